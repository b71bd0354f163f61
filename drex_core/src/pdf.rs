//! # PDF Generation Module
//!
//! Generates the customer-facing system proposal from a sizing result using
//! Typst, compiled entirely in memory.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected via string replacement before compilation
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! The CSI specification PDF ([`crate::csi_spec`]) shares the same world.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drex_core::branding::Branding;
//! use drex_core::calculations::{calculate, Dryer, ManifoldSpec};
//! use drex_core::elevation::NoElevation;
//! use drex_core::pdf::render_proposal_pdf;
//! use drex_core::project::Project;
//!
//! let mut project = Project::new("Laundromat", "80202", "Owner");
//! project.add_dryer(Dryer::new(300.0, 8, 10.0), 6);
//! project.manifold = ManifoldSpec::new(80.0);
//!
//! let result = calculate(&project, &NoElevation).unwrap();
//! let pdf_bytes = render_proposal_pdf(&project, &result, &Branding::default()).unwrap();
//! std::fs::write("proposal.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::branding::Branding;
use crate::calculations::CalculationResult;
use crate::errors::{CalcError, CalcResult};
use crate::project::Project;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Fonts bundled with typst-assets, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect()
});

static FONT_BOOK: Lazy<LazyHash<FontBook>> = Lazy::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    library: LazyHash<Library>,
    /// Date reported to `datetime.today()`
    today: NaiveDate,
}

impl PdfWorld {
    fn new(source: String, today: NaiveDate) -> Self {
        PdfWorld {
            main: Source::detached(source),
            library: LazyHash::new(Library::default()),
            today,
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            u8::try_from(self.today.month()).ok()?,
            u8::try_from(self.today.day()).ok()?,
        )
    }
}

/// Compile Typst markup to PDF bytes.
///
/// `report` names the document in error messages.
pub(crate) fn compile_pdf(report: &str, source: String, today: NaiveDate) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source, today);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed(report, format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed(report, format!("PDF export failed: {}", error_msgs.join("; ")))
    })
}

// ============================================================================
// Proposal Template
// ============================================================================

const PROPOSAL_TEMPLATE: &str = r##"
#let primary = rgb("{{PRIMARY}}")
#let secondary = rgb("{{SECONDARY}}")
#let accent = rgb("{{ACCENT}}")
#let brandgray = rgb("{{GRAY}}")

#set page(
  paper: "us-letter",
  margin: 0.75in,
  header: align(right)[
    #text(size: 9pt, fill: brandgray)[{{COMPANY_FULL}}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + brandgray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{{PROJECT_NAME}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)
#show heading.where(level: 2): set text(fill: primary)

// Title Block
#align(center)[
  #text(size: 14pt, weight: "bold", fill: secondary)[{{COMPANY}}]
  #v(8pt)
  #text(size: 24pt, weight: "bold", fill: primary)[Commercial Dryer Exhaust \ System Proposal]
  #v(4pt)
  #text(size: 14pt, style: "italic", fill: secondary)[{{PROJECT_NAME}}]
]

#v(12pt)

#table(
  columns: (2fr, 4fr),
  inset: 8pt,
  stroke: 0.5pt + brandgray,
  fill: (x, _) => if x == 0 { rgb("#f0f2f6") },
  [*Project Location:*], [{{LOCATION}}],
  [*Zip Code:*], [{{ZIP}}],
  [*Elevation:*], [{{ELEVATION}} ft],
  [*Prepared For:*], [{{PREPARED_FOR}}],
  [*Contact:*], [{{EMAIL}}],
  [*Date:*], [{{DATE}}],
)

== Executive Summary

{{COMPANY}} is pleased to provide this dryer exhaust system solution for your facility.
The design below was sized for the airflow and static pressure of every connected dryer.

*System Highlights:*
- {{DRYER_COUNT}} commercial dryers supported
- {{TOTAL_CFM}} CFM total exhaust airflow
- {{MANIFOLD_DIA}}" manifold duct system
- {{FAN_SERIES}} exhaust fan with {{CONTROLLER}} constant pressure control

== Recommended System Configuration

#table(
  columns: (3fr, 2fr),
  inset: 10pt,
  stroke: 1pt + secondary,
  fill: (_, y) => if y == 0 { secondary } else if calc.even(y) { rgb("#f8f9fa") },
  table.header(text(fill: white)[*SPECIFICATION*], text(fill: white)[*VALUE*]),
  [Total System Airflow], [{{TOTAL_CFM}} CFM],
  [Manifold Diameter], [{{MANIFOLD_DIA}}" ({{MANIFOLD_MODE}})],
  [Manifold Length], [{{MANIFOLD_LENGTH}} ft],
  [System Static Pressure], [{{TOTAL_SP}} in. WC],
  [Recommended Fan], [{{FAN_MODEL}}],
  [Controller], [{{CONTROLLER}} Constant Pressure],
)

#v(8pt)

#let warning_count = {{WARNING_COUNT}}
#block(
  width: 100%,
  fill: if warning_count == 0 { rgb("#d4edda") } else { rgb("#f8d7da") },
  inset: 12pt,
  radius: 4pt,
)[
  #if warning_count == 0 [
    *All pressure losses are within design limits.*
  ] else [
    *Design Warnings*
{{WARNING_ITEMS}}
  ]
]

#pagebreak()

== System Design Details

=== Dryer Connectors

#table(
  columns: (auto, 1fr, auto, auto, auto, 1.4fr, auto, auto),
  inset: 5pt,
  stroke: 0.5pt + brandgray,
  align: (center, left, right, center, right, left, right, center),
  fill: (_, y) => if y == 0 { primary },
  table.header(
    text(fill: white, size: 9pt)[*\#*],
    text(fill: white, size: 9pt)[*Dryer*],
    text(fill: white, size: 9pt)[*CFM*],
    text(fill: white, size: 9pt)[*Dia.*],
    text(fill: white, size: 9pt)[*Length*],
    text(fill: white, size: 9pt)[*Fittings*],
    text(fill: white, size: 9pt)[*Loss (in. WC)*],
    text(fill: white, size: 9pt)[*Status*],
  ),
{{DRYER_ROWS}}
)

Connector limit: {{CONNECTOR_LIMIT}} in. WC. Worst connector loss: {{WORST_CONNECTOR}} in. WC.

=== Manifold

- Length: {{MANIFOLD_LENGTH}} ft
- Diameter: {{MANIFOLD_DIA}} in ({{MANIFOLD_MODE}})
- Fittings: {{MANIFOLD_FITTINGS}}
- Additional K: {{MANIFOLD_ADD_K}}
- Airflow: {{TOTAL_CFM}} CFM at {{MANIFOLD_VELOCITY}} FPM
- Total K: {{MANIFOLD_K}}
- Pressure Loss: {{MANIFOLD_LOSS}} in. WC (target {{MANIFOLD_TARGET}} in. WC)

=== Exhaust Fan Selection

{{FAN_SECTION}}

=== System Curve

The system curve $S P = k Q^2$ passes through the manifold operating point
({{TOTAL_CFM}} CFM at {{MANIFOLD_LOSS}} in. WC).

#table(
  columns: (1fr, 1fr, 1fr),
  inset: 5pt,
  stroke: 0.5pt + brandgray,
  align: right,
  table.header([*Airflow (CFM)*], [*System SP (in. WC)*], [*Fan SP (in. WC)*]),
{{CURVE_ROWS}}
)

== Engineering Notes

- Calculations per ASHRAE Handbook - Fundamentals, duct design chapter
- Pressure loss: $Delta P = (0.3 L \/ D + Sigma K) rho (V \/ 1096.2)^2$
- Air density: {{AIR_DENSITY}} lb/ft#super[3] at {{ELEVATION}} ft{{TEMPERATURE_NOTE}}
- System static pressure: manifold loss plus the largest connector loss
- Code compliance: IMC, NFPA 211, UL 705

#pagebreak()

== Next Steps

+ *Review & Approval.* Review this proposal and confirm it meets your project requirements.
+ *Detailed Engineering.* Submittal drawings and specifications follow approval.
+ *Equipment Procurement.* Equipment is manufactured and shipped to your project site.
+ *Installation Support.* {{COMPANY}} provides installation support and startup assistance.
+ *Training & Warranty.* Operator training and a {{WARRANTY}}-month equipment warranty are included.

== Contact Information

*{{COMPANY}}* \
{{PARENT_LINE}}
Website: {{WEBSITE}} \
Phone: {{PHONE}} \
Email: {{CONTACT_EMAIL}}

#v(24pt)
#align(center)[
  #text(size: 8pt, fill: brandgray)[
    This proposal is valid for {{VALID_DAYS}} days from date of issue.
    Specifications subject to change based on final project requirements. \
    © {{YEAR}} {{COMPANY_FULL}}. All rights reserved.
  ]
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render the system proposal to PDF, dated today.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::RenderFailed)` - If Typst compilation or export fails
pub fn render_proposal_pdf(project: &Project, result: &CalculationResult, branding: &Branding) -> CalcResult<Vec<u8>> {
    let today = Local::now().date_naive();
    let source = proposal_source(project, result, branding, today);
    compile_pdf("proposal", source, today)
}

/// Typst markup for the proposal, including the equations appendix.
pub fn proposal_source(project: &Project, result: &CalculationResult, branding: &Branding, date: NaiveDate) -> String {
    let manifold = &result.manifold;

    let location = result
        .location
        .as_ref()
        .map(|l| l.place())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "N/A".to_string());

    let warning_items: String = result
        .warnings
        .iter()
        .map(|w| format!("    - {}\n", escape_typst(&w.message())))
        .collect();

    let temperature_note = project
        .settings
        .exhaust_temperature_f
        .map(|t| format!(", {:.0}°F exhaust", t))
        .unwrap_or_default();

    let parent_line = if branding.parent_company.is_empty() {
        String::new()
    } else {
        format!("A Division of {} \\\n", escape_typst(&branding.parent_company))
    };

    let mut source = PROPOSAL_TEMPLATE
        .replace("{{PRIMARY}}", &branding.colors.primary)
        .replace("{{SECONDARY}}", &branding.colors.secondary)
        .replace("{{ACCENT}}", &branding.colors.accent)
        .replace("{{GRAY}}", &branding.colors.gray)
        .replace("{{COMPANY_FULL}}", &escape_typst(&branding.full_name()))
        .replace("{{COMPANY}}", &escape_typst(&branding.company))
        .replace("{{PARENT_LINE}}", &parent_line)
        .replace("{{FAN_SERIES}}", &escape_typst(&branding.fan_series))
        .replace("{{CONTROLLER}}", &escape_typst(&branding.controller_model))
        .replace("{{WEBSITE}}", &escape_typst(&branding.website))
        .replace("{{PHONE}}", &escape_typst(&branding.phone))
        .replace("{{CONTACT_EMAIL}}", &escape_typst(&branding.email))
        .replace("{{WARRANTY}}", &branding.warranty_months.to_string())
        .replace("{{VALID_DAYS}}", &branding.proposal_valid_days.to_string())
        .replace("{{YEAR}}", &date.year().to_string())
        .replace("{{PROJECT_NAME}}", &escape_typst(&project.meta.name))
        .replace("{{PREPARED_FOR}}", &escape_or_na(&project.meta.prepared_for))
        .replace("{{EMAIL}}", &escape_or_na(&project.meta.email))
        .replace("{{ZIP}}", &escape_typst(&project.meta.zip_code))
        .replace("{{LOCATION}}", &escape_typst(&location))
        .replace("{{DATE}}", &date.format("%B %d, %Y").to_string())
        .replace("{{ELEVATION}}", &format!("{:.0}", result.elevation_ft))
        .replace("{{AIR_DENSITY}}", &format!("{:.4}", result.air_density))
        .replace("{{TEMPERATURE_NOTE}}", &temperature_note)
        .replace("{{DRYER_COUNT}}", &result.connectors.len().to_string())
        .replace("{{TOTAL_CFM}}", &format!("{:.0}", result.total_cfm))
        .replace("{{TOTAL_SP}}", &format!("{:.3}", result.total_static_inwc))
        .replace("{{MANIFOLD_DIA}}", &manifold.diameter_in.to_string())
        .replace("{{MANIFOLD_MODE}}", if manifold.optimized { "optimized" } else { "specified" })
        .replace("{{MANIFOLD_LENGTH}}", &format!("{:.1}", manifold.length_ft))
        .replace("{{MANIFOLD_FITTINGS}}", &escape_typst(&manifold.fittings))
        .replace("{{MANIFOLD_ADD_K}}", &format!("{:.2}", manifold.additional_k))
        .replace("{{MANIFOLD_VELOCITY}}", &format!("{:.0}", manifold.velocity_fpm))
        .replace("{{MANIFOLD_K}}", &format!("{:.2}", manifold.total_k))
        .replace("{{MANIFOLD_LOSS}}", &format!("{:.3}", manifold.loss_inwc))
        .replace("{{MANIFOLD_TARGET}}", &format!("{:.2}", project.settings.manifold_target_inwc))
        .replace("{{CONNECTOR_LIMIT}}", &format!("{:.2}", project.settings.connector_limit_inwc))
        .replace("{{WORST_CONNECTOR}}", &format!("{:.3}", result.worst_connector_loss_inwc))
        .replace(
            "{{FAN_MODEL}}",
            &result.fan.as_ref().map(|f| f.model.clone()).unwrap_or_else(|| "Contact Us".to_string()),
        )
        .replace("{{FAN_SECTION}}", &fan_section(result, branding))
        .replace("{{WARNING_COUNT}}", &result.warnings.len().to_string())
        .replace("{{WARNING_ITEMS}}", &warning_items)
        .replace("{{DRYER_ROWS}}", &dryer_rows(result))
        .replace("{{CURVE_ROWS}}", &curve_rows(result));

    source.push_str(&result.equations.generate_appendix_typst());
    source
}

fn escape_or_na(s: &str) -> String {
    if s.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape_typst(s)
    }
}

/// Escape special Typst characters in user-provided text.
///
/// Braces are escaped too, so user text never forms a `{{PLACEHOLDER}}`.
pub(crate) fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            '/' => "\\/".to_string(),
            '=' => "\\=".to_string(),
            '-' => "\\-".to_string(),
            '+' => "\\+".to_string(),
            '~' => "\\~".to_string(),
            '{' => "\\{".to_string(),
            '}' => "\\}".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Connector table rows
fn dryer_rows(result: &CalculationResult) -> String {
    result
        .connectors
        .iter()
        .map(|c| {
            format!(
                "  [{}], [{}], [{:.0}], [{}\"], [{:.1} ft], [{}], [{:.3}], [{}],",
                c.index + 1,
                escape_typst(&c.label),
                c.flow_cfm,
                c.diameter_in,
                c.length_ft,
                escape_typst(&c.fittings),
                c.loss_inwc,
                if c.exceeds_limit { "#text(fill: accent)[HIGH]" } else { "OK" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn curve_rows(result: &CalculationResult) -> String {
    result
        .system_curve
        .iter()
        .map(|p| {
            let fan = p.fan_static_inwc.map(|sp| format!("{:.2}", sp)).unwrap_or_else(|| "-".to_string());
            format!("  [{:.0}], [{:.3}], [{}],", p.cfm, p.system_static_inwc, fan)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fan_section(result: &CalculationResult, branding: &Branding) -> String {
    let Some(fan) = &result.fan else {
        return format!(
            "#text(fill: accent)[*No {} fan covers {:.0} CFM at {:.3} in. WC.*] \
             Contact {} to review a multiple-fan or split-manifold design.",
            escape_typst(&branding.fan_series),
            result.total_cfm,
            result.total_static_inwc,
            escape_typst(&branding.company)
        );
    };

    let mut section = format!(
        "*Model:* {} \\\n*Maximum Capacity:* {:.0} CFM, {:.2} in. WC \\\n",
        escape_typst(&fan.model),
        fan.max_cfm,
        fan.max_static_inwc
    );
    match (fan.available_cfm, fan.margin_percent) {
        (Some(available), Some(margin)) => {
            section.push_str(&format!(
                "*Available CFM at Operating Point:* {:.0} CFM \\\n*Design Margin:* {:.1}%\n\n",
                available, margin
            ));
            if margin >= 10.0 {
                section.push_str("#text(fill: rgb(\"#00a86b\"))[Fan properly sized with adequate margin.]\n");
            } else {
                section.push_str(&format!(
                    "#text(fill: accent)[Margin below 10%. Contact {} for optimization recommendations.]\n",
                    escape_typst(&branding.company)
                ));
            }
        }
        _ => section.push_str("*Operating point:* beyond the published fan curve\n"),
    }
    if !fan.alternatives.is_empty() {
        section.push_str(&format!("\n*Alternatives:* {}\n", fan.alternatives.join(", ")));
    }
    section
}
