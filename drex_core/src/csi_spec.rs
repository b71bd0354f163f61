//! # CSI Specification Document
//!
//! Builds the project's CSI MasterFormat section 23 35 01 (Commercial Dryer
//! Exhaust System) from a sizing result, in the usual three-part layout:
//! Part 1 General, Part 2 Products, Part 3 Execution.
//!
//! The section is first assembled as a [`SpecDocument`], then rendered as
//! RTF (opens in any word processor for editing) or as a Typst PDF.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use drex_core::branding::Branding;
//! use drex_core::calculations::{calculate, Dryer, ManifoldSpec};
//! use drex_core::csi_spec::{build_spec, render_spec_rtf};
//! use drex_core::elevation::NoElevation;
//! use drex_core::project::Project;
//!
//! let mut project = Project::new("Laundromat", "80202", "Owner");
//! project.add_dryer(Dryer::new(300.0, 8, 10.0), 6);
//! project.manifold = ManifoldSpec::new(80.0);
//! let result = calculate(&project, &NoElevation).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! let spec = build_spec(&project, &result, &Branding::default(), date);
//! assert_eq!(spec.parts.len(), 3);
//!
//! let rtf = render_spec_rtf(&spec, &Branding::default());
//! assert!(rtf.starts_with("{\\rtf1"));
//! ```

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::branding::{hex_to_rgb, Branding};
use crate::calculations::CalculationResult;
use crate::errors::CalcResult;
use crate::pdf::{compile_pdf, escape_typst};
use crate::project::Project;

/// CSI MasterFormat section number
pub const SECTION_NUMBER: &str = "23 35 01";

/// Section title
pub const SECTION_TITLE: &str = "COMMERCIAL DRYER EXHAUST SYSTEM";

/// A complete specification section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDocument {
    pub section_number: String,
    pub title: String,
    pub parts: Vec<SpecPart>,
    /// Closing block: company, website, project, date
    pub footer: Vec<String>,
}

/// "PART 1: GENERAL" and its articles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecPart {
    pub title: String,
    pub articles: Vec<SpecArticle>,
}

/// A numbered article ("1.01 SUMMARY").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecArticle {
    pub number: String,
    pub title: String,
    /// Lettered paragraphs A, B, C...
    pub paragraphs: Vec<SpecParagraph>,
}

/// A lettered paragraph with optional numbered sub-items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecParagraph {
    pub text: String,
    pub items: Vec<String>,
}

impl SpecParagraph {
    fn text(text: impl Into<String>) -> Self {
        SpecParagraph { text: text.into(), items: Vec::new() }
    }

    fn with_items(text: impl Into<String>, items: Vec<String>) -> Self {
        SpecParagraph { text: text.into(), items }
    }
}

fn article(number: &str, title: &str, paragraphs: Vec<SpecParagraph>) -> SpecArticle {
    SpecArticle {
        number: number.to_string(),
        title: title.to_string(),
        paragraphs,
    }
}

fn lettered(texts: Vec<String>) -> Vec<SpecParagraph> {
    texts.into_iter().map(SpecParagraph::text).collect()
}

/// Paragraph letter for position `index` (0 → "A")
pub fn paragraph_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// Assemble section 23 35 01 for this project.
pub fn build_spec(project: &Project, result: &CalculationResult, branding: &Branding, date: NaiveDate) -> SpecDocument {
    let company = &branding.company;
    let controller = &branding.controller_model;
    let fan_model = result.fan.as_ref().map(|f| f.model.as_str()).unwrap_or("DEFXX");
    let cfm = format!("{:.0}", result.total_cfm);
    let sp = format!("{:.2}", result.total_static_inwc);
    let setpoint = format!("{:.2}", result.manifold.loss_inwc);

    let general = SpecPart {
        title: "PART 1: GENERAL".to_string(),
        articles: vec![
            article("1.01", "SUMMARY", vec![SpecParagraph::with_items(
                "This system shall provide the required exhaust capacity for commercial clothes dryer applications. The following are components of the system:",
                vec![
                    format!("{}, Commercial Dryer Exhaust Fan Model {}, ETL-listed to UL STD 705.", company, fan_model),
                    format!("{} Model {} Constant Pressure Controller.", company, controller),
                    "Electrical connections, by installing contractor.".to_string(),
                ],
            )]),
            article("1.02", "RELATED REQUIREMENTS", lettered(vec![
                "Section 01 41 00, REGULATORY REQUIREMENTS".to_string(),
            ])),
            article("1.03", "CODES AND STANDARDS", vec![SpecParagraph::with_items(
                "The following published specification standards apply to work in this section:",
                ["UL (Underwriters Laboratories)", "ANSI Z223.1", "NFPA 211", "International Mechanical Code", "National Electrical Code"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )]),
            article("1.04", "SUBMITTALS", vec![
                SpecParagraph::text("Submittal documents shall be provided by the local manufacturer's representative."),
                SpecParagraph::with_items(
                    "The following shall be submitted to the Owner's representative:",
                    vec![
                        "All relevant data sheets for the dryer exhaust fan, controller and related controls.".to_string(),
                        "ASHRAE duct design calculations.".to_string(),
                        "Wiring diagrams and installation manuals shall be submitted to the installing contractor prior to installation.".to_string(),
                        "Certification of listing for the actual application by an OSHA approved NRTL.".to_string(),
                    ],
                ),
            ]),
            article("1.05", "QUALITY ASSURANCE", lettered(vec![
                "All listed dryer exhaust fans shall be assembled and marked at the facility indicated by the listing control number.".to_string(),
                "Exhaust system must be able to sense pressure in the venting system and maintain constant pressure.".to_string(),
                format!("System capacity scheduled shall be minimum {} CFM at {} inches water column static pressure.", cfm, sp),
            ])),
            article("1.06", "MANUFACTURER WARRANTY", lettered(vec![format!(
                "All equipment is to be guaranteed against defects in materials and/or workmanship for a period of {} months from the date of delivery to the construction site.",
                branding.warranty_months
            )])),
        ],
    };

    let products = SpecPart {
        title: "PART 2: PRODUCTS".to_string(),
        articles: vec![
            article("2.01", "MANUFACTURER, DRYER EXHAUST SYSTEM", vec![SpecParagraph::with_items(
                format!("Furnish {} Commercial Dryer Exhaust System consisting of the following components:", company),
                vec![
                    format!("Model {} inline dryer exhaust fan with design volume of {} CFM and design pressure of {} inches water column as scheduled.", fan_model, cfm, sp),
                    format!("Model {} constant pressure controller with integrated display and alarm outputs.", controller),
                    "Current sensing relay (if required for application).".to_string(),
                ],
            )]),
            article("2.02", "DESCRIPTION, INLINE DRYER EXHAUST FAN", lettered(vec![
                "The entire dryer exhaust fan shall be constructed of G90 galvanized steel with minimum .030 thickness. The fan shall be listed to UL STD 705 and shall bear the listed mark from an OSHA approved NRTL.".to_string(),
                "The fan impeller shall be statically and dynamically balanced with permanently attached balancing weights of the same material as the impeller.".to_string(),
                "The dryer exhaust fan shall be listed for 480°F exhaust gas temperatures and shall discharge gases as scheduled on drawings. The fan shall include an integrated access panel.".to_string(),
                "The fan motor shall be electronically commutated (EC), totally enclosed and outdoor rated with minimum efficiency of 75%. The motor shall provide variable speed control for pressure management.".to_string(),
            ])),
            article("2.03", &format!("DESCRIPTION, {} CONSTANT PRESSURE CONTROLLER", controller.to_uppercase()), lettered(vec![
                format!("The {} constant pressure controller shall monitor and control pressure in the dryer exhaust duct to maintain programmed setpoint pressure.", controller),
                "The controller's pressure range shall be -1.00 in. w.c. to +1.00 in. w.c. with resolution of 0.01 in. w.c.".to_string(),
                "The controller shall provide visual LCD display, audible alarm, and dry contact alarm outputs for remote monitoring.".to_string(),
                format!("The controller shall maintain setpoint within +/-0.01 in. w.c. Setpoint for this application: {} in. w.c.", setpoint),
                format!("The {} shall include sensor verification, sleep mode, and adjustable PID control parameters.", controller),
            ])),
            article("2.04", "PERFORMANCE REQUIREMENTS", lettered(vec![
                "The dryer exhaust fan system shall reach setpoint within 15 seconds of initial demand.".to_string(),
                format!("Fan shall deliver minimum {} CFM at {} in. w.c. system static pressure.", cfm, sp),
                "The system shall include intelligent feedback signal to determine and control motor RPM.".to_string(),
                "System shall operate quietly with vibration isolation as required.".to_string(),
            ])),
            article("2.05", "SEQUENCE OF OPERATION", lettered(vec![
                format!("Upon demand signal, the {} controller activates sensor verification. Once verified, the system controls fan speed to achieve setpoint pressure.", controller),
                format!("As individual dryers call for heat, the {} adjusts fan speed to maintain constant setpoint pressure in the exhaust manifold.", controller),
                "When all dryers have satisfied, the controller engages sleep mode after programmable delay period.".to_string(),
                "System includes integrated alarm functions for low pressure, high pressure, and sensor fault conditions.".to_string(),
            ])),
            article("2.06", "ELECTRICAL REQUIREMENTS", vec![SpecParagraph::with_items(
                "Power supply shall be:",
                vec![
                    format!("{} pressure controller: 120VAC, single phase, 60Hz", controller),
                    "EC motor fan: 120VAC or 240VAC single phase, 60Hz (as scheduled)".to_string(),
                    "All wiring in accordance with National Electrical Code".to_string(),
                ],
            )]),
        ],
    };

    let execution = SpecPart {
        title: "PART 3: EXECUTION".to_string(),
        articles: vec![
            article("3.01", "INSTALLATION", lettered(vec![
                "Complete structural, mechanical, and electrical connections in accordance with manufacturer's printed instructions.".to_string(),
                format!("Install {} dryer connectors to manifold duct of {} in. diameter as shown on drawings.", result.connectors.len(), result.manifold.diameter_in),
                format!("Install manifold duct system of {:.0} feet total length with fittings as scheduled ({}).", result.manifold.length_ft, result.manifold.fittings),
                format!("Mount {} exhaust fan in location shown on drawings with proper vibration isolation and support.", fan_model),
                format!("Install {} controller in accessible location for programming and service. Mount pressure sensor in manifold as detailed.", controller),
                "Low voltage control wiring shall be minimum 18 AWG shielded wire. Maintain separation from line voltage wiring.".to_string(),
                "Provide electrical disconnects and overcurrent protection as required by NEC.".to_string(),
            ])),
            article("3.02", "STARTUP AND COMMISSIONING", lettered(vec![
                format!("System startup shall be performed by qualified {} technician or authorized representative.", company),
                "Verify all electrical connections, duct connections, and sensor locations prior to energizing system.".to_string(),
                format!("Program {} controller with setpoint pressure of {} in. w.c. and verify sensor calibration.", controller, setpoint),
                "Test system operation with all connected dryers and verify pressure control performance.".to_string(),
                "Provide training to owner's maintenance personnel on system operation, troubleshooting, and routine maintenance.".to_string(),
            ])),
        ],
    };

    SpecDocument {
        section_number: SECTION_NUMBER.to_string(),
        title: SECTION_TITLE.to_string(),
        parts: vec![general, products, execution],
        footer: vec![
            branding.full_name().to_uppercase(),
            branding.website.clone(),
            format!("Project: {}", project.meta.name),
            format!("Prepared: {}", date.format("%B %d, %Y")),
        ],
    }
}

// ============================================================================
// RTF Rendering
// ============================================================================

/// Escape text for an RTF body: control characters and anything
/// outside ASCII become RTF escapes.
fn rtf_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    // RTF \u takes a signed 16-bit value
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

/// Render the section as an RTF document.
pub fn render_spec_rtf(spec: &SpecDocument, branding: &Branding) -> String {
    let (r, g, b) = hex_to_rgb(&branding.colors.primary).unwrap_or((0, 0, 0));

    let mut out = String::new();
    out.push_str("{\\rtf1\\ansi\\ansicpg1252\\deff0\n");
    out.push_str("{\\fonttbl{\\f0\\froman Times New Roman;}{\\f1\\fswiss Arial;}}\n");
    out.push_str(&format!("{{\\colortbl ;\\red{}\\green{}\\blue{};}}\n", r, g, b));
    // US letter, 1 inch margins (twips)
    out.push_str("\\paperw12240\\paperh15840\\margl1440\\margr1440\\margt1440\\margb1440\n");

    out.push_str(&format!(
        "\\pard\\qc\\f1\\fs28\\b SECTION: {}\\b0\\par\n",
        rtf_escape(&spec.section_number)
    ));
    out.push_str(&format!("\\pard\\qc\\f1\\fs28\\b {}\\b0\\par\n\\pard\\par\n", rtf_escape(&spec.title)));

    for (i, part) in spec.parts.iter().enumerate() {
        if i > 0 {
            out.push_str("\\page\n");
        }
        out.push_str(&format!(
            "\\pard\\sb240\\sa120\\f1\\fs26\\cf1\\b {}\\b0\\cf0\\par\n",
            rtf_escape(&part.title)
        ));

        for art in &part.articles {
            out.push_str(&format!(
                "\\pard\\sb200\\sa80\\f1\\fs22\\b {} {}\\b0\\par\n",
                rtf_escape(&art.number),
                rtf_escape(&art.title)
            ));
            for (p, para) in art.paragraphs.iter().enumerate() {
                out.push_str(&format!(
                    "\\pard\\li360\\sa80\\f0\\fs22 {}. {}\\par\n",
                    paragraph_letter(p),
                    rtf_escape(&para.text)
                ));
                for (n, item) in para.items.iter().enumerate() {
                    out.push_str(&format!(
                        "\\pard\\li1080\\fi-360\\sa60\\f0\\fs22 {}.\\tab {}\\par\n",
                        n + 1,
                        rtf_escape(item)
                    ));
                }
            }
        }
    }

    out.push_str("\\page\n\\pard\\qc\\f1\\fs24\\b ");
    out.push_str(&spec.footer.iter().map(|l| rtf_escape(l)).collect::<Vec<_>>().join("\\b0\\fs20\\line "));
    out.push_str("\\b0\\par\n}\n");
    out
}

// ============================================================================
// Typst / PDF Rendering
// ============================================================================

/// Typst markup for the section.
pub fn spec_typst_source(spec: &SpecDocument, branding: &Branding) -> String {
    let mut out = format!(
        r##"#set page(paper: "us-letter", margin: 1in)
#set text(font: "Libertinus Serif", size: 11pt)
#show heading.where(level: 1): set text(fill: rgb("{}"))

#align(center)[
  #text(size: 14pt, weight: "bold")[SECTION: {}] \
  #text(size: 14pt, weight: "bold")[{}]
]

"##,
        branding.colors.primary,
        escape_typst(&spec.section_number),
        escape_typst(&spec.title)
    );

    for (i, part) in spec.parts.iter().enumerate() {
        if i > 0 {
            out.push_str("#pagebreak()\n");
        }
        out.push_str(&format!("= {}\n\n", escape_typst(&part.title)));
        for art in &part.articles {
            out.push_str(&format!("== {} {}\n\n", escape_typst(&art.number), escape_typst(&art.title)));
            for (p, para) in art.paragraphs.iter().enumerate() {
                out.push_str(&format!(
                    "#pad(left: 0.25in)[{}. {}]\n\n",
                    paragraph_letter(p),
                    escape_typst(&para.text)
                ));
                if !para.items.is_empty() {
                    out.push_str("#pad(left: 0.5in)[\n");
                    for item in &para.items {
                        out.push_str(&format!("  + {}\n", escape_typst(item)));
                    }
                    out.push_str("]\n\n");
                }
            }
        }
    }

    out.push_str("#v(36pt)\n#align(center)[\n");
    let footer: Vec<String> = spec.footer.iter().map(|l| escape_typst(l)).collect();
    out.push_str(&format!("  *{}* \\\n", footer.first().cloned().unwrap_or_default()));
    for line in footer.iter().skip(1) {
        out.push_str(&format!("  #text(size: 10pt)[{}] \\\n", line));
    }
    out.push_str("]\n");
    out
}

/// Render the section to PDF.
pub fn render_spec_pdf(spec: &SpecDocument, branding: &Branding) -> CalcResult<Vec<u8>> {
    compile_pdf("csi_spec", spec_typst_source(spec, branding), Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{calculate, Dryer, ManifoldSpec};
    use crate::elevation::NoElevation;

    fn sample() -> SpecDocument {
        let mut project = Project::new("Hotel {North}", "10001", "Owner");
        project.add_dryer(Dryer::new(300.0, 8, 10.0), 5);
        project.manifold = ManifoldSpec::new(60.0);
        let result = calculate(&project, &NoElevation).unwrap();
        build_spec(&project, &result, &Branding::default(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    #[test]
    fn test_structure() {
        let spec = sample();
        assert_eq!(spec.section_number, "23 35 01");
        let titles: Vec<_> = spec.parts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["PART 1: GENERAL", "PART 2: PRODUCTS", "PART 3: EXECUTION"]);
        assert_eq!(spec.parts[0].articles.len(), 6);
        assert_eq!(spec.parts[1].articles.len(), 6);
        assert_eq!(spec.parts[2].articles.len(), 2);
        assert_eq!(spec.footer[3], "Prepared: June 02, 2025");
    }

    #[test]
    fn test_result_values_flow_in() {
        let spec = sample();
        let qa = &spec.parts[0].articles[4].paragraphs[2].text;
        assert!(qa.contains("minimum 1500 CFM"), "{}", qa);
        let install = &spec.parts[2].articles[0].paragraphs[1].text;
        assert!(install.starts_with("Install 5 dryer connectors"));
        let summary = &spec.parts[0].articles[0].paragraphs[0].items[0];
        assert!(summary.contains("Model DEF"));
    }

    #[test]
    fn test_paragraph_letters() {
        assert_eq!(paragraph_letter(0), 'A');
        assert_eq!(paragraph_letter(3), 'D');
    }

    #[test]
    fn test_rtf_escape() {
        assert_eq!(rtf_escape("a{b}c\\"), "a\\{b\\}c\\\\");
        assert_eq!(rtf_escape("480°F"), "480\\u176?F");
    }

    #[test]
    fn test_rtf_document() {
        let rtf = render_spec_rtf(&sample(), &Branding::default());
        assert!(rtf.starts_with("{\\rtf1"));
        assert!(rtf.trim_end().ends_with('}'));
        assert!(rtf.contains("SECTION: 23 35 01"));
        assert!(rtf.contains("\\red42\\green56\\blue83"));
        assert!(rtf.contains("Project: Hotel \\{North\\}"));
        assert_eq!(rtf.matches("\\page").count(), 3);
    }

    #[test]
    fn test_typst_source() {
        let source = spec_typst_source(&sample(), &Branding::default());
        assert!(source.contains("= PART 2: PRODUCTS"));
        assert!(source.contains("== 2.03 DESCRIPTION, L150 CONSTANT PRESSURE CONTROLLER"));
        assert!(source.contains("  + "));
    }

    #[test]
    fn test_pdf() {
        let pdf = render_spec_pdf(&sample(), &Branding::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
