//! # Drex CLI
//!
//! Sizes a commercial dryer exhaust system from a JSON project file or from
//! interactive prompts, and writes the proposal PDF, CSI specification and
//! presentation outline.
//!
//! ```text
//! drex calculate --input project.json --pdf proposal.pdf --spec spec.rtf
//! drex calculate --input project.json --elevation-ft 5280 --json
//! drex interactive --offline
//! drex fans
//! drex equations
//! ```

mod elevation_http;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::{Args, Parser, Subcommand};

use drex_core::branding::Branding;
use drex_core::calculations::{calculate, CalculationResult, Dryer, ManifoldSpec};
use drex_core::catalog::{FittingCount, FittingType, DEF_FANS};
use drex_core::csi_spec::{build_spec, render_spec_pdf, render_spec_rtf};
use drex_core::elevation::{ElevationProvider, FixedElevation, NoElevation};
use drex_core::equations::generate_equations_markdown;
use drex_core::errors::{CalcError, CalcResult};
use drex_core::outline::presentation_outline;
use drex_core::pdf::render_proposal_pdf;
use drex_core::project::Project;

use crate::elevation_http::HttpElevation;

/// Per-request timeout for the elevation services
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "drex", version, about = "Commercial dryer exhaust system sizing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Size a project from a JSON file
    Calculate(CalculateArgs),
    /// Prompt for a uniform bank of dryers and size it
    Interactive {
        #[command(flatten)]
        elevation: ElevationArgs,
    },
    /// List the DEF fan catalog
    Fans,
    /// Print the equations reference (Markdown)
    Equations,
}

#[derive(Args)]
struct ElevationArgs {
    /// Use this site elevation (ft) instead of looking up the zip code
    #[arg(long, conflicts_with = "offline")]
    elevation_ft: Option<f64>,

    /// Skip the zip code lookup and use the project's default elevation
    #[arg(long)]
    offline: bool,
}

impl ElevationArgs {
    fn provider(&self) -> CalcResult<Box<dyn ElevationProvider>> {
        if let Some(feet) = self.elevation_ft {
            return Ok(Box::new(FixedElevation::feet(feet)));
        }
        if self.offline {
            return Ok(Box::new(NoElevation));
        }
        let http = HttpElevation::new(LOOKUP_TIMEOUT).map_err(|e| CalcError::Internal { message: e.to_string() })?;
        Ok(Box::new(http))
    }
}

#[derive(Args)]
struct CalculateArgs {
    /// Project JSON file
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    elevation: ElevationArgs,

    /// Branding JSON file (defaults to LF Systems)
    #[arg(long)]
    branding: Option<PathBuf>,

    /// Write the proposal PDF here
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Write the CSI specification (RTF) here
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Write the CSI specification (PDF) here
    #[arg(long)]
    spec_pdf: Option<PathBuf>,

    /// Write the presentation outline (text) here
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Print the result as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let json_errors = matches!(&cli.command, Command::Calculate(args) if args.json);
    let outcome = match cli.command {
        Command::Calculate(args) => run_calculate(&args),
        Command::Interactive { elevation } => run_interactive(&elevation),
        Command::Fans => {
            print_fans();
            Ok(())
        }
        Command::Equations => {
            print!("{}", generate_equations_markdown());
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, json_errors);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &CalcError, json: bool) {
    if json {
        if let Ok(text) = serde_json::to_string_pretty(e) {
            eprintln!("{}", text);
            return;
        }
    }
    eprintln!("Error [{}]: {}", e.error_code(), e);
}

fn io_error(path: &Path, e: io::Error) -> CalcError {
    CalcError::Internal {
        message: format!("{}: {}", path.display(), e),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    fs::write(path, bytes).map_err(|e| io_error(path, e))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn run_calculate(args: &CalculateArgs) -> CalcResult<()> {
    let project: Project = read_json(&args.input)?;
    let branding: Branding = match &args.branding {
        Some(path) => read_json(path)?,
        None => Branding::default(),
    };
    branding.validate()?;

    let provider = args.elevation.provider()?;
    let result = calculate(&project, provider.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&project, &result);
    }

    let today = Local::now().date_naive();
    if let Some(path) = &args.pdf {
        write_file(path, &render_proposal_pdf(&project, &result, &branding)?)?;
    }
    if args.spec.is_some() || args.spec_pdf.is_some() {
        let spec = build_spec(&project, &result, &branding, today);
        if let Some(path) = &args.spec {
            write_file(path, render_spec_rtf(&spec, &branding).as_bytes())?;
        }
        if let Some(path) = &args.spec_pdf {
            write_file(path, &render_spec_pdf(&spec, &branding)?)?;
        }
    }
    if let Some(path) = &args.outline {
        write_file(path, presentation_outline(&project, &result, &branding, today).as_bytes())?;
    }
    Ok(())
}

// ============================================================================
// Interactive Mode
// ============================================================================

fn read_input() -> Option<String> {
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{} [{}]: ", prompt, default);
    read_input().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    print!("{} [{}]: ", prompt, default);
    read_input().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn prompt_string(prompt: &str, default: &str) -> String {
    print!("{} [{}]: ", prompt, default);
    match read_input() {
        Some(s) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}

fn elbows(count: u32) -> Vec<FittingCount> {
    if count == 0 {
        Vec::new()
    } else {
        vec![FittingCount::new(FittingType::Elbow90Standard, count)]
    }
}

fn run_interactive(elevation: &ElevationArgs) -> CalcResult<()> {
    println!("Drex - Dryer Exhaust Sizing");
    println!("===========================");
    println!();

    let name = prompt_string("Project name", "New Project");
    let zip = prompt_string("Site zip code", "10001");
    let prepared_for = prompt_string("Prepared for", "");

    let count = prompt_u32("Number of dryers", 4) as usize;
    let cfm = prompt_f64("Exhaust per dryer (CFM)", 300.0);
    let connector_in = prompt_u32("Connector diameter (in)", 8);
    let connector_ft = prompt_f64("Connector length (ft)", 10.0);
    let connector_elbows = prompt_u32("Connector 90° elbows", 1);

    let manifold_ft = prompt_f64("Manifold length (ft)", 50.0);
    let manifold_elbows = prompt_u32("Manifold 90° elbows", 2);

    let mut project = Project::new(name, zip, prepared_for);
    let dryer = Dryer::new(cfm, connector_in, connector_ft).with_fittings(elbows(connector_elbows));
    let added = project.add_dryer(dryer, count);
    if added < count {
        println!("Only {} dryers added (limit reached)", added);
    }

    let mut fittings = elbows(manifold_elbows);
    fittings.push(FittingCount::one(FittingType::Exit));
    project.manifold = ManifoldSpec::new(manifold_ft).with_fittings(fittings);

    let provider = elevation.provider()?;
    let result = calculate(&project, provider.as_ref())?;

    println!();
    print_summary(&project, &result);
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "[OK]"
    } else {
        "[!!]"
    }
}

fn print_summary(project: &Project, result: &CalculationResult) {
    println!("═══════════════════════════════════════");
    println!("  DRYER EXHAUST SIZING: {}", project.meta.name);
    println!("═══════════════════════════════════════");
    println!();
    match &result.location {
        Some(loc) if !loc.place().is_empty() => println!("Site:       {} ({})", loc.place(), project.meta.zip_code),
        _ => println!("Site:       zip {}", project.meta.zip_code),
    }
    println!("Elevation:  {:.0} ft", result.elevation_ft);
    println!("Density:    {:.4} lb/ft³", result.air_density);
    println!("Total flow: {:.0} CFM ({} dryers)", result.total_cfm, result.connectors.len());
    println!();
    println!("Connectors:");
    for c in &result.connectors {
        println!(
            "  {:<12} {:>4.0} CFM  {:>2} in  {:>5.1} ft  {:>5.0} FPM  {:.3} in. WC {}",
            c.label,
            c.flow_cfm,
            c.diameter_in,
            c.length_ft,
            c.velocity_fpm,
            c.loss_inwc,
            status_icon(!c.exceeds_limit)
        );
    }
    println!();
    let m = &result.manifold;
    println!(
        "Manifold:   {} in ({}), {:.0} ft, {:.0} FPM, {:.3} in. WC {}",
        m.diameter_in,
        if m.optimized { "optimized" } else { "manual" },
        m.length_ft,
        m.velocity_fpm,
        m.loss_inwc,
        status_icon(!m.exceeds_target)
    );
    println!(
        "Static:     {:.3} in. WC (manifold {:.3} + worst connector {:.3})",
        result.total_static_inwc, m.loss_inwc, result.worst_connector_loss_inwc
    );
    match &result.fan {
        Some(fan) => {
            print!("Fan:        {}", fan.model);
            if let (Some(cfm), Some(margin)) = (fan.available_cfm, fan.margin_percent) {
                print!(" ({:.0} CFM available, {:+.0}% margin)", cfm, margin);
            }
            println!();
        }
        None => println!("Fan:        none in catalog"),
    }

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &result.warnings {
            println!("  [{}] {}", w.code(), w.message());
        }
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if result.passes() { "PASS" } else { "REVIEW" });
    println!("═══════════════════════════════════════");
}

fn print_fans() {
    println!("{:<8} {:>9} {:>12}", "Model", "Max CFM", "Max SP (WC)");
    for fan in DEF_FANS.iter() {
        println!("{:<8} {:>9.0} {:>12.2}", fan.name, fan.max_cfm, fan.max_static_inwc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_calculate_args() {
        let cli = Cli::try_parse_from([
            "drex", "calculate", "--input", "p.json", "--elevation-ft", "5280", "--spec", "s.rtf", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Calculate(args) => {
                assert_eq!(args.elevation.elevation_ft, Some(5280.0));
                assert!(!args.elevation.offline);
                assert_eq!(args.spec, Some(PathBuf::from("s.rtf")));
                assert!(args.json);
            }
            _ => panic!("expected calculate"),
        }
    }

    #[test]
    fn test_offline_conflicts_with_elevation() {
        let parsed = Cli::try_parse_from(["drex", "interactive", "--offline", "--elevation-ft", "10"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_elbows() {
        assert!(elbows(0).is_empty());
        assert_eq!(elbows(2)[0].count, 2);
    }
}
