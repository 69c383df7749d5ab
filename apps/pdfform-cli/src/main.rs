//! pdfform command-line front end
//!
//! Exports placed fields into a PDF as an AcroForm, or reports page geometry.
//! Logs go to stderr so stdout stays machine-readable JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pdfform_core::{export_form, inspect_pages, parse_field_specs, ExportOptions, ExportReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdfform")]
#[command(version, about = "Place interactive form fields into PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export fields from a JSON file into a PDF form
    Export(ExportArgs),
    /// Print the size, origin and rotation of every page as JSON
    Inspect {
        /// Source PDF
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ExportArgs {
    /// Source PDF
    #[arg(short, long)]
    input: PathBuf,

    /// JSON array of field placements
    #[arg(short, long)]
    fields: PathBuf,

    /// Where to write the resulting PDF
    #[arg(short, long)]
    output: PathBuf,

    /// Bake page rotation into the content and re-project the fields
    #[arg(long)]
    normalize_rotation: bool,

    /// TOML file with export options
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Export(args) => {
            let report = run_export(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Inspect { input } => {
            let bytes = read_input(&input)?;
            let pages = inspect_pages(&bytes)
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
    }

    Ok(())
}

fn run_export(args: &ExportArgs) -> anyhow::Result<ExportReport> {
    let options = load_options(args)?;
    let source = read_input(&args.input)?;
    let fields_json = fs::read_to_string(&args.fields)
        .with_context(|| format!("Failed to read fields file: {}", args.fields.display()))?;
    let fields = parse_field_specs(&fields_json)
        .with_context(|| format!("Failed to parse {}", args.fields.display()))?;

    tracing::info!(
        input = %args.input.display(),
        fields = fields.len(),
        normalize = options.normalize_page_rotation,
        "Exporting form"
    );

    let report = export_form(&source, &fields, &options)
        .with_context(|| format!("Failed to export {}", args.input.display()))?;

    fs::write(&args.output, &report.bytes)
        .with_context(|| format!("Failed to write output: {}", args.output.display()))?;
    tracing::info!(output = %args.output.display(), bytes = report.bytes.len(), "Wrote PDF");

    Ok(report)
}

/// Options from `--config`, with command-line flags layered on top
fn load_options(args: &ExportArgs) -> anyhow::Result<ExportOptions> {
    let mut options = match &args.config {
        Some(path) => ExportOptions::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ExportOptions::default(),
    };
    if args.normalize_rotation {
        options.normalize_page_rotation = true;
    }
    Ok(options)
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read input PDF: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_command() {
        let cli = Cli::try_parse_from([
            "pdfform",
            "export",
            "--input",
            "in.pdf",
            "--fields",
            "fields.json",
            "--output",
            "out.pdf",
            "--normalize-rotation",
        ])
        .unwrap();

        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.input, PathBuf::from("in.pdf"));
                assert_eq!(args.fields, PathBuf::from("fields.json"));
                assert_eq!(args.output, PathBuf::from("out.pdf"));
                assert!(args.normalize_rotation);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_export_requires_output() {
        let result = Cli::try_parse_from(["pdfform", "export", "-i", "in.pdf", "-f", "f.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flag_overrides_config_default() {
        let args = ExportArgs {
            input: PathBuf::from("in.pdf"),
            fields: PathBuf::from("fields.json"),
            output: PathBuf::from("out.pdf"),
            normalize_rotation: true,
            config: None,
        };
        let options = load_options(&args).unwrap();
        assert!(options.normalize_page_rotation);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let args = ExportArgs {
            input: PathBuf::from("in.pdf"),
            fields: PathBuf::from("fields.json"),
            output: PathBuf::from("out.pdf"),
            normalize_rotation: false,
            config: Some(PathBuf::from("/nonexistent/pdfform.toml")),
        };
        let err = load_options(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/pdfform.toml"));
    }
}
