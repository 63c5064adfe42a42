use anyhow::{Context, Result};
use checkup_core::{ExtractionConfig, Extractor, writer};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod formatter;
mod logging;

use formatter::{Status, Summary};
use logging::LogFormat;

const DEFAULT_CONFIG_FILE: &str = "checkupconv.toml";

#[derive(Parser)]
#[command(name = "checkupconv")]
#[command(about = "Convert checkup report workbooks into template-shaped tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Report workbook to convert (xlsx, xlsm, xlsb, xls, ods)
    #[arg(value_name = "SOURCE", required_unless_present = "print_config")]
    source: Option<PathBuf>,

    /// Template workbook whose first row lists the output columns
    #[arg(short, long, value_name = "TEMPLATE", required_unless_present = "print_config")]
    template: Option<PathBuf>,

    /// Output file (default: next to SOURCE with the configured suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Extract and report without writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less log output (-q warnings, -qq errors)
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Log format on stderr
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(
        logging::level_from_flags(cli.verbose, cli.quiet),
        cli.log_format,
    );

    let config = load_config(cli.config.as_ref())?;
    config.validate().context("Invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let (Some(source), Some(template)) = (cli.source.as_ref(), cli.template.as_ref()) else {
        anyhow::bail!("SOURCE and --template are required");
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| writer::output_path_for(source, &config.output_suffix));
    let remainder_column = config.remainder_column.clone();
    let extractor = Extractor::with_config(config);

    let extraction = extractor
        .extract_files(source, template)
        .with_context(|| format!("Failed to convert file: {}", source.display()))?;

    let status = if cli.dry_run && !extraction.is_empty() {
        Status::DryRun
    } else {
        let outcome = extractor
            .write_extraction(&extraction, &output)
            .with_context(|| format!("Failed to write output: {}", output.display()))?;
        Status::from(&outcome)
    };

    let output = (status != Status::Empty).then_some(output);
    let summary = Summary::new(source, output, status, &extraction, &remainder_column);
    match cli.format {
        OutputFormat::Human => formatter::print_human(&summary),
        OutputFormat::Json => formatter::print_json(&summary)?,
    }

    // Empty result is a distinct outcome, not a failure
    if status == Status::Empty {
        std::process::exit(2);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ExtractionConfig> {
    if let Some(config_path) = path {
        return ExtractionConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_config_path.exists() {
        ExtractionConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(ExtractionConfig::default())
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
    fn test_print_config_needs_no_inputs() {
        let cli = Cli::try_parse_from(["checkupconv", "--print-config"]).unwrap();
        assert!(cli.print_config);
        assert!(cli.source.is_none());

        assert!(Cli::try_parse_from(["checkupconv", "report.xlsx"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "checkupconv",
            "report.xlsx",
            "-t",
            "template.xlsx",
            "-vv",
            "--dry-run",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.dry_run);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
