use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ot-classifier",
    about = "Classify a software catalog as OT/ICS related using an LLM",
    version
)]
pub struct Cli {
    /// Input CSV with `caption` and `vendor` columns
    #[arg(default_value = "software.csv")]
    pub input: PathBuf,

    /// Output CSV (columns: scale, caption, vendor, brief)
    #[arg(short, long, default_value = "output.csv", value_name = "FILE")]
    pub output: PathBuf,

    /// Settings file [default: ./.ot-classifier/config.toml, fallback ~/.config/ot-classifier/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Azure deployment name, overrides the settings file
    #[arg(long, value_name = "NAME")]
    pub deployment: Option<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every row in the report and log each classification
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_file_names() {
        let cli = Cli::parse_from(["ot-classifier"]);
        assert_eq!(cli.input, PathBuf::from("software.csv"));
        assert_eq!(cli.output, PathBuf::from("output.csv"));
        assert!(matches!(cli.report, ReportFormat::Terminal));
        assert!(cli.deployment.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "ot-classifier",
            "catalog.csv",
            "-o",
            "rated.csv",
            "--deployment",
            "gpt-35-turbo",
            "--report",
            "json",
            "-q",
        ]);
        assert_eq!(cli.input, PathBuf::from("catalog.csv"));
        assert_eq!(cli.output, PathBuf::from("rated.csv"));
        assert_eq!(cli.deployment.as_deref(), Some("gpt-35-turbo"));
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(cli.quiet);
    }
}
