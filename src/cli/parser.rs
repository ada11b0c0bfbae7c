use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{AppConfig, ExportConfig, ResolveConfig};
use crate::error::ConfigError;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Debug)]
pub enum FormatOpt {
    Csv,
    Xlsx,
    Both,
}

impl FormatOpt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for FormatOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "geo_matcher",
    version,
    about = "Geo market-label tools: DMA name-to-code conversion and Geo-ID filtering",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert market names in a data file to codes via a reference mapping
    Convert(ConvertArgs),
    /// Keep rows of a data file whose geo id appears in a reference file
    Filter(FilterArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Reference CSV with name and code columns
    #[arg(value_name = "REF_FILE")]
    pub reference: String,
    /// Data CSV containing the column to convert
    #[arg(value_name = "DATA_FILE")]
    pub data: String,
    /// Name column in the reference file
    #[arg(long = "name-col", value_name = "COLUMN")]
    pub name_col: String,
    /// Code column in the reference file
    #[arg(long = "code-col", value_name = "COLUMN")]
    pub code_col: String,
    /// Column to convert in the data file
    #[arg(long = "geo-col", value_name = "COLUMN")]
    pub geo_col: String,
    /// Output path (env: GEO_MATCHER_OUT)
    #[arg(
        long,
        short = 'o',
        value_name = "OUT_PATH",
        env = "GEO_MATCHER_OUT",
        default_value = "processed_data.csv"
    )]
    pub out: String,
    /// Output format (env: GEO_MATCHER_FORMAT)
    #[arg(
        long,
        value_name = "FORMAT",
        env = "GEO_MATCHER_FORMAT",
        default_value_t = FormatOpt::Csv
    )]
    pub format: FormatOpt,
    /// Drop rows whose converted value is the literal "unknown"
    #[arg(long = "drop-unknown")]
    pub drop_unknown: bool,
    /// Emit a progress line every N resolved values
    #[arg(long = "progress-every", value_name = "N", default_value_t = 1000)]
    pub progress_every: usize,
}

impl ConvertArgs {
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let cfg = AppConfig {
            resolve: ResolveConfig {
                drop_unknown: self.drop_unknown,
                progress_every: self.progress_every,
            },
            export: ExportConfig {
                out_path: Some(self.out.clone()),
                format: Some(self.format.as_str().into()),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Data CSV to filter
    #[arg(value_name = "DATA_FILE")]
    pub data: String,
    /// Reference CSV holding the geo ids to keep
    #[arg(value_name = "REF_FILE")]
    pub reference: String,
    /// Geo id column in the data file
    #[arg(long = "data-id-col", value_name = "COLUMN")]
    pub data_id_col: String,
    /// Geo id column in the reference file
    #[arg(long = "ref-id-col", value_name = "COLUMN")]
    pub ref_id_col: String,
    /// Output path (env: GEO_MATCHER_OUT)
    #[arg(
        long,
        short = 'o',
        value_name = "OUT_PATH",
        env = "GEO_MATCHER_OUT",
        default_value = "filtered_output.csv"
    )]
    pub out: String,
    /// Output format (env: GEO_MATCHER_FORMAT)
    #[arg(
        long,
        value_name = "FORMAT",
        env = "GEO_MATCHER_FORMAT",
        default_value_t = FormatOpt::Csv
    )]
    pub format: FormatOpt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args_parse() {
        let cli = Cli::try_parse_from([
            "geo_matcher",
            "convert",
            "ref.csv",
            "data.csv",
            "--name-col",
            "DMA Name",
            "--code-col",
            "DMA Code",
            "--geo-col",
            "market",
            "--drop-unknown",
        ])
        .unwrap();
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.reference, "ref.csv");
                assert_eq!(args.geo_col, "market");
                assert!(args.drop_unknown);
                assert_eq!(args.out, "processed_data.csv");
                let cfg = args.to_app_config().unwrap();
                assert!(cfg.resolve.drop_unknown);
                assert_eq!(cfg.export.format.as_deref(), Some("csv"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_filter_args_parse() {
        let cli = Cli::try_parse_from([
            "geo_matcher",
            "filter",
            "data.csv",
            "ids.csv",
            "--data-id-col",
            "geo",
            "--ref-id-col",
            "geo",
            "--format",
            "both",
        ])
        .unwrap();
        match cli.command {
            Command::Filter(args) => {
                assert_eq!(args.format, FormatOpt::Both);
                assert_eq!(args.out, "filtered_output.csv");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_progress_cadence_rejected_via_config() {
        let cli = Cli::try_parse_from([
            "geo_matcher",
            "convert",
            "ref.csv",
            "data.csv",
            "--name-col",
            "n",
            "--code-col",
            "c",
            "--geo-col",
            "g",
            "--progress-every",
            "0",
        ])
        .unwrap();
        match cli.command {
            Command::Convert(args) => assert!(args.to_app_config().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
