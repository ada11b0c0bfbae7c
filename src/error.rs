use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported input format for {path}: only CSV input is supported (save spreadsheets as CSV first)")]
    UnsupportedFormat { path: String },
    #[error("column {column:?} not found in {path} (available: {available})")]
    MissingColumn {
        column: String,
        path: String,
        available: String,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export error: {0}")]
    Csv(String),
    #[error("xlsx export error: {0}")]
    Xlsx(String),
}
