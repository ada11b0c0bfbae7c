use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ResolveConfig {
    /// Drop rows whose converted value is the literal "unknown".
    pub drop_unknown: bool,
    /// Progress update cadence, in resolved values.
    pub progress_every: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            drop_unknown: false,
            progress_every: 1000,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ExportConfig {
    pub out_path: Option<String>,
    pub format: Option<String>, // csv|xlsx|both
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_path: None,
            format: Some("csv".into()),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref fmt) = self.export.format {
            match fmt.as_str() {
                "csv" | "xlsx" | "both" => {}
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "export.format",
                        reason: format!("unsupported: {}", other),
                    });
                }
            }
        }
        if let Some(ref path) = self.export.out_path {
            if path.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "export.out_path",
                });
            }
        }
        if self.resolve.progress_every == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolve.progress_every",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }
}
