//! Enhancement configuration
//!
//! Read from TOML or JSON; every key is optional and unknown keys are
//! rejected.

use crate::analysis::LabelNames;
use crate::diagnostics::{EtchError, EtchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Print widths and pool size for the enhancement pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Width past which a labelled union `type` is split one member per line
    pub short_type_union_print_width: usize,
    /// Width past which a union default value is split one member per line
    pub default_value_union_print_width: usize,
    /// Print width of the expanded detailed type
    pub detailed_type_print_width: usize,
    /// Worker threads for per-field enhancement
    pub max_concurrency: usize,
    /// Type names shown in the `style` and `render` labels
    pub labels: LabelNames,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            short_type_union_print_width: 40,
            default_value_union_print_width: 40,
            detailed_type_print_width: 100,
            max_concurrency: default_concurrency(),
            labels: LabelNames::default(),
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl EnhanceConfig {
    /// Parse TOML configuration
    pub fn from_toml_str(text: &str) -> EtchResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validated()
    }

    /// Parse JSON configuration
    pub fn from_json_str(text: &str) -> EtchResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validated()
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> EtchResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(EtchError::config(format!(
                "unsupported configuration file: {}",
                path.display()
            ))),
        }
    }

    fn validated(self) -> EtchResult<Self> {
        let widths = [
            ("shortTypeUnionPrintWidth", self.short_type_union_print_width),
            ("defaultValueUnionPrintWidth", self.default_value_union_print_width),
            ("detailedTypePrintWidth", self.detailed_type_print_width),
            ("maxConcurrency", self.max_concurrency),
        ];
        if let Some((key, _)) = widths.iter().find(|(_, value)| *value == 0) {
            return Err(EtchError::config(format!("{} must be greater than zero", key)));
        }
        Ok(self)
    }
}
