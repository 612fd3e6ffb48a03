use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// ── CodecOption ───────────────────────────────────────────────────────────────

/// One tuning option applied onto the encoder format before configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecOption {
    pub key: String,
    pub value: CodecOptionValue,
}

/// Typed value of a [`CodecOption`].
///
/// The set is closed: an option can only hold one of the types the encoder
/// format supports, so an unsupported value type cannot reach the applier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecOptionValue {
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
}

impl CodecOption {
    pub fn new(key: impl Into<String>, value: CodecOptionValue) -> Self {
        Self { key: key.into(), value }
    }

    /// Parse a comma-separated option list in `key[:type]=value` syntax.
    ///
    /// Supported types are `int` (the default when no type is given),
    /// `long`, `float`, and `string`. A malformed entry or an unknown type
    /// suffix is a configuration error — options are never silently dropped.
    ///
    /// ```
    /// use screenwire_core::options::{CodecOption, CodecOptionValue};
    ///
    /// let opts = CodecOption::parse_list("profile=1,level:long=2048,quality:float=0.9").unwrap();
    /// assert_eq!(opts[1].value, CodecOptionValue::Long(2048));
    /// ```
    pub fn parse_list(raw: &str) -> Result<Vec<CodecOption>, ConfigError> {
        let mut options = Vec::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            options.push(Self::parse_entry(entry)?);
        }
        Ok(options)
    }

    fn parse_entry(entry: &str) -> Result<CodecOption, ConfigError> {
        let (lhs, raw_value) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidCodecOption {
            option: entry.to_owned(),
            reason: "missing '='".to_owned(),
        })?;

        let (key, value_type) = match lhs.split_once(':') {
            Some((key, ty)) => (key, ty),
            None => (lhs, "int"),
        };
        if key.is_empty() {
            return Err(ConfigError::InvalidCodecOption {
                option: entry.to_owned(),
                reason: "empty key".to_owned(),
            });
        }

        let value = match value_type {
            "int" => CodecOptionValue::Int(raw_value.parse().map_err(|_| {
                ConfigError::InvalidCodecOption {
                    option: entry.to_owned(),
                    reason: format!("'{raw_value}' is not an int"),
                }
            })?),
            "long" => CodecOptionValue::Long(raw_value.parse().map_err(|_| {
                ConfigError::InvalidCodecOption {
                    option: entry.to_owned(),
                    reason: format!("'{raw_value}' is not a long"),
                }
            })?),
            "float" => CodecOptionValue::Float(raw_value.parse().map_err(|_| {
                ConfigError::InvalidCodecOption {
                    option: entry.to_owned(),
                    reason: format!("'{raw_value}' is not a float"),
                }
            })?),
            "string" => CodecOptionValue::String(raw_value.to_owned()),
            other => {
                return Err(ConfigError::InvalidCodecOption {
                    option: entry.to_owned(),
                    reason: format!("unsupported value type '{other}'"),
                })
            }
        };

        Ok(CodecOption { key: key.to_owned(), value })
    }
}
