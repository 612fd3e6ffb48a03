//! screenwire-core — shared types for the ScreenWire capture core.
//!
//! Everything here is plain data: geometry primitives, the per-attempt
//! [`ScreenInfo`] snapshot, encoded/captured frame records, the
//! [`StreamConfig`] the caller hands in, codec tuning options, and the
//! typed error taxonomy used across the workspace.

pub mod config;
pub mod errors;
pub mod options;
pub mod types;

pub use config::StreamConfig;
pub use errors::{CodecError, ConfigError, DisplayError, StreamError};
pub use options::{CodecOption, CodecOptionValue};
pub use types::*;
