use thiserror::Error;

/// Configuration faults. Fatal to the whole run, surfaced with enough
/// diagnostic detail for the caller to correct the input.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("encoder '{name}' not found; encoders for this codec: [{}]", .available.join(", "))]
    UnknownEncoder {
        name: String,
        /// Names of the encoders discovered for the required MIME type.
        available: Vec<String>,
    },

    #[error("codec option '{option}' rejected: {reason}")]
    InvalidCodecOption { option: String, reason: String },
}

/// Virtual-display faults. Fatal to the current attempt; the controller
/// still runs the guaranteed-cleanup path before propagating.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("failed to create virtual display: {reason}")]
    CreateFailed { reason: String },

    #[error("failed to bind capture surface: {reason}")]
    BindFailed { reason: String },
}

/// Encoder/image-session faults reported by the platform capability.
#[derive(Error, Debug)]
pub enum CodecError {
    /// No encoder with the requested name exists. The session layer
    /// converts this into [`ConfigError::UnknownEncoder`] together with the
    /// discovered encoder list.
    #[error("no encoder named '{0}'")]
    NotFound(String),

    #[error("encoder rejected configuration: {0}")]
    Rejected(String),

    /// Mid-stream fault. Ends the attempt; never retried.
    #[error("encoder fault: {0}")]
    Fault(String),
}

/// Top-level error of a streaming session.
///
/// Sink write failures are deliberately absent: a closed sink is the normal
/// "peer disconnected" stop signal and terminates the session cleanly.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("virtual display: {0}")]
    Display(#[from] DisplayError),

    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error("capture source: {reason}")]
    Source { reason: String },

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}
