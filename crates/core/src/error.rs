/// Result alias that carries the custom [`StatusError`] type.
pub type Result<T> = std::result::Result<T, StatusError>;

/// Common error type for the core crate.
///
/// None of these are fatal to a playback session. Callers decide whether to
/// skip a frame, print a notice or give up.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Free-form error raised by the command line driver or by callers that
    /// want to surface a readable message through the same type.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors raised while writing to the output
    /// stream.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The playback progress was requested against a sequence of zero length.
    #[error("sequence duration is zero, cannot place {elapsed} ms on the progress bar")]
    ZeroDuration { elapsed: u32 },
    /// A player mode short name that does not match any known mode.
    #[error("unknown player mode `{0}`")]
    UnknownPlayerMode(String),
    /// A module or configuration description could not be decoded.
    #[error("invalid description: {0}")]
    Json(#[from] serde_json::Error),
}

impl StatusError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for StatusError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for StatusError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
