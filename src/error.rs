use thiserror::Error;

/// Failure to obtain evidence from the data provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Transport error, timeout, non-success status, or provider-reported errors.
    #[error("data unavailable: {0}")]
    Unavailable(String),

    /// The payload did not have the expected shape.
    #[error("malformed data: {0}")]
    Malformed(String),
}

impl DataError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Failure to push an alert to the messaging channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("delivery transport failed: {0}")]
    Transport(String),

    #[error("delivery rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}
