//! Tagged success/error envelope returned by every remote call.

use crate::error::{Result, StoryError};

/// Outcome of a remote call that reached the server.
///
/// Business failures (bad credentials, validation, missing auth) are a
/// `Failure`; only transport faults are reported through `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success { message: String, data: T },
    Failure { message: String },
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::Success {
            message: message.into(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Success { message, data } => Envelope::Success {
                message,
                data: f(data),
            },
            Self::Failure { message } => Envelope::Failure { message },
        }
    }

    /// Converts a failure envelope into `StoryError::Remote`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { message } => Err(StoryError::remote(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_becomes_remote_error() {
        let envelope: Envelope<()> = Envelope::failure("\"password\" length must be at least 8");
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.user_message(), "\"password\" length must be at least 8");
    }

    #[test]
    fn test_map_keeps_message() {
        let envelope = Envelope::success("Stories fetched successfully", vec![1, 2, 3]);
        let mapped = envelope.map(|v| v.len());
        assert_eq!(mapped, Envelope::success("Stories fetched successfully", 3));
    }
}
