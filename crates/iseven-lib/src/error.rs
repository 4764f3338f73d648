use thiserror::Error;

/// Convenient result alias for the iseven library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raised when the caller supplies a value outside the accepted domain.
    #[error("negative numbers are not supported: {number}")]
    InvalidArgument { number: i64 },
}

impl Error {
    /// Short, stable label for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidArgument { .. } => "invalid_argument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_reports_offending_value() {
        let err = Error::InvalidArgument { number: -7 };
        assert_eq!(err.to_string(), "negative numbers are not supported: -7");
        assert_eq!(err.reason(), "invalid_argument");
    }
}
