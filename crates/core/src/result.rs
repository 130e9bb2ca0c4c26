//! Result alias and the boundary combinator used by views.
//!
//! Views never propagate failures to a global handler. They convert them to
//! state at the component boundary, logging on the way.

use crate::error::Error;

/// The standard Result type for Playdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for swallowing errors at a view boundary.
pub trait ResultExt<T> {
    /// Convert a Result to an Option, logging the error if present.
    fn into_option_logged(self) -> Option<T>;

    /// Get the value or a default, logging the error if present.
    fn or_default_logged(self, default: T) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn into_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "operation failed");
                None
            }
        }
    }

    fn or_default_logged(self, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "operation failed, using default");
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_into_option_ok() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.into_option_logged(), Some(42));
    }

    #[test]
    fn test_result_into_option_err() {
        let result: Result<i32> = Err(Error::SocketClosed);
        assert_eq!(result.into_option_logged(), None);
    }

    #[test]
    fn test_or_default_logged() {
        let result: Result<String> = Err(Error::network_failure("refused"));
        assert_eq!(result.or_default_logged(String::new()), "");
    }
}
