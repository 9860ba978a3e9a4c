#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the bootstrap and diagnostic errors of this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("greeting_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),
}

/// GreetingError enumerates the ways a greeting request can fail.  The variants
/// carry no HTTP semantics; the api layer decides on status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GreetingError {
    /// The format parameter was neither json nor text.
    #[error("Invalid format. Use \"json\" or \"text\"")]
    InvalidFormat,

    /// The timezone name is not in the timezone database.
    #[error("Invalid timezone: {}. Use standard timezone names like \"UTC\", \"US/Eastern\", \"Europe/London\", etc.", .0)]
    InvalidTimezone(String),

    /// Anything unexpected.  The text is logged, never returned to clients.
    #[allow(dead_code)]
    #[error("Internal error: {}", .0)]
    Internal(String),
}

impl GreetingError {
    /// True for errors caused by the client's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, GreetingError::InvalidFormat | GreetingError::InvalidTimezone(_))
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::GreetingError;

    #[test]
    fn messages_name_the_offender() {
        let e = GreetingError::InvalidTimezone("Not/AZone".to_string());
        assert!(e.to_string().starts_with("Invalid timezone: Not/AZone. "));
        assert!(e.is_validation());
        assert_eq!(GreetingError::InvalidFormat.to_string(),
                   "Invalid format. Use \"json\" or \"text\"");
        assert!(!GreetingError::Internal("x".to_string()).is_validation());
    }
}
