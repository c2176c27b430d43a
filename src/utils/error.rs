use thiserror::Error;

/// Failure while talking to an FDSN web service.
///
/// The cascade controller never propagates these; they degrade to an empty
/// earthquake list. They stay a distinct type so callers and tests can tell
/// "zero events" apart from "fetch failed".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service at {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed response on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Could not read delimited response: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Unknown region: {name}")]
    UnknownRegion { name: String },

    #[error("Invalid minimum magnitude: {value}")]
    InvalidMagnitude { value: String },

    #[error("Language {language} is not supported. Use 'en' or 'de'.")]
    UnsupportedLanguage { language: String },

    #[error("Unknown station: {code}")]
    UnknownStation { code: String },

    #[error("Year {year} is outside the supported catalog range")]
    InvalidYear { year: i32 },

    #[error("No earthquake is selected")]
    NoEarthquakeSelected,

    #[error("Data service error: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Selection,
    Network,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExplorerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplorerError::UnknownRegion { .. }
            | ExplorerError::InvalidMagnitude { .. }
            | ExplorerError::UnknownStation { .. }
            | ExplorerError::InvalidYear { .. }
            | ExplorerError::NoEarthquakeSelected => ErrorCategory::Selection,
            ExplorerError::Fetch(_) => ErrorCategory::Network,
            ExplorerError::UnsupportedLanguage { .. }
            | ExplorerError::ConfigValidationError { .. }
            | ExplorerError::InvalidConfigValueError { .. }
            | ExplorerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExplorerError::IoError(_)
            | ExplorerError::CsvError(_)
            | ExplorerError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Selection | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExplorerError::UnknownRegion { name } => {
                format!("'{}' is not one of the supported regions", name)
            }
            ExplorerError::InvalidMagnitude { value } => {
                format!("'{}' is not a valid magnitude", value)
            }
            ExplorerError::UnknownStation { code } => {
                format!("Station '{}' is not part of the school network", code)
            }
            ExplorerError::InvalidYear { year } => {
                format!("No earthquake catalog is available for the year {}", year)
            }
            ExplorerError::NoEarthquakeSelected => {
                "No earthquake matches the current selection".to_string()
            }
            ExplorerError::Fetch(e) => format!("The data service could not be reached: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Selection => {
                "Pick a region of Worldwide/Europe/Switzerland and one of its listed magnitudes"
            }
            ErrorCategory::Network => "Check the network connection and the service URLs",
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::Output => "Check that the output directory is writable",
        }
    }
}

impl ErrorSeverity {
    /// Process exit code reported by the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_errors_exit_with_failure() {
        let err = ExplorerError::UnknownRegion {
            name: "Atlantis".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Selection);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.severity().exit_code(), 2);
        assert!(err.user_friendly_message().contains("Atlantis"));

        for err in [
            ExplorerError::NoEarthquakeSelected,
            ExplorerError::InvalidYear { year: 1200 },
            ExplorerError::InvalidMagnitude {
                value: "big".to_string(),
            },
            ExplorerError::UnknownStation {
                code: "XXXX".to_string(),
            },
        ] {
            assert_ne!(err.severity().exit_code(), 0, "{:?}", err);
        }
    }

    #[test]
    fn test_exit_codes_by_severity() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_fetch_error_converts_into_network_category() {
        let err: ExplorerError = FetchError::Status {
            url: "http://example.com".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
