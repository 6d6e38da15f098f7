use crate::ProviderStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error kind reported in the [`crate::ResolutionDetails`] of a failed flag resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The provider has not been initialized yet.
    ProviderNotReady = 1000,
    /// The key of the resolved flag was not found in the flag table.
    FlagNotFound = 1001,
    /// A flag definition could not be parsed.
    ParseError = 1002,
    /// The type of the flag's value doesn't match the requested type.
    TypeMismatch = 2002,
    /// The evaluation needed a targeting key that was missing from the context.
    TargetingKeyMissing = 2003,
    /// The evaluation context didn't have the expected shape.
    InvalidContext = 2004,
    /// The provider is in an unrecoverable state.
    ProviderFatal = 3000,
    /// Any other failure, e.g. the provider is in [`ProviderStatus::Error`] state.
    General = 3001,
}

impl ErrorType {
    pub(crate) fn code(&self) -> u16 {
        *self as u16
    }
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::ProviderNotReady => f.write_str("PROVIDER_NOT_READY"),
            ErrorType::FlagNotFound => f.write_str("FLAG_NOT_FOUND"),
            ErrorType::ParseError => f.write_str("PARSE_ERROR"),
            ErrorType::TypeMismatch => f.write_str("TYPE_MISMATCH"),
            ErrorType::TargetingKeyMissing => f.write_str("TARGETING_KEY_MISSING"),
            ErrorType::InvalidContext => f.write_str("INVALID_CONTEXT"),
            ErrorType::ProviderFatal => f.write_str("PROVIDER_FATAL"),
            ErrorType::General => f.write_str("GENERAL"),
        }
    }
}

/// Error struct that holds the [`ErrorType`] and message of a failed resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionError {
    /// The kind of the failure.
    pub error_type: ErrorType,
    /// The text representation of the failure.
    pub message: String,
}

impl ResolutionError {
    pub(crate) fn new(error_type: ErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
        }
    }
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl Error for ResolutionError {}

/// Failures that abort a provider operation instead of being reported in a resolution result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// A required argument was empty or inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A flag definition document could not be read or parsed.
    #[error("Flag definition parsing failed. ({0})")]
    Parse(String),
    /// The operation is not allowed in the provider's current status.
    #[error("Operation is not allowed while the provider is in '{0}' status")]
    InvalidState(ProviderStatus),
}
