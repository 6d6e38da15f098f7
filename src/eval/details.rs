use crate::errors::{ErrorType, ResolutionError};
use crate::value::{Value, ValuePrimitive};
use std::fmt::{Display, Formatter};

/// Why a resolution produced its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The value is static, no dynamic evaluation took place.
    Static,
    /// The value is the flag's configured default.
    Default,
    /// A targeting rule matched.
    TargetingMatch,
    /// The value was selected by a pseudorandom split.
    Split,
    /// The flag is disabled.
    Disabled,
    /// The reason is not known.
    Unknown,
    /// The resolution failed, the caller's default value was returned.
    Error,
    /// A reason specific to a custom [`crate::VariantEvaluator`].
    Other(String),
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Static => f.write_str("STATIC"),
            Reason::Default => f.write_str("DEFAULT"),
            Reason::TargetingMatch => f.write_str("TARGETING_MATCH"),
            Reason::Split => f.write_str("SPLIT"),
            Reason::Disabled => f.write_str("DISABLED"),
            Reason::Unknown => f.write_str("UNKNOWN"),
            Reason::Error => f.write_str("ERROR"),
            Reason::Other(reason) => f.write_str(reason),
        }
    }
}

/// Details of a flag resolution's result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionDetails<T> {
    /// Key of the resolved flag.
    pub flag_key: String,
    /// The resolved value, or the caller's default value when the resolution failed.
    pub value: T,
    /// Name of the selected variant (if any).
    pub variant: Option<String>,
    /// Why the value was produced.
    pub reason: Option<Reason>,
    /// Error kind in case the resolution failed.
    pub error_type: Option<ErrorType>,
    /// Description of the failure in case the resolution failed.
    pub error_message: Option<String>,
}

impl<T> ResolutionDetails<T> {
    /// Successful result for `variant`.
    pub fn from_variant(flag_key: &str, value: T, variant: &str, reason: Reason) -> Self {
        Self {
            flag_key: flag_key.to_owned(),
            value,
            variant: Some(variant.to_owned()),
            reason: Some(reason),
            error_type: None,
            error_message: None,
        }
    }

    /// Failed result carrying the caller's `default` value.
    pub fn from_err(default: T, flag_key: &str, err: ResolutionError) -> Self {
        Self {
            flag_key: flag_key.to_owned(),
            value: default,
            variant: None,
            reason: Some(Reason::Error),
            error_type: Some(err.error_type),
            error_message: Some(err.message),
        }
    }

    /// Sets the selected variant, keeping every other field.
    pub fn with_variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_owned());
        self
    }

    /// True if the resolution failed and [`ResolutionDetails::value`] is the caller's default.
    pub fn is_error(&self) -> bool {
        self.error_type.is_some()
    }

    /// Reassembles the failure, if any.
    pub fn error(&self) -> Option<ResolutionError> {
        self.error_type.map(|error_type| {
            ResolutionError::new(error_type, self.error_message.clone().unwrap_or_default())
        })
    }
}

impl ResolutionDetails<Value> {
    /// Narrows a dynamically typed result to `T`.
    ///
    /// A value that is not a `T` yields `default` with [`ErrorType::TypeMismatch`].
    pub(crate) fn narrow<T: ValuePrimitive>(self, default: T) -> ResolutionDetails<T> {
        match T::from_value(&self.value) {
            Some(value) => ResolutionDetails {
                flag_key: self.flag_key,
                value,
                variant: self.variant,
                reason: self.reason,
                error_type: self.error_type,
                error_message: self.error_message,
            },
            None => {
                let err = ResolutionError::new(
                    ErrorType::TypeMismatch,
                    format!(
                        "Evaluator returned a value of type '{}' for flag '{}' but the requested type was '{}'.",
                        self.value.kind(),
                        self.flag_key,
                        T::KIND
                    ),
                );
                let details = ResolutionDetails::from_err(default, &self.flag_key, err);
                match self.variant {
                    Some(variant) => details.with_variant(&variant),
                    None => details,
                }
            }
        }
    }
}
