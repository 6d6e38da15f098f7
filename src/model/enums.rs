use std::fmt::{Display, Formatter};

/// The runtime type tag of a [`crate::Value`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The on/off type.
    Bool,
    /// The whole number type.
    Int,
    /// The decimal number type.
    Float,
    /// The text type.
    String,
    /// The structured document type.
    Structure,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Bool => f.write_str("Bool"),
            ValueKind::Int => f.write_str("Int"),
            ValueKind::Float => f.write_str("Float"),
            ValueKind::String => f.write_str("String"),
            ValueKind::Structure => f.write_str("Structure"),
        }
    }
}

/// Readiness state of a [`crate::InMemoryProvider`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ProviderStatus {
    /// The provider has not been initialized yet.
    #[default]
    NotReady = 0,
    /// The provider is initialized and resolves flags.
    Ready = 1,
    /// The provider's flag data may be outdated.
    Stale = 2,
    /// The provider is in an error state, resolution reports a general error.
    Error = 3,
    /// The provider is in an unrecoverable error state.
    Fatal = 4,
}

impl ProviderStatus {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ProviderStatus::Ready,
            2 => ProviderStatus::Stale,
            3 => ProviderStatus::Error,
            4 => ProviderStatus::Fatal,
            _ => ProviderStatus::NotReady,
        }
    }
}

impl Display for ProviderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::NotReady => f.write_str("NOT_READY"),
            ProviderStatus::Ready => f.write_str("READY"),
            ProviderStatus::Stale => f.write_str("STALE"),
            ProviderStatus::Error => f.write_str("ERROR"),
            ProviderStatus::Fatal => f.write_str("FATAL"),
        }
    }
}

/// The type of a [`crate::ProviderEvent`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderEventType {
    /// The provider became ready to resolve flags.
    Ready,
    /// One or more flags were added, replaced or removed.
    ConfigurationChanged,
    /// The provider entered an error state.
    Error,
    /// The provider's flag data became outdated.
    Stale,
}

impl Display for ProviderEventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderEventType::Ready => f.write_str("PROVIDER_READY"),
            ProviderEventType::ConfigurationChanged => {
                f.write_str("PROVIDER_CONFIGURATION_CHANGED")
            }
            ProviderEventType::Error => f.write_str("PROVIDER_ERROR"),
            ProviderEventType::Stale => f.write_str("PROVIDER_STALE"),
        }
    }
}
