//! In-memory feature flag provider.
//!
//! Flags are supplied programmatically (or parsed from JSON) and resolved to
//! typed values through a pluggable [`VariantEvaluator`]. Resolution failures
//! never abort the caller: they are reported in [`ResolutionDetails`] next to
//! the caller's default value. Lifecycle and configuration changes are
//! published on an ordered event queue, see [`InMemoryProvider::event_receiver`].
//!
//! # Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade; every record
//! carries an `event_id` key-value pair.

#![warn(missing_docs)]

#[macro_use]
mod macros;
mod builder;
mod constants;
mod context;
mod errors;
mod eval;
mod events;
mod hooks;
mod model;
mod options;
mod provider;
mod store;
mod value;

pub use builder::ProviderBuilder;
pub use constants::PKG_VERSION;
pub use context::{ContextValue, EvaluationContext};
pub use errors::{ErrorType, ProviderError, ResolutionError};
pub use eval::details::{Reason, ResolutionDetails};
pub use eval::evaluator::{DefaultVariantEvaluator, VariantEvaluator};
pub use events::{EventReceiver, ProviderEvent};
pub use hooks::Hook;
pub use model::definition::FlagSet;
pub use model::enums::{ProviderEventType, ProviderStatus, ValueKind};
pub use model::flag::{Flag, FlagBuilder};
pub use provider::{InMemoryProvider, ProviderMetadata};
pub use value::{Structure, Value, ValuePrimitive};
