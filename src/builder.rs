use crate::constants::DEFAULT_PROVIDER_NAME;
use crate::errors::ProviderError;
use crate::options::Options;
use crate::{Flag, Hook, InMemoryProvider};
use std::collections::HashSet;
use std::sync::Arc;

/// Builder to create an [`InMemoryProvider`].
///
/// # Examples
///
/// ```rust
/// use inmemory_flags::{Flag, InMemoryProvider};
///
/// let provider = InMemoryProvider::builder()
///     .name("local-flags")
///     .flag(Flag::builder("bool-flag").variant("on", true).default_variant("on").build().unwrap())
///     .event_capacity(64)
///     .build()
///     .unwrap();
/// ```
pub struct ProviderBuilder {
    name: Option<String>,
    flags: Vec<Flag>,
    event_capacity: Option<usize>,
    hooks: Vec<Arc<dyn Hook>>,
}

impl ProviderBuilder {
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            flags: Vec::new(),
            event_capacity: None,
            hooks: Vec::new(),
        }
    }

    /// Sets the display name reported in the provider's metadata and events.
    /// Default value is `"InMemoryProvider"`.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Adds an initial flag.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Adds initial flags.
    pub fn flags<I: IntoIterator<Item = Flag>>(mut self, flags: I) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Bounds the event queue to `capacity` events; emitting then waits
    /// while the queue is full. By default the queue is unbounded.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Registers a hook exposed through [`InMemoryProvider::hooks`].
    pub fn hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Creates an [`InMemoryProvider`] from the configuration made on the builder.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidArgument`] if the name is blank or
    /// two initial flags share a key.
    pub fn build(self) -> Result<InMemoryProvider, ProviderError> {
        Ok(InMemoryProvider::with_options(self.build_options()?))
    }

    pub(crate) fn build_options(self) -> Result<Options, ProviderError> {
        let name = self
            .name
            .unwrap_or_else(|| DEFAULT_PROVIDER_NAME.to_owned());
        if name.trim().is_empty() {
            return Err(ProviderError::InvalidArgument(
                "Provider name cannot be empty".to_owned(),
            ));
        }
        ensure_unique_keys(&self.flags)?;
        Ok(Options::new(
            name,
            self.flags,
            self.event_capacity,
            self.hooks,
        ))
    }
}

pub(crate) fn ensure_unique_keys(flags: &[Flag]) -> Result<(), ProviderError> {
    let mut seen = HashSet::with_capacity(flags.len());
    for flag in flags {
        if !seen.insert(flag.key()) {
            return Err(ProviderError::InvalidArgument(format!(
                "Flag key '{}' is defined more than once",
                flag.key()
            )));
        }
    }
    Ok(())
}
