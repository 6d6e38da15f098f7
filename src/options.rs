use crate::constants::DEFAULT_PROVIDER_NAME;
use crate::{Flag, Hook};
use std::sync::Arc;

/// Configuration of an [`crate::InMemoryProvider`], produced by [`crate::ProviderBuilder`].
pub(crate) struct Options {
    name: String,
    flags: Vec<Flag>,
    event_capacity: Option<usize>,
    hooks: Vec<Arc<dyn Hook>>,
}

impl Options {
    pub(crate) fn new(
        name: String,
        flags: Vec<Flag>,
        event_capacity: Option<usize>,
        hooks: Vec<Arc<dyn Hook>>,
    ) -> Self {
        Self {
            name,
            flags,
            event_capacity,
            hooks,
        }
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Flag>, Option<usize>, Vec<Arc<dyn Hook>>) {
        (self.name, self.flags, self.event_capacity, self.hooks)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_NAME.to_owned(), Vec::new(), None, Vec::new())
    }
}
