use crate::builder::{ensure_unique_keys, ProviderBuilder};
use crate::constants::{
    FLAGS_REPLACED_EVENT_ID, FLAG_UPSERTED_EVENT_ID, INITIALIZED_EVENT_ID, STATUS_CHANGED_EVENT_ID,
};
use crate::errors::{ErrorType, ProviderError, ResolutionError};
use crate::events::{channel, EventReceiver, EventSender, ProviderEvent};
use crate::options::Options;
use crate::store::FlagStore;
use crate::value::{Structure, ValuePrimitive};
use crate::{EvaluationContext, Flag, Hook, ProviderEventType, ProviderStatus, ResolutionDetails};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Metadata describing a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Display name of the provider.
    pub name: String,
}

/// Feature flag provider serving flags from memory.
///
/// Resolution never blocks and never fails outright: every problem is reported
/// in the returned [`ResolutionDetails`] alongside the caller's default value.
///
/// # Examples
///
/// ```rust
/// use inmemory_flags::{Flag, InMemoryProvider};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let provider = InMemoryProvider::with_flags(vec![
///         Flag::builder("bool-flag")
///             .variant("on", true)
///             .variant("off", false)
///             .default_variant("on")
///             .build()
///             .unwrap(),
///     ])
///     .unwrap();
///
///     provider.initialize(None).await.unwrap();
///
///     let details = provider.resolve_bool("bool-flag", false, None).await;
///     assert!(details.value);
/// }
/// ```
pub struct InMemoryProvider {
    metadata: ProviderMetadata,
    store: FlagStore,
    // Held across every state change and its event so events leave in the
    // order the changes were applied.
    events: tokio::sync::Mutex<EventSender>,
    receiver: Mutex<Option<EventReceiver>>,
    hooks: RwLock<Vec<Arc<dyn Hook>>>,
}

impl InMemoryProvider {
    pub(crate) fn with_options(options: Options) -> Self {
        let (name, flags, event_capacity, hooks) = options.into_parts();
        let (sender, receiver) = channel(event_capacity);
        Self {
            metadata: ProviderMetadata { name },
            store: FlagStore::new(flags),
            events: tokio::sync::Mutex::new(sender),
            receiver: Mutex::new(Some(receiver)),
            hooks: RwLock::new(hooks),
        }
    }

    /// Creates an empty provider named `"InMemoryProvider"`.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a new [`ProviderBuilder`] used to build an [`InMemoryProvider`].
    pub fn builder() -> ProviderBuilder {
        ProviderBuilder::new()
    }

    /// Creates an empty provider with the given display name.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidArgument`] if `name` is blank.
    pub fn with_name(name: &str) -> Result<Self, ProviderError> {
        ProviderBuilder::new().name(name).build()
    }

    /// Creates a provider serving `flags`.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidArgument`] if two flags share a key.
    pub fn with_flags(flags: Vec<Flag>) -> Result<Self, ProviderError> {
        ProviderBuilder::new().flags(flags).build()
    }

    /// Returns the provider's metadata.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Returns the current [`ProviderStatus`].
    pub fn status(&self) -> ProviderStatus {
        self.store.status()
    }

    /// Overrides the provider's status without emitting an event.
    ///
    /// This is the only way out of [`ProviderStatus::Error`] and [`ProviderStatus::Fatal`].
    pub fn set_status(&self, status: ProviderStatus) {
        let previous = self.store.set_status(status);
        if previous != status {
            info!(event_id = STATUS_CHANGED_EVENT_ID; "Provider '{}' status changed from '{previous}' to '{status}'.", self.metadata.name);
        }
    }

    /// Takes the receiving half of the event queue.
    ///
    /// Returns [`None`] on every call after the first. Until it is taken, a
    /// bounded queue that fills up drops further events; afterwards emitters
    /// wait for capacity.
    pub fn event_receiver(&self) -> Option<EventReceiver> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Moves the provider to [`ProviderStatus::Ready`] and emits a
    /// [`ProviderEventType::Ready`] event.
    ///
    /// Calling it on a ready provider emits another event.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidState`] while the provider is in
    /// [`ProviderStatus::Error`] or [`ProviderStatus::Fatal`] status.
    pub async fn initialize(
        &self,
        context: Option<&EvaluationContext>,
    ) -> Result<(), ProviderError> {
        let sender = self.events.lock().await;
        if let Some(ctx) = context {
            debug!(event_id = INITIALIZED_EVENT_ID; "Initialization context: {ctx}");
        }
        if let Err(status) = self.store.mark_ready() {
            warn!(event_id = INITIALIZED_EVENT_ID; "Provider '{}' cannot be initialized in '{status}' status.", self.metadata.name);
            return Err(ProviderError::InvalidState(status));
        }
        self.emit(
            &sender,
            ProviderEvent::new(ProviderEventType::Ready, &self.metadata.name),
        )
        .await;
        info!(event_id = INITIALIZED_EVENT_ID; "Provider '{}' initialized, status: '{}'.", self.metadata.name, ProviderStatus::Ready);
        Ok(())
    }

    /// Moves the provider back to [`ProviderStatus::NotReady`]. The flags are kept.
    pub fn shutdown(&self) {
        self.set_status(ProviderStatus::NotReady);
    }

    /// Replaces every flag with `flags` and emits a
    /// [`ProviderEventType::ConfigurationChanged`] event.
    ///
    /// The event lists every key of both the old and the new flag set, whether
    /// or not its definition changed. Resolvers observe either the complete old
    /// or the complete new set.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidArgument`] if two flags share a key;
    /// the current flags are kept in that case.
    pub async fn update_flags(&self, flags: Vec<Flag>) -> Result<(), ProviderError> {
        ensure_unique_keys(&flags)?;
        let sender = self.events.lock().await;
        let changed = self.store.replace(flags);
        debug!(event_id = FLAGS_REPLACED_EVENT_ID; "Flags of provider '{}' replaced, changed: [{}].", self.metadata.name, changed.join(", "));
        self.emit(
            &sender,
            ProviderEvent::new(ProviderEventType::ConfigurationChanged, &self.metadata.name)
                .flags_changed(changed)
                .message("flags changed"),
        )
        .await;
        Ok(())
    }

    /// Adds `flag`, or replaces the flag with the same key, and emits a
    /// [`ProviderEventType::ConfigurationChanged`] event for its key.
    pub async fn update_flag(&self, flag: Flag) {
        let key = flag.key().to_owned();
        let sender = self.events.lock().await;
        self.store.upsert(flag);
        debug!(event_id = FLAG_UPSERTED_EVENT_ID; "Flag '{key}' of provider '{}' added or updated.", self.metadata.name);
        self.emit(
            &sender,
            ProviderEvent::new(ProviderEventType::ConfigurationChanged, &self.metadata.name)
                .flags_changed(vec![key])
                .message("flag added/updated"),
        )
        .await;
    }

    /// Emits a bare event of `event_type`, without changed flags.
    pub async fn send_event(&self, event_type: ProviderEventType) {
        let sender = self.events.lock().await;
        self.emit(&sender, ProviderEvent::new(event_type, &self.metadata.name))
            .await;
    }

    // Until the receiver is taken nobody drains the queue, so a full bounded
    // queue drops events instead of waiting.
    async fn emit(&self, sender: &EventSender, event: ProviderEvent) {
        let undrained = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        if undrained {
            sender.try_send(event);
        } else {
            sender.send(event).await;
        }
    }

    /// Returns the keys of all flags, sorted.
    pub fn flag_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.snapshot().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the flag identified by `key`.
    pub fn get_flag(&self, key: &str) -> Option<Arc<Flag>> {
        self.store.get(key)
    }

    /// Appends a hook. Hooks are neither deduplicated nor reordered.
    pub fn add_hook(&self, hook: Arc<dyn Hook>) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    /// Returns a snapshot of the registered hooks in insertion order.
    pub fn hooks(&self) -> Vec<Arc<dyn Hook>> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves the flag identified by `key` to a `T`.
    ///
    /// Returns `default` with an error in the details if the provider is not
    /// ready, the flag doesn't exist, or its value is not a `T`.
    pub async fn resolve<T: ValuePrimitive>(
        &self,
        key: &str,
        default: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T> {
        self.resolve_now(key, default, context)
    }

    /// Resolves a `bool` flag.
    pub async fn resolve_bool(
        &self,
        key: &str,
        default: bool,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<bool> {
        self.resolve_now(key, default, context)
    }

    /// Resolves a [`String`] flag.
    pub async fn resolve_str(
        &self,
        key: &str,
        default: &str,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<String> {
        self.resolve_now(key, default.to_owned(), context)
    }

    /// Resolves a whole number flag.
    pub async fn resolve_int(
        &self,
        key: &str,
        default: i64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<i64> {
        self.resolve_now(key, default, context)
    }

    /// Resolves a decimal number flag.
    pub async fn resolve_float(
        &self,
        key: &str,
        default: f64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<f64> {
        self.resolve_now(key, default, context)
    }

    /// Resolves a structured flag.
    pub async fn resolve_struct(
        &self,
        key: &str,
        default: Structure,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Structure> {
        self.resolve_now(key, default, context)
    }

    fn resolve_now<T: ValuePrimitive>(
        &self,
        key: &str,
        default: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T> {
        let details = match self.store.status() {
            ProviderStatus::Ready => match self.store.get(key) {
                Some(flag) => flag.evaluate(default, context),
                None => ResolutionDetails::from_err(
                    default,
                    key,
                    ResolutionError::new(
                        ErrorType::FlagNotFound,
                        format!("Failed to resolve flag '{key}' (the key was not found)."),
                    ),
                ),
            },
            ProviderStatus::NotReady => ResolutionDetails::from_err(
                default,
                key,
                ResolutionError::new(
                    ErrorType::ProviderNotReady,
                    format!("Failed to resolve flag '{key}' (provider not yet initialized)."),
                ),
            ),
            status => ResolutionDetails::from_err(
                default,
                key,
                ResolutionError::new(
                    ErrorType::General,
                    format!("Failed to resolve flag '{key}' (provider is in '{status}' status)."),
                ),
            ),
        };
        if let Some(err) = details.error() {
            log_resolution_err!(err);
        }
        details
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod provider_tests {
    use super::*;
    use crate::Value;

    fn bool_flag() -> Flag {
        Flag::builder("bool-flag")
            .variant("on", true)
            .variant("off", false)
            .default_variant("on")
            .build()
            .unwrap()
    }

    #[test]
    fn metadata_name() {
        assert_eq!(InMemoryProvider::new().metadata().name, "InMemoryProvider");
        assert_eq!(
            InMemoryProvider::with_name("custom").unwrap().metadata().name,
            "custom"
        );
    }

    #[tokio::test]
    async fn status_lifecycle() {
        let provider = InMemoryProvider::new();
        assert_eq!(provider.status(), ProviderStatus::NotReady);

        provider.initialize(None).await.unwrap();
        assert_eq!(provider.status(), ProviderStatus::Ready);

        provider.set_status(ProviderStatus::Error);
        assert_eq!(
            provider.initialize(None).await,
            Err(ProviderError::InvalidState(ProviderStatus::Error))
        );
        assert_eq!(provider.status(), ProviderStatus::Error);

        provider.set_status(ProviderStatus::NotReady);
        provider.initialize(None).await.unwrap();
        assert_eq!(provider.status(), ProviderStatus::Ready);

        provider.shutdown();
        assert_eq!(provider.status(), ProviderStatus::NotReady);
    }

    #[tokio::test]
    async fn resolution_by_status() {
        let provider = InMemoryProvider::with_flags(vec![bool_flag()]).unwrap();

        let not_ready = provider.resolve_bool("bool-flag", false, None).await;
        assert_eq!(not_ready.error_type, Some(ErrorType::ProviderNotReady));
        assert!(!not_ready.value);

        provider.initialize(None).await.unwrap();
        let ready = provider.resolve_bool("bool-flag", false, None).await;
        assert!(ready.value);
        assert!(ready.error_type.is_none());

        for status in [ProviderStatus::Error, ProviderStatus::Stale, ProviderStatus::Fatal] {
            provider.set_status(status);
            let details = provider.resolve_bool("bool-flag", false, None).await;
            assert_eq!(details.error_type, Some(ErrorType::General));
            assert!(!details.value);
        }
    }

    #[tokio::test]
    async fn event_receiver_is_taken_once() {
        let provider = InMemoryProvider::new();
        assert!(provider.event_receiver().is_some());
        assert!(provider.event_receiver().is_none());
        provider.initialize(None).await.unwrap();
    }

    #[tokio::test]
    async fn inspection() {
        let provider = InMemoryProvider::with_flags(vec![bool_flag()]).unwrap();
        provider
            .update_flag(
                Flag::builder("a-flag")
                    .variant("x", 1)
                    .default_variant("x")
                    .build()
                    .unwrap(),
            )
            .await;

        assert_eq!(provider.flag_keys(), vec!["a-flag", "bool-flag"]);
        assert_eq!(
            provider.get_flag("a-flag").unwrap().variant("x"),
            Some(&Value::Int(1))
        );
        assert!(provider.get_flag("missing").is_none());
    }
}
