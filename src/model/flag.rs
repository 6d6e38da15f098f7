use crate::errors::ProviderError;
use crate::eval::details::ResolutionDetails;
use crate::eval::evaluator::{DefaultVariantEvaluator, VariantEvaluator};
use crate::value::ValuePrimitive;
use crate::{EvaluationContext, Value};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A feature flag: named variants, one of them designated as default, and
/// the [`VariantEvaluator`] that picks among them.
///
/// A flag is immutable once built; the provider replaces flags, it never edits them.
///
/// # Examples
///
/// ```rust
/// use inmemory_flags::Flag;
///
/// let flag = Flag::builder("bool-flag")
///     .variant("on", true)
///     .variant("off", false)
///     .default_variant("on")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct Flag {
    key: String,
    variants: HashMap<String, Value>,
    default_variant: String,
    evaluator: Arc<dyn VariantEvaluator>,
}

impl Flag {
    /// Creates a [`Flag`] served by the shared [`DefaultVariantEvaluator`].
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidArgument`] if `key` or `default_variant`
    /// is blank, or `default_variant` is not one of `variants`.
    pub fn new(
        key: &str,
        variants: HashMap<String, Value>,
        default_variant: &str,
    ) -> Result<Self, ProviderError> {
        Self::with_evaluator(
            key,
            variants,
            default_variant,
            DefaultVariantEvaluator::shared(),
        )
    }

    /// Creates a [`Flag`] served by a custom [`VariantEvaluator`].
    ///
    /// # Errors
    ///
    /// The same as [`Flag::new`].
    pub fn with_evaluator(
        key: &str,
        variants: HashMap<String, Value>,
        default_variant: &str,
        evaluator: Arc<dyn VariantEvaluator>,
    ) -> Result<Self, ProviderError> {
        if key.trim().is_empty() {
            return Err(ProviderError::InvalidArgument(
                "Flag key cannot be empty".to_owned(),
            ));
        }
        if default_variant.trim().is_empty() {
            return Err(ProviderError::InvalidArgument(format!(
                "Default variant of flag '{key}' cannot be empty"
            )));
        }
        if let Some(name) = variants.keys().find(|name| name.trim().is_empty()) {
            return Err(ProviderError::InvalidArgument(format!(
                "Flag '{key}' has a variant with an empty name ('{name}')"
            )));
        }
        if !variants.contains_key(default_variant) {
            return Err(ProviderError::InvalidArgument(format!(
                "Default variant '{default_variant}' is not a variant of flag '{key}'"
            )));
        }
        Ok(Self {
            key: key.to_owned(),
            variants,
            default_variant: default_variant.to_owned(),
            evaluator,
        })
    }

    /// Creates a new [`FlagBuilder`].
    pub fn builder(key: &str) -> FlagBuilder {
        FlagBuilder::new(key)
    }

    /// Key of the flag.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the variant served by default.
    pub fn default_variant(&self) -> &str {
        &self.default_variant
    }

    /// All variants of the flag.
    pub fn variants(&self) -> &HashMap<String, Value> {
        &self.variants
    }

    /// Value of the variant called `name`.
    pub fn variant(&self, name: &str) -> Option<&Value> {
        self.variants.get(name)
    }

    /// Resolves the flag to a `T` through its [`VariantEvaluator`].
    pub fn evaluate<T: ValuePrimitive>(
        &self,
        default: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T> {
        self.evaluator
            .evaluate(self, default.clone().into(), context)
            .narrow(default)
    }
}

impl Debug for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("key", &self.key)
            .field("variants", &self.variants)
            .field("default_variant", &self.default_variant)
            .finish_non_exhaustive()
    }
}

/// Builder to create a [`Flag`].
pub struct FlagBuilder {
    key: String,
    variants: HashMap<String, Value>,
    default_variant: Option<String>,
    evaluator: Option<Arc<dyn VariantEvaluator>>,
}

impl FlagBuilder {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            variants: HashMap::new(),
            default_variant: None,
            evaluator: None,
        }
    }

    /// Adds a variant. Replaces a previously added variant with the same name.
    pub fn variant<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.variants.insert(name.to_owned(), value.into());
        self
    }

    /// Sets the variant served by default.
    pub fn default_variant(mut self, name: &str) -> Self {
        self.default_variant = Some(name.to_owned());
        self
    }

    /// Sets a custom [`VariantEvaluator`].
    /// Default is the shared [`DefaultVariantEvaluator`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inmemory_flags::{EvaluationContext, Flag, Reason, ResolutionDetails, Value};
    /// use std::sync::Arc;
    ///
    /// let flag = Flag::builder("greeting")
    ///     .variant("hi", "hi")
    ///     .default_variant("hi")
    ///     .evaluator(Arc::new(|flag: &Flag, _: Value, _: Option<&EvaluationContext>| {
    ///         ResolutionDetails::from_variant(flag.key(), Value::from("hi"), "hi", Reason::Static)
    ///     }))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn evaluator(mut self, evaluator: Arc<dyn VariantEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Creates the [`Flag`].
    ///
    /// # Errors
    ///
    /// The same as [`Flag::new`]; a missing default variant counts as blank.
    pub fn build(self) -> Result<Flag, ProviderError> {
        Flag::with_evaluator(
            &self.key,
            self.variants,
            self.default_variant.as_deref().unwrap_or_default(),
            self.evaluator
                .unwrap_or_else(DefaultVariantEvaluator::shared),
        )
    }
}
