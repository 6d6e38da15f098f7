use crate::errors::{ErrorType, ResolutionError};
use crate::eval::details::{Reason, ResolutionDetails};
use crate::{EvaluationContext, Flag, Value};
use std::sync::{Arc, OnceLock};

/// Variant selection strategy attached to a [`Flag`].
///
/// The requested type is the kind of the `default` value. An implementation
/// returns either the selected variant's value or `default` together with
/// an error; it must not panic on missing or mismatching variants.
///
/// Closures with the same signature implement the trait as well.
///
/// # Examples
///
/// ```rust
/// use inmemory_flags::{EvaluationContext, Flag, Reason, ResolutionDetails, Value, VariantEvaluator};
///
/// struct Beta;
///
/// impl VariantEvaluator for Beta {
///     fn evaluate(&self, flag: &Flag, default: Value, context: Option<&EvaluationContext>) -> ResolutionDetails<Value> {
///         let variant = match context.and_then(|c| c.targeting_key()) {
///             Some(key) if key.starts_with("beta-") => "on",
///             _ => flag.default_variant(),
///         };
///         match flag.variant(variant) {
///             Some(value) => ResolutionDetails::from_variant(flag.key(), value.clone(), variant, Reason::TargetingMatch),
///             None => ResolutionDetails::from_variant(flag.key(), default, variant, Reason::Default),
///         }
///     }
/// }
/// ```
pub trait VariantEvaluator: Send + Sync {
    /// Selects a value of `flag` for the given `context`.
    fn evaluate(
        &self,
        flag: &Flag,
        default: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value>;
}

impl<F> VariantEvaluator for F
where
    F: Fn(&Flag, Value, Option<&EvaluationContext>) -> ResolutionDetails<Value> + Send + Sync,
{
    fn evaluate(
        &self,
        flag: &Flag,
        default: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        self(flag, default, context)
    }
}

/// Always serves the flag's default variant, ignoring the context.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultVariantEvaluator;

impl DefaultVariantEvaluator {
    /// The instance shared by every flag built without an explicit evaluator.
    pub fn shared() -> Arc<dyn VariantEvaluator> {
        static SHARED: OnceLock<Arc<dyn VariantEvaluator>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(DefaultVariantEvaluator)))
    }
}

impl VariantEvaluator for DefaultVariantEvaluator {
    fn evaluate(
        &self,
        flag: &Flag,
        default: Value,
        _: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        let variant = flag.default_variant();
        match flag.variant(variant) {
            Some(value) if value.kind() == default.kind() => {
                ResolutionDetails::from_variant(flag.key(), value.clone(), variant, Reason::Static)
            }
            Some(value) => {
                let err = ResolutionError::new(
                    ErrorType::TypeMismatch,
                    format!(
                        "The type of flag '{}' must match the requested type. Variant '{variant}' holds a '{}' value but the requested type was '{}'.",
                        flag.key(),
                        value.kind(),
                        default.kind()
                    ),
                );
                ResolutionDetails::from_err(default, flag.key(), err).with_variant(variant)
            }
            None => {
                let err = ResolutionError::new(
                    ErrorType::General,
                    format!(
                        "Default variant '{variant}' of flag '{}' is missing.",
                        flag.key()
                    ),
                );
                ResolutionDetails::from_err(default, flag.key(), err)
            }
        }
    }
}

#[cfg(test)]
mod evaluator_tests {
    use super::*;

    fn flag() -> Flag {
        Flag::builder("color")
            .variant("red", "#f00")
            .variant("blue", "#00f")
            .default_variant("red")
            .build()
            .unwrap()
    }

    #[test]
    fn serves_default_variant() {
        let details = DefaultVariantEvaluator.evaluate(&flag(), Value::from("none"), None);

        assert_eq!(details.value, Value::from("#f00"));
        assert_eq!(details.variant.as_deref(), Some("red"));
        assert_eq!(details.reason, Some(Reason::Static));
        assert!(details.error_type.is_none());
        assert!(details.error_message.is_none());
    }

    #[test]
    fn ignores_context() {
        let context = EvaluationContext::new("someone").custom("color", "blue");
        let details = DefaultVariantEvaluator.evaluate(&flag(), Value::from("none"), Some(&context));

        assert_eq!(details.variant.as_deref(), Some("red"));
    }

    #[test]
    fn type_mismatch_returns_caller_default() {
        let details = DefaultVariantEvaluator.evaluate(&flag(), Value::Int(5), None);

        assert_eq!(details.value, Value::Int(5));
        assert_eq!(details.variant.as_deref(), Some("red"));
        assert_eq!(details.error_type, Some(ErrorType::TypeMismatch));
        assert!(details.error_message.unwrap().contains("'String'"));
    }

    #[test]
    fn shared_instance_is_reused() {
        assert!(Arc::ptr_eq(
            &DefaultVariantEvaluator::shared(),
            &DefaultVariantEvaluator::shared()
        ));
    }
}
