use crate::{EvaluationContext, ResolutionDetails, ResolutionError, Value};

/// Evaluation lifecycle callbacks registered on a provider.
///
/// The provider only stores hooks and hands them out through
/// [`crate::InMemoryProvider::hooks`]; running them is the job of the
/// evaluation client. Every method defaults to a no-op.
pub trait Hook: Send + Sync {
    /// Called before a flag is resolved. A returned context is merged into
    /// the evaluation context by the client.
    fn before(&self, _flag_key: &str, _context: &EvaluationContext) -> Option<EvaluationContext> {
        None
    }

    /// Called after a successful resolution.
    fn after(&self, _details: &ResolutionDetails<Value>, _context: &EvaluationContext) {}

    /// Called when a resolution failed.
    fn error(&self, _flag_key: &str, _err: &ResolutionError, _context: &EvaluationContext) {}

    /// Called after every resolution, successful or not.
    fn finally(&self, _flag_key: &str, _context: &EvaluationContext) {}
}
