//! Expression-resolution boundary

use serde_json::Value;

use crate::Result;

/// Boundary to the expression-resolution engine
///
/// Implementations turn a raw specification string into a concrete JSON
/// value for the item at `index`. Resolution is the engine's only suspension
/// point: parsing never starts before the resolved value is fully available,
/// and cancellation belongs to the execution context driving the resolver.
#[allow(async_fn_in_trait)] // Callers stay generic over the resolver; no Send bound is imposed here.
pub trait ValueResolver {
    /// Resolve `raw` against the execution context of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`](crate::Error::Resolution) when an
    /// embedded expression fails to evaluate.
    async fn resolve(&self, raw: &str, index: usize) -> Result<Value>;
}

/// Resolver for specifications without embedded expressions
///
/// Treats the raw text as literal JSON. Template engines live outside this
/// crate and implement [`ValueResolver`] themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralResolver;

impl ValueResolver for LiteralResolver {
    async fn resolve(&self, raw: &str, index: usize) -> Result<Value> {
        serde_json::from_str(raw).map_err(|e| {
            crate::Error::resolution(index, format!("document contains invalid JSON: {e}"))
        })
    }
}
