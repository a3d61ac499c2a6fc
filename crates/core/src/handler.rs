//! Registered-callable plumbing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::Result;

/// Ordered argument map passed to a registered function after binding.
pub type ArgMap = Map<String, Value>;

/// Boxed future returned by a registered function.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// A registered callable: bound arguments in, JSON return value out.
///
/// Handlers return a plain [`Value`] rather than an envelope so the adapters
/// can apply the defensive wrap uniformly (see `CallOutcome::from_return`).
pub type Handler = Arc<dyn Fn(ArgMap) -> HandlerFuture + Send + Sync>;

/// Wrap an async function as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(ArgMap) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |args| Box::pin(f(args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn wrapped_function_is_callable() {
        let h = handler(|args: ArgMap| async move {
            let n = args.get("n").and_then(Value::as_i64).unwrap_or(0);
            Ok(json!(n + 1))
        });

        let mut args = ArgMap::new();
        args.insert("n".into(), json!(41));
        assert_eq!(h(args).await.unwrap(), json!(42));
    }
}
