//! The handler contract
//!
//! A [`Handler`] exposes its parameter table once, at registration, and is
//! called once per request with the bound [`CallArgs`]. `#[handler]` derives
//! both from an ordinary function; [`handler_fn`] builds one from an explicit
//! table.

use super::args::CallArgs;
use super::descriptor::ParameterDescriptor;
use crate::http::{IntoReply, Reply};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// A request handler with a declared parameter table
///
/// # Example
///
/// The `#[handler]` macro turns
///
/// ```rust,ignore
/// #[handler]
/// pub async fn post_model_code(status: u16, model: Model) -> (Model, u16) {
///     (model, status)
/// }
/// ```
///
/// into a unit type `post_model_code` whose `params()` is
/// `[status: u16, model: Model]` and whose `call()` takes both arguments out of
/// the [`CallArgs`] before running the original body.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Name used in logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The handler's formal parameters, in declaration order
    fn params(&self) -> Vec<ParameterDescriptor>;

    async fn call(&self, args: CallArgs) -> Reply;
}

/// Handler built from a closure and an explicit parameter table
pub struct FnHandler<F, Fut, R> {
    name: &'static str,
    params: Vec<ParameterDescriptor>,
    f: F,
    _marker: PhantomData<fn() -> (Fut, R)>,
}

/// Build a [`Handler`] without the macro
///
/// ```rust,ignore
/// let echo = handler_fn(
///     "post_model",
///     vec![ParameterDescriptor::new("model", TypeRef::of::<Model>())],
///     |mut args: CallArgs| async move {
///         let model: Model = args.take_model("model")?;
///         Ok::<_, FrameworkError>((model, 201u16))
///     },
/// );
/// ```
pub fn handler_fn<F, Fut, R>(
    name: &'static str,
    params: Vec<ParameterDescriptor>,
    f: F,
) -> FnHandler<F, Fut, R>
where
    F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + 'static,
{
    FnHandler {
        name,
        params,
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, R> Handler for FnHandler<F, Fut, R>
where
    F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn params(&self) -> Vec<ParameterDescriptor> {
        self.params.clone()
    }

    async fn call(&self, args: CallArgs) -> Reply {
        (self.f)(args).await.into_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::descriptor::TypeRef;
    use crate::error::FrameworkError;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_fn_handler_reports_params_and_runs() {
        let handler = handler_fn(
            "echo_int",
            vec![ParameterDescriptor::new("value", TypeRef::of::<i64>())],
            |mut args: CallArgs| async move {
                let value: i64 = args.take_param("value")?;
                Ok::<_, FrameworkError>(value.to_string())
            },
        );

        assert_eq!(handler.name(), "echo_int");
        assert_eq!(handler.params()[0].name, "value");

        let args = CallArgs::new(HashMap::from([("value".to_string(), "42".to_string())]));
        match handler.call(args).await {
            Reply::Body { status: None, .. } => {}
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fn_handler_surfaces_extraction_failure() {
        let handler = handler_fn("needs_value", Vec::new(), |mut args: CallArgs| async move {
            let value: i64 = args.take_param("value")?;
            Ok::<_, FrameworkError>(value.to_string())
        });

        let reply = handler.call(CallArgs::default()).await;
        assert!(matches!(reply, Reply::Failed(FrameworkError::ParamError { .. })));
    }
}
