//! Model binding for HTTP handlers
//!
//! Handlers declare the models they need as typed parameters; the router
//! decodes the request body, builds and validates those models, runs the
//! handler and normalizes whatever it returns into a response.
//!
//! ```rust,ignore
//! use bindkit::{handler, model, Router};
//!
//! #[model]
//! pub struct Node {
//!     #[validate(length(min = 1))]
//!     pub label: String,
//!     pub value: i64,
//! }
//!
//! #[handler]
//! pub async fn put_node(node_id: u32, node: Node) -> (&'static str, u16) {
//!     ("", 204)
//! }
//!
//! let router = Router::new().put("/node/{node_id}", put_node);
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod server;
pub mod testing;

pub use self::binding::{
    handler_fn, Arg, Binder, BoundModel, CallArgs, DumpModel, Handler, Model, ModelDescriptor,
    ModelRegistry, ModelType, OptionalPolicy, ParameterDescriptor, TypeRef,
};
pub use self::config::{BindingConfig, Config, Environment, ServerConfig};
pub use self::error::{AppError, FrameworkError, HttpError, ValidationErrors, ValidationFailure};
pub use self::http::{
    Body, HttpResponse, IntoBody, IntoReply, NormalizedResponse, RawPayload, Reply, Request,
};
pub use self::routing::{bind_route, BindTarget, RouteGroup, RouteOptions, Router};
pub use self::server::Server;

pub use bindkit_macros::{handler, model, Model};

// Used by macro expansions
pub use async_trait::async_trait;
pub use inventory;
