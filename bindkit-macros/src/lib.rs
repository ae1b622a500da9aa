//! Procedural macros for bindkit
//!
//! - `#[handler]` turns a function into a `bindkit::Handler`
//! - `#[model]` and `#[derive(Model)]` make a struct a bindable model

use proc_macro::TokenStream;

mod handler;
mod model;

/// Turn a function into a route handler
///
/// Every parameter must be a path capture type (integers, floats, `bool`,
/// `String`, `Uuid`), a model, or `Option<Model>`. The function name becomes a
/// unit type implementing `bindkit::Handler`; the original body stays callable
/// as `name::invoke(..)`.
///
/// # Example
///
/// ```rust,ignore
/// use bindkit::handler;
///
/// #[handler]
/// pub async fn put_node(node_id: u32, node: Node) -> (&'static str, u16) {
///     ("", 204)
/// }
///
/// let router = Router::new().put("/node/{node_id}", put_node);
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, input: TokenStream) -> TokenStream {
    handler::handler_impl(attr, input)
}

/// Derive the `bindkit::Model` contract for a struct
///
/// The struct must also derive `serde::Deserialize`, `serde::Serialize` and
/// `validator::Validate`. Besides `Model`, this implements the handler
/// argument and reply conversions and registers the type with
/// `ModelRegistry::collected()`.
#[proc_macro_derive(Model)]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model_impl(input)
}

/// Make a struct a model, adding the derives it needs
///
/// ```rust,ignore
/// use bindkit::model;
///
/// #[model]
/// pub struct Node {
///     #[validate(length(min = 1))]
///     pub label: String,
///     pub value: i64,
/// }
/// ```
///
/// expands to
///
/// ```rust,ignore
/// #[derive(serde::Deserialize, serde::Serialize, validator::Validate, bindkit::Model)]
/// pub struct Node { ... }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, input: TokenStream) -> TokenStream {
    model::model_attr_impl(attr, input)
}
