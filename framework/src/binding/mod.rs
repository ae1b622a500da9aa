//! Handler parameter binding
//!
//! Resolves which handler parameters are models, builds them from the decoded
//! request payload and hands them to the handler.

mod args;
mod binder;
mod descriptor;
mod handler;
pub(crate) mod model;

pub use args::{Arg, CallArgs};
pub use binder::{Binder, OptionalPolicy};
pub use descriptor::{resolve, ModelDescriptor, ParameterDescriptor, TypeRef};
pub use handler::{handler_fn, FnHandler, Handler};
pub use model::{BoundModel, DumpModel, Model, ModelRegistration, ModelRegistry, ModelType};
