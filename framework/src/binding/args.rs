//! Per-request call arguments and typed parameter extraction

use super::descriptor::TypeRef;
use super::model::{BoundModel, Model};
use crate::error::FrameworkError;
use std::collections::HashMap;
use std::str::FromStr;

enum Slot {
    Bound(BoundModel),
    Null,
}

/// Arguments for one handler invocation
///
/// Starts with the path captures supplied by the router; the binder adds one
/// slot per model parameter. Handler parameters are taken out by name.
#[derive(Default)]
pub struct CallArgs {
    params: HashMap<String, String>,
    slots: HashMap<String, Slot>,
}

impl CallArgs {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self {
            params,
            slots: HashMap::new(),
        }
    }

    /// Raw path capture `name`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Store the binder's result for a model parameter (`None` binds null)
    pub fn inject(&mut self, name: impl Into<String>, model: Option<BoundModel>) {
        let slot = match model {
            Some(bound) => Slot::Bound(bound),
            None => Slot::Null,
        };
        self.slots.insert(name.into(), slot);
    }

    /// Whether the binder stored an instance for `name`
    pub fn is_bound(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(Slot::Bound(_)))
    }

    /// Whether the binder stored null for `name`
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(Slot::Null))
    }

    /// Parse path capture `name` into `T`
    pub fn take_param<T: FromStr>(&mut self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.params.get(name).ok_or_else(|| FrameworkError::param(name))?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(name, std::any::type_name::<T>()))
    }

    /// Take the required model bound to `name`
    pub fn take_model<M: Model>(&mut self, name: &str) -> Result<M, FrameworkError> {
        match self.slots.remove(name) {
            Some(Slot::Bound(bound)) => downcast(name, bound),
            Some(Slot::Null) => Err(FrameworkError::internal(format!(
                "required model parameter '{}' was bound to null",
                name
            ))),
            None => Err(FrameworkError::internal(format!(
                "model parameter '{}' ({}) was not bound; is the model registered?",
                name,
                M::model_name()
            ))),
        }
    }

    /// Take the optional model bound to `name`
    pub fn take_optional<M: Model>(&mut self, name: &str) -> Result<Option<M>, FrameworkError> {
        match self.slots.remove(name) {
            Some(Slot::Bound(bound)) => downcast(name, bound).map(Some),
            Some(Slot::Null) | None => Ok(None),
        }
    }
}

fn downcast<M: Model>(name: &str, bound: BoundModel) -> Result<M, FrameworkError> {
    bound.downcast::<M>().map_err(|bound| {
        FrameworkError::internal(format!(
            "parameter '{}' expects {} but {} was bound",
            name,
            M::model_name(),
            bound.model_name()
        ))
    })
}

impl std::fmt::Debug for CallArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<_> = self.slots.keys().collect();
        bound.sort();
        f.debug_struct("CallArgs")
            .field("params", &self.params)
            .field("bound", &bound)
            .finish()
    }
}

/// A type that can appear as a handler parameter
///
/// `type_ref` describes the parameter for the route's binding table and
/// `take` pulls the value out of the call arguments. Path-capture scalars are
/// parsed with `FromStr`; models are implemented by `#[derive(Model)]`;
/// `Option<M>` covers every optional model.
pub trait Arg: Sized + Send + 'static {
    fn type_ref() -> TypeRef;

    fn take(args: &mut CallArgs, name: &str) -> Result<Self, FrameworkError>;
}

macro_rules! path_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Arg for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::of::<$ty>()
                }

                fn take(args: &mut CallArgs, name: &str) -> Result<Self, FrameworkError> {
                    args.take_param::<$ty>(name)
                }
            }
        )*
    };
}

path_args!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64, bool, char, String,
    uuid::Uuid,
);

impl<M: Model> Arg for Option<M> {
    fn type_ref() -> TypeRef {
        TypeRef::optional::<M>()
    }

    fn take(args: &mut CallArgs, name: &str) -> Result<Self, FrameworkError> {
        args.take_optional::<M>(name)
    }
}
