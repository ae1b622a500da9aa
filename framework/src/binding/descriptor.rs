//! Parameter descriptors and model resolution
//!
//! A handler's parameter table is built once, when the route is registered.
//! [`resolve`] decides for each declared type whether the binder owns the
//! parameter (a model, possibly optional) or leaves it to the router.

use super::model::{ModelRegistry, ModelType};
use std::any::TypeId;

/// Runtime reference to a parameter's declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A concrete `'static` type
    Named { name: &'static str, id: TypeId },
    /// A nullable union; holds only the non-null members
    Nullable(Vec<TypeRef>),
    /// Anything that cannot be resolved to a type
    Opaque(String),
}

impl TypeRef {
    pub fn of<T: 'static>() -> Self {
        Self::Named {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// `T` or null
    pub fn optional<T: 'static>() -> Self {
        Self::nullable([Self::of::<T>()])
    }

    pub fn nullable(members: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Nullable(members.into_iter().collect())
    }

    pub fn opaque(annotation: impl Into<String>) -> Self {
        Self::Opaque(annotation.into())
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, .. } => write!(f, "{}", name),
            Self::Nullable(members) => {
                let members: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "Option<{}>", members.join(" | "))
            }
            Self::Opaque(annotation) => write!(f, "{}", annotation),
        }
    }
}

/// One formal parameter of a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared: TypeRef,
    pub is_optional: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, declared: TypeRef) -> Self {
        let is_optional = declared.is_nullable();
        Self {
            name: name.into(),
            declared,
            is_optional,
        }
    }
}

/// A parameter the binder fills from the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub model: ModelType,
    pub optional: bool,
}

/// Decide whether `declared` denotes a model parameter
///
/// A registered model type resolves as required; a nullable wrapper around
/// exactly one registered model type resolves as optional. Everything else,
/// including unresolvable annotations, is `None`.
pub fn resolve(declared: &TypeRef, registry: &ModelRegistry) -> Option<ModelDescriptor> {
    match declared {
        TypeRef::Named { id, .. } => registry.get(*id).map(|model| ModelDescriptor {
            model: *model,
            optional: false,
        }),
        TypeRef::Nullable(members) => match members.as_slice() {
            [TypeRef::Named { id, .. }] => registry.get(*id).map(|model| ModelDescriptor {
                model: *model,
                optional: true,
            }),
            _ => None,
        },
        TypeRef::Opaque(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::model::tests::Pet;
    use pretty_assertions::assert_eq;

    fn registry() -> ModelRegistry {
        ModelRegistry::new().with::<Pet>()
    }

    #[test]
    fn test_required_model() {
        let descriptor = resolve(&TypeRef::of::<Pet>(), &registry()).unwrap();
        assert_eq!(descriptor.model, ModelType::of::<Pet>());
        assert!(!descriptor.optional);
    }

    #[test]
    fn test_optional_model() {
        let descriptor = resolve(&TypeRef::optional::<Pet>(), &registry()).unwrap();
        assert_eq!(descriptor.model.name(), "Pet");
        assert!(descriptor.optional);
    }

    #[test]
    fn test_non_models_are_left_alone() {
        let registry = registry();
        assert_eq!(resolve(&TypeRef::of::<u32>(), &registry), None);
        assert_eq!(resolve(&TypeRef::optional::<String>(), &registry), None);
        assert_eq!(resolve(&TypeRef::opaque("&'a str"), &registry), None);
    }

    #[test]
    fn test_unregistered_model_is_not_resolved() {
        assert_eq!(resolve(&TypeRef::of::<Pet>(), &ModelRegistry::new()), None);
    }

    #[test]
    fn test_nullable_needs_exactly_one_member() {
        let registry = registry();
        let union = TypeRef::nullable([TypeRef::of::<Pet>(), TypeRef::of::<u32>()]);
        assert_eq!(resolve(&union, &registry), None);
        assert_eq!(resolve(&TypeRef::Nullable(Vec::new()), &registry), None);

        let nested = TypeRef::nullable([TypeRef::optional::<Pet>()]);
        assert_eq!(resolve(&nested, &registry), None);
    }

    #[test]
    fn test_descriptor_optionality_follows_declared_type() {
        assert!(ParameterDescriptor::new("model", TypeRef::optional::<Pet>()).is_optional);
        assert!(!ParameterDescriptor::new("node_id", TypeRef::of::<u32>()).is_optional);
    }
}
