//! The model contract and the registry of model types
//!
//! A model is a schema-validated struct: `serde` gives it a shape, `validator`
//! gives it rules. The binder only ever sees models through the type-erased
//! [`ModelType`] handle, so route tables can be built once and shared.

use crate::error::{FrameworkError, ValidationErrors, ValidationFailure};
use crate::http::RawPayload;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use validator::Validate;

/// Trait for validated request models
///
/// Implemented by `#[derive(Model)]` (or the `#[model]` attribute, which adds
/// the serde and validator derives as well):
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
pub trait Model: DeserializeOwned + Serialize + Validate + Send + 'static {
    /// Name used in diagnostics and logs
    fn model_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Validating constructor
    ///
    /// JSON payloads deserialize through `serde_json`; form payloads through
    /// `serde_urlencoded`, so numeric fields parse from their text form. The
    /// validator rules run after the shape is accepted.
    fn from_payload(payload: &RawPayload) -> Result<Self, ValidationFailure> {
        let failure = |errors| ValidationFailure::new(Self::model_name(), errors);

        let parsed = match payload {
            RawPayload::Absent => {
                return Err(failure(ValidationErrors::root("no data to build the model from")))
            }
            RawPayload::Json(value) => Self::deserialize(value).map_err(|e| e.to_string()),
            RawPayload::Form(fields) => serde_urlencoded::to_string(fields)
                .map_err(|e| e.to_string())
                .and_then(|encoded| serde_urlencoded::from_str(&encoded).map_err(|e| e.to_string())),
        };
        let model = parsed.map_err(|message| failure(ValidationErrors::root(message)))?;

        model
            .validate()
            .map_err(|errors| failure(ValidationErrors::from_validator(errors)))?;
        Ok(model)
    }

    /// Field-by-field plain structure of the model
    fn dump(&self) -> Result<serde_json::Value, FrameworkError> {
        serde_json::to_value(self).map_err(|e| {
            FrameworkError::internal(format!("Failed to serialize {}: {}", Self::model_name(), e))
        })
    }
}

/// A model instance of any type, as returned by a handler
pub trait DumpModel: Send {
    fn model_name(&self) -> &'static str;
    fn dump_fields(&self) -> Result<serde_json::Value, FrameworkError>;
}

impl<M: Model> DumpModel for M {
    fn model_name(&self) -> &'static str {
        M::model_name()
    }

    fn dump_fields(&self) -> Result<serde_json::Value, FrameworkError> {
        self.dump()
    }
}

/// A validated model instance with its type erased
///
/// Lives for one request: the binder stores it in the call arguments and the
/// handler's parameter extraction takes it back out.
pub struct BoundModel {
    model: &'static str,
    value: Box<dyn Any + Send>,
}

impl BoundModel {
    pub fn new<M: Model>(model: M) -> Self {
        Self {
            model: M::model_name(),
            value: Box::new(model),
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model
    }

    /// Recover the concrete model, handing `self` back on a type mismatch
    pub fn downcast<M: Model>(self) -> Result<M, Self> {
        match self.value.downcast::<M>() {
            Ok(model) => Ok(*model),
            Err(value) => Err(Self {
                model: self.model,
                value,
            }),
        }
    }
}

impl std::fmt::Debug for BoundModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundModel").field("model", &self.model).finish()
    }
}

/// Type-erased handle to a model type
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    type_id: TypeId,
    build: fn(&RawPayload) -> Result<BoundModel, ValidationFailure>,
}

impl ModelType {
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::model_name(),
            type_id: TypeId::of::<M>(),
            build: build_bound::<M>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Run the model's validating constructor on `payload`
    pub fn build(&self, payload: &RawPayload) -> Result<BoundModel, ValidationFailure> {
        (self.build)(payload)
    }
}

fn build_bound<M: Model>(payload: &RawPayload) -> Result<BoundModel, ValidationFailure> {
    M::from_payload(payload).map(BoundModel::new)
}

impl std::fmt::Debug for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModelType").field(&self.name).finish()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelType {}

/// Link-time registration emitted by `#[derive(Model)]`
pub struct ModelRegistration {
    pub model: fn() -> ModelType,
}

inventory::collect!(ModelRegistration);

/// The set of types the resolver treats as models
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<TypeId, ModelType>,
}

impl ModelRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every model registered through `#[derive(Model)]` in the final binary
    pub fn collected() -> Self {
        let mut registry = Self::new();
        for registration in inventory::iter::<ModelRegistration> {
            registry.insert((registration.model)());
        }
        registry
    }

    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.insert(ModelType::of::<M>());
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<M: Model>(mut self) -> Self {
        self.register::<M>();
        self
    }

    pub fn insert(&mut self, model: ModelType) {
        self.models.insert(model.type_id(), model);
    }

    pub fn get(&self, type_id: TypeId) -> Option<&ModelType> {
        self.models.get(&type_id)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.models.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize, Serialize, Validate)]
    pub(crate) struct Pet {
        #[validate(length(min = 1, message = "name must not be empty"))]
        pub name: String,
        #[serde(default)]
        pub age: Option<u32>,
    }

    impl Model for Pet {}

    #[test]
    fn test_model_name_is_unqualified() {
        assert_eq!(<Pet as Model>::model_name(), "Pet");
    }

    #[test]
    fn test_from_json_payload() {
        let pet = Pet::from_payload(&RawPayload::Json(json!({"name": "Rex", "age": 3}))).unwrap();
        assert_eq!(
            pet,
            Pet {
                name: "Rex".to_string(),
                age: Some(3)
            }
        );
    }

    #[test]
    fn test_from_form_payload_parses_numbers() {
        let payload = RawPayload::Form(vec![
            ("name".to_string(), "Rex".to_string()),
            ("age".to_string(), "7".to_string()),
        ]);
        assert_eq!(Pet::from_payload(&payload).unwrap().age, Some(7));
    }

    #[test]
    fn test_absent_payload_fails_at_root() {
        let failure = Pet::from_payload(&RawPayload::Absent).unwrap_err();
        assert_eq!(failure.model, "Pet");
        assert_eq!(failure.errors.field(ValidationErrors::ROOT).len(), 1);
    }

    #[test]
    fn test_shape_and_rule_failures() {
        let shape = Pet::from_payload(&RawPayload::Json(json!({"not_name": "x"}))).unwrap_err();
        assert!(shape.errors.field(ValidationErrors::ROOT)[0].contains("name"));

        let rule = Pet::from_payload(&RawPayload::Json(json!({"name": ""}))).unwrap_err();
        assert_eq!(rule.errors.field("name"), ["name must not be empty".to_string()]);
    }

    #[test]
    fn test_dump_is_plain_structure() {
        let pet = Pet {
            name: "Rex".to_string(),
            age: None,
        };
        assert_eq!(pet.dump().unwrap(), json!({"name": "Rex", "age": null}));
    }

    #[test]
    fn test_bound_model_roundtrips_through_any() {
        let bound = ModelType::of::<Pet>()
            .build(&RawPayload::Json(json!({"name": "Rex"})))
            .unwrap();
        assert_eq!(bound.model_name(), "Pet");
        assert_eq!(bound.downcast::<Pet>().unwrap().name, "Rex");
    }

    #[test]
    fn test_registry() {
        let registry = ModelRegistry::new().with::<Pet>();
        assert!(registry.contains::<Pet>());
        assert!(!registry.contains::<String>());
        assert_eq!(registry.get(TypeId::of::<Pet>()).map(ModelType::name), Some("Pet"));
    }
}
