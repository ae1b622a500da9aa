use bindkit::model;
use validator::ValidationError;

#[model]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[model]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub value: i64,
}

/// Partial update of a [`Node`]; at least one field must be given
#[model]
#[derive(Debug, Clone, PartialEq)]
#[validate(schema(function = "label_or_value"))]
pub struct NodePatch {
    pub label: Option<String>,
    pub value: Option<i64>,
}

fn label_or_value(patch: &NodePatch) -> Result<(), ValidationError> {
    if patch.label.is_none() && patch.value.is_none() {
        let mut error = ValidationError::new("label_or_value");
        error.message = Some("must provide either label or value".into());
        return Err(error);
    }
    Ok(())
}

/// Login form; the password is never written back out
#[model]
#[derive(Clone)]
pub struct Login {
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("password", &"**********")
            .finish()
    }
}
