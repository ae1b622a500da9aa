//! Framework-wide error types
//!
//! Every failure the binding pipeline can produce is a [`FrameworkError`].
//! The router's error hook turns it into the client-visible response.

use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrorsKind;

/// Trait for errors that can be converted to HTTP responses
///
/// Implement this trait on your domain errors to customize the HTTP status code
/// and message that will be returned when the error reaches the router.
///
/// # Example
///
/// ```rust,ignore
/// use bindkit::HttpError;
///
/// #[derive(Debug)]
/// struct NodeLocked { node_id: u32 }
///
/// impl std::fmt::Display for NodeLocked {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "Node {} is locked", self.node_id)
///     }
/// }
///
/// impl std::error::Error for NodeLocked {}
///
/// impl HttpError for NodeLocked {
///     fn status_code(&self) -> u16 { 409 }
/// }
/// ```
pub trait HttpError: std::error::Error + Send + Sync + 'static {
    /// HTTP status code (default: 500)
    fn status_code(&self) -> u16 {
        500
    }

    /// Error message for HTTP response (default: error's Display)
    fn error_message(&self) -> String {
        self.to_string()
    }
}

/// Simple wrapper for one-off domain errors raised by handlers
///
/// ```rust,ignore
/// #[handler]
/// pub async fn put_node(node_id: u32, node: Node) -> Result<(), AppError> {
///     if node_id == 0 {
///         return Err(AppError::not_found("no such node"));
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AppError {
    message: String,
    status_code: u16,
}

impl AppError {
    /// Create a new AppError with status 500 (Internal Server Error)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 500,
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).status(404)
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).status(400)
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message).status(409)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl HttpError for AppError {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn error_message(&self) -> String {
        self.message.clone()
    }
}

impl<E: HttpError> From<E> for FrameworkError {
    fn from(e: E) -> Self {
        FrameworkError::Domain {
            message: e.error_message(),
            status_code: e.status_code(),
        }
    }
}

/// Field-level validation diagnostics
///
/// Maps a field name to every message raised for it. Errors that are not tied
/// to a single field (missing payload, wrong JSON shape, schema-level rules)
/// live under [`ValidationErrors::ROOT`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Key for errors that do not belong to a single field
    pub const ROOT: &'static str = "__root__";

    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of a single root-level message
    pub fn root(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(Self::ROOT, message);
        errors
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for `field`, empty if none
    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Convert from validator crate's ValidationErrors
    ///
    /// Schema-level rules (`#[validate(schema(...))]`) are reported by
    /// `validator` under `__all__` and are folded into [`Self::ROOT`]. Errors
    /// from nested models are keyed by their path, e.g. `owner.name` or
    /// `tags[1].label`.
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        result.collect(None, &errors);
        result
    }

    fn collect(&mut self, parent: Option<&str>, errors: &validator::ValidationErrors) {
        for (field, kind) in errors.errors() {
            let key = match (parent, *field) {
                (None, "__all__") => Self::ROOT.to_string(),
                (None, field) => field.to_string(),
                (Some(parent), "__all__") => parent.to_string(),
                (Some(parent), field) => format!("{}.{}", parent, field),
            };
            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let message = error.message.as_ref().map(|m| m.to_string()).unwrap_or_else(
                            || format!("Validation failed for field '{}' ({})", key, error.code),
                        );
                        self.add(key.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.collect(Some(&key), nested),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect(Some(&format!("{}[{}]", key, index)), nested);
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        let rendered: Vec<String> = fields
            .into_iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A model could not be built from the request payload
///
/// Carries the target model and its diagnostics. The diagnostics are meant for
/// logs; the default response body does not include them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Name of the model that failed to build
    pub model: &'static str,
    pub errors: ValidationErrors,
}

impl ValidationFailure {
    pub fn new(model: &'static str, errors: ValidationErrors) -> Self {
        Self { model, errors }
    }

    /// JSON rendering used when diagnostics are exposed to clients
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": "The given data was invalid.",
            "model": self.model,
            "errors": self.errors.errors,
        })
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.model, self.errors)
    }
}

impl std::error::Error for ValidationFailure {}

/// Framework-wide error type
///
/// Handlers may return `Result<_, E>` for any `E: Into<FrameworkError>`; the
/// router converts the error through its error hook.
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// A path capture the handler asked for is missing
    #[error("Missing required parameter: {param_name}")]
    ParamError { param_name: String },

    /// A path capture cannot be parsed to the handler's parameter type
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        param: String,
        expected_type: &'static str,
    },

    /// The body is malformed for the content type it declares
    #[error("Malformed {content_type} body: {message}")]
    Decode {
        content_type: &'static str,
        message: String,
    },

    /// A required model could not be built from the payload
    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    /// No route matches the request path
    #[error("Not Found")]
    NotFound,

    /// The path exists but not for this method
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The request body exceeds the configured limit
    #[error("Payload Too Large")]
    PayloadTooLarge,

    /// A route could not be registered
    #[error("Cannot register route '{path}': {message}")]
    Route { path: String, message: String },

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },

    /// Domain/application error with custom status code
    #[error("{message}")]
    Domain { message: String, status_code: u16 },
}

impl FrameworkError {
    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    /// Create a ParamParse error (400)
    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    pub fn decode(content_type: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            content_type,
            message: message.into(),
        }
    }

    pub fn route(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Route {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a Domain error with custom status code
    pub fn domain(message: impl Into<String>, status_code: u16) -> Self {
        Self::Domain {
            message: message.into(),
            status_code,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::Decode { .. } => 400,
            Self::Validation(_) => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge => 413,
            Self::Route { .. } => 500,
            Self::Internal { .. } => 500,
            Self::Domain { status_code, .. } => *status_code,
        }
    }

    /// Whether this error means the request body was rejected
    pub fn is_client_payload_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Validation(_))
    }
}

impl From<ValidationFailure> for FrameworkError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl From<std::convert::Infallible> for FrameworkError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
