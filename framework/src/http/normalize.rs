//! Response normalization
//!
//! Handlers may return a native [`HttpResponse`], a body, or a `(body, status)`
//! pair. [`normalize`] shapes all of them into one result before the router
//! emits it.

use super::HttpResponse;
use crate::binding::DumpModel;
use crate::error::FrameworkError;

/// A handler-produced body, before normalization
pub enum Body {
    Empty,
    Text(String),
    Json(serde_json::Value),
    /// A model instance; dumped to its plain structure by the normalizer
    Model(Box<dyn DumpModel>),
}

impl Body {
    pub fn model<M: DumpModel + 'static>(model: M) -> Self {
        Self::Model(Box::new(model))
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Model(model) => f.debug_tuple("Model").field(&model.model_name()).finish(),
        }
    }
}

/// Conversion into a response body
///
/// Implemented here for the plain body types and by `#[derive(Model)]` for
/// every model.
pub trait IntoBody {
    fn into_body(self) -> Body;
}

impl IntoBody for Body {
    fn into_body(self) -> Body {
        self
    }
}

impl IntoBody for () {
    fn into_body(self) -> Body {
        Body::Empty
    }
}

impl IntoBody for String {
    fn into_body(self) -> Body {
        Body::Text(self)
    }
}

impl IntoBody for &'static str {
    fn into_body(self) -> Body {
        Body::Text(self.to_string())
    }
}

impl IntoBody for serde_json::Value {
    fn into_body(self) -> Body {
        Body::Json(self)
    }
}

/// What a handler invocation produced
#[derive(Debug)]
pub enum Reply {
    /// A framework-native response, emitted unchanged
    Native(HttpResponse),
    Body { body: Body, status: Option<u16> },
    /// The handler (or argument extraction) failed
    Failed(FrameworkError),
}

impl Reply {
    pub fn body(body: impl IntoBody) -> Self {
        Self::Body {
            body: body.into_body(),
            status: None,
        }
    }

    pub fn with_status(body: impl IntoBody, status: u16) -> Self {
        Self::Body {
            body: body.into_body(),
            status: Some(status),
        }
    }

    pub fn failed(err: impl Into<FrameworkError>) -> Self {
        Self::Failed(err.into())
    }
}

/// Conversion of a handler's return value into a [`Reply`]
pub trait IntoReply {
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply {
        self
    }
}

impl IntoReply for HttpResponse {
    fn into_reply(self) -> Reply {
        Reply::Native(self)
    }
}

macro_rules! body_replies {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReply for $ty {
                fn into_reply(self) -> Reply {
                    Reply::body(self)
                }
            }
        )*
    };
}

body_replies!(Body, (), String, &'static str, serde_json::Value);

impl<T: IntoBody> IntoReply for (T, u16) {
    fn into_reply(self) -> Reply {
        Reply::with_status(self.0, self.1)
    }
}

impl<T: IntoBody> IntoReply for (T, http::StatusCode) {
    fn into_reply(self) -> Reply {
        Reply::with_status(self.0, self.1.as_u16())
    }
}

impl<R: IntoReply, E: Into<FrameworkError>> IntoReply for Result<R, E> {
    fn into_reply(self) -> Reply {
        match self {
            Ok(reply) => reply.into_reply(),
            Err(err) => Reply::Failed(err.into()),
        }
    }
}

/// A reply with its final status and a plain body
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResponse {
    Native(HttpResponse),
    Shaped { body: ShapedBody, status: u16 },
}

/// Body of a shaped response
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl NormalizedResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Native(response) => response.status_code(),
            Self::Shaped { status, .. } => *status,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        match self {
            Self::Native(response) => response,
            Self::Shaped { body, status } => match body {
                ShapedBody::Empty => HttpResponse::new().status(status),
                ShapedBody::Text(text) => HttpResponse::text(text).status(status),
                ShapedBody::Json(value) => HttpResponse::json(value).status(status),
            },
        }
    }
}

/// Shape a handler's reply into its final status and body
///
/// Native responses pass through. Other bodies get the handler's status or
/// 200; model bodies are dumped to their plain structure.
pub fn normalize(reply: Reply) -> Result<NormalizedResponse, FrameworkError> {
    let (body, status) = match reply {
        Reply::Native(response) => return Ok(NormalizedResponse::Native(response)),
        Reply::Failed(err) => return Err(err),
        Reply::Body { body, status } => (body, status.unwrap_or(200)),
    };

    if http::StatusCode::from_u16(status).is_err() {
        return Err(FrameworkError::internal(format!(
            "handler returned invalid status code {}",
            status
        )));
    }

    let body = match body {
        Body::Empty => ShapedBody::Empty,
        Body::Text(text) => ShapedBody::Text(text),
        Body::Json(value) => ShapedBody::Json(value),
        Body::Model(model) => ShapedBody::Json(model.dump_fields()?),
    };
    Ok(NormalizedResponse::Shaped { body, status })
}
