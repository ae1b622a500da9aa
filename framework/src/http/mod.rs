mod body;
mod decode;
mod normalize;
mod request;
mod response;

pub use body::collect_body;
pub use decode::{decode, ContentKind, RawPayload};
pub use normalize::{normalize, Body, IntoBody, IntoReply, NormalizedResponse, Reply, ShapedBody};
pub use request::{Request, RequestParts};
pub use response::HttpResponse;

pub use ::http::{Method, StatusCode};
