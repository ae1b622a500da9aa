//! One registered route and its per-request pipeline

use crate::binding::{Binder, CallArgs, Handler};
use crate::error::FrameworkError;
use crate::http::{decode, normalize, NormalizedResponse, Request};
use std::sync::Arc;

/// A handler wrapped by decode → bind → call → normalize
pub struct BoundRoute {
    path: String,
    handler: Arc<dyn Handler>,
    binder: Binder,
}

impl BoundRoute {
    pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>, binder: Binder) -> Self {
        Self {
            path: path.into(),
            handler,
            binder,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler.name()
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    /// Run the pipeline for one matched request
    ///
    /// The body is only decoded when the handler declares a model parameter.
    /// Decode and required-model failures return before the handler runs.
    pub async fn run(&self, request: Request) -> Result<NormalizedResponse, FrameworkError> {
        let (parts, body) = request.into_parts();
        let mut args = CallArgs::new(parts.params);

        if self.binder.has_models() {
            let payload = decode(parts.content_type.as_deref(), &body).map_err(|e| {
                tracing::debug!(route = %self.path, error = %e, "Request body rejected");
                e
            })?;
            args = self.binder.bind(&payload, args)?;
        }

        normalize(self.handler.call(args).await)
    }
}

impl std::fmt::Debug for BoundRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundRoute")
            .field("path", &self.path)
            .field("handler", &self.handler.name())
            .field("binder", &self.binder)
            .finish()
    }
}
