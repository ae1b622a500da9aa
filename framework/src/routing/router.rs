use super::group::RouteGroup;
use super::route::BoundRoute;
use crate::binding::{Binder, Handler, ModelRegistry};
use crate::config::BindingConfig;
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request};
use http::Method;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns a dispatch error into the response sent to the client
pub type ErrorHook = Arc<dyn Fn(&FrameworkError, &BindingConfig) -> HttpResponse + Send + Sync>;

/// Options for [`bind_route`], mirroring the router's own route options
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub methods: Vec<Method>,
    pub name: Option<String>,
}

impl RouteOptions {
    /// GET, unnamed
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve exactly `method`
    pub fn method(mut self, method: Method) -> Self {
        self.methods = vec![method];
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Name the route for [`Router::url_for`]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            methods: vec![Method::GET],
            name: None,
        }
    }
}

/// HTTP router with model binding on every route
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new()
///     .get("/", index)
///     .post("/model", post_model)
///     .put("/node/{node_id}", put_node);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Arc<BoundRoute>>>,
    names: HashMap<String, String>,
    registry: ModelRegistry,
    config: BindingConfig,
    error_hook: ErrorHook,
}

impl Router {
    /// Router over every model registered in the binary
    pub fn new() -> Self {
        Self::with_registry(ModelRegistry::collected())
    }

    /// Router that only treats the models in `registry` as bindable
    pub fn with_registry(registry: ModelRegistry) -> Self {
        Self {
            routes: HashMap::new(),
            names: HashMap::new(),
            registry,
            config: BindingConfig::default(),
            error_hook: Arc::new(default_error_response),
        }
    }

    /// Apply binding config
    ///
    /// The optional-model policy is fixed per route when it is registered, so
    /// call this before adding routes.
    pub fn with_config(mut self, config: BindingConfig) -> Self {
        if !self.routes.is_empty() {
            tracing::warn!("Binding config applied after routes were registered; existing routes keep their policy");
        }
        self.config = config;
        self
    }

    /// Replace the error-to-response hook
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FrameworkError, &BindingConfig) -> HttpResponse + Send + Sync + 'static,
    {
        self.error_hook = Arc::new(hook);
        self
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Register a GET route
    pub fn get<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new())
    }

    /// Register a POST route
    pub fn post<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::POST))
    }

    /// Register a PUT route
    pub fn put<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::PUT))
    }

    /// Register a PATCH route
    pub fn patch<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::PATCH))
    }

    /// Register a DELETE route
    pub fn delete<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::DELETE))
    }

    /// Register a route with explicit options
    ///
    /// Registration errors are logged and the route is skipped; use
    /// [`bind_route`] to handle them.
    pub fn route<H: Handler>(mut self, path: &str, handler: H, options: RouteOptions) -> Self {
        if let Err(e) = bind_route(&mut self, path, handler, options) {
            tracing::error!(error = %e, "Route skipped");
        }
        self
    }

    /// Register routes under a shared path prefix
    ///
    /// ```rust,ignore
    /// Router::new().group("/api", |api| {
    ///     api.name("api")
    ///         .post("/item", create_item)      // POST /api/item
    ///         .put("/node/{node_id}", put_node) // PUT /api/node/{node_id}
    /// })
    /// ```
    pub fn group<F>(mut self, prefix: &str, routes: F) -> Self
    where
        F: FnOnce(RouteGroup<'_>) -> RouteGroup<'_>,
    {
        routes(RouteGroup::new(&mut self, prefix));
        self
    }

    /// Generate a URL for a named route with parameters
    ///
    /// ```rust,ignore
    /// let url = router.url_for("node.update", &[("node_id", "7")]);
    /// assert_eq!(url, Some("/node/7".to_string()));
    /// ```
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let mut url = self.names.get(name)?.clone();
        for (key, value) in params {
            url = url
                .replace(&format!("{{*{}}}", key), value)
                .replace(&format!("{{{}}}", key), value);
        }
        Some(url)
    }

    /// Route a request and produce its response
    pub async fn dispatch(&self, request: Request) -> HttpResponse {
        let method = request.method().clone();
        let path = request.path().to_string();

        let result = match self.lookup(&method, &path) {
            Ok((route, params)) => route
                .run(request.with_params(params))
                .await
                .map(|normalized| normalized.into_response()),
            Err(e) => Err(e),
        };

        let response = result.unwrap_or_else(|e| self.render_error(&e));
        tracing::debug!(
            method = %method,
            path = %path,
            status = response.status_code(),
            "Request dispatched"
        );
        response
    }

    /// Render `error` through the error hook
    pub fn render_error(&self, error: &FrameworkError) -> HttpResponse {
        match error.status_code() {
            500..=599 => tracing::error!(error = %error, "Request failed"),
            _ if error.is_client_payload_error() => {
                tracing::warn!(error = %error, "Request payload rejected")
            }
            _ => tracing::debug!(error = %error, "Request failed"),
        }
        (self.error_hook)(error, &self.config)
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<(Arc<BoundRoute>, HashMap<String, String>), FrameworkError> {
        if let Some(matched) = self.routes.get(method).and_then(|table| table.at(path).ok()) {
            let params = matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            return Ok((matched.value.clone(), params));
        }

        let known_elsewhere = self
            .routes
            .iter()
            .any(|(other, table)| other != method && table.at(path).is_ok());
        if known_elsewhere {
            Err(FrameworkError::MethodNotAllowed)
        } else {
            Err(FrameworkError::NotFound)
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Something handlers can be bound onto: a [`Router`] or a prefixed
/// [`RouteGroup`](super::RouteGroup)
pub trait BindTarget {
    /// The router that ends up serving the route
    fn router_mut(&mut self) -> &mut Router;

    /// Full path for a route declared at `path`
    fn full_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Full name for a route declared as `name`
    fn full_name(&self, name: &str) -> String {
        name.to_string()
    }
}

impl BindTarget for Router {
    fn router_mut(&mut self) -> &mut Router {
        self
    }
}

/// Register `handler` at `path`, wrapped by decode, bind and normalize
///
/// The handler's parameter table is resolved against the router's model
/// registry here, once. Every non-model parameter must be a capture in the
/// full path. Registration is all-or-nothing: on error no method serves the
/// route.
pub fn bind_route<T, H>(
    target: &mut T,
    path: &str,
    handler: H,
    options: RouteOptions,
) -> Result<(), FrameworkError>
where
    T: BindTarget + ?Sized,
    H: Handler,
{
    if !path.starts_with('/') {
        return Err(FrameworkError::route(path, "path must start with '/'"));
    }
    let full_path = target.full_path(path);
    let name = options.name.as_deref().map(|name| target.full_name(name));
    let router = target.router_mut();
    let path = full_path.as_str();

    if !path.starts_with('/') {
        return Err(FrameworkError::route(path, "path must start with '/'"));
    }
    if options.methods.is_empty() {
        return Err(FrameworkError::route(path, "no methods given"));
    }
    if let Some(name) = &name {
        if router.names.contains_key(name) {
            return Err(FrameworkError::route(
                path,
                format!("route name '{}' is already in use", name),
            ));
        }
    }

    let binder = Binder::new(handler.params(), &router.registry, router.config.optional_policy());
    let captures = path_captures(path);
    if let Some(param) = binder
        .unbound_params()
        .find(|param| !captures.contains(&param.name.as_str()))
    {
        return Err(FrameworkError::route(
            path,
            format!(
                "parameter '{}' ({}) is neither a path capture nor a registered model",
                param.name, param.declared
            ),
        ));
    }

    let models = binder.model_params().count();
    let handler_name = handler.name();
    let route = Arc::new(BoundRoute::new(path, Arc::new(handler), binder));

    // Insert into copies first so a conflict on one method leaves every table untouched
    let mut staged: Vec<(Method, MatchitRouter<Arc<BoundRoute>>)> = Vec::new();
    for method in &options.methods {
        let mut table = match staged.iter().position(|(m, _)| m == method) {
            Some(index) => staged.swap_remove(index).1,
            None => router
                .routes
                .get(method)
                .cloned()
                .unwrap_or_else(MatchitRouter::new),
        };
        table
            .insert(path, route.clone())
            .map_err(|e| FrameworkError::route(path, e.to_string()))?;
        staged.push((method.clone(), table));
    }
    router.routes.extend(staged);
    if let Some(name) = name {
        router.names.insert(name, path.to_string());
    }

    tracing::info!(
        path = %path,
        methods = ?options.methods,
        handler = handler_name,
        models,
        "Route registered"
    );
    Ok(())
}

/// Names captured by a matchit path: `{name}` and `{*name}`
fn path_captures(path: &str) -> Vec<&str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}'))
        .map(|(capture, _)| capture.trim_start_matches('*'))
        .filter(|capture| !capture.is_empty())
        .collect()
}

/// The default error hook
///
/// Payload failures answer a generic `400 Invalid request`, or the field
/// diagnostics as JSON when `expose_validation_errors` is set. Anything else
/// answers `{"error": message}` with the error's status.
pub fn default_error_response(error: &FrameworkError, config: &BindingConfig) -> HttpResponse {
    let status = error.status_code();
    match error {
        FrameworkError::Validation(failure) if config.expose_validation_errors => {
            HttpResponse::json(failure.to_json()).status(status)
        }
        FrameworkError::Decode { .. } if config.expose_validation_errors => {
            HttpResponse::json(serde_json::json!({
                "message": "Invalid request",
                "error": error.to_string(),
            }))
            .status(status)
        }
        _ if error.is_client_payload_error() => HttpResponse::text("Invalid request").status(status),
        _ => HttpResponse::json(serde_json::json!({ "error": error.to_string() })).status(status),
    }
}
