//! Route grouping with a shared path prefix and name prefix

use super::router::{bind_route, BindTarget, RouteOptions, Router};
use crate::binding::Handler;
use http::Method;

/// Routes registered under a shared prefix
///
/// Every route bound through a group is served by the outer [`Router`] at
/// `prefix + path`, with the same model registry and binding config. A named
/// group also prefixes route names: route `show` in group `node` is
/// `node.show` for [`Router::url_for`].
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .group("/api", |api| {
///         api.post("/item", create_item)        // -> POST /api/item
///            .group("/v2", |v2| v2.get("/", index)) // -> GET /api/v2/
///     })
/// ```
pub struct RouteGroup<'a> {
    router: &'a mut Router,
    prefix: String,
    name: Option<String>,
}

impl<'a> RouteGroup<'a> {
    pub(crate) fn new(router: &'a mut Router, prefix: &str) -> Self {
        Self {
            router,
            prefix: prefix.trim_end_matches('/').to_string(),
            name: None,
        }
    }

    /// Prefix route names registered in this group with `name.`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = Some(match self.name.take() {
            Some(outer) => format!("{}.{}", outer, name),
            None => name,
        });
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a GET route within the group
    pub fn get<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new())
    }

    /// Register a POST route within the group
    pub fn post<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::POST))
    }

    /// Register a PUT route within the group
    pub fn put<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::PUT))
    }

    /// Register a PATCH route within the group
    pub fn patch<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::PATCH))
    }

    /// Register a DELETE route within the group
    pub fn delete<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(path, handler, RouteOptions::new().method(Method::DELETE))
    }

    /// Register a route with explicit options; errors are logged and the
    /// route is skipped, like [`Router::route`]
    pub fn route<H: Handler>(mut self, path: &str, handler: H, options: RouteOptions) -> Self {
        if let Err(e) = bind_route(&mut self, path, handler, options) {
            tracing::error!(error = %e, prefix = %self.prefix, "Route skipped");
        }
        self
    }

    /// Nest a group under this one
    pub fn group<F>(self, prefix: &str, routes: F) -> Self
    where
        F: FnOnce(RouteGroup<'_>) -> RouteGroup<'_>,
    {
        let nested_prefix = self.full_path(prefix);
        let name = self.name.clone();
        let router: &mut Router = self.router;
        routes(RouteGroup {
            router: &mut *router,
            prefix: nested_prefix.trim_end_matches('/').to_string(),
            name,
        });
        Self {
            router,
            prefix: self.prefix,
            name: self.name,
        }
    }
}

impl BindTarget for RouteGroup<'_> {
    fn router_mut(&mut self) -> &mut Router {
        self.router
    }

    fn full_path(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    fn full_name(&self, name: &str) -> String {
        match &self.name {
            Some(group) => format!("{}.{}", group, name),
            None => name.to_string(),
        }
    }
}
