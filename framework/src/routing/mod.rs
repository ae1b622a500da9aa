mod group;
mod route;
mod router;

pub use group::RouteGroup;
pub use route::BoundRoute;
pub use router::{bind_route, default_error_response, BindTarget, ErrorHook, RouteOptions, Router};
