use bindkit::http::Method;
use bindkit::{BindingConfig, RouteOptions, Router};

use crate::controllers::{self, echo, form, item, node};

/// Every demo route
pub fn router(config: BindingConfig) -> Router {
    Router::new()
        .with_config(config)
        .route("/", controllers::index, RouteOptions::new().name("index"))
        .get("/echo/path/{*value}", echo::path)
        .get("/echo/int/{value}", echo::int)
        .get("/echo/uuid/{value}", echo::id)
        .post("/model", item::create)
        .post("/r/model", item::reflect)
        .post("/s/model/{status}", item::with_status)
        .post("/opt/model", item::optional)
        .post("/opt/model/{param}", item::optional_with_param)
        .route(
            "/node/{node_id}",
            node::replace,
            RouteOptions::new().method(Method::PUT).name("node"),
        )
        .patch("/node/{node_id}", node::update)
        .post("/form", form::login)
}
