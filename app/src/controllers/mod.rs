pub mod echo;
pub mod form;
pub mod item;
pub mod node;

use bindkit::handler;

#[handler]
pub async fn index() -> &'static str {
    "hello world"
}
