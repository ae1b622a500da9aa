use crate::models::Item;
use bindkit::handler;
use serde_json::{json, Value};

#[handler]
pub async fn create(item: Item) -> (Value, u16) {
    (json!({"id": 1, "name": item.name}), 201)
}

/// Return the model itself; the normalizer dumps it
#[handler]
pub async fn reflect(item: Item) -> (Item, u16) {
    (item, 201)
}

#[handler]
pub async fn with_status(status: u16, item: Item) -> (Item, u16) {
    (item, status)
}

#[handler]
pub async fn optional(item: Option<Item>) -> Value {
    match item {
        Some(item) => json!({"name": item.name}),
        None => json!({"name": "Out Of Thin Air!"}),
    }
}

#[handler]
pub async fn optional_with_param(param: String, item: Option<Item>) -> Value {
    let mut body = match item {
        Some(item) => json!({"name": item.name}),
        None => json!({"name": "Out Of Thin Air!"}),
    };
    body["url_param"] = Value::String(param);
    body
}
