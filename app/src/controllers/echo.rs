//! Path captures only; nothing here touches the body

use bindkit::handler;

#[handler]
pub async fn path(value: String) -> String {
    value
}

#[handler]
pub async fn int(value: i64) -> String {
    value.to_string()
}

#[handler]
pub async fn id(value: uuid::Uuid) -> String {
    value.to_string()
}
