use crate::models::Login;
use bindkit::handler;
use serde_json::{json, Value};

#[handler]
pub async fn login(form: Login) -> Value {
    json!({"username": form.username})
}
