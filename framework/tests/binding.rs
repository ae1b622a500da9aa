use bindkit::testing::TestClient;
use bindkit::{handler, model, BindingConfig, HttpResponse, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use validator::ValidationError;

#[model]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[model]
#[derive(Debug)]
pub struct Node {
    pub label: String,
    pub value: i64,
}

#[model]
#[derive(Debug)]
#[validate(schema(function = "label_or_value"))]
pub struct NodePatch {
    pub label: Option<String>,
    pub value: Option<i64>,
}

fn label_or_value(patch: &NodePatch) -> Result<(), ValidationError> {
    if patch.label.is_none() && patch.value.is_none() {
        let mut error = ValidationError::new("label_or_value");
        error.message = Some("must provide either label or value".into());
        return Err(error);
    }
    Ok(())
}

static GUARDED_ITEM_CALLED: AtomicBool = AtomicBool::new(false);

#[handler]
async fn create_item(item: Item) -> (Value, u16) {
    (json!({"id": 1, "name": item.name}), 201)
}

#[handler]
async fn guarded_item(item: Item) -> String {
    GUARDED_ITEM_CALLED.store(true, Ordering::SeqCst);
    item.name
}

#[handler]
async fn echo_item(item: Item) -> (Item, u16) {
    (item, 201)
}

#[handler]
async fn reflect_item(item: Item) -> Item {
    item
}

#[handler]
async fn maybe_item(item: Option<Item>) -> Value {
    match item {
        Some(item) => json!({"name": item.name}),
        None => json!({"name": "Out Of Thin Air!"}),
    }
}

#[handler]
async fn extend_item(param: String, item: Option<Item>) -> Value {
    json!({"bound": item.is_some(), "url_param": param})
}

#[handler]
async fn put_node(node_id: u32, node: Node) -> (Value, u16) {
    (json!({"id": node_id, "label": node.label, "value": node.value}), 200)
}

#[handler]
async fn patch_node(node_id: u32, patch: NodePatch) -> (&'static str, u16) {
    let _ = (node_id, patch);
    ("", 204)
}

#[handler]
async fn echo_path(value: String) -> String {
    value
}

#[handler]
async fn echo_uuid(value: uuid::Uuid) -> String {
    value.to_string()
}

#[handler]
fn teapot() -> HttpResponse {
    HttpResponse::text("short and stout").status(418).header("X-Kettle", "1")
}

#[handler]
async fn nothing() {}

fn router() -> Router {
    Router::new()
        .post("/item", create_item)
        .post("/guarded", guarded_item)
        .post("/echo", echo_item)
        .post("/reflect", reflect_item)
        .post("/opt", maybe_item)
        .post("/opt/{param}", extend_item)
        .put("/node/{node_id}", put_node)
        .patch("/node/{node_id}", patch_node)
        .get("/echo/path/{*value}", echo_path)
        .get("/echo/uuid/{value}", echo_uuid)
        .get("/teapot", teapot)
        .get("/nothing", nothing)
}

fn client() -> TestClient {
    TestClient::new(router())
}

#[tokio::test]
async fn required_model_binds_from_json() {
    let response = client().post("/echo").json(&json!({"name": "Foo"})).send().await;

    assert_eq!(response.status, 201);
    assert_eq!(response.json(), json!({"name": "Foo"}));
}

#[tokio::test]
async fn required_model_rejects_empty_or_mismatched_body_without_running_handler() {
    let client = client();

    let empty = client.post("/guarded").send().await;
    assert_eq!(empty.status, 400);
    assert_eq!(empty.text(), "Invalid request");

    let mismatched = client.post("/guarded").json(&json!({"not_name": "x"})).send().await;
    assert_eq!(mismatched.status, 400);

    assert!(!GUARDED_ITEM_CALLED.load(Ordering::SeqCst));
}

#[tokio::test]
async fn optional_model_without_body_is_null() {
    let response = client().post("/opt").send().await;

    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"name": "Out Of Thin Air!"}));
}

#[tokio::test]
async fn optional_model_with_body_binds() {
    let response = client().post("/opt").json(&json!({"name": "Foo"})).send().await;
    assert_eq!(response.json(), json!({"name": "Foo"}));
}

#[tokio::test]
async fn invalid_optional_model_is_null_under_lenient_policy() {
    let response = client().post("/opt/thing").json(&json!({"name": ""})).send().await;

    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"bound": false, "url_param": "thing"}));
}

#[tokio::test]
async fn invalid_optional_model_is_rejected_under_strict_policy() {
    let router = Router::new()
        .with_config(BindingConfig::builder().strict_optional_validation(true).build())
        .post("/opt/{param}", extend_item);
    let client = TestClient::new(router);

    let invalid = client.post("/opt/thing").json(&json!({"name": ""})).send().await;
    assert_eq!(invalid.status, 400);

    let absent = client.post("/opt/thing").send().await;
    assert_eq!(absent.json(), json!({"bound": false, "url_param": "thing"}));
}

#[tokio::test]
async fn bare_model_return_defaults_to_ok_json() {
    let response = client().post("/reflect").json(&json!({"name": "Foo"})).send().await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.json(), json!({"name": "Foo"}));
}

#[tokio::test]
async fn handler_status_is_passed_through() {
    let response = client().post("/item").json(&json!({"name": "Foo"})).send().await;

    assert_eq!(response.status, 201);
    assert_eq!(response.json(), json!({"id": 1, "name": "Foo"}));
}

#[tokio::test]
async fn missing_required_field_is_bad_request() {
    let response = client().post("/item").json(&json!({"not_name": "x"})).send().await;
    assert_eq!(response.status, 400);
}

#[tokio::test]
async fn path_captures_bind_alongside_models() {
    let client = client();

    let response = client
        .put("/node/7")
        .json(&json!({"label": "seven", "value": 7}))
        .send()
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"id": 7, "label": "seven", "value": 7}));

    let path = client.get("/echo/path/a/b/c").send().await;
    assert_eq!(path.text(), "a/b/c");

    let id = "6926a61d-71c4-47a0-a063-9e5104ab409a";
    let uuid = client.get(&format!("/echo/uuid/{}", id)).send().await;
    assert_eq!(uuid.text(), id);

    let bad_uuid = client.get("/echo/uuid/not-a-uuid").send().await;
    assert_eq!(bad_uuid.status, 400);
}

#[tokio::test]
async fn form_bodies_bind_by_field_name() {
    let response = client()
        .put("/node/3")
        .form(&[("label", "three"), ("value", "3")])
        .send()
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"id": 3, "label": "three", "value": 3}));
}

#[tokio::test]
async fn multipart_text_fields_bind() {
    let body = "--XyZ\r\n\
                Content-Disposition: form-data; name=\"name\"\r\n\
                \r\n\
                Foo\r\n\
                --XyZ--\r\n";
    let response = client()
        .post("/echo")
        .body("multipart/form-data; boundary=XyZ", body)
        .send()
        .await;

    assert_eq!(response.status, 201);
    assert_eq!(response.json(), json!({"name": "Foo"}));
}

#[tokio::test]
async fn multipart_binary_file_parts_are_skipped() {
    let mut body = Vec::new();
    body.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nFoo\r\n");
    body.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n");
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(&[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00]);
    body.extend_from_slice(b"\r\n--XyZ--\r\n");

    let response = client()
        .post("/echo")
        .body("multipart/form-data; boundary=XyZ", body)
        .send()
        .await;

    assert_eq!(response.status, 201);
    assert_eq!(response.json(), json!({"name": "Foo"}));
}

#[tokio::test]
async fn malformed_json_is_rejected_even_for_optional_models() {
    let response = client()
        .post("/opt")
        .body("application/json", "{\"name\": ")
        .send()
        .await;
    assert_eq!(response.status, 400);
}

#[tokio::test]
async fn unsupported_content_type_is_absent() {
    let response = client().post("/opt").body("text/plain", "name=Foo").send().await;
    assert_eq!(response.json(), json!({"name": "Out Of Thin Air!"}));
}

#[tokio::test]
async fn schema_level_rules_reject_payloads() {
    let client = client();

    let empty = client.patch("/node/1").json(&json!({})).send().await;
    assert_eq!(empty.status, 400);

    let label = client.patch("/node/1").json(&json!({"label": "x"})).send().await;
    assert_eq!(label.status, 204);
    assert_eq!(label.text(), "");
}

#[tokio::test]
async fn exposed_schema_errors_land_on_root() {
    let router = Router::new()
        .with_config(BindingConfig::builder().expose_validation_errors(true).build())
        .patch("/node/{node_id}", patch_node);
    let response = TestClient::new(router).patch("/node/1").json(&json!({})).send().await;

    assert_eq!(response.status, 400);
    assert_eq!(
        response.json()["errors"]["__root__"],
        json!(["must provide either label or value"])
    );
}

#[tokio::test]
async fn native_and_empty_responses() {
    let client = client();

    let teapot_resp = client.get("/teapot").send().await;
    assert_eq!(teapot_resp.status, 418);
    assert_eq!(teapot_resp.header("x-kettle"), Some("1"));
    assert_eq!(teapot_resp.text(), "short and stout");

    let nothing_resp = client.get("/nothing").send().await;
    assert_eq!(nothing_resp.status, 200);
    assert_eq!(nothing_resp.text(), "");
}

#[tokio::test]
async fn handlers_stay_callable() {
    let item = Item {
        name: "direct".to_string(),
    };
    let (echoed, status) = echo_item::invoke(item.clone()).await;

    assert_eq!(echoed, item);
    assert_eq!(status, 201);
}
