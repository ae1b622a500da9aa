use crate::models::{Node, NodePatch};
use bindkit::{handler, AppError};

#[handler]
pub async fn replace(node_id: u32, node: Node) -> (&'static str, u16) {
    tracing::info!(node_id, label = %node.label, value = node.value, "Node replaced");
    ("", 204)
}

/// Node 0 is the root and cannot be patched
#[handler]
pub async fn update(node_id: u32, patch: NodePatch) -> Result<(&'static str, u16), AppError> {
    if node_id == 0 {
        return Err(AppError::conflict("the root node is read-only"));
    }
    tracing::info!(node_id, ?patch, "Node updated");
    Ok(("", 204))
}
