mod binding;
mod server;

pub use binding::{BindingConfig, BindingConfigBuilder};
pub use server::{ServerConfig, ServerConfigBuilder};
