//! Configuration
//!
//! - `.env` file loading with environment-based precedence
//! - Typed config structs read from the environment, each with a builder
//!
//! # Example
//!
//! ```rust,no_run
//! use bindkit::Config;
//!
//! let config = Config::init(std::path::Path::new("."));
//! println!("Server port: {}", config.server.port);
//! ```

pub mod env;
pub mod providers;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{BindingConfig, BindingConfigBuilder, ServerConfig, ServerConfigBuilder};

use std::path::Path;

/// Every config section, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub binding: BindingConfig,
}

impl Config {
    /// Load `.env` files from `project_root`, then read every section
    ///
    /// Call at application startup, before building the router and server.
    pub fn init(project_root: &Path) -> Self {
        Self::for_environment(load_dotenv(project_root))
    }

    /// Read every section from the process environment alone
    pub fn from_env() -> Self {
        Self::for_environment(Environment::detect())
    }

    /// Read every section once `.env` files for `environment` are loaded
    pub fn for_environment(environment: Environment) -> Self {
        let config = Self {
            environment,
            server: ServerConfig::from_env(),
            binding: BindingConfig::from_env(),
        };
        tracing::info!(environment = %config.environment, "Configuration loaded");
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
