//! Log subscriber setup

use bindkit::config::load_dotenv;
use bindkit::Environment;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Load the `.env` files under `root`, then build the log filter from
/// `RUST_LOG` so a level set in those files applies
pub fn prepare(root: &Path) -> (Environment, EnvFilter) {
    let environment = load_dotenv(root);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    (environment, filter)
}

/// Install the global fmt subscriber
pub fn init(root: &Path) -> Environment {
    let (environment, filter) = prepare(root);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    environment
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rust_log_from_dotenv_drives_the_filter() {
        let root = std::env::temp_dir().join(format!("app-telemetry-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(".env"), "RUST_LOG=app=debug\n").unwrap();
        std::env::remove_var("RUST_LOG");

        let (_, filter) = prepare(&root);

        assert_eq!(filter.to_string(), "app=debug");
        std::fs::remove_dir_all(&root).unwrap();
    }
}
