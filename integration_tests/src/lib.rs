//! Helpers for end-to-end tests of devices exchanging telegrams
pub mod sim_bus;

/// Path to a config file in the `device_configs` directory
pub fn device_config_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("device_configs")
        .join(name)
}
