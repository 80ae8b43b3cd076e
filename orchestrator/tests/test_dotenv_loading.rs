use std::env;
use std::fs;

use config::{Config, File, FileFormat};
use orchestrator::settings::config::Settings;
use tempfile::TempDir;

/// `.env.local` is loaded before `.env`; dotenvy never overrides variables
/// that are already set, so the process environment wins over both files.
#[test]
fn test_dotenv_files_feed_settings_in_precedence_order() {
    let temp_dir = TempDir::new().unwrap();

    env::remove_var("ORCHESTRATOR__AUTH__ISSUER");
    env::remove_var("ORCHESTRATOR__API__TENANT_HEADER");
    env::set_var("ORCHESTRATOR__API__BIND_ADDRESS", "127.0.0.1:7000");

    let env_path = temp_dir.path().join(".env");
    fs::write(
        &env_path,
        "ORCHESTRATOR__AUTH__ISSUER=from-env\nORCHESTRATOR__API__TENANT_HEADER=x-from-env\nORCHESTRATOR__API__BIND_ADDRESS=0.0.0.0:1\n",
    )
    .unwrap();
    let env_local_path = temp_dir.path().join(".env.local");
    fs::write(&env_local_path, "ORCHESTRATOR__API__TENANT_HEADER=x-from-local\n").unwrap();

    dotenvy::from_path(&env_local_path).ok();
    dotenvy::from_path(&env_path).ok();

    let config = Config::builder()
        .add_source(File::from_str("debug: true\nauth:\n  jwt_secret: s\n", FileFormat::Yaml))
        .add_source(Settings::get_environment())
        .build()
        .unwrap();
    let settings = Settings::from_config(config).unwrap();

    assert_eq!(settings.auth.issuer, "from-env");
    assert_eq!(settings.api.tenant_header, "x-from-local");
    assert_eq!(settings.api.bind_address, "127.0.0.1:7000");

    env::remove_var("ORCHESTRATOR__AUTH__ISSUER");
    env::remove_var("ORCHESTRATOR__API__TENANT_HEADER");
    env::remove_var("ORCHESTRATOR__API__BIND_ADDRESS");
}

#[test]
fn test_missing_dotenv_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    assert!(dotenvy::from_path(temp_dir.path().join(".env")).is_err());
    assert!(dotenvy::from_path(temp_dir.path().join(".env.local")).is_err());
}
