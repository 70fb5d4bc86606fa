// --- File: crates/bookify_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, in increasing priority: `config/default`, `config/{RUN_ENV}`,
/// then environment variables prefixed with `{PREFIX}__` (double underscore
/// separates nesting levels, e.g. `BOOKIFY__SCHEDULING__MAX_ADVANCE_DAYS`).
/// Both files are optional; every field carries a default.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "BOOKIFY".to_string());

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2) // go from crates/bookify_config to workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let default_path = workspace_root.join("config/default");
    let env_path = workspace_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// Loads at most once per process. The file defaults to `.env` and can be
/// overridden with the `DOTENV_OVERRIDE` environment variable.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = AppConfig::default();
        assert_eq!(config.scheduling.slot_snap_minutes, 30);
        assert_eq!(config.scheduling.full_day_threshold_hours, 8);
        assert_eq!(config.scheduling.max_advance_days, 0);
        assert_eq!(config.scheduling.default_open.to_string(), "09:00:00");
        assert_eq!(config.scheduling.default_close.to_string(), "17:00:00");
    }

    #[test]
    fn test_partial_file_falls_back_to_field_defaults() {
        let raw = r#"{ "scheduling": { "max_advance_days": 60 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.scheduling.max_advance_days, 60);
        assert_eq!(config.scheduling.slot_snap_minutes, 30);
    }
}
