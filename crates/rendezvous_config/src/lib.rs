use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

/// Loads the layered application configuration.
///
/// Sources, later ones winning: `config/default.toml`, `config/{RUN_ENV}.toml`
/// and `RENDEZVOUS__*` environment variables. String values equal to
/// `secret_from_env` are then replaced from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = PathBuf::from(env_vars::config_dir());
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(env_vars::run_env());
    debug!(
        default = %default_path.display(),
        overlay = %env_path.display(),
        "Loading configuration"
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&env_vars::config_prefix())
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all marker string values with environment variable values.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: &mut Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.clone());
                    walk(path, v);
                    path.pop();
                }
            }
            Value::String(s) if s == env_vars::SECRET_MARKER => {
                let env_key = env_vars::secret_path_to_env_var(path);
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => {
                        warn!(env_key = %env_key, "Environment variable not set for secret_from_env");
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    walk(&mut Vec::new(), value);
}

/// Applies environment overrides based on `secret_from_env` markers.
///
/// Unresolved markers become `None` so that optional secrets stay unset.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json =
        serde_json::to_value(&config).map_err(|e| ConfigError::Message(e.to_string()))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json).map_err(|e| ConfigError::Message(e.to_string()))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file once per process and returns the path that was used.
///
/// `DOTENV_OVERRIDE` wins over a first CLI argument starting with `.env`,
/// which wins over `.env`.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
