//! Naming rules for environment variables consumed by the configuration layer.

use std::env;

/// Prefix for layered configuration overrides, e.g. `RENDEZVOUS__SERVER__PORT`.
pub const DEFAULT_PREFIX: &str = "RENDEZVOUS";

/// Separator between nested keys in configuration overrides.
pub const CONFIG_SEPARATOR: &str = "__";

/// Separator between path segments of a secret variable, e.g. `STRIPE_SECRET_KEY`.
pub const SECRET_SEPARATOR: &str = "_";

/// Value that marks a config entry as "read me from the environment".
pub const SECRET_MARKER: &str = "secret_from_env";

pub fn config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Directory holding `default.toml` and the per-environment overlays.
pub fn config_dir() -> String {
    env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string())
}

pub fn run_env() -> String {
    env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string())
}

/// Converts a dotted configuration path to its override variable.
///
/// `server.port` becomes `RENDEZVOUS__SERVER__PORT`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Converts the path of a marked secret to the variable that holds it.
///
/// `["stripe", "secret_key"]` becomes `STRIPE_SECRET_KEY`.
pub fn secret_path_to_env_var<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(SECRET_SEPARATOR)
        .to_uppercase()
}
