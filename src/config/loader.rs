//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "schoolhub.toml";

/// Load configuration from schoolhub.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::Config(format!(
        "Config file {} not found. Run 'schoolhub init' first.",
        path.display()
    )))?;
    parse_config(&content)
}

/// Parse configuration text after interpolating environment variables
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir()?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::Config(format!(
                "{} not found. Run 'schoolhub init' first.",
                CONFIG_FILENAME
            )));
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; a failure here is a bug, not a runtime condition
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Schoolhub Configuration

[server]
host = "0.0.0.0"
port = 5000

[auth]
# Signing secret for bearer tokens. Keep it out of version control;
# generate one with 'schoolhub secret'.
jwt_secret = "${JWT_SECRET}"
token_ttl_secs = 86400  # 1 day
bcrypt_cost = 10

[database]
backend = "memory"  # or "postgres"
# url = "host=localhost port=5432 user=postgres password=${POSTGRES_PASSWORD:-postgres} dbname=schoolhub"
"#
}
