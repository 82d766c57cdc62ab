use std::env;
use std::fs;
use std::path::Path;

use shutterquote_core::config::{resolve_config_path, AppConfig};
use toml::Value;

use crate::commands::{load_config, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = config_file_path.as_deref().and_then(load_config_file_doc);

    let mut lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
    ];
    for entry in effective_values(&config) {
        let source = field_source(
            entry.key_path,
            entry.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", entry.key_path, entry.value));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

struct EffectiveValue {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

fn effective_values(config: &AppConfig) -> Vec<EffectiveValue> {
    vec![
        EffectiveValue {
            key_path: "database.url",
            value: config.database.url.clone(),
            env_keys: &["SHUTTERQUOTE_DATABASE_URL"],
        },
        EffectiveValue {
            key_path: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["SHUTTERQUOTE_DATABASE_MAX_CONNECTIONS"],
        },
        EffectiveValue {
            key_path: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["SHUTTERQUOTE_DATABASE_TIMEOUT_SECS"],
        },
        EffectiveValue {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["SHUTTERQUOTE_SERVER_BIND_ADDRESS"],
        },
        EffectiveValue {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["SHUTTERQUOTE_SERVER_PORT"],
        },
        EffectiveValue {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["SHUTTERQUOTE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        EffectiveValue {
            key_path: "pricing.total_tolerance",
            value: config.pricing.total_tolerance.to_string(),
            env_keys: &["SHUTTERQUOTE_PRICING_TOTAL_TOLERANCE"],
        },
        EffectiveValue {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SHUTTERQUOTE_LOGGING_LEVEL", "SHUTTERQUOTE_LOG_LEVEL"],
        },
        EffectiveValue {
            key_path: "logging.format",
            value: config.logging.format.as_str().to_string(),
            env_keys: &["SHUTTERQUOTE_LOGGING_FORMAT", "SHUTTERQUOTE_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
