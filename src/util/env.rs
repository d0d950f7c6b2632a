//! Environment helpers: ergonomic getters over an injectable lookup.
//! `process_env` reads the real process environment; tests pass a closure
//! over a fixed map instead.
use tracing::info;

use crate::error::ConfigError;

/// Lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get optional env var (None if unset or blank).
pub fn env_opt<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Get env var with a default for unset/blank values.
pub fn env_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_opt(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Resolve every required key, reporting all missing ones together.
pub fn env_required<F, const N: usize>(
    lookup: &F,
    keys: [&'static str; N],
) -> Result<[String; N], ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let values = keys.map(|k| env_opt(lookup, k));
    let missing: Vec<&'static str> = keys
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }
    Ok(values.map(Option::unwrap_or_default))
}

/// Mask a value for logging when its key looks like it carries a credential.
pub fn redact_value(key: &str, val: &str) -> String {
    let k = key.to_ascii_uppercase();
    if k.contains("SECRET") || k.contains("PASSWORD") || k.contains("TOKEN") {
        if val.is_empty() {
            return String::new();
        }
        return "***".to_string();
    }
    if k.contains("ACCESS_KEY") && val.chars().count() > 4 {
        let head: String = val.chars().take(4).collect();
        return format!("{head}***");
    }
    val.to_string()
}

/// Log a consolidated, redacted snapshot of the given keys.
pub fn log_snapshot<F>(title: &str, lookup: &F, keys: &[&str])
where
    F: Fn(&str) -> Option<String>,
{
    let snapshot: Vec<(String, String)> = keys
        .iter()
        .map(|&k| {
            let v = env_opt(lookup, k).unwrap_or_default();
            (k.to_string(), redact_value(k, &v))
        })
        .collect();
    info!(target = "preflight", title, snapshot = ?snapshot, "configuration snapshot");
}
