use regex::Regex;
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as-is.
pub fn expand_env_var_in_string(value: &str) -> String {
    let mut result = value.to_string();

    for cap in env_var_pattern().captures_iter(value) {
        let var_name = &cap[1];
        let replacement = env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

/// Reduce any accepted endpoint spelling to an API base ending in `/v1`.
///
/// `http://host:8000`, `http://host:8000/v1/` and
/// `http://host:8000/v1/chat/completions` all map to `http://host:8000/v1`.
pub fn normalize_api_base(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    let trimmed = trimmed
        .strip_suffix("/chat/completions")
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{}/v1", trimmed)
    }
}
