//! Shared naming helpers for generated output.

use std::sync::LazyLock;

use regex::Regex;

/// A single character followed by a capitalised word (`xWord`).
static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));

/// A lowercase letter or digit followed by a capital (`aB`, `1B`).
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a type name to snake_case (e.g., "UserProfile" -> "user_profile").
///
/// A run of capitals followed by a lowercase word splits before the last
/// capital, so "HTTPClient" becomes "http_client".
pub fn to_snake_case(s: &str) -> String {
    let snake = FIRST_CAP.replace_all(s, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// File name for the generated output of `type_name`
/// (e.g., ("UserProfile", "access") -> "user_profile_access.rs").
pub fn output_file_name(type_name: &str, suffix: &str) -> String {
    format!("{}_{}.rs", to_snake_case(type_name), suffix).to_lowercase()
}
