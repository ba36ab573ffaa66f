//! Route template placeholders.
//!
//! Templates use `{name}`, `{name?}`, `{name:constraint}` and `{name:constraint?}`.
//! The public route keeps only `{name}`; a trailing `?` marks the parameter optional.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}:?]+)(?::([^{}?]*))?(\?)?\}").expect("Invalid regex constant")
});

/// A placeholder found in a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlaceholder {
    pub name: String,
    pub constraint: Option<String>,
    pub is_optional: bool,
}

/// All placeholders of a template, in order
pub fn placeholders(template: &str) -> Vec<RoutePlaceholder> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| RoutePlaceholder {
            name: caps[1].to_string(),
            constraint: caps.get(2).map(|m| m.as_str().to_string()),
            is_optional: caps.get(3).is_some(),
        })
        .collect()
}

/// The placeholder for a parameter name, if the template has one
pub fn find_placeholder(template: &str, name: &str) -> Option<RoutePlaceholder> {
    placeholders(template).into_iter().find(|p| p.name == name)
}

/// Strips constraints and optionality markers: `{id:int?}` becomes `{id}`.
pub fn strip_placeholders(template: &str) -> String {
    PLACEHOLDER.replace_all(template, "{$1}").into_owned()
}

/// Builds the public route: `prefix/route` with placeholders stripped and no trailing slash.
pub fn normalize_route(prefix: &str, template: &str) -> String {
    let route = strip_placeholders(template);
    let route = route.trim_start_matches('/');
    let prefix = prefix.trim_matches('/');

    let combined = if prefix.is_empty() {
        route.to_string()
    } else {
        format!("{}/{}", prefix, route)
    };

    combined.trim_end_matches('/').to_string()
}
