//! API action registry and path templating.
//!
//! An [`Action`] pairs an HTTP method with a path template whose `:name`
//! placeholders are filled by [`replace_params`] at call time.

use reqwest::Method;
use std::fmt::Display;

/// One API endpoint: a method and a path template relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Short name used in logs and errors.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template with `:name` placeholders.
    pub path: &'static str,
}

impl Action {
    /// List the account's active zones, first page of 20, by name.
    pub const LIST_ZONES: Action = Action {
        name: "list_zones",
        method: Method::GET,
        path: "/zones?status=active&page=1&per_page=20&order=name",
    };

    /// Create an IP access rule in a zone. Requires `zone_id`.
    pub const CREATE_ZONE_ACCESS_RULE: Action = Action {
        name: "create_zone_access_rule",
        method: Method::POST,
        path: "/zones/:zone_id/firewall/access_rules/rules",
    };

    /// Whether requests for this action carry a JSON body.
    pub fn sends_json(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }

    /// Resolve the path template with `params`.
    pub fn resolve<K, V>(&self, params: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: Display,
    {
        replace_params(self.path, params)
    }
}

/// Replace every `:key` in `template` with its value, for each pair in order.
///
/// Matching is literal, so keys containing characters like `.` or `*` only
/// ever match themselves. Keys absent from the template are ignored.
pub fn replace_params<K, V>(template: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: Display,
{
    params
        .iter()
        .fold(template.to_string(), |url, (key, value)| {
            let placeholder = format!(":{}", key.as_ref());
            url.replace(&placeholder, &value.to_string())
        })
}
