//! Request and response types for the Cloudflare API.
//!
//! Responses share the v4 envelope ([`ApiEnvelope`]); every field defaults so
//! that error payloads still decode and can be reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The v4 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the API considers the call successful.
    #[serde(default)]
    pub success: bool,

    /// Errors reported by the API.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,

    /// Informational messages.
    #[serde(default)]
    pub messages: Vec<ApiMessage>,

    /// The payload, absent on most error responses.
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// All error messages joined for display.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An error or message entry from the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Numeric code.
    #[serde(default)]
    pub code: i64,
    /// Human-readable text.
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// A zone as returned by the zone listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque zone identifier.
    pub id: String,
    /// Domain name.
    pub name: String,
    /// Zone status, e.g. `active`.
    #[serde(default)]
    pub status: Option<String>,
}

/// A selectable zone in the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneChoice {
    /// Value returned when chosen (the zone id).
    pub value: String,
    /// Label shown to the user (the zone name).
    pub name: String,
}

impl From<&Zone> for ZoneChoice {
    fn from(zone: &Zone) -> Self {
        Self {
            value: zone.id.clone(),
            name: zone.name.clone(),
        }
    }
}

/// Access rule mode. Only whitelisting is issued by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    /// Allow traffic from the target.
    Whitelist,
    /// Block traffic from the target.
    Block,
    /// Present a challenge.
    Challenge,
    /// Present a JavaScript challenge.
    JsChallenge,
    /// Present a managed challenge.
    ManagedChallenge,
}

/// What an access rule matches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    /// Target kind, always `ip` here.
    pub target: String,
    /// The address.
    pub value: String,
}

/// Body of a create-access-rule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRuleRequest {
    /// Rule mode.
    pub mode: RuleMode,
    /// Rule target.
    pub configuration: RuleConfiguration,
    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AccessRuleRequest {
    /// A rule that whitelists a single IP address.
    pub fn whitelist_ip(ip: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            mode: RuleMode::Whitelist,
            configuration: RuleConfiguration {
                target: "ip".to_string(),
                value: ip.into(),
            },
            notes,
        }
    }
}

/// An access rule as returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Rule identifier.
    pub id: String,
    /// Rule mode, kept as text so new modes still decode.
    #[serde(default)]
    pub mode: Option<String>,
    /// Rule target.
    #[serde(default)]
    pub configuration: Option<RuleConfiguration>,
    /// Note attached to the rule.
    #[serde(default)]
    pub notes: Option<String>,
}
