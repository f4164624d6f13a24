//! HTTP client for the Cloudflare API.
//!
//! [`ApiClient::act`] sends one request for an [`Action`] and returns the
//! parsed JSON body. The typed wrappers decode that body into the known
//! response shapes.

use crate::action::Action;
use crate::config::Config;
use crate::error::{Result, WhitelistError};
use crate::request::{AccessRule, AccessRuleRequest, ApiEnvelope, Zone};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

const AUTH_EMAIL: &str = "x-auth-email";
const AUTH_KEY: &str = "x-auth-key";

/// Per-call options for [`ApiClient::act`].
#[derive(Debug, Clone, Default)]
pub struct ActOptions {
    /// Values for the path template placeholders.
    pub params: Vec<(String, String)>,
    /// Pre-serialized request body.
    pub body: Option<String>,
    /// Headers that override the defaults.
    pub headers: HeaderMap,
}

impl ActOptions {
    /// Bind a path placeholder.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header override.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Cloudflare API client. Auth headers are fixed at construction.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = &config.credentials;

        let email = HeaderValue::from_str(&credentials.email)
            .map_err(|_| WhitelistError::InvalidHeader { name: AUTH_EMAIL })?;
        let mut key = HeaderValue::from_str(credentials.api_key.expose_secret())
            .map_err(|_| WhitelistError::InvalidHeader { name: AUTH_KEY })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(AUTH_EMAIL), email);
        headers.insert(HeaderName::from_static(AUTH_KEY), key);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(WhitelistError::HttpRequest)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_headers: headers,
        })
    }

    /// Full URL for an action with its placeholders resolved.
    pub fn url_for(&self, action: &Action, params: &[(String, String)]) -> String {
        format!("{}{}", self.base_url, action.resolve(params))
    }

    /// Build the request for an action without sending it.
    pub fn build_request(&self, action: &Action, options: ActOptions) -> Result<Request> {
        let url = self.url_for(action, &options.params);

        let mut headers = self.default_headers.clone();
        if action.sends_json() {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for name in options.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &options.headers {
            headers.append(name.clone(), value.clone());
        }

        let mut builder = self
            .client
            .request(action.method.clone(), url)
            .headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        builder.build().map_err(WhitelistError::HttpRequest)
    }

    /// Send one request and parse the response body as JSON.
    ///
    /// The HTTP status is not inspected; error payloads come back as JSON
    /// like any other response.
    pub async fn act(&self, action: &Action, options: ActOptions) -> Result<Value> {
        let request = self.build_request(action, options)?;

        debug!(
            action = action.name,
            method = %request.method(),
            url = %request.url(),
            "Sending request"
        );

        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(action = action.name, status = status.as_u16(), "Received response");

        let bytes = response.bytes().await?;
        trace!(action = action.name, body = %String::from_utf8_lossy(&bytes), "Response body");

        serde_json::from_slice(&bytes).map_err(|source| WhitelistError::ResponseParse {
            action: action.name,
            status: status.as_u16(),
            source,
        })
    }

    /// List the account's active zones.
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let action = Action::LIST_ZONES;
        let value = self.act(&action, ActOptions::default()).await?;
        let envelope: ApiEnvelope<Vec<Zone>> = decode(&action, value)?;

        match envelope.result {
            Some(zones) => Ok(zones),
            None if !envelope.errors.is_empty() => Err(WhitelistError::Api {
                action: action.name,
                errors: envelope.error_summary(),
            }),
            None => Err(WhitelistError::UnexpectedResponse {
                action: action.name,
                message: "missing result".to_string(),
            }),
        }
    }

    /// Create an access rule in a zone.
    ///
    /// The envelope is returned as-is; `success: false` is not an error here.
    pub async fn create_zone_access_rule(
        &self,
        zone_id: &str,
        rule: &AccessRuleRequest,
    ) -> Result<ApiEnvelope<AccessRule>> {
        let action = Action::CREATE_ZONE_ACCESS_RULE;
        let options = ActOptions::default()
            .param("zone_id", zone_id)
            .body(serde_json::to_string(rule)?);

        let value = self.act(&action, options).await?;
        decode(&action, value)
    }
}

fn decode<T: DeserializeOwned>(action: &Action, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| WhitelistError::UnexpectedResponse {
        action: action.name,
        message: e.to_string(),
    })
}
