//! Whitelisting orchestration.
//!
//! Drives the line reader over the input file and creates one access rule per
//! address, strictly one request at a time.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::lines::process_line_by_line;
use crate::request::{AccessRule, AccessRuleRequest, ZoneChoice};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Processor that whitelists every address in a file.
pub struct Processor {
    client: ApiClient,
}

impl Processor {
    /// Create a new processor.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    /// Create a processor around an existing client.
    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the active zones as prompt choices.
    pub async fn zone_choices(&self) -> Result<Vec<ZoneChoice>> {
        let zones = self.client.list_zones().await?;
        debug!(zones = zones.len(), "Fetched zones");
        Ok(zones.iter().map(ZoneChoice::from).collect())
    }

    /// Whitelist every address in `path` for `zone_id`.
    ///
    /// Prints `Added <ip> to zone <zone_id>.` after each request. The first
    /// failing request aborts the run.
    pub async fn process_file(
        &self,
        zone_id: &str,
        notes: Option<&str>,
        path: &Path,
    ) -> Result<ProcessingResult> {
        let start = Instant::now();
        info!(zone = zone_id, input = %path.display(), "Starting whitelist run");

        let client = &self.client;
        let added = process_line_by_line(path, |ip| async move {
            let rule = AccessRuleRequest::whitelist_ip(ip.as_str(), notes.map(str::to_string));
            let envelope = client.create_zone_access_rule(zone_id, &rule).await?;

            if !envelope.success {
                warn!(
                    ip = %ip,
                    zone = zone_id,
                    errors = %envelope.error_summary(),
                    "API reported failure for access rule"
                );
            }

            let added = AddedRule {
                ip,
                zone_id: zone_id.to_string(),
                accepted: envelope.success,
                rule: envelope.result,
            };
            println!("{added}");
            debug!(
                ip = %added.ip,
                rule_id = ?added.rule.as_ref().map(|r| &r.id),
                "Access rule created"
            );
            Ok(added)
        })
        .await?;

        Ok(ProcessingResult {
            added,
            elapsed: start.elapsed(),
        })
    }
}

/// One processed address.
#[derive(Debug, Clone)]
pub struct AddedRule {
    /// The address that was submitted.
    pub ip: String,
    /// Zone the rule was created in.
    pub zone_id: String,
    /// Whether the API reported success.
    pub accepted: bool,
    /// The created rule, when the API returned one.
    pub rule: Option<AccessRule>,
}

impl fmt::Display for AddedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Added {} to zone {}.", self.ip, self.zone_id)
    }
}

/// Result of a whitelist run.
#[derive(Debug)]
pub struct ProcessingResult {
    /// Every submitted address, in file order.
    pub added: Vec<AddedRule>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl ProcessingResult {
    /// Number of requests sent.
    pub fn total(&self) -> usize {
        self.added.len()
    }

    /// Requests the API reported as unsuccessful.
    pub fn rejected(&self) -> usize {
        self.added.iter().filter(|a| !a.accepted).count()
    }

    /// Print a summary of the run.
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(40));
        println!("  Requests sent:    {}", self.total());
        println!("  API rejected:     {}", self.rejected());
        println!("  Elapsed Time:     {:.2}s", self.elapsed.as_secs_f64());
        println!("{}", "═".repeat(40));
    }
}
