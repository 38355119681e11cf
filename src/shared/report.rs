/**
 * Inconsistency Reports
 *
 * Diagnostic records created when a server state check shows the client's
 * thread store had silently diverged. Reports are handed to an external
 * telemetry channel; nothing in this crate acts on them.
 */
use serde::{Deserialize, Serialize};

use super::thread::ThreadInfos;

/// Kind of report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    ThreadInconsistency,
}

/// Client platform description attached to reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetails {
    /// Platform name, e.g. "ios", "android", "web"
    pub platform: String,
    #[serde(default)]
    pub code_version: Option<u32>,
    #[serde(default)]
    pub state_version: Option<u32>,
}

impl Default for PlatformDetails {
    fn default() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            code_version: None,
            state_version: None,
        }
    }
}

/// Summary of one recent action, as kept by the action history log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionSummary {
    #[serde(rename = "type")]
    pub action_type: String,
    /// Time the action was recorded, milliseconds since the epoch
    pub time: i64,
    pub summary: String,
}

/// A detected divergence between the local thread store and server truth
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientThreadInconsistencyReport {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub platform_details: PlatformDetails,
    /// Thread map before the server's corrections were applied
    pub before_action: ThreadInfos,
    /// The triggering action with secrets redacted
    pub action: serde_json::Value,
    /// Thread map after the server's corrections were applied
    pub push_result: ThreadInfos,
    /// Recent action history, oldest first
    pub last_actions: Vec<ActionSummary>,
    /// Report creation time, milliseconds since the epoch
    pub time: i64,
}
