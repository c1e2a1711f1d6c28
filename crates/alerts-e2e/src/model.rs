//! Domain entities the suite seeds and asserts on.
//!
//! Field names follow the fixture API's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential, stable display number of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertNumber(pub u64);

impl fmt::Display for AlertNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Service identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escalation policy identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscalationPolicyId(pub String);

impl fmt::Display for EscalationPolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification routing configuration referenced by a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationPolicy {
    /// Policy ID
    pub id: EscalationPolicyId,
    /// Policy name
    pub name: String,
    /// Number of escalation steps
    #[serde(default)]
    pub step_count: u32,
}

/// A monitored entity that owns alerts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service ID
    pub id: ServiceId,
    /// Display name
    pub name: String,
    /// Marked as a favorite by the current user
    #[serde(default)]
    pub favorite: bool,
    /// Owning escalation policy
    #[serde(default, rename = "ep")]
    pub escalation_policy: Option<EscalationPolicy>,
}

/// Alert lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    /// Open and not yet acknowledged
    Unacknowledged,
    /// Acknowledged by a user
    Acknowledged,
    /// Closed
    Closed,
}

impl AlertStatus {
    /// Label rendered by the UI
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unacknowledged => "UNACKNOWLEDGED",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether the alert is closed
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single actionable notification instance tied to a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Display number
    pub number: AlertNumber,
    /// Summary line
    pub summary: String,
    /// Detail text
    #[serde(default)]
    pub details: String,
    /// Owning service
    pub service: Service,
    /// Current status
    pub status: AlertStatus,
    /// Display name of the creator
    #[serde(default)]
    pub created_by: String,
}

/// Kind of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertLogEvent {
    /// Alert created
    Created,
    /// Alert acknowledged
    Acknowledged,
    /// Escalation requested
    Escalated,
    /// Alert closed
    Closed,
    /// Notification sent
    Notified,
    /// Generated by the engine
    Engine,
}

/// Ordered event record attached to an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLogEntry {
    /// Log entry ID (monotonic per backend)
    pub id: u64,
    /// Event kind
    pub event: AlertLogEvent,
    /// Rendered message
    pub message: String,
}

/// An alert seeded together with a batch of log entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLogs {
    /// The alert
    pub alert: Alert,
    /// Seeded entries
    pub logs: Vec<AlertLogEntry>,
}
