//! Core data types: demands, clients, team members and the record set that
//! holds them.

use crate::error::{DemandError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Demand priority.
///
/// Serializes as its display label and deserializes through [`FromStr`], so
/// stored documents accept the same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Sort rank: High first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Ok(Self::Low),
            "medium" | "média" | "media" => Ok(Self::Medium),
            "high" | "alta" => Ok(Self::High),
            other => Err(DemandError::validation(
                "priority",
                format!("unknown priority '{other}' (expected Low, Medium or High)"),
            )),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = DemandError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Demand workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "not started" | "not_started" | "not-started" | "não iniciado" | "nao iniciado" => {
                Ok(Self::NotStarted)
            }
            "in progress" | "in_progress" | "in-progress" | "em andamento" => {
                Ok(Self::InProgress)
            }
            "completed" | "concluído" | "concluido" => Ok(Self::Completed),
            other => Err(DemandError::validation(
                "status",
                format!(
                    "unknown status '{other}' (expected Not Started, In Progress or Completed)"
                ),
            )),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = DemandError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A tracked unit of work.
///
/// `team_member` and `client` hold names by value; they are not checked
/// against the registered clients and team members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub id: i64,
    pub team_member: String,
    pub client: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Demand {
    /// Build a demand from submitted fields.
    #[must_use]
    pub fn from_fields(id: i64, fields: DemandFields, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            team_member: fields.team_member,
            client: fields.client,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            created_at,
        }
    }

    /// The mutable part of this demand.
    #[must_use]
    pub fn fields(&self) -> DemandFields {
        DemandFields {
            team_member: self.team_member.clone(),
            client: self.client.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
        }
    }

    /// Replace every mutable field; id and creation time are kept.
    pub fn apply(&mut self, fields: DemandFields) {
        self.team_member = fields.team_member;
        self.client = fields.client;
        self.description = fields.description;
        self.priority = fields.priority;
        self.status = fields.status;
    }
}

/// Caller-supplied values for creating or replacing a demand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemandFields {
    pub team_member: String,
    pub client: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl DemandFields {
    /// Check required fields. Values are stored verbatim, so nothing is
    /// trimmed here.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the description is blank.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(DemandError::validation(
                "description",
                "description cannot be empty",
            ));
        }
        Ok(())
    }
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
}

/// A registered team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
}

/// The complete application state held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Records {
    pub demands: Vec<Demand>,
    pub clients: Vec<Client>,
    pub team_members: Vec<TeamMember>,
}

impl Records {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.demands.is_empty() && self.clients.is_empty() && self.team_members.is_empty()
    }

    #[must_use]
    pub fn find_demand(&self, id: i64) -> Option<&Demand> {
        self.demands.iter().find(|d| d.id == id)
    }

    pub(crate) fn demand_position(&self, id: i64) -> Option<usize> {
        self.demands.iter().position(|d| d.id == id)
    }

    /// # Errors
    ///
    /// Returns a validation error once ids reach `i64::MAX`.
    pub fn next_demand_id(&self) -> Result<i64> {
        next_id(self.demands.iter().map(|d| d.id))
    }

    /// # Errors
    ///
    /// Returns a validation error once ids reach `i64::MAX`.
    pub fn next_client_id(&self) -> Result<i64> {
        next_id(self.clients.iter().map(|c| c.id))
    }

    /// # Errors
    ///
    /// Returns a validation error once ids reach `i64::MAX`.
    pub fn next_team_member_id(&self) -> Result<i64> {
        next_id(self.team_members.iter().map(|m| m.id))
    }

    #[must_use]
    pub fn has_client(&self, name: &str) -> bool {
        self.clients.iter().any(|c| c.name == name)
    }

    #[must_use]
    pub fn has_team_member(&self, name: &str) -> bool {
        self.team_members.iter().any(|m| m.name == name)
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> Result<i64> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| DemandError::validation("id", "no ids left after i64::MAX"))
}
