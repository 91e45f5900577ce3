use std::str::FromStr;

use audienceos_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Urgency a support ticket was filed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Can wait for the next working day.
    Low,
    /// Default for new tickets.
    Medium,
    /// Needs attention today.
    High,
    /// Client facing breakage.
    Urgent,
}

impl TicketPriority {
    /// Returns the canonical identifier used on the wire and in trigger
    /// configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Returns every priority, mildest first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TicketPriority] = &[
            TicketPriority::Low,
            TicketPriority::Medium,
            TicketPriority::High,
            TicketPriority::Urgent,
        ];
        ALL
    }
}

impl FromStr for TicketPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(AppError::Validation(format!(
                "unknown ticket priority '{other}'"
            ))),
        }
    }
}

/// Position of a ticket in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly filed, nobody working on it yet.
    Open,
    /// Someone on the team is working on it.
    InProgress,
    /// Blocked on a reply from the client.
    WaitingOnClient,
    /// Fixed, pending confirmation.
    Resolved,
    /// Confirmed done or abandoned.
    Closed,
}

impl TicketStatus {
    /// Returns the canonical identifier used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::WaitingOnClient => "waiting_on_client",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Returns every status in lifecycle order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TicketStatus] = &[
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::WaitingOnClient,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ];
        ALL
    }
}

impl FromStr for TicketStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "waiting_on_client" => Ok(Self::WaitingOnClient),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(AppError::Validation(format!(
                "unknown ticket status '{other}'"
            ))),
        }
    }
}

/// A support ticket filed against a client account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    id: String,
    client_id: String,
    subject: NonEmptyString,
    body: Option<String>,
    priority: TicketPriority,
    status: TicketStatus,
    created_at: DateTime<Utc>,
}

impl Ticket {
    /// Opens a ticket.
    ///
    /// The subject must be non-empty; a blank body is normalized to `None`.
    /// New tickets always start in [`TicketStatus::Open`].
    pub fn open(
        id: impl Into<String>,
        client_id: impl Into<String>,
        subject: &str,
        body: Option<String>,
        priority: TicketPriority,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: id.into(),
            client_id: client_id.into(),
            subject: NonEmptyString::new(subject)?,
            body: body.filter(|text| !text.trim().is_empty()),
            priority,
            status: TicketStatus::Open,
            created_at,
        })
    }

    /// Returns the unique identifier of the ticket.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the client this ticket belongs to.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the one line summary.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the free form description, when one was given.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the filed priority.
    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    /// Returns when the ticket was opened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the ticket moved to another status.
    ///
    /// Moving to the status the ticket is already in is rejected so that
    /// status changes always mean something in the audit trail.
    pub fn with_status(mut self, status: TicketStatus) -> AppResult<Self> {
        if self.status == status {
            return Err(AppError::Validation(format!(
                "ticket is already {}",
                status.as_str()
            )));
        }
        self.status = status;
        Ok(self)
    }
}
