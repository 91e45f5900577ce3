use std::str::FromStr;

use audienceos_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage of the client lifecycle pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Prospect that has not signed yet.
    Lead,
    /// Signed client being set up.
    Onboarding,
    /// Client in steady delivery.
    Active,
    /// Client showing churn signals.
    AtRisk,
    /// Client that has left.
    Churned,
}

impl PipelineStage {
    /// Returns the canonical identifier used on the wire and in trigger
    /// configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Onboarding => "onboarding",
            Self::Active => "active",
            Self::AtRisk => "at_risk",
            Self::Churned => "churned",
        }
    }

    /// Returns the label shown on the pipeline board.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Onboarding => "Onboarding",
            Self::Active => "Active",
            Self::AtRisk => "At Risk",
            Self::Churned => "Churned",
        }
    }

    /// Returns every stage in pipeline order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PipelineStage] = &[
            PipelineStage::Lead,
            PipelineStage::Onboarding,
            PipelineStage::Active,
            PipelineStage::AtRisk,
            PipelineStage::Churned,
        ];
        ALL
    }
}

impl FromStr for PipelineStage {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lead" => Ok(Self::Lead),
            "onboarding" => Ok(Self::Onboarding),
            "active" => Ok(Self::Active),
            "at_risk" => Ok(Self::AtRisk),
            "churned" => Ok(Self::Churned),
            other => Err(AppError::Validation(format!(
                "unknown pipeline stage '{other}'"
            ))),
        }
    }
}

/// Channel an inbound client message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    /// Connected Slack workspace.
    Slack,
    /// Forwarded mailbox.
    Email,
    /// LinkedIn inbox.
    Linkedin,
}

impl MessageChannel {
    /// Returns the canonical identifier used on the wire and in trigger
    /// configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Email => "email",
            Self::Linkedin => "linkedin",
        }
    }
}

impl FromStr for MessageChannel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "slack" => Ok(Self::Slack),
            "email" => Ok(Self::Email),
            "linkedin" => Ok(Self::Linkedin),
            other => Err(AppError::Validation(format!(
                "unknown message channel '{other}'"
            ))),
        }
    }
}

/// A client account managed by the agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    id: String,
    name: NonEmptyString,
    company: Option<String>,
    owner: Option<String>,
    stage: PipelineStage,
    last_activity_at: DateTime<Utc>,
}

impl Client {
    /// Creates a client record.
    ///
    /// The name must be non-empty; a blank company or owner is normalized to
    /// `None`.
    pub fn new(
        id: impl Into<String>,
        name: &str,
        company: Option<String>,
        owner: Option<String>,
        stage: PipelineStage,
        last_activity_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: id.into(),
            name: NonEmptyString::new(name)?,
            company: normalize_optional(company),
            owner: normalize_optional(owner),
            stage,
            last_activity_at,
        })
    }

    /// Returns the unique identifier of the client.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the client name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the company behind the account, when recorded.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the subject of the account owner, when assigned.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns the current pipeline stage.
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Returns when activity was last recorded for this client.
    #[must_use]
    pub const fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Returns the client moved to another stage.
    ///
    /// Moving stages counts as activity, so the activity timestamp advances
    /// as well.
    #[must_use]
    pub fn with_stage(mut self, stage: PipelineStage, at: DateTime<Utc>) -> Self {
        self.stage = stage;
        self.last_activity_at = at;
        self
    }

    /// Returns the client with its activity timestamp advanced.
    #[must_use]
    pub fn touched(mut self, at: DateTime<Utc>) -> Self {
        self.last_activity_at = at;
        self
    }

    /// Returns how many whole days have passed since the last recorded
    /// activity, never negative.
    #[must_use]
    pub fn days_inactive(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity_at).num_days().max(0)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
