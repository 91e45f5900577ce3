use std::str::FromStr;

use audienceos_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an instruction cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartridgeStatus {
    /// Being written, not yet in use.
    Draft,
    /// Live for its client.
    Active,
    /// Retired but kept for reference.
    Archived,
}

impl CartridgeStatus {
    /// Returns the canonical identifier used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for CartridgeStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(AppError::Validation(format!(
                "unknown cartridge status '{other}'"
            ))),
        }
    }
}

/// A reusable block of delivery instructions, optionally pinned to one
/// client.
///
/// Cartridges without a client are workspace wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cartridge {
    id: String,
    client_id: Option<String>,
    name: NonEmptyString,
    instructions: String,
    status: CartridgeStatus,
    updated_at: DateTime<Utc>,
}

impl Cartridge {
    /// Creates a cartridge in draft.
    ///
    /// Drafts may have empty instructions; activation is what requires
    /// content.
    pub fn draft(
        id: impl Into<String>,
        client_id: Option<String>,
        name: &str,
        instructions: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: id.into(),
            client_id: client_id.filter(|value| !value.trim().is_empty()),
            name: NonEmptyString::new(name)?,
            instructions: instructions.into(),
            status: CartridgeStatus::Draft,
            updated_at,
        })
    }

    /// Returns the unique identifier of the cartridge.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the client this cartridge is pinned to, when it is not a
    /// workspace default.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Returns the cartridge name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the instruction text.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> CartridgeStatus {
        self.status
    }

    /// Returns when the cartridge was last written.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the cartridge with new name and instructions.
    ///
    /// Editing an archived cartridge is rejected; unarchive by activating a
    /// replacement instead.
    pub fn edited(
        mut self,
        name: &str,
        instructions: impl Into<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if self.status == CartridgeStatus::Archived {
            return Err(AppError::Validation(
                "archived cartridges cannot be edited".to_owned(),
            ));
        }
        self.name = NonEmptyString::new(name)?;
        self.instructions = instructions.into();
        self.updated_at = at;
        Ok(self)
    }

    /// Returns the cartridge activated for use.
    ///
    /// A cartridge with blank instructions cannot go live.
    pub fn activated(mut self, at: DateTime<Utc>) -> AppResult<Self> {
        if self.instructions.trim().is_empty() {
            return Err(AppError::Validation(
                "cartridge cannot be activated without instructions".to_owned(),
            ));
        }
        self.status = CartridgeStatus::Active;
        self.updated_at = at;
        Ok(self)
    }

    /// Returns the cartridge retired from use.
    #[must_use]
    pub fn archived(mut self, at: DateTime<Utc>) -> Self {
        self.status = CartridgeStatus::Archived;
        self.updated_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drafted(instructions: &str) -> Cartridge {
        Cartridge::draft(
            "cartridge-1",
            Some("client-1".to_owned()),
            "Voice and tone",
            instructions,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn drafts_start_unpublished() {
        let cartridge = drafted("");
        assert_eq!(cartridge.status(), CartridgeStatus::Draft);
    }

    #[test]
    fn empty_drafts_cannot_be_activated() {
        let result = drafted("   ").activated(Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn drafts_with_instructions_can_go_live() {
        let cartridge = drafted("Write like a newsroom, not a brochure.")
            .activated(Utc::now())
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(cartridge.status(), CartridgeStatus::Active);
    }

    #[test]
    fn archived_cartridges_reject_edits() {
        let cartridge = drafted("Keep sentences short.").archived(Utc::now());
        let result = cartridge.edited("Voice and tone", "New text", Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_client_ids_mean_workspace_defaults() {
        let cartridge = Cartridge::draft(
            "cartridge-2",
            Some("  ".to_owned()),
            "House style",
            "Prefer plain words.",
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(cartridge.client_id(), None);
    }
}
