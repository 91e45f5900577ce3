use audienceos_application::{SaveCartridgeInput, UpdateCartridgeInput};
use audienceos_domain::cartridge::Cartridge;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for cartridge creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-cartridge-request.ts"
)]
pub struct SaveCartridgeRequest {
    pub client_id: Option<String>,
    pub name: String,
    pub instructions: Option<String>,
}

/// Incoming payload rewriting an existing cartridge.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-cartridge-request.ts"
)]
pub struct UpdateCartridgeRequest {
    pub name: String,
    pub instructions: String,
}

/// API representation of one instruction cartridge.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/cartridge-response.ts"
)]
pub struct CartridgeResponse {
    pub id: String,
    pub client_id: Option<String>,
    pub name: String,
    pub instructions: String,
    pub status: String,
    pub updated_at: String,
}

impl From<SaveCartridgeRequest> for SaveCartridgeInput {
    fn from(value: SaveCartridgeRequest) -> Self {
        Self {
            client_id: value.client_id,
            name: value.name,
            instructions: value.instructions.unwrap_or_default(),
        }
    }
}

impl From<UpdateCartridgeRequest> for UpdateCartridgeInput {
    fn from(value: UpdateCartridgeRequest) -> Self {
        Self {
            name: value.name,
            instructions: value.instructions,
        }
    }
}

impl From<Cartridge> for CartridgeResponse {
    fn from(value: Cartridge) -> Self {
        Self {
            id: value.id().to_owned(),
            client_id: value.client_id().map(ToOwned::to_owned),
            name: value.name().to_owned(),
            instructions: value.instructions().to_owned(),
            status: value.status().as_str().to_owned(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}
