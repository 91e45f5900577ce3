use audienceos_domain::security::EffectivePermission;
use serde::Serialize;
use ts_rs::TS;

/// API representation of one granted permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-permission-response.ts"
)]
pub struct EffectivePermissionResponse {
    pub resource: String,
    pub action: String,
    pub source: String,
    pub role_id: Option<String>,
    pub client_id: Option<String>,
}

impl From<EffectivePermission> for EffectivePermissionResponse {
    fn from(value: EffectivePermission) -> Self {
        Self {
            resource: value.resource,
            action: value.action.as_str().to_owned(),
            source: value.source.as_str().to_owned(),
            role_id: value.role_id,
            client_id: value.client_id,
        }
    }
}
