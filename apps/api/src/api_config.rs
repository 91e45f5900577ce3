use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use audienceos_core::{AppError, TenantId};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub tenant_id: TenantId,
    pub admin_subject: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub bootstrap: Option<BootstrapConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let bootstrap_tenant_id = env::var("BOOTSTRAP_TENANT_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                uuid::Uuid::parse_str(value.as_str())
                    .map(TenantId::from_uuid)
                    .map_err(|error| {
                        AppError::Validation(format!("invalid BOOTSTRAP_TENANT_ID: {error}"))
                    })
            })
            .transpose()?;
        let bootstrap_admin_subject = env::var("BOOTSTRAP_ADMIN_SUBJECT")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let bootstrap = match (bootstrap_tenant_id, bootstrap_admin_subject) {
            (Some(tenant_id), Some(admin_subject)) => Some(BootstrapConfig {
                tenant_id,
                admin_subject,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "BOOTSTRAP_TENANT_ID and BOOTSTRAP_ADMIN_SUBJECT must be set together"
                        .to_owned(),
                ));
            }
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            bootstrap,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
