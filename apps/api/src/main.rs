//! AudienceOS API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use audienceos_application::{
    AuthorizationService, CartridgeService, ClientService, TicketService, WorkflowService,
};
use audienceos_core::AppError;
use audienceos_domain::security::{EffectivePermission, PermissionAction, resources};
use audienceos_infrastructure::{
    InMemoryAuthorizationRepository, InMemoryCartridgeRepository, InMemoryClientRepository,
    InMemoryTicketRepository, InMemoryWorkflowRepository, TracingAuditRepository,
};
use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api_config::{ApiConfig, BootstrapConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let authorization_repository = Arc::new(InMemoryAuthorizationRepository::default());
    if let Some(bootstrap) = config.bootstrap.as_ref() {
        seed_bootstrap_admin(&authorization_repository, bootstrap).await;
    }

    let authorization_service = AuthorizationService::new(authorization_repository);
    let audit_repository = Arc::new(TracingAuditRepository::default());
    let client_repository = Arc::new(InMemoryClientRepository::default());

    let workflow_service = WorkflowService::new(
        authorization_service.clone(),
        Arc::new(InMemoryWorkflowRepository::default()),
        audit_repository.clone(),
    );
    let client_service = ClientService::new(
        authorization_service.clone(),
        client_repository.clone(),
        workflow_service.clone(),
        audit_repository.clone(),
    );
    let ticket_service = TicketService::new(
        authorization_service.clone(),
        Arc::new(InMemoryTicketRepository::default()),
        client_repository.clone(),
        workflow_service.clone(),
        audit_repository.clone(),
    );
    let cartridge_service = CartridgeService::new(
        authorization_service.clone(),
        Arc::new(InMemoryCartridgeRepository::default()),
        client_repository,
        audit_repository,
    );

    let app_state = AppState {
        authorization_service,
        workflow_service,
        client_service,
        ticket_service,
        cartridge_service,
    };

    let protected_routes = Router::new()
        .route(
            "/api/triggers/types",
            get(handlers::triggers::list_trigger_types_handler),
        )
        .route(
            "/api/triggers/schedules",
            get(handlers::triggers::list_schedules_handler),
        )
        .route(
            "/api/triggers/timezones",
            get(handlers::triggers::list_timezones_handler),
        )
        .route(
            "/api/triggers/validate",
            post(handlers::triggers::validate_trigger_handler),
        )
        .route(
            "/api/workflows",
            get(handlers::workflows::list_workflows_handler)
                .post(handlers::workflows::create_workflow_handler),
        )
        .route(
            "/api/workflows/{workflow_id}",
            put(handlers::workflows::update_workflow_handler),
        )
        .route(
            "/api/clients",
            get(handlers::clients::list_clients_handler)
                .post(handlers::clients::create_client_handler),
        )
        .route(
            "/api/clients/{client_id}",
            get(handlers::clients::get_client_handler),
        )
        .route(
            "/api/clients/{client_id}/stage",
            post(handlers::clients::move_client_stage_handler),
        )
        .route(
            "/api/clients/{client_id}/messages",
            post(handlers::clients::log_client_message_handler),
        )
        .route(
            "/api/tickets",
            get(handlers::tickets::list_tickets_handler)
                .post(handlers::tickets::create_ticket_handler),
        )
        .route(
            "/api/tickets/{ticket_id}/status",
            put(handlers::tickets::update_ticket_status_handler),
        )
        .route(
            "/api/cartridges",
            get(handlers::cartridges::list_cartridges_handler)
                .post(handlers::cartridges::create_cartridge_handler),
        )
        .route(
            "/api/cartridges/{cartridge_id}",
            put(handlers::cartridges::update_cartridge_handler),
        )
        .route(
            "/api/cartridges/{cartridge_id}/activate",
            post(handlers::cartridges::activate_cartridge_handler),
        )
        .route(
            "/api/cartridges/{cartridge_id}/archive",
            post(handlers::cartridges::archive_cartridge_handler),
        )
        .route(
            "/api/security/permissions",
            get(handlers::security::list_permissions_handler),
        )
        .route_layer(from_fn(middleware::require_identity));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-tenant-id"),
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-name"),
            HeaderName::from_static("x-user-email"),
        ]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "audienceos-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn seed_bootstrap_admin(
    repository: &InMemoryAuthorizationRepository,
    bootstrap: &BootstrapConfig,
) {
    for resource in [
        resources::CLIENTS,
        resources::TICKETS,
        resources::WORKFLOWS,
        resources::CARTRIDGES,
    ] {
        repository
            .grant(
                bootstrap.tenant_id,
                bootstrap.admin_subject.as_str(),
                EffectivePermission::from_role(
                    resource,
                    PermissionAction::Manage,
                    "bootstrap-admin",
                ),
            )
            .await;
    }

    info!(
        tenant_id = %bootstrap.tenant_id,
        subject = bootstrap.admin_subject.as_str(),
        "seeded bootstrap admin grants"
    );
}
