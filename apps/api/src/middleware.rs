use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use audienceos_core::{AppError, TenantId, UserIdentity};
use uuid::Uuid;

use crate::error::ApiResult;

pub async fn require_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let tenant_id = header_value(headers, "x-tenant-id")
        .ok_or_else(|| AppError::Unauthorized("x-tenant-id header is required".to_owned()))?;
    let tenant_id = Uuid::parse_str(tenant_id)
        .map(TenantId::from_uuid)
        .map_err(|error| AppError::Unauthorized(format!("invalid x-tenant-id header: {error}")))?;

    let subject = header_value(headers, "x-user-id")
        .ok_or_else(|| AppError::Unauthorized("x-user-id header is required".to_owned()))?;
    let display_name = header_value(headers, "x-user-name").unwrap_or(subject);
    let email = header_value(headers, "x-user-email").map(ToOwned::to_owned);

    Ok(UserIdentity::new(subject, display_name, email, tenant_id))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use audienceos_core::AppError;
    use axum::http::{HeaderMap, HeaderValue};

    use super::identity_from_headers;

    const TENANT: &str = "7b6f7d2e-4f16-4f7b-9c53-1a2d6c0f3b41";

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn identity_is_read_from_gateway_headers() {
        let headers = headers(&[
            ("x-tenant-id", TENANT),
            ("x-user-id", "ana"),
            ("x-user-name", "Ana Flores"),
            ("x-user-email", "ana@meridian.agency"),
        ]);

        let result = identity_from_headers(&headers);
        assert!(result.is_ok());
        let identity = result.unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.subject(), "ana");
        assert_eq!(identity.display_name(), "Ana Flores");
        assert_eq!(identity.email(), Some("ana@meridian.agency"));
        assert_eq!(identity.tenant_id().to_string(), TENANT);
    }

    #[test]
    fn display_name_falls_back_to_the_subject() {
        let headers = headers(&[("x-tenant-id", TENANT), ("x-user-id", "ana")]);

        let result = identity_from_headers(&headers);
        assert!(result.is_ok());
        let identity = result.unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.display_name(), "ana");
        assert_eq!(identity.email(), None);
    }

    #[test]
    fn missing_user_header_is_unauthorized() {
        let headers = headers(&[("x-tenant-id", TENANT)]);

        let result = identity_from_headers(&headers);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn malformed_tenant_header_is_unauthorized() {
        let headers = headers(&[("x-tenant-id", "not-a-uuid"), ("x-user-id", "ana")]);

        let result = identity_from_headers(&headers);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn blank_headers_count_as_missing() {
        let headers = headers(&[("x-tenant-id", TENANT), ("x-user-id", "   ")]);

        let result = identity_from_headers(&headers);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
