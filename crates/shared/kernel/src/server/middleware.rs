use super::error::ApiError;
use crate::domain::constants::{ROLES_HEADER, USER_HEADER};
use crate::domain::roles::UserRoles;
use crate::request::{RequestContext, RequestUser};
use axum::extract::{FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use axum::middleware::Next;
use axum::response::Response;
use std::convert::Infallible;
use tracing::debug;

/// Builds the request context from the identity headers set by the upstream
/// authenticating proxy and the `dwft_*` query overrides.
#[must_use]
pub fn context_from_parts(headers: &HeaderMap, uri: &Uri) -> RequestContext {
    let username = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let ctx = username.map_or_else(RequestContext::anonymous, |username| {
        let roles = headers
            .get(ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(UserRoles::parse_list)
            .unwrap_or_default();
        RequestContext::for_user(RequestUser::new(username, roles))
    });

    match Query::<Vec<(String, String)>>::try_from_uri(uri) {
        Ok(Query(pairs)) => {
            ctx.with_query_overrides(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        },
        Err(_) => ctx,
    }
}

/// Installs the [`RequestContext`] as a request extension and as the ambient
/// context for the rest of the request.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let ctx = context_from_parts(req.headers(), req.uri());
    debug!(user = ctx.username().unwrap_or("anonymous"), "Request context resolved");
    req.extensions_mut().insert(ctx.clone());
    RequestContext::scope(ctx, next.run(req)).await
}

/// Extractor for the current [`RequestContext`].
#[derive(Debug, Clone)]
pub struct CurrentRequest(pub RequestContext);

impl CurrentRequest {
    /// The requesting user, or `401` for anonymous requests.
    ///
    /// # Errors
    /// Returns [`ApiError::unauthorized`] when no user is attached.
    pub fn require_user(&self) -> Result<&RequestUser, ApiError> {
        self.0.user().ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = match parts.extensions.get::<RequestContext>() {
            Some(ctx) => ctx.clone(),
            None => context_from_parts(&parts.headers, &parts.uri),
        };
        Ok(Self(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn headers_and_query_build_context() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("audrey"));
        headers.insert(ROLES_HEADER, HeaderValue::from_static("staff"));
        let uri: Uri = "/courses/x?dwft_unified_course_view=1&other=2".parse().unwrap();

        let ctx = context_from_parts(&headers, &uri);
        assert_eq!(ctx.username(), Some("audrey"));
        assert!(ctx.is_staff());
        assert_eq!(ctx.flag_override("unified_course_view"), Some(true));
    }

    #[test]
    fn blank_user_header_is_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        let ctx = context_from_parts(&headers, &Uri::from_static("/"));
        assert!(!ctx.is_authenticated());
    }
}
