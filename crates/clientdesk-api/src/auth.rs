use axum::{
    extract::{FromRequestParts, Query, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use clientdesk_db::{DeskPool, models::ProjectAssignment};
use clientdesk_types::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, errors::ApiError};

/// Claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub email: String,
    pub exp: usize,
}

pub struct AuthConfig {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn decode(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                ApiError::Unauthorized("Invalid token".to_string())
            })?;

        let claims = token_data.claims;
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role {} is not allowed to access this resource",
                self.role
            )))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require_role(&[UserRole::Admin])
    }

    /// Admins and team members.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        self.require_role(&[UserRole::Admin, UserRole::Team])
    }

    /// Admins see everything, other roles only the projects they are assigned to.
    pub async fn ensure_project_access(
        &self,
        state: &AppState,
        project_id: Uuid,
    ) -> Result<(), ApiError> {
        if self.is_admin() {
            return Ok(());
        }

        let user_id = self.id;
        let assigned = state
            .pool
            .interact_with_context(
                format!("check assignment of user {user_id} to project {project_id}"),
                move |conn| ProjectAssignment::is_assigned(user_id, project_id, conn),
            )
            .await?;

        if assigned {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Not assigned to project {project_id}"
            )))
        }
    }

    /// `None` for admins, the assigned project ids otherwise.
    pub async fn visible_projects(&self, state: &AppState) -> Result<Option<Vec<Uuid>>, ApiError> {
        if self.is_admin() {
            return Ok(None);
        }

        let user_id = self.id;
        let ids = state
            .pool
            .interact_with_context(format!("list projects of user {user_id}"), move |conn| {
                ProjectAssignment::project_ids_for_user(user_id, conn)
            })
            .await?;
        Ok(Some(ids))
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Bearer header first, then an `access_token` query parameter for websocket clients.
fn extract(parts: &Parts, config: &AuthConfig) -> Result<AuthUser, ApiError> {
    let from_header = parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|bearer| bearer.token().to_string());

    let token = from_header
        .or_else(|| {
            Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|q| q.0.access_token)
        })
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    config.decode(token.trim())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = extract(parts, &state.auth);
        std::future::ready(result)
    }
}

pub async fn admin_gate(user: AuthUser, request: Request, next: Next) -> Result<Response, ApiError> {
    user.require_admin()?;
    Ok(next.run(request).await)
}

pub async fn team_gate(user: AuthUser, request: Request, next: Next) -> Result<Response, ApiError> {
    user.require_staff()?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request as HttpRequest, header::AUTHORIZATION};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token(role: UserRole, exp: usize, secret: &str) -> String {
        let claims = Claims {
            sub: Uuid::nil(),
            role,
            email: "ada@example.com".to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_an_hour() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    fn parts(uri: &str, bearer: Option<&str>) -> Parts {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn valid_token_maps_claims() {
        let config = AuthConfig::new(SECRET);
        let jwt = token(UserRole::Team, in_an_hour(), SECRET);

        let user = extract(&parts("/v1/projects", Some(&jwt)), &config).unwrap();

        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.role, UserRole::Team);
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.is_admin());
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let config = AuthConfig::new(SECRET);
        let result = extract(&parts("/v1/projects", None), &config);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn expired_or_foreign_tokens_are_unauthorized() {
        let config = AuthConfig::new(SECRET);
        let an_hour_ago = (chrono::Utc::now().timestamp() - 3600) as usize;

        let expired = token(UserRole::Admin, an_hour_ago, SECRET);
        assert!(matches!(
            extract(&parts("/", Some(&expired)), &config),
            Err(ApiError::Unauthorized(_))
        ));

        let foreign = token(UserRole::Admin, in_an_hour(), "another-secret");
        assert!(matches!(
            extract(&parts("/", Some(&foreign)), &config),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn query_token_is_accepted_for_websockets() {
        let config = AuthConfig::new(SECRET);
        let jwt = token(UserRole::Client, in_an_hour(), SECRET);

        let user = extract(
            &parts(&format!("/v1/realtime?tables=projects&access_token={jwt}"), None),
            &config,
        )
        .unwrap();

        assert_eq!(user.role, UserRole::Client);
    }

    #[test]
    fn role_checks_return_forbidden() {
        let client = AuthUser {
            id: Uuid::new_v4(),
            email: "c@example.com".to_string(),
            role: UserRole::Client,
        };

        assert!(matches!(client.require_admin(), Err(ApiError::Forbidden(_))));
        assert!(client.require_role(&[UserRole::Client, UserRole::Team]).is_ok());
    }
}
