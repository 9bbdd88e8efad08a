use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, errors::ErrorResponse};
use tracing::warn;

/// Username of the authenticated operator, available to admin handlers.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub String);

pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let Some(token) = token else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "You are not logged in, please provide token",
            )),
        ));
    };

    let username = match jwt.verify_token(&token, "access") {
        Ok(subject) => subject,
        Err(e) => {
            warn!("⚠️ Rejected admin token: {e}");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid token")),
            ));
        }
    };

    req.extensions_mut().insert(AdminIdentity(username));

    Ok(next.run(req).await)
}
