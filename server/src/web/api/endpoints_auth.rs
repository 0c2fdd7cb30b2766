use crate::auth_session::SessionToken;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, Responder};
use gigstock_api_types::{LoginRequest, LoginResponse};
use serde_json::json;

#[post("/auth/login")]
async fn login(
    body: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let store = state.store.clone();
    let user = web::block(move || -> Result<_, APIError> {
        let mut store = store.get_facade()?;
        Ok(store.authenticate_with_password(&body.email, &body.password)?)
    })
    .await??;
    let session_token = SessionToken::for_user(user.id);
    Ok(web::Json(LoginResponse {
        token: session_token.as_string(&state.secret),
        user: user.into(),
    }))
}

/// Returns the identity bound to the session token, for clients to restore their login state.
#[get("/auth/session")]
async fn get_session_user(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let auth = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_auth_context_for_session(&session_token)?)
    })
    .await??;
    Ok(web::Json(json!({
        "userId": auth.user_id(),
        "name": auth.user_name(),
        "role": auth.role().name(),
    })))
}
