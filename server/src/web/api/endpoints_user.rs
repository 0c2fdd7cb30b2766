use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};

#[get("/users")]
async fn list_users(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let users: Vec<gigstock_api_types::User> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_users(&auth)?)
    })
    .await??
    .into_iter()
    .map(|u| u.into())
    .collect();
    Ok(web::Json(users))
}

#[post("/users")]
async fn create_user(
    data: web::Json<gigstock_api_types::NewUser>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let user = data.into_inner();
    if user.name.trim().is_empty() || user.email.trim().is_empty() {
        return Err(APIError::InvalidData(
            "User name and email must not be empty".to_string(),
        ));
    }
    if user.password.is_empty() {
        return Err(APIError::InvalidData(
            "Password must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::User = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_user(&auth, models::NewUser::from(user))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}
