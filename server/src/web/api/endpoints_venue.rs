use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};

#[get("/venues")]
async fn list_venues(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let venues: Vec<gigstock_api_types::Venue> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_venues(&auth)?)
    })
    .await??
    .into_iter()
    .map(|v| v.into())
    .collect();
    Ok(web::Json(venues))
}

#[post("/venues")]
async fn create_venue(
    data: web::Json<gigstock_api_types::NewVenue>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let venue = data.into_inner();
    if venue.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Venue name must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Venue = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_venue(&auth, models::NewVenue::from(venue))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}
