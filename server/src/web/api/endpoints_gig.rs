use crate::data_store::{models, BookingOutcome};
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use uuid::Uuid;

#[get("/gigs")]
async fn list_gigs(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let gigs: Vec<gigstock_api_types::GigSummary> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_gigs(&auth)?)
    })
    .await??
    .into_iter()
    .map(|g| g.into())
    .collect();
    Ok(web::Json(gigs))
}

#[get("/gigs/{gig_id}")]
async fn get_gig(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let gig_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let gig: gigstock_api_types::Gig = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_gig(&auth, gig_id)?)
    })
    .await??
    .into();
    Ok(web::Json(gig))
}

#[post("/gigs")]
async fn create_gig(
    data: web::Json<gigstock_api_types::NewGig>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let gig = data.into_inner();
    if gig.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Gig name must not be empty".to_string(),
        ));
    }
    let outcome = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_gig(&auth, models::NewGig::from(gig))?)
    })
    .await??;
    match outcome {
        BookingOutcome::Booked(full_gig) => {
            let gig: gigstock_api_types::Gig = full_gig.into();
            Ok(HttpResponse::Created().json(gig))
        }
        BookingOutcome::Conflict(conflict) => Err(APIError::BookingConflict(conflict.message())),
    }
}

#[delete("/gigs/{gig_id}")]
async fn delete_gig(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let gig_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        store.delete_gig(&auth, gig_id)?;
        Ok(())
    })
    .await??;
    Ok(HttpResponse::NoContent())
}
