use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};

#[get("/contacts")]
async fn list_contacts(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let contacts: Vec<gigstock_api_types::Contact> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_contacts(&auth)?)
    })
    .await??
    .into_iter()
    .map(|c| c.into())
    .collect();
    Ok(web::Json(contacts))
}

#[post("/contacts")]
async fn create_contact(
    data: web::Json<gigstock_api_types::NewContact>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let contact = data.into_inner();
    if contact.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Contact name must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Contact = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_contact(&auth, models::NewContact::from(contact))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}
