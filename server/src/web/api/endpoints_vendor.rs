use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};

#[get("/vendors")]
async fn list_vendors(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let vendors: Vec<gigstock_api_types::Vendor> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_vendors(&auth)?)
    })
    .await??
    .into_iter()
    .map(|v| v.into())
    .collect();
    Ok(web::Json(vendors))
}

#[post("/vendors")]
async fn create_vendor(
    data: web::Json<gigstock_api_types::NewVendor>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let vendor = data.into_inner();
    if vendor.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Vendor name must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Vendor = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_vendor(&auth, models::NewVendor::from(vendor))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}
