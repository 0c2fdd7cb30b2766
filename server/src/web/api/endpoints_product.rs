use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};

#[get("/products")]
async fn list_products(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let products: Vec<gigstock_api_types::Product> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_products(&auth)?)
    })
    .await??
    .into_iter()
    .map(|p| p.into())
    .collect();
    Ok(web::Json(products))
}

#[post("/products")]
async fn create_product(
    data: web::Json<gigstock_api_types::NewProduct>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let product = data.into_inner();
    if product.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Product name must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Product = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_product(&auth, models::NewProduct::from(product))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}
