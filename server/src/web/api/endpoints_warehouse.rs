use crate::data_store::models;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use uuid::Uuid;

#[get("/warehouses")]
async fn list_warehouses(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let warehouses: Vec<gigstock_api_types::WarehouseSummary> =
        web::block(move || -> Result<_, APIError> {
            let mut store = state.store.get_facade()?;
            let auth = store.get_auth_context_for_session(&session_token)?;
            Ok(store.get_warehouses(&auth)?)
        })
        .await??
        .into_iter()
        .map(|w| w.into())
        .collect();
    Ok(web::Json(warehouses))
}

#[get("/warehouses/{warehouse_id}")]
async fn get_warehouse(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let warehouse_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let details: gigstock_api_types::WarehouseDetails =
        web::block(move || -> Result<_, APIError> {
            let mut store = state.store.get_facade()?;
            let auth = store.get_auth_context_for_session(&session_token)?;
            Ok(store.get_warehouse(&auth, warehouse_id)?)
        })
        .await??
        .into();
    Ok(web::Json(details))
}

#[post("/warehouses")]
async fn create_warehouse(
    data: web::Json<gigstock_api_types::NewWarehouse>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let warehouse = data.into_inner();
    if warehouse.name.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Warehouse name must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Warehouse = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_warehouse(&auth, models::NewWarehouse::from(warehouse))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}

#[delete("/warehouses/{warehouse_id}")]
async fn delete_warehouse(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let warehouse_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        store.delete_warehouse(&auth, warehouse_id)?;
        Ok(())
    })
    .await??;
    Ok(HttpResponse::NoContent())
}
