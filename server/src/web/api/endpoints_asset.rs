use crate::data_store::{models, AssetFilter};
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

/// Query string representation of an [AssetFilter]
#[derive(Deserialize)]
struct AssetFilterAsQuery {
    status: Option<gigstock_api_types::AssetStatus>,
    #[serde(rename = "warehouseId")]
    warehouse_id: Option<Uuid>,
}

impl From<AssetFilterAsQuery> for AssetFilter {
    fn from(query: AssetFilterAsQuery) -> Self {
        Self {
            status: query.status.map(|s| s.into()),
            warehouse: query.warehouse_id,
        }
    }
}

#[get("/assets")]
async fn list_assets(
    query: web::Query<AssetFilterAsQuery>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let assets: Vec<gigstock_api_types::Asset> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_assets_filtered(&auth, query.into_inner().into())?)
    })
    .await??
    .into_iter()
    .map(|a| a.into())
    .collect();
    Ok(web::Json(assets))
}

#[get("/assets/{asset_id}")]
async fn get_asset(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let asset_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let details: gigstock_api_types::AssetDetails = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.get_asset(&auth, asset_id)?)
    })
    .await??
    .into();
    Ok(web::Json(details))
}

#[post("/assets")]
async fn create_asset(
    data: web::Json<gigstock_api_types::NewAsset>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let asset = data.into_inner();
    if asset.asset_tag.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Asset tag must not be empty".to_string(),
        ));
    }
    let created: gigstock_api_types::Asset = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.create_asset(&auth, models::NewAsset::from(asset))?)
    })
    .await??
    .into();
    Ok(HttpResponse::Created().json(created))
}

#[put("/assets/{asset_id}")]
async fn update_asset(
    path: web::Path<Uuid>,
    data: web::Json<gigstock_api_types::NewAsset>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let asset_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let asset = data.into_inner();
    if asset.asset_tag.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Asset tag must not be empty".to_string(),
        ));
    }
    let updated: gigstock_api_types::Asset = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        Ok(store.update_asset(&auth, asset_id, models::NewAsset::from(asset))?)
    })
    .await??
    .into();
    Ok(web::Json(updated))
}

#[delete("/assets/{asset_id}")]
async fn delete_asset(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let asset_id = path.into_inner();
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_context_for_session(&session_token)?;
        store.delete_asset(&auth, asset_id)?;
        Ok(())
    })
    .await??;
    Ok(HttpResponse::NoContent())
}
