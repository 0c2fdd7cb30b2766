use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, web, Responder};

#[get("/reports/overview")]
async fn get_overview(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .ok_or(APIError::NoSessionToken)?
        .into_inner()
        .session_token(&state.secret)?;
    let overview: gigstock_api_types::ReportOverview =
        web::block(move || -> Result<_, APIError> {
            let mut store = state.store.get_facade()?;
            let auth = store.get_auth_context_for_session(&session_token)?;
            Ok(store.get_report_overview(&auth)?)
        })
        .await??
        .into();
    Ok(web::Json(overview))
}
