use std::fmt::Display;

mod endpoints_asset;
mod endpoints_auth;
mod endpoints_contact;
mod endpoints_gig;
mod endpoints_product;
mod endpoints_report;
mod endpoints_user;
mod endpoints_vendor;
mod endpoints_venue;
mod endpoints_warehouse;
#[cfg(test)]
mod tests;

use crate::auth_session::SessionToken;
use crate::data_store::authorization::Privilege;
use crate::data_store::StoreError;
use actix_web::error::JsonPayloadError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web, HttpResponse,
};
use serde_json::json;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(get_api_service());
}

fn get_api_service() -> actix_web::Scope {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| APIError::InvalidJson(err).into());
    web::scope("/api/v1")
        .app_data(json_config)
        .service(endpoints_auth::login)
        .service(endpoints_auth::get_session_user)
        .service(endpoints_user::list_users)
        .service(endpoints_user::create_user)
        .service(endpoints_warehouse::list_warehouses)
        .service(endpoints_warehouse::get_warehouse)
        .service(endpoints_warehouse::create_warehouse)
        .service(endpoints_warehouse::delete_warehouse)
        .service(endpoints_vendor::list_vendors)
        .service(endpoints_vendor::create_vendor)
        .service(endpoints_product::list_products)
        .service(endpoints_product::create_product)
        .service(endpoints_asset::list_assets)
        .service(endpoints_asset::get_asset)
        .service(endpoints_asset::create_asset)
        .service(endpoints_asset::update_asset)
        .service(endpoints_asset::delete_asset)
        .service(endpoints_venue::list_venues)
        .service(endpoints_venue::create_venue)
        .service(endpoints_contact::list_contacts)
        .service(endpoints_contact::create_contact)
        .service(endpoints_gig::list_gigs)
        .service(endpoints_gig::get_gig)
        .service(endpoints_gig::create_gig)
        .service(endpoints_gig::delete_gig)
        .service(endpoints_report::get_overview)
}

#[derive(Debug)]
pub enum APIError {
    NotExisting,
    AlreadyExisting,
    PermissionDenied {
        required_privilege: Privilege,
    },
    NoSessionToken,
    InvalidSessionToken,
    AuthenticationFailed,
    BookingConflict(String),
    DependentEntitiesExist(String),
    InvalidJson(actix_web::error::JsonPayloadError),
    InvalidData(String),
    TransactionConflict,
    InternalError(String),
}

impl Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExisting => f.write_str("Element does not exist")?,
            Self::AlreadyExisting => {
                f.write_str("Element already exists")?;
            }
            Self::PermissionDenied { required_privilege } => {
                write!(
                    f,
                    "Client is not authorized to perform this action. Authentication as {} is required.",
                    required_privilege
                        .qualifying_roles()
                        .iter()
                        .map(|role| role.name().to_owned())
                        .collect::<Vec<String>>()
                        .join(" or ")
                )?;
            }
            Self::NoSessionToken => {
                f.write_str("This action requires authentication, but client did not send authentication session token.")?
            }
            Self::InvalidSessionToken => {
                f.write_str("This action requires authentication, but the authentication session given by the client is not valid.")?
            }
            Self::AuthenticationFailed => {
                f.write_str("Invalid credentials")?;
            }
            Self::BookingConflict(message) => {
                f.write_str(message)?;
            }
            Self::DependentEntitiesExist(message) => {
                f.write_str(message)?;
            }
            Self::InternalError(s) => {
                f.write_str("Internal error: ")?;
                f.write_str(s)?;
            }
            Self::InvalidJson(e) => {
                write!(f, "Invalid JSON request data: {}", e)?;
            }
            Self::InvalidData(e) => {
                write!(f, "{}", e)?;
            }
            Self::TransactionConflict => {
                f.write_str("Concurrent database transaction conflict. Please retry request.")?;
            }
        };
        Ok(())
    }
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse {
        let message = format!("{}", self);

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({
                "error": message
            }))
    }
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotExisting => StatusCode::NOT_FOUND,
            Self::AlreadyExisting => StatusCode::CONFLICT,
            Self::PermissionDenied { .. } => StatusCode::UNAUTHORIZED,
            Self::NoSessionToken => StatusCode::UNAUTHORIZED,
            Self::InvalidSessionToken => StatusCode::UNAUTHORIZED,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::BookingConflict(_) => StatusCode::BAD_REQUEST,
            Self::DependentEntitiesExist(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidJson(e) => match e {
                JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidData(_) => StatusCode::BAD_REQUEST,
            Self::TransactionConflict => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConnectionError(error) => {
                Self::InternalError(format!("Could not connect to database: {}", error))
            }
            StoreError::QueryError(diesel_error) => Self::InternalError(format!(
                "Error while executing database query: {}",
                diesel_error
            )),
            StoreError::TransactionConflict => Self::TransactionConflict,
            StoreError::NotExisting => Self::NotExisting,
            StoreError::ConflictEntityExists => Self::AlreadyExisting,
            StoreError::DependentEntitiesExist(message) => Self::DependentEntitiesExist(message),
            StoreError::AuthenticationFailed => Self::AuthenticationFailed,
            StoreError::PermissionDenied { required_privilege } => {
                Self::PermissionDenied { required_privilege }
            }
            StoreError::InvalidInputData(e) => Self::InvalidData(e),
            StoreError::InvalidDataInDatabase(e) => Self::InternalError(format!(
                "Data queried from database could not be deserialized: {}",
                e
            )),
            StoreError::InternalError(e) => Self::InternalError(e),
        }
    }
}

impl From<actix_web::error::BlockingError> for APIError {
    fn from(_e: actix_web::error::BlockingError) -> Self {
        APIError::InternalError(
            "Could not get thread from thread pool for synchronous database operation.".to_owned(),
        )
    }
}

impl From<crate::auth_session::SessionError> for APIError {
    fn from(_e: crate::auth_session::SessionError) -> Self {
        APIError::InvalidSessionToken
    }
}

struct SessionTokenHeader(String);
const SESSION_TOKEN_MAX_AGE: std::time::Duration = std::time::Duration::from_secs(86400 * 7);

impl SessionTokenHeader {
    fn session_token(
        &self,
        secret: &str,
    ) -> Result<crate::auth_session::SessionToken, crate::auth_session::SessionError> {
        SessionToken::from_string(&self.0, secret, SESSION_TOKEN_MAX_AGE)
    }
}

impl actix_web::http::header::TryIntoHeaderValue for SessionTokenHeader {
    type Error = actix_web::http::header::InvalidHeaderValue;

    fn try_into_value(self) -> Result<actix_web::http::header::HeaderValue, Self::Error> {
        self.0.parse()
    }
}

impl actix_web::http::header::Header for SessionTokenHeader {
    fn name() -> actix_web::http::header::HeaderName {
        "X-SESSION-TOKEN"
            .try_into()
            .expect("Session Token Header name should be a valid header name")
    }

    fn parse<M: actix_web::HttpMessage>(msg: &M) -> Result<Self, actix_web::error::ParseError> {
        Ok(Self(
            msg.headers()
                .get(Self::name())
                .ok_or(actix_web::error::ParseError::Header)?
                .to_str()
                .unwrap_or("")
                .to_owned(),
        ))
    }
}
