//! The backend part of the backend: the database interface
//!
//! The primary entry point to this module is the function [get_store_from_env], which returns an
//! object implementing the [GigStockStore] trait. This object can be shared between threads in a
//! global application state and be used to create [GigStockStoreFacade] instances for interaction
//! with the database. These provide a CRUD-like interface, using the data models from the [models]
//! module.
//!
//! The primary implementation of [GigStockStore] ([postgres::PgDataStore]) wraps a PostgreSQL
//! connection pool and its corresponding [GigStockStoreFacade] objects
//! ([postgres::PgDataStoreFacade]) hold a reference to one pooled connection each, using the Diesel
//! query DSL for implementing the database interaction.
//!
//! There is also a mock implementation for unittests. Other [GigStockStore] implementations may be
//! added later and selected via the "DATABASE_URL" environment variable.

use crate::auth_session::SessionToken;
use crate::cli_error::CliError;
use crate::cli_error::CliError::UnexpectedStoreError;
use crate::data_store::authorization::Privilege;
use crate::setup;
use authorization::AuthContext;

pub mod authorization;
pub mod models;
mod password;
mod postgres;
pub mod scheduling;
mod schema;
#[cfg(test)]
pub mod store_mock;

/// Get a [GigStockStore] instance, according to the "DATABASE_URL" environment variable.
///
/// The DATABASE_URL must be a PostgreSQL connection url, following the schema
/// "postgres://{user}:{password}@{host}/{database}".
pub fn get_store_from_env() -> Result<impl GigStockStore, CliError> {
    postgres::PgDataStore::new(&setup::get_database_url_from_env()?)
        .map_err(|err| UnexpectedStoreError(err.to_string()))
}

pub type UserId = uuid::Uuid;
pub type GigId = uuid::Uuid;
pub type AssetId = uuid::Uuid;
pub type WarehouseId = uuid::Uuid;
pub type VendorId = uuid::Uuid;
pub type ProductId = uuid::Uuid;
pub type VenueId = uuid::Uuid;
pub type ContactId = uuid::Uuid;

/// Result of an attempt to book a gig through [GigStockStoreFacade::create_gig].
///
/// A scheduling conflict is an expected outcome of the booking operation, not an error, so it is
/// carried in the `Ok` branch of the result and only infrastructure failures use [StoreError].
#[derive(Debug)]
pub enum BookingOutcome {
    /// The gig and all its staff and asset assignments have been created.
    Booked(models::FullGig),
    /// Nothing has been created, because a requested staff member or asset is already assigned to
    /// a gig overlapping the requested time window.
    Conflict(scheduling::BookingConflict),
}

pub trait GigStockStoreFacade {
    /// Try to authenticate a client with an email address and cleartext password.
    ///
    /// Every failure mode (unknown email, wrong password, locked account) is reported as
    /// [StoreError::AuthenticationFailed], so the response does not reveal which part was wrong.
    /// Repeated failures for an existing account lock it for a while.
    fn authenticate_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<models::User, StoreError>;

    /// Get an [AuthContext] instance for a client, representing the client's access role
    fn get_auth_context_for_session(
        &mut self,
        session_token: &SessionToken,
    ) -> Result<AuthContext, StoreError>;

    fn get_users(&mut self, auth: &AuthContext) -> Result<Vec<models::User>, StoreError>;
    fn create_user(
        &mut self,
        auth: &AuthContext,
        user: models::NewUser,
    ) -> Result<models::User, StoreError>;

    fn get_warehouses(
        &mut self,
        auth: &AuthContext,
    ) -> Result<Vec<models::WarehouseWithAssetCount>, StoreError>;
    fn get_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<models::WarehouseDetails, StoreError>;
    fn create_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse: models::NewWarehouse,
    ) -> Result<models::Warehouse, StoreError>;
    /// Delete a warehouse.
    ///
    /// Fails with [StoreError::DependentEntitiesExist] while any asset is still stored in the
    /// warehouse.
    fn delete_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<(), StoreError>;

    fn get_vendors(&mut self, auth: &AuthContext) -> Result<Vec<models::Vendor>, StoreError>;
    fn create_vendor(
        &mut self,
        auth: &AuthContext,
        vendor: models::NewVendor,
    ) -> Result<models::Vendor, StoreError>;

    fn get_products(&mut self, auth: &AuthContext) -> Result<Vec<models::FullProduct>, StoreError>;
    fn create_product(
        &mut self,
        auth: &AuthContext,
        product: models::NewProduct,
    ) -> Result<models::FullProduct, StoreError>;

    /// Get a filtered list of assets, including their product, warehouse and vendor records.
    ///
    /// Assets are returned sorted by asset tag.
    fn get_assets_filtered(
        &mut self,
        auth: &AuthContext,
        filter: AssetFilter,
    ) -> Result<Vec<models::FullAsset>, StoreError>;
    fn get_asset(
        &mut self,
        auth: &AuthContext,
        asset_id: AssetId,
    ) -> Result<models::AssetDetails, StoreError>;
    fn create_asset(
        &mut self,
        auth: &AuthContext,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError>;
    fn update_asset(
        &mut self,
        auth: &AuthContext,
        asset_id: AssetId,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError>;
    /// Delete an asset.
    ///
    /// Fails with [StoreError::DependentEntitiesExist] while the asset is assigned to any gig
    /// that has not ended yet.
    fn delete_asset(&mut self, auth: &AuthContext, asset_id: AssetId) -> Result<(), StoreError>;

    fn get_venues(&mut self, auth: &AuthContext) -> Result<Vec<models::Venue>, StoreError>;
    fn create_venue(
        &mut self,
        auth: &AuthContext,
        venue: models::NewVenue,
    ) -> Result<models::Venue, StoreError>;

    fn get_contacts(&mut self, auth: &AuthContext) -> Result<Vec<models::Contact>, StoreError>;
    fn create_contact(
        &mut self,
        auth: &AuthContext,
        contact: models::NewContact,
    ) -> Result<models::Contact, StoreError>;

    /// Get the list of gigs with the newest start time first, i.e. sorted descending by
    /// (begin, end)
    fn get_gigs(&mut self, auth: &AuthContext) -> Result<Vec<models::GigSummary>, StoreError>;
    fn get_gig(&mut self, auth: &AuthContext, gig_id: GigId)
        -> Result<models::FullGig, StoreError>;
    /// Book a gig, i.e. create it together with its staff and asset assignments.
    ///
    /// The conflict check and the inserts run in a single serializable transaction, so two
    /// concurrent bookings cannot both pass the check and double-book a resource. Staff
    /// assignments are checked before asset assignments and within each group the earliest
    /// conflicting gig wins, which makes the reported conflict deterministic.
    fn create_gig(
        &mut self,
        auth: &AuthContext,
        gig: models::NewGig,
    ) -> Result<BookingOutcome, StoreError>;
    fn delete_gig(&mut self, auth: &AuthContext, gig_id: GigId) -> Result<(), StoreError>;

    fn get_report_overview(
        &mut self,
        auth: &AuthContext,
    ) -> Result<models::ReportOverview, StoreError>;

    /// Import a complete data set in a single transaction, for seeding a fresh database from a
    /// JSON file via the command line.
    fn import_data(&mut self, auth: &AuthContext, data: models::DataImport)
        -> Result<(), StoreError>;
}

/// Filter options for retrieving assets from the store via
/// [GigStockStoreFacade::get_assets_filtered]
#[derive(Default)]
pub struct AssetFilter {
    /// Filter for assets with the given status
    pub status: Option<models::AssetStatus>,
    /// Filter for assets stored in the given warehouse
    pub warehouse: Option<WarehouseId>,
}

impl AssetFilter {
    /// Checks if a given asset matches the filter
    ///
    /// Usually, filtering should be done by the database. This function can be used for separate
    /// checks of individual assets in software.
    pub fn matches(&self, asset: &models::Asset) -> bool {
        if let Some(status) = self.status {
            if asset.status != status {
                return false;
            }
        }
        if let Some(warehouse) = self.warehouse {
            if asset.warehouse_id != warehouse {
                return false;
            }
        }
        true
    }
}

pub trait GigStockStore: Send + Sync {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn GigStockStoreFacade + 'a>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    /// Connection to the database failed. See string description for details.
    ConnectionError(String),
    /// The query could not be executed because of some error not covered by the other members (see
    /// string description)
    QueryError(diesel::result::Error),
    /// Database transaction could not be commited due to a conflicting concurrent transaction
    TransactionConflict,
    /// The requested entity does not exist
    NotExisting,
    /// The entity could not be created because another entity with the same unique attribute (e.g.
    /// name, email address or asset tag) exists already.
    ConflictEntityExists,
    /// The entity cannot be deleted because other entities still reference it. See string
    /// description for the user-facing explanation.
    DependentEntitiesExist(String),
    /// The client could not be authenticated. Deliberately carries no detail about which part of
    /// the credentials was rejected.
    AuthenticationFailed,
    /// The client is not authorized for this action. It would need to be signed in with a role
    /// qualifying for the `required_privilege`.
    PermissionDenied { required_privilege: Privilege },
    /// The provided data is invalid, i.e. it does not match the expected ranges or violates a
    /// SQL constraint. See string description for details.
    InvalidInputData(String),
    /// Some data queried from the database could not be deserialized. See string description for
    /// details.
    InvalidDataInDatabase(String),
    /// An internal operation failed for a reason unrelated to the database. See string description
    /// for details.
    InternalError(String),
}

impl From<password::PasswordHashingError> for StoreError {
    fn from(error: password::PasswordHashingError) -> Self {
        Self::InternalError(error.to_string())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotExisting,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => Self::ConflictEntityExists,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => Self::TransactionConflict,
            diesel::result::Error::DatabaseError(
                e @ diesel::result::DatabaseErrorKind::ForeignKeyViolation
                | e @ diesel::result::DatabaseErrorKind::CheckViolation,
                _,
            ) => Self::InvalidInputData(format!("{:?}", e)),
            diesel::result::Error::SerializationError(e) => Self::InvalidInputData(e.to_string()),
            diesel::result::Error::DeserializationError(e) => {
                Self::InvalidDataInDatabase(e.to_string())
            }
            _ => Self::QueryError(error),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        Self::ConnectionError(error.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Error connecting to database: {}", e),
            Self::QueryError(e) => write!(f, "Error while executing database query: {}", e),
            Self::TransactionConflict => f.write_str("Database transaction could not be commited due to a conflicting concurrent transaction"),
            Self::NotExisting => f.write_str("Database record does not exist."),
            Self::ConflictEntityExists => f.write_str("Database record exists already."),
            Self::DependentEntitiesExist(e) => f.write_str(e),
            Self::AuthenticationFailed => f.write_str("Invalid credentials"),
            Self::PermissionDenied { required_privilege } => {
                write!(f, "Client is not authorized to perform this action. {:?} privilege required.", required_privilege)
            }
            Self::InvalidInputData(e) => {
                write!(f, "Data to be stored in database is not valid: {}", e)
            }
            StoreError::InvalidDataInDatabase(e) => {
                write!(f, "Data queried from database could not be deserialized: {}", e)
            },
            Self::InternalError(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}
