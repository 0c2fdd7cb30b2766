use crate::data_store::authorization::Role;
use chrono::{naive::NaiveDate, DateTime, Utc};
use diesel::deserialize::FromSql;
use diesel::prelude::*;
use diesel::query_builder::bind_collector::RawBytesBindCollector;
use diesel::serialize::ToSql;
use diesel::{AsExpression, FromSqlRow};
use uuid::Uuid;

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::users)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for gigstock_api_types::User {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role.into(),
            created_at: value.created_at,
            last_login: value.last_login,
        }
    }
}

/// Data for creating a new user account. The password is still in cleartext here; it is hashed by
/// the store when the record is created.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

impl From<gigstock_api_types::NewUser> for NewUser {
    fn from(value: gigstock_api_types::NewUser) -> Self {
        Self {
            name: value.name,
            email: value.email,
            role: value.role.into(),
            password: value.password,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::warehouses)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Warehouse> for gigstock_api_types::Warehouse {
    fn from(value: Warehouse) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            address1: value.address1,
            address2: value.address2,
            city: value.city,
            state: value.state,
            zip: value.zip,
        }
    }
}

#[derive(Clone)]
pub struct NewWarehouse {
    pub name: String,
    pub description: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<gigstock_api_types::NewWarehouse> for NewWarehouse {
    fn from(value: gigstock_api_types::NewWarehouse) -> Self {
        Self {
            name: value.name,
            description: value.description,
            address1: value.address1,
            address2: value.address2,
            city: value.city,
            state: value.state,
            zip: value.zip,
        }
    }
}

#[derive(Clone)]
pub struct WarehouseWithAssetCount {
    pub warehouse: Warehouse,
    pub asset_count: i64,
}

impl From<WarehouseWithAssetCount> for gigstock_api_types::WarehouseSummary {
    fn from(value: WarehouseWithAssetCount) -> Self {
        Self {
            warehouse: value.warehouse.into(),
            asset_count: value.asset_count,
        }
    }
}

#[derive(Clone)]
pub struct WarehouseDetails {
    pub warehouse: Warehouse,
    pub assets: Vec<FullAsset>,
}

impl From<WarehouseDetails> for gigstock_api_types::WarehouseDetails {
    fn from(value: WarehouseDetails) -> Self {
        Self {
            warehouse: value.warehouse.into(),
            assets: value.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::vendors)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl From<Vendor> for gigstock_api_types::Vendor {
    fn from(value: Vendor) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            website: value.website,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
        }
    }
}

#[derive(Clone)]
pub struct NewVendor {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl From<gigstock_api_types::NewVendor> for NewVendor {
    fn from(value: gigstock_api_types::NewVendor) -> Self {
        Self {
            name: value.name,
            description: value.description,
            website: value.website,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::brands)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
}

impl From<Brand> for gigstock_api_types::Brand {
    fn from(value: Brand) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            website: value.website,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::product_types)]
pub struct ProductType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<ProductType> for gigstock_api_types::ProductType {
    fn from(value: ProductType) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::products)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand_id: Option<Uuid>,
    pub type_id: Option<Uuid>,
    pub description: String,
    pub model_number: Option<String>,
    pub default_price: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct FullProduct {
    pub product: Product,
    pub brand: Option<Brand>,
    pub product_type: Option<ProductType>,
}

impl From<FullProduct> for gigstock_api_types::Product {
    fn from(value: FullProduct) -> Self {
        Self {
            id: value.product.id,
            name: value.product.name,
            brand: value.brand.map(|b| b.into()),
            product_type: value.product_type.map(|t| t.into()),
            description: value.product.description,
            model_number: value.product.model_number,
            default_price: value.product.default_price,
        }
    }
}

#[derive(Clone)]
pub struct NewProduct {
    pub name: String,
    pub brand_id: Option<Uuid>,
    pub type_id: Option<Uuid>,
    pub description: String,
    pub model_number: Option<String>,
    pub default_price: Option<f64>,
}

impl From<gigstock_api_types::NewProduct> for NewProduct {
    fn from(value: gigstock_api_types::NewProduct) -> Self {
        Self {
            name: value.name,
            brand_id: value.brand_id,
            type_id: value.type_id,
            description: value.description,
            model_number: value.model_number,
            default_price: value.default_price,
        }
    }
}

#[derive(Debug, PartialEq, FromSqlRow, AsExpression, Eq, Clone, Copy)]
#[diesel(sql_type = diesel::sql_types::Text)]
pub enum AssetStatus {
    Available,
    InUse,
    Maintenance,
    Retired,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in-use",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }
}

impl TryFrom<&str> for AssetStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(Self::Available),
            "in-use" => Ok(Self::InUse),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(format!("Unknown asset status: {}", value)),
        }
    }
}

impl From<AssetStatus> for gigstock_api_types::AssetStatus {
    fn from(value: AssetStatus) -> Self {
        match value {
            AssetStatus::Available => Self::Available,
            AssetStatus::InUse => Self::InUse,
            AssetStatus::Maintenance => Self::Maintenance,
            AssetStatus::Retired => Self::Retired,
        }
    }
}

impl From<gigstock_api_types::AssetStatus> for AssetStatus {
    fn from(value: gigstock_api_types::AssetStatus) -> Self {
        match value {
            gigstock_api_types::AssetStatus::Available => Self::Available,
            gigstock_api_types::AssetStatus::InUse => Self::InUse,
            gigstock_api_types::AssetStatus::Maintenance => Self::Maintenance,
            gigstock_api_types::AssetStatus::Retired => Self::Retired,
        }
    }
}

impl<DB> ToSql<diesel::sql_types::Text, DB> for AssetStatus
where
    DB: diesel::backend::Backend,
    for<'c> DB: diesel::backend::Backend<BindCollector<'c> = RawBytesBindCollector<DB>>,
    str: ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(&mut out.reborrow())
    }
}

impl<DB> FromSql<diesel::sql_types::Text, DB> for AssetStatus
where
    DB: diesel::backend::Backend,
    String: FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let s = String::from_sql(bytes)?;
        s.as_str().try_into().map_err(|e: String| e.into())
    }
}

#[derive(Debug, PartialEq, FromSqlRow, AsExpression, Eq, Clone, Copy)]
#[diesel(sql_type = diesel::sql_types::Text)]
pub enum AssetCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AssetCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl TryFrom<&str> for AssetCondition {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(format!("Unknown asset condition: {}", value)),
        }
    }
}

impl From<AssetCondition> for gigstock_api_types::AssetCondition {
    fn from(value: AssetCondition) -> Self {
        match value {
            AssetCondition::Excellent => Self::Excellent,
            AssetCondition::Good => Self::Good,
            AssetCondition::Fair => Self::Fair,
            AssetCondition::Poor => Self::Poor,
        }
    }
}

impl From<gigstock_api_types::AssetCondition> for AssetCondition {
    fn from(value: gigstock_api_types::AssetCondition) -> Self {
        match value {
            gigstock_api_types::AssetCondition::Excellent => Self::Excellent,
            gigstock_api_types::AssetCondition::Good => Self::Good,
            gigstock_api_types::AssetCondition::Fair => Self::Fair,
            gigstock_api_types::AssetCondition::Poor => Self::Poor,
        }
    }
}

impl<DB> ToSql<diesel::sql_types::Text, DB> for AssetCondition
where
    DB: diesel::backend::Backend,
    for<'c> DB: diesel::backend::Backend<BindCollector<'c> = RawBytesBindCollector<DB>>,
    str: ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(&mut out.reborrow())
    }
}

impl<DB> FromSql<diesel::sql_types::Text, DB> for AssetCondition
where
    DB: diesel::backend::Backend,
    String: FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let s = String::from_sql(bytes)?;
        s.as_str().try_into().map_err(|e: String| e.into())
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::assets)]
pub struct Asset {
    pub id: Uuid,
    pub product_id: Uuid,
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub vendor_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub notes: String,
    pub location: Option<String>,
    pub condition: AssetCondition,
    pub status: AssetStatus,
    pub warehouse_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct FullAsset {
    pub asset: Asset,
    pub product: FullProduct,
    pub warehouse: Warehouse,
    pub vendor: Option<Vendor>,
}

impl From<FullAsset> for gigstock_api_types::Asset {
    fn from(value: FullAsset) -> Self {
        Self {
            id: value.asset.id,
            asset_tag: value.asset.asset_tag,
            serial_number: value.asset.serial_number,
            purchase_date: value.asset.purchase_date,
            purchase_price: value.asset.purchase_price,
            barcode: value.asset.barcode,
            notes: value.asset.notes,
            location: value.asset.location,
            condition: value.asset.condition.into(),
            status: value.asset.status.into(),
            product: value.product.into(),
            warehouse: value.warehouse.into(),
            vendor: value.vendor.map(|v| v.into()),
            created_at: value.asset.created_at,
        }
    }
}

#[derive(Clone)]
pub struct NewAsset {
    pub product_id: Uuid,
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub vendor_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub notes: String,
    pub location: Option<String>,
    pub condition: AssetCondition,
    pub status: AssetStatus,
    pub warehouse_id: Uuid,
}

impl From<gigstock_api_types::NewAsset> for NewAsset {
    fn from(value: gigstock_api_types::NewAsset) -> Self {
        Self {
            product_id: value.product_id,
            asset_tag: value.asset_tag,
            serial_number: value.serial_number,
            purchase_date: value.purchase_date,
            purchase_price: value.purchase_price,
            vendor_id: value.vendor_id,
            barcode: value.barcode,
            notes: value.notes,
            location: value.location,
            condition: value.condition.into(),
            status: value.status.into(),
            warehouse_id: value.warehouse_id,
        }
    }
}

/// One assignment of an asset to a gig, for the assignment history on the asset detail view
#[derive(Clone, Queryable)]
pub struct AssignmentRecord {
    pub gig_name: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<AssignmentRecord> for gigstock_api_types::AssignmentRecord {
    fn from(value: AssignmentRecord) -> Self {
        Self {
            gig_name: value.gig_name,
            start_time: value.begin,
            end_time: value.end,
        }
    }
}

#[derive(Clone)]
pub struct AssetDetails {
    pub asset: FullAsset,
    pub assignments: Vec<AssignmentRecord>,
}

impl From<AssetDetails> for gigstock_api_types::AssetDetails {
    fn from(value: AssetDetails) -> Self {
        Self {
            asset: value.asset.into(),
            assignments: value.assignments.into_iter().map(|a| a.into()).collect(),
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::venues)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Venue> for gigstock_api_types::Venue {
    fn from(value: Venue) -> Self {
        Self {
            id: value.id,
            name: value.name,
            address1: value.address1,
            address2: value.address2,
            city: value.city,
            state: value.state,
            zip: value.zip,
            phone: value.phone,
        }
    }
}

#[derive(Clone)]
pub struct NewVenue {
    pub name: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

impl From<gigstock_api_types::NewVenue> for NewVenue {
    fn from(value: gigstock_api_types::NewVenue) -> Self {
        Self {
            name: value.name,
            address1: value.address1,
            address2: value.address2,
            city: value.city,
            state: value.state,
            zip: value.zip,
            phone: value.phone,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::contacts)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for gigstock_api_types::Contact {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id,
            name: value.name,
            phone: value.phone,
            email: value.email,
            notes: value.notes,
        }
    }
}

#[derive(Clone)]
pub struct NewContact {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: String,
}

impl From<gigstock_api_types::NewContact> for NewContact {
    fn from(value: gigstock_api_types::NewContact) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            email: value.email,
            notes: value.notes,
        }
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::gigs)]
pub struct Gig {
    pub id: Uuid,
    pub name: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub venue_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub notes: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct GigSummary {
    pub gig: Gig,
    pub venue_name: Option<String>,
    pub contact_name: Option<String>,
    pub staff_count: i64,
    pub asset_count: i64,
}

impl From<GigSummary> for gigstock_api_types::GigSummary {
    fn from(value: GigSummary) -> Self {
        Self {
            id: value.gig.id,
            name: value.gig.name,
            start_time: value.gig.begin,
            end_time: value.gig.end,
            notes: value.gig.notes,
            venue_name: value.venue_name,
            contact_name: value.contact_name,
            staff_count: value.staff_count,
            asset_count: value.asset_count,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FullGig {
    pub gig: Gig,
    pub venue: Option<Venue>,
    pub contact: Option<Contact>,
    pub staff: Vec<User>,
    pub assets: Vec<FullAsset>,
}

impl From<FullGig> for gigstock_api_types::Gig {
    fn from(value: FullGig) -> Self {
        Self {
            id: value.gig.id,
            name: value.gig.name,
            start_time: value.gig.begin,
            end_time: value.gig.end,
            venue: value.venue.map(|v| v.into()),
            contact: value.contact.map(|c| c.into()),
            notes: value.gig.notes,
            staff: value.staff.into_iter().map(|u| u.into()).collect(),
            assets: value.assets.into_iter().map(|a| a.into()).collect(),
            created_at: value.gig.created_at,
        }
    }
}

/// Data for booking a new gig, with the ids of the staff members and assets to assign
#[derive(Clone)]
pub struct NewGig {
    pub name: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub venue_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub notes: String,
    pub staff_ids: Vec<Uuid>,
    pub asset_ids: Vec<Uuid>,
}

impl From<gigstock_api_types::NewGig> for NewGig {
    fn from(value: gigstock_api_types::NewGig) -> Self {
        Self {
            name: value.name,
            begin: value.start_time,
            end: value.end_time,
            venue_id: value.venue_id,
            contact_id: value.contact_id,
            notes: value.notes,
            staff_ids: value.staff_ids,
            asset_ids: value.asset_ids,
        }
    }
}

// Row types for the Gig-User and Gig-Asset association tables, with composite primary keys, used
// for inserting and querying the staff/asset assignments of a Gig.
#[derive(Queryable, Associations, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::gig_staff)]
#[diesel(primary_key(gig_id, user_id))]
#[diesel(belongs_to(Gig))]
pub struct GigStaffMapping {
    pub gig_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Queryable, Associations, Identifiable, Selectable, Insertable)]
#[diesel(table_name=super::schema::gig_assets)]
#[diesel(primary_key(gig_id, asset_id))]
#[diesel(belongs_to(Gig))]
pub struct GigAssetMapping {
    pub gig_id: Uuid,
    pub asset_id: Uuid,
    pub assigned_by: Uuid,
}

/// Aggregated numbers for the reporting overview
#[derive(Clone, Debug)]
pub struct ReportOverview {
    pub total_assets: i64,
    pub available_assets: i64,
    pub assets_in_use: i64,
    pub total_gigs: i64,
    pub active_gigs: i64,
    /// Only filled in for callers with the ManageUsers privilege
    pub total_users: Option<i64>,
    pub assets_by_status: std::collections::BTreeMap<String, i64>,
    pub assets_by_condition: std::collections::BTreeMap<String, i64>,
}

impl From<ReportOverview> for gigstock_api_types::ReportOverview {
    fn from(value: ReportOverview) -> Self {
        Self {
            total_assets: value.total_assets,
            available_assets: value.available_assets,
            assets_in_use: value.assets_in_use,
            total_gigs: value.total_gigs,
            active_gigs: value.active_gigs,
            total_users: value.total_users,
            assets_by_status: value.assets_by_status,
            assets_by_condition: value.assets_by_condition,
        }
    }
}

/// A user account in a [DataImport], with a fixed id and a cleartext password.
///
/// The password is hashed by the store during the import.
#[derive(Clone)]
pub struct ImportUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// A complete data set for the bulk import from a JSON file.
///
/// All records carry their ids, so entities can reference each other within the same import.
/// Gigs are imported without conflict checking; the file is trusted to be consistent.
pub struct DataImport {
    pub users: Vec<ImportUser>,
    pub warehouses: Vec<Warehouse>,
    pub vendors: Vec<Vendor>,
    pub brands: Vec<Brand>,
    pub product_types: Vec<ProductType>,
    pub products: Vec<Product>,
    pub venues: Vec<Venue>,
    pub contacts: Vec<Contact>,
    pub assets: Vec<Asset>,
    pub gigs: Vec<Gig>,
    pub gig_staff: Vec<GigStaffMapping>,
    pub gig_assets: Vec<GigAssetMapping>,
}
