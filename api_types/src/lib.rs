//! Wire types of the GigStock JSON API.
//!
//! These structs define the request and response bodies of the REST API under
//! `/api/v1`. Field names on the wire are camelCase, following the convention
//! of the original clients.

use chrono::{naive::NaiveDate, DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Warehouse list view: the warehouse record plus the number of assets stored in it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WarehouseSummary {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    #[serde(rename = "assetCount")]
    pub asset_count: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewWarehouse {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WarehouseDetails {
    pub warehouse: Warehouse,
    pub assets: Vec<Asset>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactEmail")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewVendor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactEmail")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductType {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "productType")]
    pub product_type: Option<ProductType>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "modelNumber")]
    pub model_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "defaultPrice")]
    pub default_price: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "brandId")]
    pub brand_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "typeId")]
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "modelNumber")]
    pub model_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "defaultPrice")]
    pub default_price: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "in-use")]
    InUse,
    #[serde(rename = "maintenance")]
    Maintenance,
    #[serde(rename = "retired")]
    Retired,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetCondition {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "poor")]
    Poor,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Asset {
    pub id: Uuid,
    #[serde(rename = "assetTag")]
    pub asset_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "purchaseDate")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "purchasePrice")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub condition: AssetCondition,
    pub status: AssetStatus,
    pub product: Product,
    pub warehouse: Warehouse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewAsset {
    #[serde(rename = "productId")]
    pub product_id: Uuid,
    #[serde(rename = "assetTag")]
    pub asset_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "purchaseDate")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "purchasePrice")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "vendorId")]
    pub vendor_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub condition: AssetCondition,
    pub status: AssetStatus,
    #[serde(rename = "warehouseId")]
    pub warehouse_id: Uuid,
}

/// One historical (or upcoming) assignment of an asset to a gig, as shown on
/// the asset detail page.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssignmentRecord {
    #[serde(rename = "gigName")]
    pub gig_name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssetDetails {
    pub asset: Asset,
    pub assignments: Vec<AssignmentRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewVenue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewContact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Payload of the booking endpoint `POST /api/v1/gigs`.
///
/// `start_time`/`end_time` define the half-open interval `[start, end)` of
/// the gig. `staff_ids` and `asset_ids` may be empty.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewGig {
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "venueId")]
    pub venue_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactId")]
    pub contact_id: Option<Uuid>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, rename = "staffIds")]
    pub staff_ids: Vec<Uuid>,
    #[serde(default, rename = "assetIds")]
    pub asset_ids: Vec<Uuid>,
}

/// Gig list view: venue/contact resolved to their names, staff and assets to
/// counts.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GigSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "venueName")]
    pub venue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contactName")]
    pub contact_name: Option<String>,
    #[serde(rename = "staffCount")]
    pub staff_count: i64,
    #[serde(rename = "assetCount")]
    pub asset_count: i64,
}

/// Full gig representation returned by a successful booking, with venue,
/// contact, staff and assets resolved.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Gig {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub notes: String,
    pub staff: Vec<User>,
    pub assets: Vec<Asset>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReportOverview {
    #[serde(rename = "totalAssets")]
    pub total_assets: i64,
    #[serde(rename = "availableAssets")]
    pub available_assets: i64,
    #[serde(rename = "assetsInUse")]
    pub assets_in_use: i64,
    #[serde(rename = "totalGigs")]
    pub total_gigs: i64,
    #[serde(rename = "activeGigs")]
    pub active_gigs: i64,
    /// Only included for Admin callers.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "totalUsers")]
    pub total_users: Option<i64>,
    #[serde(rename = "assetsByStatus")]
    pub assets_by_status: std::collections::BTreeMap<String, i64>,
    #[serde(rename = "assetsByCondition")]
    pub assets_by_condition: std::collections::BTreeMap<String, i64>,
}
