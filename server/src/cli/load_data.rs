//! Bulk import of a complete data set from a JSON file, for seeding a fresh database.
//!
//! The file carries explicit UUIDs on all records, so entities can reference each other. The
//! records are handed to the data store as one [models::DataImport] and inserted in a single
//! transaction.
use crate::cli::CliAuthTokenKey;
use crate::cli_error::CliError;
use crate::data_store::authorization::AuthContext;
use crate::data_store::{get_store_from_env, models, GigStockStore};
use chrono::{naive::NaiveDate, DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SavedData {
    users: Vec<SavedUser>,
    #[serde(default)]
    warehouses: Vec<gigstock_api_types::Warehouse>,
    #[serde(default)]
    vendors: Vec<gigstock_api_types::Vendor>,
    #[serde(default)]
    brands: Vec<gigstock_api_types::Brand>,
    #[serde(default)]
    product_types: Vec<gigstock_api_types::ProductType>,
    #[serde(default)]
    products: Vec<SavedProduct>,
    #[serde(default)]
    venues: Vec<gigstock_api_types::Venue>,
    #[serde(default)]
    contacts: Vec<gigstock_api_types::Contact>,
    #[serde(default)]
    assets: Vec<SavedAsset>,
    #[serde(default)]
    gigs: Vec<SavedGig>,
}

#[derive(Deserialize)]
struct SavedUser {
    id: Uuid,
    name: String,
    email: String,
    role: gigstock_api_types::UserRole,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedProduct {
    id: Uuid,
    name: String,
    #[serde(default)]
    brand_id: Option<Uuid>,
    #[serde(default)]
    type_id: Option<Uuid>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    model_number: Option<String>,
    #[serde(default)]
    default_price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedAsset {
    id: Uuid,
    product_id: Uuid,
    asset_tag: String,
    #[serde(default)]
    serial_number: Option<String>,
    #[serde(default)]
    purchase_date: Option<NaiveDate>,
    #[serde(default)]
    purchase_price: Option<f64>,
    #[serde(default)]
    vendor_id: Option<Uuid>,
    #[serde(default)]
    barcode: Option<String>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    location: Option<String>,
    condition: gigstock_api_types::AssetCondition,
    status: gigstock_api_types::AssetStatus,
    warehouse_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedGig {
    id: Uuid,
    name: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    venue_id: Option<Uuid>,
    #[serde(default)]
    contact_id: Option<Uuid>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    staff_ids: Vec<Uuid>,
    #[serde(default)]
    asset_ids: Vec<Uuid>,
}

pub fn load_data_from_file(path: &PathBuf) -> Result<(), CliError> {
    let data_store_pool = get_store_from_env()?;
    let mut data_store = data_store_pool.get_facade()?;

    let f = File::open(path).map_err(|e| {
        CliError::FileError(format!("Could not open {:?} for reading: {}", path, e))
    })?;
    let data: SavedData = serde_json::from_reader(BufReader::new(f))?;

    // Rows reference their creator, so the file must bring at least one user. The first admin
    // account (or the first user) is recorded as the creator of all imported entities.
    let creator_id = data
        .users
        .iter()
        .find(|u| matches!(u.role, gigstock_api_types::UserRole::Admin))
        .or(data.users.first())
        .map(|u| u.id)
        .ok_or(CliError::DataError(
            "Data file must contain at least one user".to_string(),
        ))?;
    let now = Utc::now();

    let mut gig_staff = vec![];
    let mut gig_assets = vec![];
    let mut gigs = vec![];
    for gig in data.gigs {
        if gig.start_time >= gig.end_time {
            return Err(CliError::DataError(format!(
                "Gig \"{}\" has an inverted time interval",
                gig.name
            )));
        }
        gig_staff.extend(gig.staff_ids.iter().map(|user_id| models::GigStaffMapping {
            gig_id: gig.id,
            user_id: *user_id,
        }));
        gig_assets.extend(gig.asset_ids.iter().map(|asset_id| models::GigAssetMapping {
            gig_id: gig.id,
            asset_id: *asset_id,
            assigned_by: creator_id,
        }));
        gigs.push(models::Gig {
            id: gig.id,
            name: gig.name,
            begin: gig.start_time,
            end: gig.end_time,
            venue_id: gig.venue_id,
            contact_id: gig.contact_id,
            notes: gig.notes,
            created_by: creator_id,
            created_at: now,
        });
    }

    let import = models::DataImport {
        users: data
            .users
            .into_iter()
            .map(|u| models::ImportUser {
                id: u.id,
                name: u.name,
                email: u.email,
                role: u.role.into(),
                password: u.password,
            })
            .collect(),
        warehouses: data
            .warehouses
            .into_iter()
            .map(|w| models::Warehouse {
                id: w.id,
                name: w.name,
                description: w.description,
                address1: w.address1,
                address2: w.address2,
                city: w.city,
                state: w.state,
                zip: w.zip,
                created_by: creator_id,
                created_at: now,
            })
            .collect(),
        vendors: data
            .vendors
            .into_iter()
            .map(|v| models::Vendor {
                id: v.id,
                name: v.name,
                description: v.description,
                website: v.website,
                contact_email: v.contact_email,
                contact_phone: v.contact_phone,
            })
            .collect(),
        brands: data
            .brands
            .into_iter()
            .map(|b| models::Brand {
                id: b.id,
                name: b.name,
                description: b.description,
                website: b.website,
            })
            .collect(),
        product_types: data
            .product_types
            .into_iter()
            .map(|t| models::ProductType {
                id: t.id,
                name: t.name,
                description: t.description,
            })
            .collect(),
        products: data
            .products
            .into_iter()
            .map(|p| models::Product {
                id: p.id,
                name: p.name,
                brand_id: p.brand_id,
                type_id: p.type_id,
                description: p.description,
                model_number: p.model_number,
                default_price: p.default_price,
            })
            .collect(),
        venues: data
            .venues
            .into_iter()
            .map(|v| models::Venue {
                id: v.id,
                name: v.name,
                address1: v.address1,
                address2: v.address2,
                city: v.city,
                state: v.state,
                zip: v.zip,
                phone: v.phone,
                created_by: creator_id,
                created_at: now,
            })
            .collect(),
        contacts: data
            .contacts
            .into_iter()
            .map(|c| models::Contact {
                id: c.id,
                name: c.name,
                phone: c.phone,
                email: c.email,
                notes: c.notes,
                created_by: creator_id,
                created_at: now,
            })
            .collect(),
        assets: data
            .assets
            .into_iter()
            .map(|a| models::Asset {
                id: a.id,
                product_id: a.product_id,
                asset_tag: a.asset_tag,
                serial_number: a.serial_number,
                purchase_date: a.purchase_date,
                purchase_price: a.purchase_price,
                vendor_id: a.vendor_id,
                barcode: a.barcode,
                notes: a.notes,
                location: a.location,
                condition: a.condition.into(),
                status: a.status.into(),
                warehouse_id: a.warehouse_id,
                created_at: now,
            })
            .collect(),
        gigs,
        gig_staff,
        gig_assets,
    };

    let auth_key = CliAuthTokenKey::new();
    let auth = AuthContext::create_for_cli(creator_id, "cli".to_string(), &auth_key);
    data_store.import_data(&auth, import)?;

    Ok(())
}
