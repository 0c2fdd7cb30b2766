use crate::auth_session::SessionToken;
use crate::data_store::authorization::{AuthContext, Privilege};
use crate::data_store::scheduling::{self, BookingConflict, ConflictingAssignment};
use crate::data_store::{
    models, AssetFilter, AssetId, BookingOutcome, GigId, GigStockStore, GigStockStoreFacade,
    StoreError, WarehouseId,
};
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;
const ACCOUNT_LOCK_MINUTES: i64 = 30;

/**
 * A mock [GigStockStore] implementation for testing.
 *
 * The simulated database consists of the [StoreMockData] structure with vectors of entities. These
 * can be directly modified by the tests.
 *
 * Passwords are not hashed: [GigStockStoreFacade::authenticate_with_password] compares the
 * cleartext password against the `password_hash` field of the stored user. Privilege checks are
 * performed like in the real store, so endpoint tests can cover role enforcement. The
 * [StoreMockData::next_error] attribute can be set to simulate a database error.
 */
#[derive(Default)]
pub struct StoreMock {
    pub data: Mutex<StoreMockData>,
}

impl GigStockStore for StoreMock {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn GigStockStoreFacade + 'a>, StoreError> {
        Ok(Box::new(StoreMockFacade { store: self }))
    }
}

/// A gig in the mock store, with the ids of its assigned staff members and assets
#[derive(Clone)]
pub struct MockGig {
    pub gig: models::Gig,
    pub staff_ids: Vec<Uuid>,
    pub asset_ids: Vec<Uuid>,
}

#[derive(Default)]
pub struct StoreMockData {
    pub users: Vec<models::User>,
    pub warehouses: Vec<models::Warehouse>,
    pub vendors: Vec<models::Vendor>,
    pub brands: Vec<models::Brand>,
    pub product_types: Vec<models::ProductType>,
    pub products: Vec<models::Product>,
    pub venues: Vec<models::Venue>,
    pub contacts: Vec<models::Contact>,
    pub assets: Vec<models::Asset>,
    pub gigs: Vec<MockGig>,
    /// If not none, the next call to a store facade method will return this error.
    pub next_error: Option<StoreError>,
}

struct StoreMockFacade<'a> {
    store: &'a StoreMock,
}

impl<'a> GigStockStoreFacade for StoreMockFacade<'a> {
    fn authenticate_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<models::User, StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let now = Utc::now();
        let user = data
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(StoreError::AuthenticationFailed)?;
        if let Some(lock_end) = user.locked_until {
            if lock_end > now {
                return Err(StoreError::AuthenticationFailed);
            }
        }
        if user.password_hash == password {
            user.failed_login_attempts = 0;
            user.locked_until = None;
            user.last_login = Some(now);
            Ok(user.clone())
        } else {
            user.failed_login_attempts += 1;
            if user.failed_login_attempts >= MAX_FAILED_LOGIN_ATTEMPTS {
                user.failed_login_attempts = 0;
                user.locked_until = Some(now + chrono::Duration::minutes(ACCOUNT_LOCK_MINUTES));
            }
            Err(StoreError::AuthenticationFailed)
        }
    }

    fn get_auth_context_for_session(
        &mut self,
        session_token: &SessionToken,
    ) -> Result<AuthContext, StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let user = data
            .users
            .iter()
            .find(|u| u.id == session_token.user_id())
            .ok_or(StoreError::NotExisting)?;
        Ok(AuthContext::create_for_session(
            user.id,
            user.name.clone(),
            user.role,
        ))
    }

    fn get_users(&mut self, auth: &AuthContext) -> Result<Vec<models::User>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut users = data.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    fn create_user(
        &mut self,
        auth: &AuthContext,
        user: models::NewUser,
    ) -> Result<models::User, StoreError> {
        auth.check_privilege(Privilege::ManageUsers)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::ConflictEntityExists);
        }
        let record = models::User {
            id: Uuid::now_v7(),
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            created_at: Utc::now(),
        };
        data.users.push(record.clone());
        Ok(record)
    }

    fn get_warehouses(
        &mut self,
        auth: &AuthContext,
    ) -> Result<Vec<models::WarehouseWithAssetCount>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut warehouses = data.warehouses.clone();
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(warehouses
            .into_iter()
            .map(|warehouse| models::WarehouseWithAssetCount {
                asset_count: data
                    .assets
                    .iter()
                    .filter(|a| a.warehouse_id == warehouse.id)
                    .count() as i64,
                warehouse,
            })
            .collect())
    }

    fn get_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<models::WarehouseDetails, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let warehouse = data
            .warehouses
            .iter()
            .find(|w| w.id == warehouse_id)
            .cloned()
            .ok_or(StoreError::NotExisting)?;
        let mut assets: Vec<models::Asset> = data
            .assets
            .iter()
            .filter(|a| a.warehouse_id == warehouse_id)
            .cloned()
            .collect();
        assets.sort_by(|a, b| a.asset_tag.cmp(&b.asset_tag));
        let assets = assets
            .into_iter()
            .map(|a| full_asset(&data, a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(models::WarehouseDetails { warehouse, assets })
    }

    fn create_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse: models::NewWarehouse,
    ) -> Result<models::Warehouse, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if data.warehouses.iter().any(|w| w.name == warehouse.name) {
            return Err(StoreError::ConflictEntityExists);
        }
        let record = models::Warehouse {
            id: Uuid::now_v7(),
            name: warehouse.name,
            description: warehouse.description,
            address1: warehouse.address1,
            address2: warehouse.address2,
            city: warehouse.city,
            state: warehouse.state,
            zip: warehouse.zip,
            created_by: auth.user_id(),
            created_at: Utc::now(),
        };
        data.warehouses.push(record.clone());
        Ok(record)
    }

    fn delete_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if data.assets.iter().any(|a| a.warehouse_id == warehouse_id) {
            return Err(StoreError::DependentEntitiesExist(
                "Cannot delete warehouse with assets".to_string(),
            ));
        }
        if !data.warehouses.iter().any(|w| w.id == warehouse_id) {
            return Err(StoreError::NotExisting);
        }
        data.warehouses.retain(|w| w.id != warehouse_id);
        Ok(())
    }

    fn get_vendors(&mut self, auth: &AuthContext) -> Result<Vec<models::Vendor>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut vendors = data.vendors.clone();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    fn create_vendor(
        &mut self,
        auth: &AuthContext,
        vendor: models::NewVendor,
    ) -> Result<models::Vendor, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let record = models::Vendor {
            id: Uuid::now_v7(),
            name: vendor.name,
            description: vendor.description,
            website: vendor.website,
            contact_email: vendor.contact_email,
            contact_phone: vendor.contact_phone,
        };
        data.vendors.push(record.clone());
        Ok(record)
    }

    fn get_products(&mut self, auth: &AuthContext) -> Result<Vec<models::FullProduct>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut products = data.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products
            .into_iter()
            .map(|p| full_product(&data, p))
            .collect())
    }

    fn create_product(
        &mut self,
        auth: &AuthContext,
        product: models::NewProduct,
    ) -> Result<models::FullProduct, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let record = models::Product {
            id: Uuid::now_v7(),
            name: product.name,
            brand_id: product.brand_id,
            type_id: product.type_id,
            description: product.description,
            model_number: product.model_number,
            default_price: product.default_price,
        };
        data.products.push(record.clone());
        Ok(full_product(&data, record))
    }

    fn get_assets_filtered(
        &mut self,
        auth: &AuthContext,
        filter: AssetFilter,
    ) -> Result<Vec<models::FullAsset>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut assets: Vec<models::Asset> = data
            .assets
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        assets.sort_by(|a, b| a.asset_tag.cmp(&b.asset_tag));
        assets.into_iter().map(|a| full_asset(&data, a)).collect()
    }

    fn get_asset(
        &mut self,
        auth: &AuthContext,
        asset_id: AssetId,
    ) -> Result<models::AssetDetails, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let asset = data
            .assets
            .iter()
            .find(|a| a.id == asset_id)
            .cloned()
            .ok_or(StoreError::NotExisting)?;
        let asset = full_asset(&data, asset)?;
        let mut assignments: Vec<models::AssignmentRecord> = data
            .gigs
            .iter()
            .filter(|g| g.asset_ids.contains(&asset_id))
            .map(|g| models::AssignmentRecord {
                gig_name: g.gig.name.clone(),
                begin: g.gig.begin,
                end: g.gig.end,
            })
            .collect();
        assignments.sort_by(|a, b| (b.begin, b.end).cmp(&(a.begin, a.end)));
        Ok(models::AssetDetails { asset, assignments })
    }

    fn create_asset(
        &mut self,
        auth: &AuthContext,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if data.assets.iter().any(|a| a.asset_tag == asset.asset_tag) {
            return Err(StoreError::ConflictEntityExists);
        }
        let record = models::Asset {
            id: Uuid::now_v7(),
            product_id: asset.product_id,
            asset_tag: asset.asset_tag,
            serial_number: asset.serial_number,
            purchase_date: asset.purchase_date,
            purchase_price: asset.purchase_price,
            vendor_id: asset.vendor_id,
            barcode: asset.barcode,
            notes: asset.notes,
            location: asset.location,
            condition: asset.condition,
            status: asset.status,
            warehouse_id: asset.warehouse_id,
            created_at: Utc::now(),
        };
        data.assets.push(record.clone());
        full_asset(&data, record)
    }

    fn update_asset(
        &mut self,
        auth: &AuthContext,
        asset_id: AssetId,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let existing = data
            .assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or(StoreError::NotExisting)?;
        existing.product_id = asset.product_id;
        existing.asset_tag = asset.asset_tag;
        existing.serial_number = asset.serial_number;
        existing.purchase_date = asset.purchase_date;
        existing.purchase_price = asset.purchase_price;
        existing.vendor_id = asset.vendor_id;
        existing.barcode = asset.barcode;
        existing.notes = asset.notes;
        existing.location = asset.location;
        existing.condition = asset.condition;
        existing.status = asset.status;
        existing.warehouse_id = asset.warehouse_id;
        let updated = existing.clone();
        full_asset(&data, updated)
    }

    fn delete_asset(&mut self, auth: &AuthContext, asset_id: AssetId) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let now = Utc::now();
        let has_active_assignments = data
            .gigs
            .iter()
            .any(|g| g.asset_ids.contains(&asset_id) && g.gig.end > now);
        if has_active_assignments {
            return Err(StoreError::DependentEntitiesExist(
                "Cannot delete asset that is assigned to active gigs".to_string(),
            ));
        }
        if !data.assets.iter().any(|a| a.id == asset_id) {
            return Err(StoreError::NotExisting);
        }
        data.assets.retain(|a| a.id != asset_id);
        for gig in data.gigs.iter_mut() {
            gig.asset_ids.retain(|a| *a != asset_id);
        }
        Ok(())
    }

    fn get_venues(&mut self, auth: &AuthContext) -> Result<Vec<models::Venue>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut venues = data.venues.clone();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(venues)
    }

    fn create_venue(
        &mut self,
        auth: &AuthContext,
        venue: models::NewVenue,
    ) -> Result<models::Venue, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let record = models::Venue {
            id: Uuid::now_v7(),
            name: venue.name,
            address1: venue.address1,
            address2: venue.address2,
            city: venue.city,
            state: venue.state,
            zip: venue.zip,
            phone: venue.phone,
            created_by: auth.user_id(),
            created_at: Utc::now(),
        };
        data.venues.push(record.clone());
        Ok(record)
    }

    fn get_contacts(&mut self, auth: &AuthContext) -> Result<Vec<models::Contact>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut contacts = data.contacts.clone();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    fn create_contact(
        &mut self,
        auth: &AuthContext,
        contact: models::NewContact,
    ) -> Result<models::Contact, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let record = models::Contact {
            id: Uuid::now_v7(),
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            notes: contact.notes,
            created_by: auth.user_id(),
            created_at: Utc::now(),
        };
        data.contacts.push(record.clone());
        Ok(record)
    }

    fn get_gigs(&mut self, auth: &AuthContext) -> Result<Vec<models::GigSummary>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let mut gigs = data.gigs.clone();
        gigs.sort_by(|a, b| {
            (b.gig.begin, b.gig.end)
                .cmp(&(a.gig.begin, a.gig.end))
                .then_with(|| a.gig.name.cmp(&b.gig.name))
        });
        Ok(gigs
            .into_iter()
            .map(|g| models::GigSummary {
                venue_name: g
                    .gig
                    .venue_id
                    .and_then(|v| data.venues.iter().find(|venue| venue.id == v))
                    .map(|venue| venue.name.clone()),
                contact_name: g
                    .gig
                    .contact_id
                    .and_then(|c| data.contacts.iter().find(|contact| contact.id == c))
                    .map(|contact| contact.name.clone()),
                staff_count: g.staff_ids.len() as i64,
                asset_count: g.asset_ids.len() as i64,
                gig: g.gig,
            })
            .collect())
    }

    fn get_gig(&mut self, auth: &AuthContext, gig_id: GigId) -> Result<models::FullGig, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let gig = data
            .gigs
            .iter()
            .find(|g| g.gig.id == gig_id)
            .cloned()
            .ok_or(StoreError::NotExisting)?;
        full_gig(&data, gig)
    }

    fn create_gig(
        &mut self,
        auth: &AuthContext,
        gig: models::NewGig,
    ) -> Result<BookingOutcome, StoreError> {
        auth.check_privilege(Privilege::ManageGigs)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if gig.begin >= gig.end {
            return Err(StoreError::InvalidInputData(
                "Gig start time must be before end time".to_string(),
            ));
        }

        let mut staff_ids = gig.staff_ids.clone();
        staff_ids.sort_unstable();
        staff_ids.dedup();
        let mut asset_ids = gig.asset_ids.clone();
        asset_ids.sort_unstable();
        asset_ids.dedup();

        let staff_candidates = data
            .gigs
            .iter()
            .filter(|g| scheduling::overlaps(g.gig.begin, g.gig.end, gig.begin, gig.end))
            .flat_map(|g| {
                g.staff_ids
                    .iter()
                    .filter(|user_id| staff_ids.contains(user_id))
                    .map(|user_id| ConflictingAssignment {
                        resource_label: data
                            .users
                            .iter()
                            .find(|u| u.id == *user_id)
                            .map(|u| u.name.clone())
                            .unwrap_or_default(),
                        gig_name: g.gig.name.clone(),
                        gig_begin: g.gig.begin,
                        gig_end: g.gig.end,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        if let Some(conflict) = scheduling::first_conflict(staff_candidates) {
            return Ok(BookingOutcome::Conflict(BookingConflict::staff(conflict)));
        }

        let asset_candidates = data
            .gigs
            .iter()
            .filter(|g| scheduling::overlaps(g.gig.begin, g.gig.end, gig.begin, gig.end))
            .flat_map(|g| {
                g.asset_ids
                    .iter()
                    .filter(|asset_id| asset_ids.contains(asset_id))
                    .map(|asset_id| ConflictingAssignment {
                        resource_label: data
                            .assets
                            .iter()
                            .find(|a| a.id == *asset_id)
                            .map(|a| a.asset_tag.clone())
                            .unwrap_or_default(),
                        gig_name: g.gig.name.clone(),
                        gig_begin: g.gig.begin,
                        gig_end: g.gig.end,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        if let Some(conflict) = scheduling::first_conflict(asset_candidates) {
            return Ok(BookingOutcome::Conflict(BookingConflict::asset(conflict)));
        }

        let record = MockGig {
            gig: models::Gig {
                id: Uuid::now_v7(),
                name: gig.name,
                begin: gig.begin,
                end: gig.end,
                venue_id: gig.venue_id,
                contact_id: gig.contact_id,
                notes: gig.notes,
                created_by: auth.user_id(),
                created_at: Utc::now(),
            },
            staff_ids,
            asset_ids,
        };
        data.gigs.push(record.clone());
        Ok(BookingOutcome::Booked(full_gig(&data, record)?))
    }

    fn delete_gig(&mut self, auth: &AuthContext, gig_id: GigId) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageGigs)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        if !data.gigs.iter().any(|g| g.gig.id == gig_id) {
            return Err(StoreError::NotExisting);
        }
        data.gigs.retain(|g| g.gig.id != gig_id);
        Ok(())
    }

    fn get_report_overview(
        &mut self,
        auth: &AuthContext,
    ) -> Result<models::ReportOverview, StoreError> {
        auth.check_privilege(Privilege::ViewReports)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }

        let mut assets_by_status: std::collections::BTreeMap<String, i64> = [
            models::AssetStatus::Available,
            models::AssetStatus::InUse,
            models::AssetStatus::Maintenance,
            models::AssetStatus::Retired,
        ]
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
        let mut assets_by_condition: std::collections::BTreeMap<String, i64> = [
            models::AssetCondition::Excellent,
            models::AssetCondition::Good,
            models::AssetCondition::Fair,
            models::AssetCondition::Poor,
        ]
        .iter()
        .map(|c| (c.as_str().to_string(), 0))
        .collect();
        for asset in data.assets.iter() {
            *assets_by_status
                .entry(asset.status.as_str().to_string())
                .or_insert(0) += 1;
            *assets_by_condition
                .entry(asset.condition.as_str().to_string())
                .or_insert(0) += 1;
        }

        let now = Utc::now();
        Ok(models::ReportOverview {
            total_assets: data.assets.len() as i64,
            available_assets: data
                .assets
                .iter()
                .filter(|a| a.status == models::AssetStatus::Available)
                .count() as i64,
            assets_in_use: data
                .assets
                .iter()
                .filter(|a| a.status == models::AssetStatus::InUse)
                .count() as i64,
            total_gigs: data.gigs.len() as i64,
            active_gigs: data.gigs.iter().filter(|g| g.gig.end > now).count() as i64,
            total_users: if auth.has_privilege(Privilege::ManageUsers) {
                Some(data.users.len() as i64)
            } else {
                None
            },
            assets_by_status,
            assets_by_condition,
        })
    }

    fn import_data(
        &mut self,
        auth: &AuthContext,
        import: models::DataImport,
    ) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageUsers)?;
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        let now = Utc::now();
        data.users.extend(import.users.into_iter().map(|user| {
            models::User {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                password_hash: user.password,
                failed_login_attempts: 0,
                locked_until: None,
                last_login: None,
                created_at: now,
            }
        }));
        data.warehouses.extend(import.warehouses);
        data.vendors.extend(import.vendors);
        data.brands.extend(import.brands);
        data.product_types.extend(import.product_types);
        data.products.extend(import.products);
        data.venues.extend(import.venues);
        data.contacts.extend(import.contacts);
        data.assets.extend(import.assets);
        for gig in import.gigs {
            let staff_ids = import
                .gig_staff
                .iter()
                .filter(|m| m.gig_id == gig.id)
                .map(|m| m.user_id)
                .collect();
            let asset_ids = import
                .gig_assets
                .iter()
                .filter(|m| m.gig_id == gig.id)
                .map(|m| m.asset_id)
                .collect();
            data.gigs.push(MockGig {
                gig,
                staff_ids,
                asset_ids,
            });
        }
        Ok(())
    }
}

fn full_product(data: &StoreMockData, product: models::Product) -> models::FullProduct {
    models::FullProduct {
        brand: product
            .brand_id
            .and_then(|b| data.brands.iter().find(|brand| brand.id == b).cloned()),
        product_type: product
            .type_id
            .and_then(|t| data.product_types.iter().find(|pt| pt.id == t).cloned()),
        product,
    }
}

fn full_asset(data: &StoreMockData, asset: models::Asset) -> Result<models::FullAsset, StoreError> {
    let product = data
        .products
        .iter()
        .find(|p| p.id == asset.product_id)
        .cloned()
        .ok_or(StoreError::NotExisting)?;
    let warehouse = data
        .warehouses
        .iter()
        .find(|w| w.id == asset.warehouse_id)
        .cloned()
        .ok_or(StoreError::NotExisting)?;
    let vendor = asset
        .vendor_id
        .and_then(|v| data.vendors.iter().find(|vendor| vendor.id == v).cloned());
    Ok(models::FullAsset {
        product: full_product(data, product),
        warehouse,
        vendor,
        asset,
    })
}

fn full_gig(data: &StoreMockData, gig: MockGig) -> Result<models::FullGig, StoreError> {
    let venue = gig
        .gig
        .venue_id
        .and_then(|v| data.venues.iter().find(|venue| venue.id == v).cloned());
    let contact = gig
        .gig
        .contact_id
        .and_then(|c| data.contacts.iter().find(|contact| contact.id == c).cloned());
    let mut staff: Vec<models::User> = data
        .users
        .iter()
        .filter(|u| gig.staff_ids.contains(&u.id))
        .cloned()
        .collect();
    staff.sort_by(|a, b| a.name.cmp(&b.name));
    let mut assets: Vec<models::Asset> = data
        .assets
        .iter()
        .filter(|a| gig.asset_ids.contains(&a.id))
        .cloned()
        .collect();
    assets.sort_by(|a, b| a.asset_tag.cmp(&b.asset_tag));
    let assets = assets
        .into_iter()
        .map(|a| full_asset(data, a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(models::FullGig {
        gig: gig.gig,
        venue,
        contact,
        staff,
        assets,
    })
}
