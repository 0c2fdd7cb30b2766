use super::{
    models, password, schema, AssetFilter, AssetId, BookingOutcome, GigId, GigStockStore,
    GigStockStoreFacade, StoreError, WarehouseId,
};
use crate::auth_session::SessionToken;
use crate::data_store::authorization::{AuthContext, Privilege};
use crate::data_store::scheduling::{self, BookingConflict, ConflictingAssignment};
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::expression::AsExpression;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

/// Number of consecutive failed login attempts after which an account is locked
const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;
/// Duration of an account lock in minutes
const ACCOUNT_LOCK_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct PgDataStore {
    pool: diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let connection_manager = diesel::r2d2::ConnectionManager::<PgConnection>::new(database_url);
        Ok(Self {
            pool: diesel::r2d2::Pool::builder()
                .test_on_check_out(true)
                .min_idle(Some(2))
                .build(connection_manager)?,
        })
    }
}

impl GigStockStore for PgDataStore {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn GigStockStoreFacade + 'a>, StoreError> {
        Ok(Box::new(PgDataStoreFacade::with_pooled_connection(
            self.pool.get()?,
        )))
    }
}

pub struct PgDataStoreFacade {
    connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStoreFacade {
    pub fn with_pooled_connection(
        connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
    ) -> Self {
        Self { connection }
    }
}

impl GigStockStoreFacade for PgDataStoreFacade {
    fn authenticate_with_password(
        &mut self,
        the_email: &str,
        the_password: &str,
    ) -> Result<models::User, StoreError> {
        use schema::users::dsl::*;

        self.connection.transaction(|connection| {
            let user = users
                .filter(email.eq(the_email))
                .select(models::User::as_select())
                .first::<models::User>(connection)
                .optional()?;
            let Some(user) = user else {
                return Err(StoreError::AuthenticationFailed);
            };

            let now = Utc::now();
            if let Some(lock_end) = user.locked_until {
                if lock_end > now {
                    return Err(StoreError::AuthenticationFailed);
                }
            }

            if password::verify_password(the_password, &user.password_hash) {
                let user = diesel::update(users.filter(id.eq(user.id)))
                    .set((
                        failed_login_attempts.eq(0),
                        locked_until.eq(None::<DateTime<Utc>>),
                        last_login.eq(now),
                    ))
                    .returning(models::User::as_returning())
                    .get_result::<models::User>(connection)?;
                Ok(user)
            } else {
                let attempts = user.failed_login_attempts + 1;
                if attempts >= MAX_FAILED_LOGIN_ATTEMPTS {
                    // Lock the account and reset the counter, so the user gets a fresh set of
                    // attempts when the lock expires.
                    diesel::update(users.filter(id.eq(user.id)))
                        .set((
                            failed_login_attempts.eq(0),
                            locked_until
                                .eq(now + chrono::Duration::minutes(ACCOUNT_LOCK_MINUTES)),
                        ))
                        .execute(connection)?;
                } else {
                    diesel::update(users.filter(id.eq(user.id)))
                        .set(failed_login_attempts.eq(attempts))
                        .execute(connection)?;
                }
                Err(StoreError::AuthenticationFailed)
            }
        })
    }

    fn get_auth_context_for_session(
        &mut self,
        session_token: &SessionToken,
    ) -> Result<AuthContext, StoreError> {
        use schema::users::dsl::*;

        let user = users
            .filter(id.eq(session_token.user_id()))
            .select(models::User::as_select())
            .first::<models::User>(&mut self.connection)?;
        Ok(AuthContext::create_for_session(
            user.id, user.name, user.role,
        ))
    }

    fn get_users(&mut self, auth: &AuthContext) -> Result<Vec<models::User>, StoreError> {
        use schema::users::dsl::*;
        auth.check_privilege(Privilege::ShowInventory)?;

        users
            .order_by(name.asc())
            .select(models::User::as_select())
            .load::<models::User>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn create_user(
        &mut self,
        auth: &AuthContext,
        user: models::NewUser,
    ) -> Result<models::User, StoreError> {
        auth.check_privilege(Privilege::ManageUsers)?;

        let record = models::User {
            id: Uuid::now_v7(),
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: password::hash_password(&user.password)?,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            created_at: Utc::now(),
        };
        diesel::insert_into(schema::users::table)
            .values(&record)
            .execute(&mut self.connection)?;
        Ok(record)
    }

    fn get_warehouses(
        &mut self,
        auth: &AuthContext,
    ) -> Result<Vec<models::WarehouseWithAssetCount>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection.transaction(|connection| {
            let the_warehouses = schema::warehouses::table
                .order_by(schema::warehouses::name.asc())
                .select(models::Warehouse::as_select())
                .load::<models::Warehouse>(connection)?;

            let counts: HashMap<Uuid, i64> = schema::assets::table
                .group_by(schema::assets::warehouse_id)
                .select((schema::assets::warehouse_id, diesel::dsl::count_star()))
                .load::<(Uuid, i64)>(connection)?
                .into_iter()
                .collect();

            Ok(the_warehouses
                .into_iter()
                .map(|warehouse| {
                    let asset_count = counts.get(&warehouse.id).copied().unwrap_or(0);
                    models::WarehouseWithAssetCount {
                        warehouse,
                        asset_count,
                    }
                })
                .collect())
        })
    }

    fn get_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<models::WarehouseDetails, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection.transaction(|connection| {
            let warehouse = schema::warehouses::table
                .find(warehouse_id)
                .select(models::Warehouse::as_select())
                .first::<models::Warehouse>(connection)?;

            let assets = load_full_assets(
                connection,
                &AssetFilter {
                    status: None,
                    warehouse: Some(warehouse_id),
                },
            )?;
            Ok(models::WarehouseDetails { warehouse, assets })
        })
    }

    fn create_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse: models::NewWarehouse,
    ) -> Result<models::Warehouse, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

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
        diesel::insert_into(schema::warehouses::table)
            .values(&record)
            .execute(&mut self.connection)?;
        Ok(record)
    }

    fn delete_warehouse(
        &mut self,
        auth: &AuthContext,
        warehouse_id: WarehouseId,
    ) -> Result<(), StoreError> {
        use schema::warehouses::dsl::*;
        auth.check_privilege(Privilege::ManageInventory)?;

        self.connection.transaction(|connection| {
            let has_assets = diesel::dsl::select(exists(
                schema::assets::table.filter(schema::assets::warehouse_id.eq(warehouse_id)),
            ))
            .get_result::<bool>(connection)?;
            if has_assets {
                return Err(StoreError::DependentEntitiesExist(
                    "Cannot delete warehouse with assets".to_string(),
                ));
            }

            let count = diesel::delete(warehouses.filter(id.eq(warehouse_id))).execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            Ok(())
        })
    }

    fn get_vendors(&mut self, auth: &AuthContext) -> Result<Vec<models::Vendor>, StoreError> {
        use schema::vendors::dsl::*;
        auth.check_privilege(Privilege::ShowInventory)?;

        vendors
            .order_by(name.asc())
            .select(models::Vendor::as_select())
            .load::<models::Vendor>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn create_vendor(
        &mut self,
        auth: &AuthContext,
        vendor: models::NewVendor,
    ) -> Result<models::Vendor, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

        let record = models::Vendor {
            id: Uuid::now_v7(),
            name: vendor.name,
            description: vendor.description,
            website: vendor.website,
            contact_email: vendor.contact_email,
            contact_phone: vendor.contact_phone,
        };
        diesel::insert_into(schema::vendors::table)
            .values(&record)
            .execute(&mut self.connection)?;
        Ok(record)
    }

    fn get_products(&mut self, auth: &AuthContext) -> Result<Vec<models::FullProduct>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection.transaction(|connection| {
            let the_products = schema::products::table
                .order_by(schema::products::name.asc())
                .select(models::Product::as_select())
                .load::<models::Product>(connection)?;
            assemble_full_products(connection, the_products)
        })
    }

    fn create_product(
        &mut self,
        auth: &AuthContext,
        product: models::NewProduct,
    ) -> Result<models::FullProduct, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

        self.connection.transaction(|connection| {
            let record = models::Product {
                id: Uuid::now_v7(),
                name: product.name,
                brand_id: product.brand_id,
                type_id: product.type_id,
                description: product.description,
                model_number: product.model_number,
                default_price: product.default_price,
            };
            diesel::insert_into(schema::products::table)
                .values(&record)
                .execute(connection)?;

            let mut full = assemble_full_products(connection, vec![record])?;
            full.pop().ok_or(StoreError::NotExisting)
        })
    }

    fn get_assets_filtered(
        &mut self,
        auth: &AuthContext,
        filter: AssetFilter,
    ) -> Result<Vec<models::FullAsset>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection
            .transaction(|connection| load_full_assets(connection, &filter))
    }

    fn get_asset(
        &mut self,
        auth: &AuthContext,
        asset_id: AssetId,
    ) -> Result<models::AssetDetails, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection.transaction(|connection| {
            let asset = load_full_asset(connection, asset_id)?;

            let assignments = schema::gig_assets::table
                .inner_join(schema::gigs::table)
                .filter(schema::gig_assets::asset_id.eq(asset_id))
                .order_by((schema::gigs::begin.desc(), schema::gigs::end.desc()))
                .select((schema::gigs::name, schema::gigs::begin, schema::gigs::end))
                .load::<models::AssignmentRecord>(connection)?;

            Ok(models::AssetDetails { asset, assignments })
        })
    }

    fn create_asset(
        &mut self,
        auth: &AuthContext,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

        self.connection.transaction(|connection| {
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
            diesel::insert_into(schema::assets::table)
                .values(&record)
                .execute(connection)?;
            load_full_asset(connection, record.id)
        })
    }

    fn update_asset(
        &mut self,
        auth: &AuthContext,
        the_asset_id: AssetId,
        asset: models::NewAsset,
    ) -> Result<models::FullAsset, StoreError> {
        use schema::assets::dsl::*;
        auth.check_privilege(Privilege::ManageInventory)?;

        self.connection.transaction(|connection| {
            let count = diesel::update(assets.filter(id.eq(the_asset_id)))
                .set((
                    product_id.eq(asset.product_id),
                    asset_tag.eq(asset.asset_tag),
                    serial_number.eq(asset.serial_number),
                    purchase_date.eq(asset.purchase_date),
                    purchase_price.eq(asset.purchase_price),
                    vendor_id.eq(asset.vendor_id),
                    barcode.eq(asset.barcode),
                    notes.eq(asset.notes),
                    location.eq(asset.location),
                    condition.eq(asset.condition),
                    status.eq(asset.status),
                    warehouse_id.eq(asset.warehouse_id),
                ))
                .execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            load_full_asset(connection, the_asset_id)
        })
    }

    fn delete_asset(&mut self, auth: &AuthContext, asset_id: AssetId) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

        self.connection.transaction(|connection| {
            let now = Utc::now();
            let has_active_assignments = diesel::dsl::select(exists(
                schema::gig_assets::table
                    .inner_join(schema::gigs::table)
                    .filter(schema::gig_assets::asset_id.eq(asset_id))
                    .filter(schema::gigs::end.gt(now)),
            ))
            .get_result::<bool>(connection)?;
            if has_active_assignments {
                return Err(StoreError::DependentEntitiesExist(
                    "Cannot delete asset that is assigned to active gigs".to_string(),
                ));
            }

            diesel::delete(
                schema::gig_assets::table.filter(schema::gig_assets::asset_id.eq(asset_id)),
            )
            .execute(connection)?;
            let count =
                diesel::delete(schema::assets::table.filter(schema::assets::id.eq(asset_id)))
                    .execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            Ok(())
        })
    }

    fn get_venues(&mut self, auth: &AuthContext) -> Result<Vec<models::Venue>, StoreError> {
        use schema::venues::dsl::*;
        auth.check_privilege(Privilege::ShowInventory)?;

        venues
            .order_by(name.asc())
            .select(models::Venue::as_select())
            .load::<models::Venue>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn create_venue(
        &mut self,
        auth: &AuthContext,
        venue: models::NewVenue,
    ) -> Result<models::Venue, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

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
        diesel::insert_into(schema::venues::table)
            .values(&record)
            .execute(&mut self.connection)?;
        Ok(record)
    }

    fn get_contacts(&mut self, auth: &AuthContext) -> Result<Vec<models::Contact>, StoreError> {
        use schema::contacts::dsl::*;
        auth.check_privilege(Privilege::ShowInventory)?;

        contacts
            .order_by(name.asc())
            .select(models::Contact::as_select())
            .load::<models::Contact>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn create_contact(
        &mut self,
        auth: &AuthContext,
        contact: models::NewContact,
    ) -> Result<models::Contact, StoreError> {
        auth.check_privilege(Privilege::ManageInventory)?;

        let record = models::Contact {
            id: Uuid::now_v7(),
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            notes: contact.notes,
            created_by: auth.user_id(),
            created_at: Utc::now(),
        };
        diesel::insert_into(schema::contacts::table)
            .values(&record)
            .execute(&mut self.connection)?;
        Ok(record)
    }

    fn get_gigs(&mut self, auth: &AuthContext) -> Result<Vec<models::GigSummary>, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection.transaction(|connection| {
            let the_gigs = schema::gigs::table
                .order_by((
                    schema::gigs::begin.desc(),
                    schema::gigs::end.desc(),
                    schema::gigs::name.asc(),
                ))
                .select(models::Gig::as_select())
                .load::<models::Gig>(connection)?;

            let venue_names: HashMap<Uuid, String> = schema::venues::table
                .select((schema::venues::id, schema::venues::name))
                .load::<(Uuid, String)>(connection)?
                .into_iter()
                .collect();
            let contact_names: HashMap<Uuid, String> = schema::contacts::table
                .select((schema::contacts::id, schema::contacts::name))
                .load::<(Uuid, String)>(connection)?
                .into_iter()
                .collect();

            let staff_counts: HashMap<Uuid, i64> = schema::gig_staff::table
                .group_by(schema::gig_staff::gig_id)
                .select((schema::gig_staff::gig_id, diesel::dsl::count_star()))
                .load::<(Uuid, i64)>(connection)?
                .into_iter()
                .collect();
            let asset_counts: HashMap<Uuid, i64> = schema::gig_assets::table
                .group_by(schema::gig_assets::gig_id)
                .select((schema::gig_assets::gig_id, diesel::dsl::count_star()))
                .load::<(Uuid, i64)>(connection)?
                .into_iter()
                .collect();

            Ok(the_gigs
                .into_iter()
                .map(|gig| models::GigSummary {
                    venue_name: gig.venue_id.and_then(|v| venue_names.get(&v).cloned()),
                    contact_name: gig.contact_id.and_then(|c| contact_names.get(&c).cloned()),
                    staff_count: staff_counts.get(&gig.id).copied().unwrap_or(0),
                    asset_count: asset_counts.get(&gig.id).copied().unwrap_or(0),
                    gig,
                })
                .collect())
        })
    }

    fn get_gig(
        &mut self,
        auth: &AuthContext,
        gig_id: GigId,
    ) -> Result<models::FullGig, StoreError> {
        auth.check_privilege(Privilege::ShowInventory)?;

        self.connection
            .transaction(|connection| load_full_gig(connection, gig_id))
    }

    fn create_gig(
        &mut self,
        auth: &AuthContext,
        gig: models::NewGig,
    ) -> Result<BookingOutcome, StoreError> {
        auth.check_privilege(Privilege::ManageGigs)?;

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

        // The conflict check and the inserts must not be interleaved with a concurrent booking of
        // the same staff member or asset, so everything runs in one serializable transaction. A
        // serialization failure surfaces as StoreError::TransactionConflict and the client may
        // retry.
        self.connection
            .build_transaction()
            .serializable()
            .run(|connection| {
                if !staff_ids.is_empty() {
                    let staff_candidates = schema::gig_staff::table
                        .inner_join(schema::gigs::table)
                        .inner_join(schema::users::table)
                        .filter(schema::gig_staff::user_id.eq_any(&staff_ids))
                        .filter(schema::gigs::begin.lt(gig.end))
                        .filter(schema::gigs::end.gt(gig.begin))
                        .select((
                            schema::users::name,
                            schema::gigs::name,
                            schema::gigs::begin,
                            schema::gigs::end,
                        ))
                        .load::<(String, String, DateTime<Utc>, DateTime<Utc>)>(connection)?
                        .into_iter()
                        .map(|(resource_label, gig_name, gig_begin, gig_end)| {
                            ConflictingAssignment {
                                resource_label,
                                gig_name,
                                gig_begin,
                                gig_end,
                            }
                        })
                        .collect();
                    if let Some(conflict) = scheduling::first_conflict(staff_candidates) {
                        return Ok(BookingOutcome::Conflict(BookingConflict::staff(conflict)));
                    }
                }

                if !asset_ids.is_empty() {
                    let asset_candidates = schema::gig_assets::table
                        .inner_join(schema::gigs::table)
                        .inner_join(schema::assets::table)
                        .filter(schema::gig_assets::asset_id.eq_any(&asset_ids))
                        .filter(schema::gigs::begin.lt(gig.end))
                        .filter(schema::gigs::end.gt(gig.begin))
                        .select((
                            schema::assets::asset_tag,
                            schema::gigs::name,
                            schema::gigs::begin,
                            schema::gigs::end,
                        ))
                        .load::<(String, String, DateTime<Utc>, DateTime<Utc>)>(connection)?
                        .into_iter()
                        .map(|(resource_label, gig_name, gig_begin, gig_end)| {
                            ConflictingAssignment {
                                resource_label,
                                gig_name,
                                gig_begin,
                                gig_end,
                            }
                        })
                        .collect();
                    if let Some(conflict) = scheduling::first_conflict(asset_candidates) {
                        return Ok(BookingOutcome::Conflict(BookingConflict::asset(conflict)));
                    }
                }

                let the_gig = models::Gig {
                    id: Uuid::now_v7(),
                    name: gig.name.clone(),
                    begin: gig.begin,
                    end: gig.end,
                    venue_id: gig.venue_id,
                    contact_id: gig.contact_id,
                    notes: gig.notes.clone(),
                    created_by: auth.user_id(),
                    created_at: Utc::now(),
                };
                diesel::insert_into(schema::gigs::table)
                    .values(&the_gig)
                    .execute(connection)?;

                let staff_rows: Vec<models::GigStaffMapping> = staff_ids
                    .iter()
                    .map(|user_id| models::GigStaffMapping {
                        gig_id: the_gig.id,
                        user_id: *user_id,
                    })
                    .collect();
                diesel::insert_into(schema::gig_staff::table)
                    .values(&staff_rows)
                    .execute(connection)?;

                let asset_rows: Vec<models::GigAssetMapping> = asset_ids
                    .iter()
                    .map(|asset_id| models::GigAssetMapping {
                        gig_id: the_gig.id,
                        asset_id: *asset_id,
                        assigned_by: auth.user_id(),
                    })
                    .collect();
                diesel::insert_into(schema::gig_assets::table)
                    .values(&asset_rows)
                    .execute(connection)?;

                Ok(BookingOutcome::Booked(load_full_gig(
                    connection, the_gig.id,
                )?))
            })
    }

    fn delete_gig(&mut self, auth: &AuthContext, gig_id: GigId) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageGigs)?;

        self.connection.transaction(|connection| {
            diesel::delete(
                schema::gig_staff::table.filter(schema::gig_staff::gig_id.eq(gig_id)),
            )
            .execute(connection)?;
            diesel::delete(
                schema::gig_assets::table.filter(schema::gig_assets::gig_id.eq(gig_id)),
            )
            .execute(connection)?;
            let count = diesel::delete(schema::gigs::table.filter(schema::gigs::id.eq(gig_id)))
                .execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            Ok(())
        })
    }

    fn get_report_overview(
        &mut self,
        auth: &AuthContext,
    ) -> Result<models::ReportOverview, StoreError> {
        auth.check_privilege(Privilege::ViewReports)?;

        self.connection.transaction(|connection| {
            let total_assets = schema::assets::table
                .count()
                .get_result::<i64>(connection)?;

            let mut assets_by_status: std::collections::BTreeMap<String, i64> = [
                models::AssetStatus::Available,
                models::AssetStatus::InUse,
                models::AssetStatus::Maintenance,
                models::AssetStatus::Retired,
            ]
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
            for (status, count) in schema::assets::table
                .group_by(schema::assets::status)
                .select((schema::assets::status, diesel::dsl::count_star()))
                .load::<(models::AssetStatus, i64)>(connection)?
            {
                assets_by_status.insert(status.as_str().to_string(), count);
            }

            let mut assets_by_condition: std::collections::BTreeMap<String, i64> = [
                models::AssetCondition::Excellent,
                models::AssetCondition::Good,
                models::AssetCondition::Fair,
                models::AssetCondition::Poor,
            ]
            .iter()
            .map(|c| (c.as_str().to_string(), 0))
            .collect();
            for (condition, count) in schema::assets::table
                .group_by(schema::assets::condition)
                .select((schema::assets::condition, diesel::dsl::count_star()))
                .load::<(models::AssetCondition, i64)>(connection)?
            {
                assets_by_condition.insert(condition.as_str().to_string(), count);
            }

            let now = Utc::now();
            let total_gigs = schema::gigs::table.count().get_result::<i64>(connection)?;
            let active_gigs = schema::gigs::table
                .filter(schema::gigs::end.gt(now))
                .count()
                .get_result::<i64>(connection)?;

            let total_users = if auth.has_privilege(Privilege::ManageUsers) {
                Some(schema::users::table.count().get_result::<i64>(connection)?)
            } else {
                None
            };

            Ok(models::ReportOverview {
                total_assets,
                available_assets: assets_by_status
                    .get(models::AssetStatus::Available.as_str())
                    .copied()
                    .unwrap_or(0),
                assets_in_use: assets_by_status
                    .get(models::AssetStatus::InUse.as_str())
                    .copied()
                    .unwrap_or(0),
                total_gigs,
                active_gigs,
                total_users,
                assets_by_status,
                assets_by_condition,
            })
        })
    }

    fn import_data(
        &mut self,
        auth: &AuthContext,
        data: models::DataImport,
    ) -> Result<(), StoreError> {
        auth.check_privilege(Privilege::ManageUsers)?;
        let now = chrono::Utc::now();
        let users = data
            .users
            .into_iter()
            .map(|user| {
                Ok(models::User {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: user.role,
                    password_hash: password::hash_password(&user.password)?,
                    failed_login_attempts: 0,
                    locked_until: None,
                    last_login: None,
                    created_at: now,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.connection.transaction(|connection| {
            diesel::insert_into(schema::users::table)
                .values(&users)
                .execute(connection)?;
            diesel::insert_into(schema::warehouses::table)
                .values(&data.warehouses)
                .execute(connection)?;
            diesel::insert_into(schema::vendors::table)
                .values(&data.vendors)
                .execute(connection)?;
            diesel::insert_into(schema::brands::table)
                .values(&data.brands)
                .execute(connection)?;
            diesel::insert_into(schema::product_types::table)
                .values(&data.product_types)
                .execute(connection)?;
            diesel::insert_into(schema::products::table)
                .values(&data.products)
                .execute(connection)?;
            diesel::insert_into(schema::venues::table)
                .values(&data.venues)
                .execute(connection)?;
            diesel::insert_into(schema::contacts::table)
                .values(&data.contacts)
                .execute(connection)?;
            diesel::insert_into(schema::assets::table)
                .values(&data.assets)
                .execute(connection)?;
            diesel::insert_into(schema::gigs::table)
                .values(&data.gigs)
                .execute(connection)?;
            diesel::insert_into(schema::gig_staff::table)
                .values(&data.gig_staff)
                .execute(connection)?;
            diesel::insert_into(schema::gig_assets::table)
                .values(&data.gig_assets)
                .execute(connection)?;
            Ok(())
        })
    }
}

type BoxedBoolExpression<'a, Table> =
    Box<dyn BoxableExpression<Table, diesel::pg::Pg, SqlType = diesel::sql_types::Bool> + 'a>;

fn asset_filter_to_sql<'a>(filter: &AssetFilter) -> BoxedBoolExpression<'a, schema::assets::table> {
    use schema::assets::dsl::*;

    let mut expression: BoxedBoolExpression<'a, schema::assets::table> =
        Box::new(diesel::dsl::sql::<diesel::sql_types::Bool>("TRUE"));
    if let Some(the_status) = filter.status {
        expression = Box::new(expression.as_expression().and(status.eq(the_status)));
    }
    if let Some(the_warehouse_id) = filter.warehouse {
        expression = Box::new(expression.as_expression().and(warehouse_id.eq(the_warehouse_id)));
    }
    expression
}

fn load_full_assets(
    connection: &mut PgConnection,
    filter: &AssetFilter,
) -> Result<Vec<models::FullAsset>, StoreError> {
    let the_assets = schema::assets::table
        .filter(asset_filter_to_sql(filter))
        .order_by(schema::assets::asset_tag.asc())
        .select(models::Asset::as_select())
        .load::<models::Asset>(connection)?;
    assemble_full_assets(connection, the_assets)
}

fn load_full_asset(
    connection: &mut PgConnection,
    asset_id: AssetId,
) -> Result<models::FullAsset, StoreError> {
    let asset = schema::assets::table
        .find(asset_id)
        .select(models::Asset::as_select())
        .first::<models::Asset>(connection)?;
    let mut full = assemble_full_assets(connection, vec![asset])?;
    full.pop().ok_or(StoreError::NotExisting)
}

/// Resolve the product (with brand and product type), warehouse and vendor references of the given
/// asset records.
///
/// The asset order is preserved.
fn assemble_full_assets(
    connection: &mut PgConnection,
    the_assets: Vec<models::Asset>,
) -> Result<Vec<models::FullAsset>, StoreError> {
    let product_ids: Vec<Uuid> = the_assets.iter().map(|a| a.product_id).collect();
    let the_products = schema::products::table
        .filter(schema::products::id.eq_any(&product_ids))
        .select(models::Product::as_select())
        .load::<models::Product>(connection)?;
    let full_products: HashMap<Uuid, models::FullProduct> =
        assemble_full_products(connection, the_products)?
            .into_iter()
            .map(|p| (p.product.id, p))
            .collect();

    let warehouse_ids: Vec<Uuid> = the_assets.iter().map(|a| a.warehouse_id).collect();
    let the_warehouses: HashMap<Uuid, models::Warehouse> = schema::warehouses::table
        .filter(schema::warehouses::id.eq_any(&warehouse_ids))
        .select(models::Warehouse::as_select())
        .load::<models::Warehouse>(connection)?
        .into_iter()
        .map(|w| (w.id, w))
        .collect();

    let vendor_ids: Vec<Uuid> = the_assets.iter().filter_map(|a| a.vendor_id).collect();
    let the_vendors: HashMap<Uuid, models::Vendor> = schema::vendors::table
        .filter(schema::vendors::id.eq_any(&vendor_ids))
        .select(models::Vendor::as_select())
        .load::<models::Vendor>(connection)?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    the_assets
        .into_iter()
        .map(|asset| {
            let product = full_products.get(&asset.product_id).cloned().ok_or_else(|| {
                StoreError::InvalidDataInDatabase(format!(
                    "Product {} of asset {} does not exist",
                    asset.product_id, asset.id
                ))
            })?;
            let warehouse = the_warehouses.get(&asset.warehouse_id).cloned().ok_or_else(|| {
                StoreError::InvalidDataInDatabase(format!(
                    "Warehouse {} of asset {} does not exist",
                    asset.warehouse_id, asset.id
                ))
            })?;
            let vendor = asset
                .vendor_id
                .and_then(|vendor_id| the_vendors.get(&vendor_id).cloned());
            Ok(models::FullAsset {
                asset,
                product,
                warehouse,
                vendor,
            })
        })
        .collect()
}

/// Resolve the brand and product type references of the given product records, preserving order.
fn assemble_full_products(
    connection: &mut PgConnection,
    the_products: Vec<models::Product>,
) -> Result<Vec<models::FullProduct>, StoreError> {
    let brand_ids: Vec<Uuid> = the_products.iter().filter_map(|p| p.brand_id).collect();
    let the_brands: HashMap<Uuid, models::Brand> = schema::brands::table
        .filter(schema::brands::id.eq_any(&brand_ids))
        .select(models::Brand::as_select())
        .load::<models::Brand>(connection)?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let type_ids: Vec<Uuid> = the_products.iter().filter_map(|p| p.type_id).collect();
    let the_types: HashMap<Uuid, models::ProductType> = schema::product_types::table
        .filter(schema::product_types::id.eq_any(&type_ids))
        .select(models::ProductType::as_select())
        .load::<models::ProductType>(connection)?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(the_products
        .into_iter()
        .map(|product| models::FullProduct {
            brand: product.brand_id.and_then(|b| the_brands.get(&b).cloned()),
            product_type: product.type_id.and_then(|t| the_types.get(&t).cloned()),
            product,
        })
        .collect())
}

fn load_full_gig(
    connection: &mut PgConnection,
    gig_id: GigId,
) -> Result<models::FullGig, StoreError> {
    let gig = schema::gigs::table
        .find(gig_id)
        .select(models::Gig::as_select())
        .first::<models::Gig>(connection)?;

    let venue = match gig.venue_id {
        Some(venue_id) => Some(
            schema::venues::table
                .find(venue_id)
                .select(models::Venue::as_select())
                .first::<models::Venue>(connection)?,
        ),
        None => None,
    };
    let contact = match gig.contact_id {
        Some(contact_id) => Some(
            schema::contacts::table
                .find(contact_id)
                .select(models::Contact::as_select())
                .first::<models::Contact>(connection)?,
        ),
        None => None,
    };

    let staff = schema::gig_staff::table
        .inner_join(schema::users::table)
        .filter(schema::gig_staff::gig_id.eq(gig_id))
        .order_by(schema::users::name.asc())
        .select(models::User::as_select())
        .load::<models::User>(connection)?;

    let asset_ids = schema::gig_assets::table
        .filter(schema::gig_assets::gig_id.eq(gig_id))
        .select(schema::gig_assets::asset_id)
        .load::<Uuid>(connection)?;
    let the_assets = schema::assets::table
        .filter(schema::assets::id.eq_any(&asset_ids))
        .order_by(schema::assets::asset_tag.asc())
        .select(models::Asset::as_select())
        .load::<models::Asset>(connection)?;
    let assets = assemble_full_assets(connection, the_assets)?;

    Ok(models::FullGig {
        gig,
        venue,
        contact,
        staff,
        assets,
    })
}
