use crate::auth_session::SessionToken;
use crate::data_store::store_mock::StoreMock;
use crate::data_store::{GigStockStore, StoreError};
use crate::web::AppState;
use actix_web::{test, web, App};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;


const SECRET: &str = "test-secret";

fn app_state(store: &Arc<StoreMock>) -> web::Data<AppState> {
    web::Data::new(AppState {
        store: store.clone() as Arc<dyn GigStockStore>,
        secret: SECRET.to_string(),
    })
}

fn session_header(user_id: Uuid) -> (&'static str, String) {
    ("X-SESSION-TOKEN", SessionToken::for_user(user_id).as_string(SECRET))
}

macro_rules! init_test_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .configure(super::configure_app)
                .app_data(app_state(&$store)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_login_returns_token_and_user() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "manager@gigstock.test", "password": "manager-pass"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "manager@gigstock.test");
    assert_eq!(body["user"]["role"], "Manager");
}

#[actix_web::test]
async fn test_login_with_wrong_password() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "manager@gigstock.test", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[actix_web::test]
async fn test_account_lockout_after_repeated_failures() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "riley@gigstock.test", "password": "wrong"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
    // Correct password is rejected while the account is locked.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "riley@gigstock.test", "password": "riley-pass"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let locked_until = store.data.lock().unwrap().users[2].locked_until;
    assert!(locked_until.is_some());
}

#[actix_web::test]
async fn test_request_without_session_token() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get().uri("/api/v1/gigs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_request_with_invalid_session_token() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/gigs")
        .insert_header(("X-SESSION-TOKEN", "not.a.valid.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_create_gig_with_staff_conflict() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Corporate Party",
            "startTime": "2024-03-15T20:00:00Z",
            "endTime": "2024-03-15T22:00:00Z",
            "staffIds": [sample_data::STAFF_ID],
            "assetIds": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Staff conflict detected: Riley Chen is already assigned to \"Rock Concert 2024\""
    );
    let data = store.data.lock().unwrap();
    assert_eq!(data.gigs.len(), 2);
}

#[actix_web::test]
async fn test_create_gig_with_asset_conflict() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Corporate Party",
            "startTime": "2024-03-15T20:00:00Z",
            "endTime": "2024-03-15T22:00:00Z",
            "staffIds": [],
            "assetIds": [sample_data::MIC_ASSET_ID],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Asset conflict detected: Asset MIC001 is already assigned to \"Rock Concert 2024\""
    );
}

#[actix_web::test]
async fn test_staff_conflict_reported_before_asset_conflict() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Corporate Party",
            "startTime": "2024-03-15T20:00:00Z",
            "endTime": "2024-03-15T22:00:00Z",
            "staffIds": [sample_data::STAFF_ID],
            "assetIds": [sample_data::MIC_ASSET_ID],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Staff conflict detected:"));
}

#[actix_web::test]
async fn test_create_back_to_back_gig() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    // Starts exactly when "Rock Concert 2024" ends, so the same staff and asset are free.
    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Afterparty",
            "startTime": "2024-03-15T23:00:00Z",
            "endTime": "2024-03-16T01:00:00Z",
            "venueId": sample_data::VENUE_ID,
            "staffIds": [sample_data::STAFF_ID],
            "assetIds": [sample_data::MIC_ASSET_ID],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Afterparty");
    assert_eq!(body["venue"]["name"], "The Paramount");
    assert_eq!(body["staff"][0]["name"], "Riley Chen");
    assert_eq!(body["assets"][0]["assetTag"], "MIC001");
}

#[actix_web::test]
async fn test_create_gig_with_empty_assignments() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Planning Meeting",
            "startTime": "2024-03-15T20:00:00Z",
            "endTime": "2024-03-15T21:00:00Z",
            "staffIds": [],
            "assetIds": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn test_create_gig_with_inverted_interval() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Time Travel",
            "startTime": "2024-03-20T22:00:00Z",
            "endTime": "2024-03-20T20:00:00Z",
            "staffIds": [],
            "assetIds": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Gig start time must be before end time");
}

#[actix_web::test]
async fn test_create_gig_with_empty_name() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "   ",
            "startTime": "2024-03-20T20:00:00Z",
            "endTime": "2024-03-20T22:00:00Z",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_create_gig_requires_manager_role() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::STAFF_ID))
        .set_json(json!({
            "name": "Unauthorized Gig",
            "startTime": "2024-03-20T20:00:00Z",
            "endTime": "2024-03-20T22:00:00Z",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_list_gigs() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::STAFF_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let gigs = body.as_array().unwrap();
    assert_eq!(gigs.len(), 2);
    assert_eq!(gigs[0]["name"], "Festival 2099");
    assert_eq!(gigs[1]["name"], "Rock Concert 2024");
    assert_eq!(gigs[1]["venueName"], "The Paramount");
    assert_eq!(gigs[1]["staffCount"], 1);
    assert_eq!(gigs[1]["assetCount"], 1);
}

#[actix_web::test]
async fn test_list_gigs_newest_start_first() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "New Year 2101",
            "startTime": "2100-12-31T20:00:00Z",
            "endTime": "2101-01-01T02:00:00Z",
            "staffIds": [],
            "assetIds": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::STAFF_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|gig| gig["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["New Year 2101", "Festival 2099", "Rock Concert 2024"]
    );
}

#[actix_web::test]
async fn test_list_assets_with_status_filter() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/assets?status=available")
        .insert_header(session_header(sample_data::STAFF_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let assets = body.as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["assetTag"], "MIC001");
    assert_eq!(assets[0]["product"]["name"], "SM58");
}

#[actix_web::test]
async fn test_get_asset_with_assignment_history() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assets/{}", sample_data::MIC_ASSET_ID))
        .insert_header(session_header(sample_data::STAFF_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["asset"]["assetTag"], "MIC001");
    assert_eq!(body["assignments"][0]["gigName"], "Rock Concert 2024");
}

#[actix_web::test]
async fn test_delete_warehouse_with_assets() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/warehouses/{}", sample_data::WAREHOUSE_ID))
        .insert_header(session_header(sample_data::MANAGER_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cannot delete warehouse with assets");
}

#[actix_web::test]
async fn test_create_warehouse_with_duplicate_name() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/warehouses")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({"name": "Main Warehouse", "address1": "2 Depot Street"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_delete_asset_assigned_to_active_gig() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/assets/{}", sample_data::SPEAKER_ASSET_ID))
        .insert_header(session_header(sample_data::MANAGER_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Cannot delete asset that is assigned to active gigs"
    );
}

#[actix_web::test]
async fn test_warehouse_list_includes_asset_counts() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/warehouses")
        .insert_header(session_header(sample_data::STAFF_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body[0]["name"], "Main Warehouse");
    assert_eq!(body[0]["assetCount"], 2);
}

#[actix_web::test]
async fn test_create_user_requires_admin_role() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let new_user = json!({
        "name": "Sam Ortiz",
        "email": "sam@gigstock.test",
        "role": "User",
        "password": "sam-pass",
    });
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(&new_user)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(session_header(sample_data::ADMIN_ID))
        .set_json(&new_user)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "sam@gigstock.test");
}

#[actix_web::test]
async fn test_report_overview() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = init_test_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/reports/overview")
        .insert_header(session_header(sample_data::ADMIN_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["totalAssets"], 2);
    assert_eq!(body["availableAssets"], 1);
    assert_eq!(body["totalGigs"], 2);
    assert_eq!(body["activeGigs"], 1);
    assert_eq!(body["totalUsers"], 3);
    assert_eq!(body["assetsByStatus"]["available"], 1);
    assert_eq!(body["assetsByStatus"]["maintenance"], 1);
    assert_eq!(body["assetsByStatus"]["retired"], 0);
    assert_eq!(body["assetsByCondition"]["good"], 1);

    // The user count is only reported to admins.
    let req = test::TestRequest::get()
        .uri("/api/v1/reports/overview")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("totalUsers").is_none());
}

#[actix_web::test]
async fn test_transaction_conflict_maps_to_service_unavailable() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    store.data.lock().unwrap().next_error = Some(StoreError::TransactionConflict);
    let app = init_test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/gigs")
        .insert_header(session_header(sample_data::MANAGER_ID))
        .set_json(json!({
            "name": "Retry Me",
            "startTime": "2024-03-20T20:00:00Z",
            "endTime": "2024-03-20T22:00:00Z",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
}
