use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use ofg_common::Secret;
use open_fund_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    AllocationApi,
    FundableApi,
    SqliteDatabase,
};
use serde_json::Value;

use crate::{
    config::ServerConfig,
    helpers::{API_KEY_HEADER, USER_ID_HEADER},
    routes::{
        health,
        ContributionsListRoute,
        DeleteTargetRoute,
        MyContributionsRoute,
        NewContributionRoute,
        NewTargetRoute,
        TargetsListRoute,
        UpdateTargetRoute,
    },
};

pub const TEST_ADMIN_KEY: &str = "it-is-a-secret-to-everybody";

pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating test database")
}

fn test_config() -> ServerConfig {
    ServerConfig { admin_api_key: Secret::new(TEST_ADMIN_KEY.to_string()), ..ServerConfig::default() }
}

/// Builds the full route table against the given backend and dispatches one request.
pub async fn send(db: &SqliteDatabase, req: TestRequest) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(AllocationApi::new(db.clone())))
        .app_data(web::Data::new(FundableApi::new(db.clone())))
        .app_data(web::Data::new(test_config()))
        .service(health)
        .service(NewTargetRoute::<SqliteDatabase>::new())
        .service(TargetsListRoute::<SqliteDatabase>::new())
        .service(UpdateTargetRoute::<SqliteDatabase>::new())
        .service(DeleteTargetRoute::<SqliteDatabase>::new())
        .service(NewContributionRoute::<SqliteDatabase>::new())
        .service(ContributionsListRoute::<SqliteDatabase>::new())
        .service(MyContributionsRoute::<SqliteDatabase>::new());
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn as_admin(req: TestRequest) -> TestRequest {
    req.insert_header((API_KEY_HEADER, TEST_ADMIN_KEY))
}

pub fn as_user(req: TestRequest, contributor: &str) -> TestRequest {
    req.insert_header((USER_ID_HEADER, contributor))
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("Response body is not valid JSON")
}

/// Creates a funding target through the endpoint, expecting success, and returns the record.
pub async fn create_target(db: &SqliteDatabase, name: &str, amount: i64) -> Value {
    let req = as_admin(TestRequest::post().uri("/targets")).set_json(serde_json::json!({
        "name": name,
        "description": format!("Test target '{name}'"),
        "full_amount": amount,
    }));
    let (status, body) = send(db, req).await;
    assert_eq!(status, StatusCode::OK, "Could not create target '{name}': {body}");
    json(&body)
}

/// Makes a contribution through the endpoint, expecting success, and returns the record.
pub async fn contribute(db: &SqliteDatabase, contributor: &str, amount: i64) -> Value {
    let req = as_user(TestRequest::post().uri("/contributions"), contributor)
        .set_json(serde_json::json!({ "full_amount": amount }));
    let (status, body) = send(db, req).await;
    assert_eq!(status, StatusCode::OK, "Could not contribute as [{contributor}]: {body}");
    json(&body)
}
