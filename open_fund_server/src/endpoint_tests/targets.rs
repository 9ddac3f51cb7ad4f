use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;

use super::helpers::{as_admin, contribute, create_target, json as parse, new_test_db, send};

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let (status, body) = send(&db, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn create_target_returns_the_settled_record() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let target = create_target(&db, "Village well", 500).await;
    assert_eq!(target["name"], "Village well");
    assert_eq!(target["full_amount"], 500);
    assert_eq!(target["invested_amount"], 0);
    assert_eq!(target["fully_invested"], false);
    assert!(target.get("closed_at").is_none());
}

#[actix_web::test]
async fn create_target_requires_the_admin_key() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let payload = json!({ "name": "Sneaky", "description": "No key", "full_amount": 10 });

    let (status, _) = send(&db, TestRequest::post().uri("/targets").set_json(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/targets")
        .insert_header(("ofg-api-key", "not-the-right-key"))
        .set_json(payload);
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn malformed_targets_are_rejected() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let cases = [
        json!({ "name": "", "description": "No name", "full_amount": 10 }),
        json!({ "name": "x".repeat(101), "description": "Name too long", "full_amount": 10 }),
        json!({ "name": "No description", "description": "  ", "full_amount": 10 }),
        json!({ "name": "Zero", "description": "Zero amount", "full_amount": 0 }),
        json!({ "name": "Negative", "description": "Negative amount", "full_amount": -5 }),
    ];
    for payload in cases {
        let req = as_admin(TestRequest::post().uri("/targets")).set_json(payload.clone());
        let (status, body) = send(&db, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "Payload {payload} should have been rejected: {body}");
    }
    // Nothing was created along the way.
    let (_, body) = send(&db, TestRequest::get().uri("/targets")).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn duplicate_target_names_are_rejected() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    create_target(&db, "Twin", 100).await;
    let req = as_admin(TestRequest::post().uri("/targets"))
        .set_json(json!({ "name": "Twin", "description": "Same name again", "full_amount": 50 }));
    let (status, body) = send(&db, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already exists"), "Unexpected error body: {body}");
}

#[actix_web::test]
async fn target_listing_is_public() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    create_target(&db, "First", 10).await;
    create_target(&db, "Second", 20).await;
    let (status, body) = send(&db, TestRequest::get().uri("/targets")).await;
    assert_eq!(status, StatusCode::OK);
    let targets = parse(&body);
    let names = targets.as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(names, vec!["First", "Second"]);
}

#[actix_web::test]
async fn updating_targets_through_the_endpoint() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let target = create_target(&db, "Garden", 100).await;
    let id = target["id"].as_i64().unwrap();
    contribute(&db, "fred", 40).await;

    // Unknown ids are a 404.
    let req = as_admin(TestRequest::patch().uri("/targets/99999")).set_json(json!({ "name": "Ghost" }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Updates need the admin key.
    let req = TestRequest::patch().uri(&format!("/targets/{id}")).set_json(json!({ "name": "Meadow" }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Lowering the full amount below the invested amount is refused.
    let req = as_admin(TestRequest::patch().uri(&format!("/targets/{id}"))).set_json(json!({ "full_amount": 30 }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Lowering it to exactly the invested amount closes the target.
    let req = as_admin(TestRequest::patch().uri(&format!("/targets/{id}"))).set_json(json!({ "full_amount": 40 }));
    let (status, body) = send(&db, req).await;
    assert_eq!(status, StatusCode::OK);
    let updated = parse(&body);
    assert_eq!(updated["fully_invested"], true);
    assert!(updated.get("closed_at").is_some());

    // A closed target is immutable.
    let req = as_admin(TestRequest::patch().uri(&format!("/targets/{id}"))).set_json(json!({ "name": "Meadow" }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_targets_through_the_endpoint() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;

    let target = create_target(&db, "Doomed", 50).await;
    let id = target["id"].as_i64().unwrap();
    let (status, _) = send(&db, TestRequest::delete().uri(&format!("/targets/{id}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&db, as_admin(TestRequest::delete().uri(&format!("/targets/{id}")))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&db, TestRequest::get().uri("/targets")).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 0);

    // A target that has received a contribution cannot be deleted.
    let target = create_target(&db, "Sticky", 50).await;
    let id = target["id"].as_i64().unwrap();
    contribute(&db, "gina", 10).await;
    let (status, body) = send(&db, as_admin(TestRequest::delete().uri(&format!("/targets/{id}")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("cannot be deleted"), "Unexpected error body: {body}");
}
