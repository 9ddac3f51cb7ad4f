use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;

use super::helpers::{as_admin, as_user, contribute, create_target, json as parse, new_test_db, send};

#[actix_web::test]
async fn contributing_requires_a_contributor_id() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let (status, _) =
        send(&db, TestRequest::post().uri("/contributions").set_json(json!({ "full_amount": 10 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A blank id is as good as none.
    let req = as_user(TestRequest::post().uri("/contributions"), "  ").set_json(json!({ "full_amount": 10 }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn non_positive_contributions_are_rejected() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    for amount in [0, -10] {
        let req =
            as_user(TestRequest::post().uri("/contributions"), "alice").set_json(json!({ "full_amount": amount }));
        let (status, _) = send(&db, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn contribution_settles_against_open_targets() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    create_target(&db, "Well", 60).await;
    create_target(&db, "School", 50).await;

    let contribution = contribute(&db, "alice", 100).await;
    assert_eq!(contribution["full_amount"], 100);
    assert_eq!(contribution["invested_amount"], 100);
    assert_eq!(contribution["fully_invested"], true);
    assert!(contribution.get("closed_at").is_some());

    // The oldest target is exactly covered; the younger one holds the remainder.
    let (_, body) = send(&db, TestRequest::get().uri("/targets")).await;
    let targets = parse(&body);
    let targets = targets.as_array().unwrap();
    assert_eq!(targets[0]["fully_invested"], true);
    assert_eq!(targets[0]["invested_amount"], 60);
    assert_eq!(targets[1]["fully_invested"], false);
    assert_eq!(targets[1]["invested_amount"], 40);
}

#[actix_web::test]
async fn unabsorbed_contributions_stay_open() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let contribution = contribute(&db, "bob", 75).await;
    assert_eq!(contribution["invested_amount"], 0);
    assert_eq!(contribution["fully_invested"], false);
    assert!(contribution.get("closed_at").is_none());

    // A target created later drains it.
    let target = create_target(&db, "Late", 30).await;
    assert_eq!(target["invested_amount"], 30);
    assert_eq!(target["fully_invested"], true);
}

#[actix_web::test]
async fn full_contribution_listing_is_admin_only() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    contribute(&db, "alice", 10).await;
    contribute(&db, "bob", 20).await;

    let (status, _) = send(&db, TestRequest::get().uri("/contributions")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&db, as_admin(TestRequest::get().uri("/contributions"))).await;
    assert_eq!(status, StatusCode::OK);
    let contributions = parse(&body);
    let contributions = contributions.as_array().unwrap();
    assert_eq!(contributions.len(), 2);
    // Admins see the full records, allocation bookkeeping included.
    assert!(contributions[0].get("invested_amount").is_some());
    assert!(contributions[0].get("contributor_id").is_some());
}

#[actix_web::test]
async fn contributors_see_only_their_own_trimmed_records() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    contribute(&db, "henry", 10).await;
    let req = as_user(TestRequest::post().uri("/contributions"), "iris")
        .set_json(json!({ "full_amount": 20, "comment": "for the well" }));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::OK);
    contribute(&db, "henry", 30).await;

    let (status, body) = send(&db, as_user(TestRequest::get().uri("/contributions/my"), "henry")).await;
    assert_eq!(status, StatusCode::OK);
    let mine = parse(&body);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    let amounts = mine.iter().map(|c| c["full_amount"].as_i64().unwrap()).collect::<Vec<_>>();
    assert_eq!(amounts, vec![10, 30]);
    // The trimmed view carries no allocation bookkeeping.
    assert!(mine[0].get("invested_amount").is_none());
    assert!(mine[0].get("fully_invested").is_none());
    assert!(mine[0].get("contributor_id").is_none());

    let (_, body) = send(&db, as_user(TestRequest::get().uri("/contributions/my"), "iris")).await;
    let hers = parse(&body);
    let hers = hers.as_array().unwrap();
    assert_eq!(hers.len(), 1);
    assert_eq!(hers[0]["comment"], "for the well");

    let (status, _) = send(&db, TestRequest::get().uri("/contributions/my")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
