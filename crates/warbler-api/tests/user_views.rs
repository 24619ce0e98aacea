mod common;

use axum::http::StatusCode;

use common::{TestApp, body_text, location, test_app};
use warbler_db::StoreError;
use warbler_db::models::UserRow;

fn seed_follow_graph(t: &TestApp) -> (UserRow, UserRow, UserRow) {
    let testuser = t
        .state
        .db
        .signup("testuser", "test@test.com", "testuser", None)
        .unwrap();
    let testuser2 = t
        .state
        .db
        .signup("testuser2", "test2@test2.com", "testuser2", None)
        .unwrap();
    let chicken = t
        .state
        .db
        .signup("chicken_tenders", "chicken@tender.com", "123456", None)
        .unwrap();

    // Both follow testuser; testuser follows testuser2 back.
    t.state.db.follow(chicken.id, testuser.id).unwrap();
    t.state.db.follow(testuser2.id, testuser.id).unwrap();
    t.state.db.follow(testuser.id, testuser2.id).unwrap();

    (testuser, testuser2, chicken)
}

#[tokio::test]
async fn follow_pages_render_for_a_logged_in_user() {
    let t = test_app();
    let (testuser, ..) = seed_follow_graph(&t);
    let cookie = t.session_for(testuser.id);

    let resp = t
        .get(&format!("/users/{}/following", testuser.id), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("testuser2"));

    let resp = t
        .get(&format!("/users/{}/followers", testuser.id), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("testuser2"));
    assert!(html.contains("chicken_tenders"));
}

#[tokio::test]
async fn follow_pages_reject_a_session_for_a_missing_user() {
    let t = test_app();
    seed_follow_graph(&t);

    // The id in the session does not exist; treated exactly like no
    // session at all.
    let stale = t.session_for(132_222);

    for path in ["/users/132222/following", "/users/132222/followers"] {
        let resp = t.get(path, Some(&stale)).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/");

        let landing = t.follow_redirect(&resp).await;
        assert_eq!(landing.status(), StatusCode::OK);
        assert!(body_text(landing).await.contains("Access unauthorized"));
    }
}

#[tokio::test]
async fn follow_pages_reject_anonymous_viewers() {
    let t = test_app();
    let (testuser, ..) = seed_follow_graph(&t);

    let resp = t
        .get(&format!("/users/{}/following", testuser.id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let resp = t
        .get(&format!("/users/{}/followers", testuser.id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn profile_lists_the_users_messages() {
    let t = test_app();
    let (testuser, ..) = seed_follow_graph(&t);
    t.state.db.create_message("fist warble", testuser.id).unwrap();
    let cookie = t.session_for(testuser.id);

    let resp = t.get(&format!("/users/{}", testuser.id), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("fist warble"));
    assert!(html.contains("@testuser"));
}

#[tokio::test]
async fn follow_and_unfollow_routes_mutate_the_edge() {
    let t = test_app();
    let (testuser, testuser2, chicken) = seed_follow_graph(&t);
    let cookie = t.session_for(testuser.id);

    let resp = t
        .post_form(&format!("/users/follow/{}", chicken.id), "", Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/users/{}/following", testuser.id));
    assert!(t.state.db.is_following(testuser.id, chicken.id).unwrap());

    let resp = t
        .post_form(
            &format!("/users/stop-following/{}", testuser2.id),
            "",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!t.state.db.is_following(testuser.id, testuser2.id).unwrap());
}

#[tokio::test]
async fn store_faults_are_a_500_not_an_unauthorized_redirect() {
    let t = test_app();
    let (testuser, ..) = seed_follow_graph(&t);
    let cookie = t.session_for(testuser.id);

    // Poison the connection lock; session resolution now hits a store
    // fault rather than an absent user.
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = t
            .state
            .db
            .with_conn(|_| -> Result<(), StoreError> { panic!("poison the lock") });
    }));

    let resp = t
        .get(&format!("/users/{}/following", testuser.id), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn following_a_missing_user_is_a_404() {
    let t = test_app();
    let (testuser, ..) = seed_follow_graph(&t);
    let cookie = t.session_for(testuser.id);

    let resp = t.post_form("/users/follow/999999", "", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
