use crate::helpers::TestApp;

#[tokio::test]
async fn admin_routes_reject_requests_without_a_token() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .api_client
        .get(format!("{}/api/admin/subscribers", test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
    assert_eq!(
        r#"Bearer realm="admin""#,
        response.headers()["WWW-Authenticate"]
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing token");
}

#[tokio::test]
async fn admin_routes_reject_a_wrong_token() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .api_client
        .post(format!("{}/api/admin/videos", test_app.address))
        .bearer_auth("not-the-admin-token")
        .json(&serde_json::json!({ "title": "Intro", "link": "https://youtu.be/abc" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn admin_routes_accept_the_configured_token() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_admin("/subscribers").await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn public_routes_do_not_need_a_token() {
    let test_app = TestApp::spawn_app().await;

    for path in ["/api/videos", "/api/jobs"] {
        let response = test_app.get_public(path).await;

        assert_eq!(200, response.status().as_u16(), "GET {} failed", path);
    }
}
