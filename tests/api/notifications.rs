use std::collections::HashSet;
use std::time::Duration;

use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

fn recipient(request: &wiremock::Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    body["personalizations"][0]["to"][0]["email"]
        .as_str()
        .unwrap()
        .to_string()
}

fn subject(request: &wiremock::Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    body["subject"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn publishing_a_video_emails_each_distinct_address_once() {
    let test_app = TestApp::spawn_app().await;

    test_app.subscribe_email("a@x.com").await;
    test_app.subscribe_email("a@x.com").await;
    test_app.subscribe_email("b@x.com").await;
    test_app
        .post_subscription(serde_json::json!({ "telegram": "@no_email" }))
        .await
        .error_for_status()
        .unwrap();

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_admin(
            "/videos",
            serde_json::json!({
                "title": "Intro to X",
                "language": "English",
                "link": "http://y/watch?v=abc"
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    let received = test_app.wait_for_emails(2).await;
    // Give a stray third delivery the chance to show up before asserting
    tokio::time::sleep(Duration::from_millis(200)).await;
    let received_after = test_app.email_server.received_requests().await.unwrap();

    assert_eq!(received.len(), 2);
    assert_eq!(received_after.len(), 2);

    let recipients: HashSet<String> = received.iter().map(recipient).collect();
    assert_eq!(
        recipients,
        HashSet::from([String::from("a@x.com"), String::from("b@x.com")])
    );
    assert!(received
        .iter()
        .all(|request| subject(request) == "New Video: Intro to X"));
}

#[tokio::test]
async fn publishing_a_job_sends_the_job_template() {
    let test_app = TestApp::spawn_app().await;
    test_app.subscribe_email("a@x.com").await;

    Mock::given(path("/mail/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    test_app
        .post_admin(
            "/jobs",
            serde_json::json!({
                "title": "Clerk",
                "description": "Apply now",
                "applyLink": "http://z"
            }),
        )
        .await
        .error_for_status()
        .unwrap();

    let received = test_app.wait_for_emails(1).await;
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();

    assert_eq!(body["subject"], "New Job: Clerk");
    let plain = body["content"][0]["value"].as_str().unwrap();
    assert!(plain.contains("Apply now"));
    assert!(plain.contains("http://z"));
}

#[tokio::test]
async fn manual_notification_waits_for_delivery_and_reports_success() {
    let test_app = TestApp::spawn_app().await;
    test_app.subscribe_email("a@x.com").await;
    test_app.subscribe_email("b@x.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_admin(
            "/notify",
            serde_json::json!({ "type": "manual", "title": "Site maintenance" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    // The fan-out was awaited by the handler, so no polling is needed
    let received = test_app.email_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert!(received
        .iter()
        .all(|request| subject(request) == "New Job: Site maintenance"));
}

#[tokio::test]
async fn manual_notification_tolerates_null_and_non_string_fields() {
    let test_app = TestApp::spawn_app().await;
    test_app.subscribe_email("a@x.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_admin("/notify", serde_json::json!({ "type": 3, "title": null }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let received = test_app.email_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(subject(&received[0]), "New Job: ");
}

#[tokio::test]
async fn manual_notification_succeeds_when_deliveries_fail() {
    let test_app = TestApp::spawn_app().await;
    test_app.subscribe_email("a@x.com").await;
    test_app.subscribe_email("b@x.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_admin(
            "/notify",
            serde_json::json!({ "type": "video", "title": "Intro", "link": "http://y" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn manual_notification_returns_500_when_subscribers_cannot_be_read() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    sqlx::query("DROP TABLE subscribers")
        .execute(&test_app.db_pool)
        .await
        .unwrap();

    let response = test_app
        .post_admin("/notify", serde_json::json!({ "type": "job", "title": "Clerk" }))
        .await;

    assert_eq!(500, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Notification failed");
}

#[tokio::test]
async fn publishing_succeeds_when_subscribers_cannot_be_read() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    sqlx::query("DROP TABLE subscribers")
        .execute(&test_app.db_pool)
        .await
        .unwrap();

    let response = test_app
        .post_admin(
            "/videos",
            serde_json::json!({ "title": "Intro", "link": "http://y" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
}
