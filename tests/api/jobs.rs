use crate::helpers::TestApp;

async fn create_job(test_app: &TestApp, title: &str, category: &str) -> String {
    let response = test_app
        .post_admin(
            "/jobs",
            serde_json::json!({
                "title": title,
                "company": "Acme",
                "category": category,
                "description": "Apply now",
                "applyLink": "https://acme.example/apply",
                "deadline": "2026-12-01"
            }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn jobs_are_listed_newest_first_with_camel_case_fields() {
    let test_app = TestApp::spawn_app().await;

    create_job(&test_app, "Clerk", "Government").await;
    create_job(&test_app, "Developer", "IT").await;

    let jobs: Vec<serde_json::Value> = test_app
        .get_public("/api/jobs")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["title"], "Developer");
    assert_eq!(jobs[1]["applyLink"], "https://acme.example/apply");
    assert_eq!(jobs[1]["deadline"], "2026-12-01");
}

#[tokio::test]
async fn jobs_can_be_filtered_by_category() {
    let test_app = TestApp::spawn_app().await;

    create_job(&test_app, "Clerk", "Government").await;
    create_job(&test_app, "Developer", "IT").await;

    let jobs: Vec<serde_json::Value> = test_app
        .get_public("/api/jobs?category=Government")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Clerk");
}

#[tokio::test]
async fn a_job_without_company_defaults_to_an_empty_one() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_admin("/jobs", serde_json::json!({ "title": "Clerk" }))
        .await;
    let body: serde_json::Value = response.json().await.unwrap();

    let job: serde_json::Value = test_app
        .get_admin(&format!("/jobs/{}", body["id"].as_str().unwrap()))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(job["company"], "");
    assert!(job["description"].is_null());
}

#[tokio::test]
async fn creating_a_job_returns_400_when_title_is_missing() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_admin("/jobs", serde_json::json!({ "description": "Apply now" }))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_job_can_be_updated_and_deleted() {
    let test_app = TestApp::spawn_app().await;
    let id = create_job(&test_app, "Clerk", "Government").await;
    let path = format!("/jobs/{}", id);

    let response = test_app
        .put_admin(&path, serde_json::json!({ "deadline": "2027-01-15" }))
        .await;
    assert_eq!(200, response.status().as_u16());

    let job: serde_json::Value = test_app.get_admin(&path).await.json().await.unwrap();
    assert_eq!(job["deadline"], "2027-01-15");
    assert_eq!(job["title"], "Clerk");

    assert_eq!(200, test_app.delete_admin(&path).await.status().as_u16());
    assert_eq!(404, test_app.delete_admin(&path).await.status().as_u16());
}
