//! Router tests against a real Postgres. Each test skips itself unless DATABASE_URL is set.
//! Names come from `unique`, so tests can share one database and run in parallel.

mod common;

use axum::http::{Method, StatusCode};
use common::{bearer, db_app, send, unique};
use serde_json::{json, Value};

async fn create_company(app: &axum::Router, admin: &str, handle: &str) -> Value {
    let body = json!({ "handle": handle, "name": format!("Name {}", handle), "numEmployees": 10, "logoUrl": "http://example.com/logo.png" });
    let (status, body) = send(app.clone(), Method::POST, "/companies", Some(admin.into()), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn company_patch_writes_nulls_and_missing_rows_are_404() {
    let Some((app, config)) = db_app().await else { return };
    let admin = bearer(&config, "admin", true);
    let handle = unique("co");
    let created = create_company(&app, &admin, &handle).await;
    assert_eq!(created["numEmployees"], 10);

    let patch = json!({ "numEmployees": null, "logoUrl": null, "description": "patched" });
    let uri = format!("/companies/{}", handle);
    let (status, body) = send(app.clone(), Method::PATCH, &uri, Some(admin.clone()), Some(patch)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["numEmployees"], Value::Null);
    assert_eq!(body["data"]["logoUrl"], Value::Null);
    assert_eq!(body["data"]["description"], "patched");
    assert_eq!(body["data"]["name"], created["name"]);

    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["numEmployees"], Value::Null);
    assert_eq!(body["data"]["jobs"], json!([]));

    let (status, body) = send(app.clone(), Method::DELETE, &uri, Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], handle.as_str());

    let missing = format!("No company: {}", handle);
    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], missing.as_str());
    let (status, body) = send(app.clone(), Method::PATCH, &uri, Some(admin.clone()), Some(json!({ "name": "Gone" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], missing.as_str());
    let (status, body) = send(app, Method::DELETE, &uri, Some(admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], missing.as_str());
}

#[tokio::test]
async fn duplicate_companies_are_bad_requests() {
    let Some((app, config)) = db_app().await else { return };
    let admin = bearer(&config, "admin", true);
    let first = unique("da");
    let created = create_company(&app, &admin, &first).await;

    let again = json!({ "handle": first, "name": "Something else" });
    let (status, body) = send(app.clone(), Method::POST, "/companies", Some(admin.clone()), Some(again)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], format!("Duplicate company: {}", first).as_str());

    let second = unique("db");
    let same_name = json!({ "handle": second, "name": created["name"] });
    let (status, body) = send(app.clone(), Method::POST, "/companies", Some(admin.clone()), Some(same_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Duplicate company name");

    create_company(&app, &admin, &second).await;
    let uri = format!("/companies/{}", second);
    let rename = json!({ "name": created["name"] });
    let (status, body) = send(app, Method::PATCH, &uri, Some(admin), Some(rename)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Duplicate company name");
}

#[tokio::test]
async fn job_patch_round_trips_nulls_and_respects_equity_bound() {
    let Some((app, config)) = db_app().await else { return };
    let admin = bearer(&config, "admin", true);
    let handle = unique("jb");
    create_company(&app, &admin, &handle).await;

    let job = json!({ "title": "Engineer", "salary": 100, "equity": "0.5", "companyHandle": handle });
    let (status, body) = send(app.clone(), Method::POST, "/jobs", Some(admin.clone()), Some(job)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["equity"], "0.5");
    let id = body["data"]["id"].as_i64().expect("job id");
    let uri = format!("/jobs/{}", id);

    let patch = json!({ "salary": null, "equity": null });
    let (status, body) = send(app.clone(), Method::PATCH, &uri, Some(admin.clone()), Some(patch)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["salary"], Value::Null);
    assert_eq!(body["data"]["equity"], Value::Null);
    assert_eq!(body["data"]["title"], "Engineer");

    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["salary"], Value::Null);
    assert_eq!(body["data"]["company"]["handle"], handle.as_str());

    let over = json!({ "equity": "1.00000000000000000001" });
    let (status, body) = send(app.clone(), Method::PATCH, &uri, Some(admin.clone()), Some(over)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = send(app.clone(), Method::DELETE, &uri, Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    let missing = format!("No job: {}", id);
    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], missing.as_str());
    let (status, body) = send(app, Method::PATCH, &uri, Some(admin), Some(json!({ "title": "Gone" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], missing.as_str());
}

#[tokio::test]
async fn job_for_unknown_company_is_bad_request() {
    let Some((app, config)) = db_app().await else { return };
    let admin = bearer(&config, "admin", true);
    let handle = unique("nope");
    let job = json!({ "title": "Ghost", "companyHandle": handle });
    let (status, body) = send(app, Method::POST, "/jobs", Some(admin), Some(job)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], format!("No company: {}", handle).as_str());
}

#[tokio::test]
async fn lists_with_no_match_are_empty() {
    let Some((app, config)) = db_app().await else { return };
    let admin = bearer(&config, "admin", true);
    let handle = unique("ls");
    create_company(&app, &admin, &handle).await;

    let uri = format!("/companies?nameLike={}", handle);
    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["handle"], handle.as_str());

    let nobody = unique("none");
    let uri = format!("/companies?nameLike={}", nobody);
    let (status, body) = send(app.clone(), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [], "meta": { "count": 0 } }));

    let uri = format!("/jobs?title={}", nobody);
    let (status, body) = send(app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [], "meta": { "count": 0 } }));
}

#[tokio::test]
async fn users_register_log_in_and_collide() {
    let Some((app, config)) = db_app().await else { return };
    let username = unique("user");
    let signup = json!({
        "username": username, "password": "secret1", "firstName": "First",
        "lastName": "Last", "email": "someone@example.com"
    });
    let (status, body) = send(app.clone(), Method::POST, "/auth/register", None, Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["data"]["token"].is_string());

    let (status, body) = send(app.clone(), Method::POST, "/auth/register", None, Some(signup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], format!("Duplicate username: {}", username).as_str());

    let login = json!({ "username": username, "password": "secret1" });
    let (status, body) = send(app.clone(), Method::POST, "/auth/token", None, Some(login)).await;
    assert_eq!(status, StatusCode::OK);
    let token = format!("Bearer {}", body["data"]["token"].as_str().expect("token"));

    let uri = format!("/users/{}", username);
    let (status, body) = send(app.clone(), Method::PATCH, &uri, Some(token.clone()), Some(json!({ "firstName": "Renamed" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["firstName"], "Renamed");
    assert_eq!(body["data"]["isAdmin"], false);

    let (status, body) = send(app.clone(), Method::POST, &format!("{}/jobs/2147483647", uri), Some(token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No job: 2147483647");

    let ghost = unique("ghost");
    let admin = bearer(&config, "admin", true);
    let (status, body) = send(app, Method::GET, &format!("/users/{}", ghost), Some(admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], format!("No user: {}", ghost).as_str());
}
