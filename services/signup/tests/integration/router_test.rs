use std::collections::HashMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use httpmock::Method::PATCH;
use serde_json::{Value, json};
use uuid::Uuid;

use onboard_core::config::Env;
use onboard_signup::config::SignupConfig;
use onboard_signup::router::build_router;
use onboard_signup::state::AppState;
use onboard_signup::usecase::code::hash_code;
use onboard_testing::rest::{
    TEST_CODE_SALT, TEST_EMAIL_KEY, TEST_SERVICE_KEY, Upstreams, table_path,
};

fn server(upstreams: &Upstreams) -> TestServer {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SUPABASE_URL", upstreams.supabase_url()),
        ("SUPABASE_SERVICE_ROLE_KEY", TEST_SERVICE_KEY.to_owned()),
        ("CODE_SALT", TEST_CODE_SALT.to_owned()),
        ("RESEND_API_KEY", TEST_EMAIL_KEY.to_owned()),
        ("RESEND_URL", upstreams.email_url()),
        ("MODULE_PRICES", "rota=1500".to_owned()),
    ]);
    let config =
        SignupConfig::from_lookup(Env::new(move |name: &str| vars.get(name).cloned())).unwrap();
    let state = AppState::new(config, reqwest::Client::new());
    TestServer::new(build_router(state)).unwrap()
}

fn code_row(id: Uuid, code: &str, age: Duration) -> Value {
    let created_at = Utc::now() - age;
    json!({
        "id": id,
        "email": "a@x.com",
        "code_hash": hash_code(code, TEST_CODE_SALT),
        "purpose": "owner_signup",
        "company_code": null,
        "full_name": null,
        "expires_at": created_at + Duration::minutes(10),
        "used_at": null,
        "created_at": created_at,
    })
}

fn owner_body(code: &str) -> Value {
    json!({
        "email": "  A@X.com ",
        "code": code,
        "password": "longenough1",
        "full_name": "Jane Doe",
        "company_name": "Acme",
        "company_size_id": 3,
    })
}

#[tokio::test]
async fn should_answer_health_probe() {
    let upstreams = Upstreams::start();
    let response = server(&upstreams).get("/healthz").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn should_issue_code_and_email_it() {
    let upstreams = Upstreams::start();
    let discard = upstreams.delete(
        "signup_codes",
        &[("email", "eq.a@x.com"), ("used_at", "is.null")],
    );
    let insert = upstreams.insert(
        "signup_codes",
        json!([code_row(Uuid::new_v4(), "000000", Duration::zero())]),
    );
    let email = upstreams.send_email();

    let response = server(&upstreams)
        .post("/api/send-code")
        .json(&json!({ "email": " A@x.com " }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));
    discard.assert();
    insert.assert();
    email.assert();
}

#[tokio::test]
async fn should_reject_send_code_without_email() {
    let upstreams = Upstreams::start();

    let response = server(&upstreams)
        .post("/api/send-code")
        .json(&json!({ "purpose": "owner_signup" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "ok": false, "kind": "INVALID_INPUT", "error": "Missing email" })
    );
}

#[tokio::test]
async fn should_report_email_failure_as_server_error() {
    let upstreams = Upstreams::start();
    upstreams.delete("signup_codes", &[]);
    upstreams.insert(
        "signup_codes",
        json!([code_row(Uuid::new_v4(), "000000", Duration::zero())]),
    );
    upstreams.reject_email(422, "invalid from address");

    let response = server(&upstreams)
        .post("/api/send-code")
        .json(&json!({ "email": "a@x.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "UPSTREAM");
    assert_eq!(body["error"], "Send email failed: invalid from address");
}

#[tokio::test]
async fn should_reject_incorrect_code_over_http() {
    let upstreams = Upstreams::start();
    upstreams.select(
        "signup_codes",
        &[("email", "eq.a@x.com")],
        json!([code_row(Uuid::new_v4(), "123456", Duration::minutes(1))]),
    );

    let response = server(&upstreams)
        .post("/api/verify-code")
        .json(&owner_body("654321"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INCORRECT_CODE");
}

#[tokio::test]
async fn should_complete_owner_signup_over_http() {
    let upstreams = Upstreams::start();
    let code_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();
    let row = code_row(code_id, "123456", Duration::minutes(1));
    upstreams.select("signup_codes", &[("email", "eq.a@x.com")], json!([row]));
    upstreams.find_users("a@x.com", json!([]));
    let code_filter = format!("eq.{code_id}");
    let consume = upstreams.update(
        "signup_codes",
        &[("id", code_filter.as_str()), ("used_at", "is.null")],
        json!([row]),
    );
    upstreams.create_user(&user_id.to_string(), "a@x.com");
    upstreams.select("companies", &[("select", "id")], json!([]));
    upstreams.insert(
        "companies",
        json!([{
            "id": company_id,
            "company_name": "Acme",
            "company_code": "ACM482913",
            "owner_user_id": user_id,
            "company_size": "3",
            "max_employees": null,
            "created_at": Utc::now(),
        }]),
    );
    let profile = upstreams.insert("profiles", json!([{ "user_id": user_id }]));

    let response = server(&upstreams)
        .post("/api/verify-code")
        .json(&owner_body("123456"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "ok": true,
            "created": true,
            "purpose": "owner_signup",
            "user_id": user_id,
            "company_id": company_id,
            "company_code": "ACM482913",
        })
    );
    consume.assert();
    profile.assert();
}

#[tokio::test]
async fn should_release_code_when_identity_service_fails() {
    let upstreams = Upstreams::start();
    let code_id = Uuid::new_v4();
    let row = code_row(code_id, "123456", Duration::minutes(1));
    upstreams.select("signup_codes", &[("email", "eq.a@x.com")], json!([row]));
    upstreams.find_users("a@x.com", json!([]));
    let code_filter = format!("eq.{code_id}");
    upstreams.update(
        "signup_codes",
        &[("id", code_filter.as_str()), ("used_at", "is.null")],
        json!([row]),
    );
    let release = upstreams.supabase.mock(|when, then| {
        when.method(PATCH)
            .path(table_path("signup_codes"))
            .query_param("id", code_filter.as_str())
            .body(r#"{"used_at":null}"#);
        then.status(200).json_body(json!([row]));
    });
    upstreams.reject_user(500, "gotrue unavailable");

    let response = server(&upstreams)
        .post("/api/verify-code")
        .json(&owner_body("123456"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["kind"], "UPSTREAM");
    release.assert();
}

#[tokio::test]
async fn should_answer_conflict_for_registered_email() {
    let upstreams = Upstreams::start();
    upstreams.select(
        "signup_codes",
        &[("email", "eq.a@x.com")],
        json!([code_row(Uuid::new_v4(), "123456", Duration::minutes(1))]),
    );
    upstreams.find_users(
        "a@x.com",
        json!([{ "id": Uuid::new_v4(), "email": "a@x.com" }]),
    );

    let response = server(&upstreams)
        .post("/api/verify-code")
        .json(&owner_body("123456"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "EMAIL_ALREADY_REGISTERED");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let upstreams = Upstreams::start();

    let response = server(&upstreams)
        .post("/api/employee-link")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_BODY");
}

#[tokio::test]
async fn should_add_employee_over_http() {
    let upstreams = Upstreams::start();
    let company_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();
    upstreams.select("employees", &[("select", "id")], json!([]));
    upstreams.insert(
        "employees",
        json!([{
            "id": employee_id,
            "company_id": company_id,
            "full_name": "Jane Doe",
            "job_title": "Chef",
            "job_category": null,
            "employee_code": "ACM000123456",
            "is_admin": false,
            "user_id": null,
            "created_at": "2026-04-01T09:30:00Z",
        }]),
    );

    let response = server(&upstreams)
        .post("/api/app-employee")
        .json(&json!({
            "company_id": company_id,
            "company_code": "acm123456",
            "full_name": "Jane Doe",
            "job_title": "Chef",
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["ok"], true);
    assert_eq!(body["employee"]["id"], json!(employee_id));
    assert_eq!(body["employee"]["employee_code"], "ACM000123456");
    assert_eq!(body["employee"]["created_at"], "2026-04-01T09:30:00.000Z");
}

const COMPANY_CODE: &str = "ACM123456";

fn employee_code_row(id: Uuid, full_name: Option<&str>) -> Value {
    let created_at = Utc::now() - Duration::minutes(1);
    json!({
        "id": id,
        "email": "jane@x.com",
        "code_hash": hash_code("123456", TEST_CODE_SALT),
        "purpose": "employee_signup",
        "company_code": COMPANY_CODE,
        "full_name": full_name,
        "expires_at": created_at + Duration::minutes(10),
        "used_at": null,
        "created_at": created_at,
    })
}

fn roster_row(id: Uuid, company_id: Uuid, full_name: &str) -> Value {
    json!({
        "id": id,
        "company_id": company_id,
        "full_name": full_name,
        "job_title": "Chef",
        "job_category": null,
        "employee_code": "ACM000123456",
        "is_admin": false,
        "user_id": null,
        "created_at": "2026-04-01T09:30:00Z",
    })
}

/// Code, company and roster lookups for an employee signup at Acme.
fn seed_employee_signup(
    upstreams: &Upstreams,
    code_row: &Value,
    company_id: Uuid,
    roster: Value,
) {
    upstreams.select(
        "signup_codes",
        &[
            ("email", "eq.jane@x.com"),
            ("purpose", "eq.employee_signup"),
            ("company_code", "eq.ACM123456"),
        ],
        json!([code_row]),
    );
    upstreams.select(
        "companies",
        &[("select", "*"), ("company_code", "eq.ACM123456")],
        json!([{
            "id": company_id,
            "company_name": "Acme",
            "company_code": COMPANY_CODE,
            "owner_user_id": Uuid::new_v4(),
            "company_size": "10-49",
            "max_employees": null,
            "created_at": Utc::now(),
        }]),
    );
    let company_filter = format!("eq.{company_id}");
    upstreams.select("employees", &[("company_id", company_filter.as_str())], roster);
}

#[tokio::test]
async fn should_link_employee_over_http() {
    let upstreams = Upstreams::start();
    let code_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let row = employee_code_row(code_id, None);
    let entry = roster_row(employee_id, company_id, "Jane Doe");
    seed_employee_signup(&upstreams, &row, company_id, json!([entry]));
    upstreams.find_users("jane@x.com", json!([]));
    let code_filter = format!("eq.{code_id}");
    let consume = upstreams.update(
        "signup_codes",
        &[("id", code_filter.as_str()), ("used_at", "is.null")],
        json!([row]),
    );
    let create_user = upstreams.create_user(&user_id.to_string(), "jane@x.com");
    let employee_filter = format!("eq.{employee_id}");
    let link = upstreams.update(
        "employees",
        &[("id", employee_filter.as_str()), ("user_id", "is.null")],
        json!([entry]),
    );
    let profile = upstreams.insert("profiles", json!([{ "user_id": user_id }]));

    let response = server(&upstreams)
        .post("/api/employee-link")
        .json(&json!({
            "email": " Jane@X.com ",
            "code": "123456",
            "password": "longenough1",
            "company_code": "acm123456",
            "full_name": "  jane doe ",
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "ok": true, "user_id": user_id, "company_id": company_id })
    );
    consume.assert();
    create_user.assert();
    link.assert();
    profile.assert();
}

#[tokio::test]
async fn should_complete_employee_signup_through_verify_code() {
    let upstreams = Upstreams::start();
    let code_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let row = employee_code_row(code_id, Some("Jane Doe"));
    let entry = roster_row(employee_id, company_id, "JANE DOE");
    seed_employee_signup(&upstreams, &row, company_id, json!([entry]));
    upstreams.find_users("jane@x.com", json!([]));
    let code_filter = format!("eq.{code_id}");
    upstreams.update(
        "signup_codes",
        &[("id", code_filter.as_str()), ("used_at", "is.null")],
        json!([row]),
    );
    upstreams.create_user(&user_id.to_string(), "jane@x.com");
    let employee_filter = format!("eq.{employee_id}");
    let link = upstreams.update(
        "employees",
        &[("id", employee_filter.as_str()), ("user_id", "is.null")],
        json!([entry]),
    );
    upstreams.insert("profiles", json!([{ "user_id": user_id }]));

    let response = server(&upstreams)
        .post("/api/verify-code")
        .json(&json!({
            "email": "jane@x.com",
            "code": 123456,
            "purpose": "employee_signup",
            "password": "longenough1",
            "company_code": COMPANY_CODE,
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "ok": true,
            "created": true,
            "purpose": "employee_signup",
            "user_id": user_id,
            "company_id": company_id,
            "company_code": COMPANY_CODE,
            "employee_id": employee_id,
        })
    );
    link.assert();
}

#[tokio::test]
async fn should_reject_employee_missing_from_roster_before_creating_user() {
    let upstreams = Upstreams::start();
    let code_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();
    let row = employee_code_row(code_id, None);
    seed_employee_signup(
        &upstreams,
        &row,
        company_id,
        json!([roster_row(Uuid::new_v4(), company_id, "John Smith")]),
    );
    let lookup = upstreams.find_users("jane@x.com", json!([]));
    let consume = upstreams.update("signup_codes", &[], json!([row]));
    let create_user = upstreams.create_user(&Uuid::new_v4().to_string(), "jane@x.com");

    let response = server(&upstreams)
        .post("/api/employee-link")
        .json(&json!({
            "email": "jane@x.com",
            "code": "123456",
            "password": "longenough1",
            "company_code": COMPANY_CODE,
            "full_name": "Jane Doe",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "EMPLOYEE_NOT_ON_ROSTER");
    lookup.assert_calls(0);
    consume.assert_calls(0);
    create_user.assert_calls(0);
}
