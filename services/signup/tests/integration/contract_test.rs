use std::collections::HashMap;

use axum::http::{HeaderName, HeaderValue, Method};
use axum_test::TestServer;
use serde_json::Value;

use onboard_core::config::Env;
use onboard_signup::config::SignupConfig;
use onboard_signup::router::build_router;
use onboard_signup::state::AppState;
use onboard_testing::fixture::Fixture;
use onboard_testing::rest::{TEST_CODE_SALT, TEST_EMAIL_KEY, TEST_SERVICE_KEY};

/// Fixtures only cover requests rejected before any upstream call, so the upstream URLs
/// point at a closed port.
fn offline_server() -> TestServer {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SUPABASE_URL", "http://127.0.0.1:9"),
        ("SUPABASE_SERVICE_ROLE_KEY", TEST_SERVICE_KEY),
        ("CODE_SALT", TEST_CODE_SALT),
        ("RESEND_API_KEY", TEST_EMAIL_KEY),
        ("RESEND_URL", "http://127.0.0.1:9"),
    ]);
    let config = SignupConfig::from_lookup(Env::new(move |name: &str| {
        vars.get(name).map(|v| (*v).to_owned())
    }))
    .unwrap();
    TestServer::new(build_router(AppState::new(config, reqwest::Client::new()))).unwrap()
}

#[tokio::test]
async fn should_satisfy_every_signup_contract_fixture() {
    let fixtures = Fixture::load_service("signup");
    assert!(!fixtures.is_empty(), "expected signup fixtures");
    let server = offline_server();

    for fixture in fixtures {
        let method = Method::from_bytes(fixture.request.method.to_uppercase().as_bytes())
            .unwrap_or_else(|_| panic!("[{}] bad method", fixture.id));
        let mut request = server.method(method, &fixture.request.path);
        for (name, value) in &fixture.request.headers {
            request = request.add_header(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        if let Some(body) = &fixture.request.body {
            request = request.json(body);
        }

        let response = request.await;

        assert_eq!(
            response.status_code().as_u16(),
            fixture.expect.status,
            "[{}] {}",
            fixture.id,
            fixture.description
        );
        if let Some(expected) = &fixture.expect.body {
            assert_eq!(
                &response.json::<Value>(),
                expected,
                "[{}] {}",
                fixture.id,
                fixture.description
            );
        }
    }
}
