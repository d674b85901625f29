use tracing::info;

use onboard_core::tracing::init_tracing;
use onboard_signup::config::SignupConfig;
use onboard_signup::router::build_router;
use onboard_signup::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = SignupConfig::from_env().expect("invalid signup configuration");
    let addr = format!("0.0.0.0:{}", config.signup_port);

    let http = reqwest::Client::builder()
        .build()
        .expect("failed to build HTTP client");
    let state = AppState::new(config, http);

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("signup service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
