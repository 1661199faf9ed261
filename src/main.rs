use kiosk_map::api::service::{State, router};
use kiosk_map::api::{kakao, store};
use kiosk_map::config::{Config, REQUIRED_VARIABLES};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{e}");
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::env().inspect_err(|e| {
        log::error!(
            "config: {e}. Check all required environment variables ({}) are set.",
            REQUIRED_VARIABLES.join(", ")
        );
    })?;

    config.log();

    let store = store::Client::new(&config.store_url)?;
    log::info!("Using kiosk store ({})", config.store_url);

    let kakao = kakao::Client::new(&config.kakao_url, &config.kakao_api_key)?;
    log::info!("Using geocoding provider ({})", config.kakao_url);

    let state = State::new(store, kakao, config.city_prefix.clone());

    let listen_addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    let router = router::router(state);

    log::info!("Listening on {listen_addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
