use std::{net::SocketAddr, sync::Arc};

use mongodb::Client;
use tracing_subscriber::EnvFilter;

use stockportal::{
    config, routes,
    services::{
        db_init,
        user_store::{MemoryUserStore, MongoUserStore, UserStore},
    },
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = config::load();

    let users: Arc<dyn UserStore> = if settings.user_store.eq_ignore_ascii_case("memory") {
        tracing::warn!("using in-memory user store, accounts are lost on restart");
        Arc::new(MemoryUserStore::new())
    } else {
        let client = Client::with_uri_str(&settings.mongodb_uri).await?;
        let db = client.database(&settings.mongodb_db);

        if let Err(e) = db_init::ensure_indexes(&db).await {
            tracing::warn!("could not ensure indexes: {e}");
        }

        Arc::new(MongoUserStore::new(db))
    };

    if settings.itick_api_key.is_none() {
        tracing::warn!("ITICK_API_KEY is not set, /api/stock/ will answer 500");
    }

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>()?, settings.port));

    let state = AppState::new(settings, users);
    let app = routes::app(state);

    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
