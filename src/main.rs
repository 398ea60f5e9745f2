use std::time::Duration;

use actix::SyncArbiter;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use services::db_utils::{get_db_pool, init_schema, AppState, DbActor};
use settings::Settings;
use types::StartupError;

mod schema;
mod services;
mod settings;
mod types;


fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    let settings = Settings::load()?;
    init_logging(&settings.log_level);

    let pool = get_db_pool(
        &settings.database.url,
        Duration::from_millis(settings.database.busy_timeout_ms),
    )?;
    init_schema(&pool)?;
    tracing::info!(database = %settings.database.url, "cafe table ready");

    let api_keys = settings.api_keys();
    if api_keys.is_empty() {
        tracing::warn!("no api keys configured, every delete request will be rejected");
    }

    let db = SyncArbiter::start(settings.database.workers, move || DbActor(pool.clone()));
    let state = Data::new(AppState { db, api_keys });

    let bind = (settings.server.host.clone(), settings.server.port);
    tracing::info!(host = %bind.0, port = bind.1, "starting cafe api");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(services::configure)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
