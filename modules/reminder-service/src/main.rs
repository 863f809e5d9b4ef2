//! Reminder Service: standalone binary serving the reminder JSON API.
//!
//! Default: http://0.0.0.0:3000/

use reminder_service::config::Config;
use reminder_service::routes::AppState;
use reminder_service::store::Store;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Using data file: {}", config.data_path);
    let store = Arc::new(Store::new(&config.data_path));
    match store.load() {
        Ok(reminders) => log::info!("Loaded {} reminders", reminders.len()),
        Err(e) => log::warn!("Could not load {}: {}", config.data_path, e),
    }

    let state = Arc::new(AppState::new(store));
    let app = reminder_service::build_router(state);

    let addr = config.bind_addr();
    log::info!("Reminder Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
