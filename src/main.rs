use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use orgmanager_backend::config::AppConfig;
use orgmanager_backend::db::{self, EmployeeStore, InMemoryEmployeeStore, PgEmployeeStore};
use orgmanager_backend::handlers;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let store: Arc<dyn EmployeeStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.max_connections)
                .await
                .map_err(io::Error::other)?;
            db::run_migrations(&pool).await.map_err(io::Error::other)?;
            info!("Using PostgreSQL employee store");
            Arc::new(PgEmployeeStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; employees are kept in memory");
            Arc::new(InMemoryEmployeeStore::new())
        }
    };

    info!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(store.clone()))
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
