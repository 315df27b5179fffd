use dotenvy::dotenv;
use invoice_service::infrastructure::credentials::DieselCredentialsProvider;
use invoice_service::{build_server, create_pool, run_migrations};
use std::env;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "DATABASE_URL must be set"))?;
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PORT must be a valid number"))?;

    let pool = create_pool(&database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    if let (Ok(email), Ok(password)) = (env::var("SEED_USER_EMAIL"), env::var("SEED_USER_PASSWORD")) {
        let name = env::var("SEED_USER_NAME").unwrap_or_else(|_| "User".to_string());
        DieselCredentialsProvider::new(pool.clone())
            .ensure_user(&name, &email, &password)
            .map_err(io::Error::other)?;
        log::info!("seeded user {}", email);
    }

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(pool, &host, port)?.await
}
