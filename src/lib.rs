pub mod application;
pub mod cache;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::auth_service::AuthService;
use application::invoice_service::InvoiceService;
use cache::PageCache;
use infrastructure::credentials::DieselCredentialsProvider;
use infrastructure::invoice_repo::DieselInvoiceRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoices::list_invoices,
        handlers::invoices::create_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::auth::authenticate,
    ),
    tags(
        (name = "invoices", description = "Invoice form actions"),
        (name = "auth", description = "Credentials sign-in"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Routes for the dashboard actions and sign-in. The services are expected as
/// app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard/invoices")
            .route("", web::get().to(handlers::invoices::list_invoices))
            .route("", web::post().to(handlers::invoices::create_invoice))
            .route("/{id}", web::get().to(handlers::invoices::get_invoice))
            .route("/{id}/edit", web::post().to(handlers::invoices::update_invoice))
            .route("/{id}/delete", web::post().to(handlers::invoices::delete_invoice)),
    )
    .route("/login", web::post().to(handlers::auth::authenticate));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let pages = Arc::new(PageCache::new());
    let invoices = web::Data::new(InvoiceService::new(
        Arc::new(DieselInvoiceRepository::new(pool.clone())),
        pages,
    ));
    let auth = web::Data::new(AuthService::new(Arc::new(DieselCredentialsProvider::new(
        pool,
    ))));
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(invoices.clone())
            .app_data(auth.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
