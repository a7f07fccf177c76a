//! Exam PDF Resolver - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_web::{App, HttpServer, web};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use exam_pdf_lib::api::{self, ApiDoc};
use exam_pdf_lib::config::Config;
use exam_pdf_lib::middleware;
use exam_pdf_lib::services::PdfResolver;

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check() {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - PDF_STRATEGY must be 'single', 'sequential' or 'concurrent'");
            error!("  - PDF_TEMPLATES entries may only use {{year}} {{month}} {{grade}} {{subject}} {{docType}}");
            error!("  - In production, PDF_STORAGE_BASE_URL must use https");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Exam PDF Resolver");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    info!(
        "Resolver: strategy={}, {} templates, storage={}",
        config.resolver.strategy,
        config.resolver.templates.len(),
        config.resolver.base_url
    );
    info!(
        "Upstream fetch limits: {}s timeout, {}s connect timeout, {} concurrent fetches",
        config.fetch.timeout.as_secs(),
        config.fetch.connect_timeout.as_secs(),
        config.resolver.max_concurrent_fetches
    );

    let resolver = match PdfResolver::new(config.resolver.clone(), &config.fetch) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to initialize resolver: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let resolver = web::Data::new(resolver);

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            // CORS headers on every response, errors included
            .wrap(api::cors_headers())
            .wrap(middleware::RequestLogger)
            .app_data(resolver.clone())
            // Registered before the /api scope, which would otherwise claim the prefix
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", ApiDoc::openapi()),
            )
            .service(web::scope("/api").configure(api::configure_routes))
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
