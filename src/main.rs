use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use newsroom::app::{self, AppState};
use newsroom::auth::token::{JwtVerifier, TokenVerifier};
use newsroom::config::{CliArgs, Command, Settings, StoreBackend};
use newsroom::db::extras_repository::ExtrasRepository;
use newsroom::db::memory::{InMemoryBlogRepository, InMemoryExtrasRepository};
use newsroom::db::models::{ExtrasEntry, YT_CAROUSEL_TITLE};
use newsroom::db::repository::BlogRepository;

type Stores = (Arc<dyn BlogRepository>, Arc<dyn ExtrasRepository>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let settings = Settings::load(args.config_file.as_deref())?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log.filter.clone().into()),
        )
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::IssueToken {
            subject,
            manager,
            ttl_hours,
        } => {
            let jwt = JwtVerifier::new(&settings.auth.jwt_secret, settings.auth.issuer.clone());
            let roles = if manager {
                vec!["manager".to_string()]
            } else {
                vec!["reader".to_string()]
            };
            let token = jwt.issue(&subject, &roles, chrono::Duration::hours(ttl_hours))?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!("Starting newsroom server...");

    let (blogs, extras) = open_stores(&settings).await?;
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(
        &settings.auth.jwt_secret,
        settings.auth.issuer.clone(),
    ));

    let state = AppState::new(blogs, extras, verifier);
    let router = app::mount(app::router(state), &settings.server.base_path);

    let addr = settings.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on http://{}{}", addr, settings.server.base_path);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    match settings.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            let blogs: Arc<dyn BlogRepository> = Arc::new(InMemoryBlogRepository::new());
            let extras: Arc<dyn ExtrasRepository> =
                Arc::new(InMemoryExtrasRepository::with_entry(ExtrasEntry {
                    title: YT_CAROUSEL_TITLE.to_string(),
                    list: Vec::new(),
                }));
            Ok((blogs, extras))
        }
        StoreBackend::Mongo => connect_mongo(settings).await,
    }
}

#[cfg(feature = "mongo")]
async fn connect_mongo(settings: &Settings) -> anyhow::Result<Stores> {
    use newsroom::db::extras_repository::MongoExtrasRepository;
    use newsroom::db::repository::MongoBlogRepository;

    let client = mongodb::Client::with_uri_str(&settings.mongodb.uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let db = client.database(&settings.mongodb.database);

    tracing::info!(
        database = %settings.mongodb.database,
        "Connected to MongoDB"
    );

    let blogs: Arc<dyn BlogRepository> = Arc::new(MongoBlogRepository::new(
        &db,
        &settings.mongodb.blogs_collection,
    ));
    let extras: Arc<dyn ExtrasRepository> = Arc::new(MongoExtrasRepository::new(
        &db,
        &settings.mongodb.extras_collection,
    ));
    Ok((blogs, extras))
}

#[cfg(not(feature = "mongo"))]
async fn connect_mongo(_settings: &Settings) -> anyhow::Result<Stores> {
    anyhow::bail!("store.backend = \"mongo\" requires building with the `mongo` feature")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
