use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use clinibot_common::traits::{MessageSender, SchedulingGateway, UserStore};
use clinibot_core::crypto::SignatureVerifier;
use clinibot_core::eventbus::spawn_audit_logger;
use clinibot_core::platforms::{DentalinkClient, WhatsAppClient};
use clinibot_core::repositories::{InMemoryUserStore, PostgresUserStore};
use clinibot_core::services::ConversationService;
use clinibot_core::webhook::{self, WebhookState};
use clinibot_core::{AppConfig, Database, Error};

#[derive(Parser, Debug, Clone)]
#[command(name = "clinibot")]
#[command(author, version, about = "Clinibot - WhatsApp appointment assistant for Dentalink clinics")]
struct Args {
    /// Address the webhook server binds to
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://clinibot@localhost:5432/clinibot")]
    database_url: String,

    /// Keep users and audit entries in memory (local testing only)
    #[arg(long, default_value = "false")]
    in_memory: bool,

    /// Do not run migrations on startup
    #[arg(long, default_value = "false")]
    skip_migrations: bool,

    /// Capacity of the background audit queue
    #[arg(long, default_value = "256")]
    audit_buffer: usize,
}

fn init_tracing() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::from_default_env()
        .add_directive("clinibot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("A global tracing subscriber was already set.");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("Clinibot starting. bind={}, in_memory={}", args.bind, args.in_memory);

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(Box::new(e) as Box<dyn std::error::Error>);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_server(args: Args) -> Result<(), Error> {
    // 1) Configuration, loaded once.
    let config = AppConfig::from_env()?;
    config.validate()?;
    let addr: SocketAddr = args.bind.parse()
        .map_err(|e| Error::Config(format!("invalid --bind '{}': {}", args.bind, e)))?;

    // 2) Storage
    let store: Arc<dyn UserStore> = if args.in_memory {
        warn!("Using the in-memory user store; nothing survives a restart.");
        Arc::new(InMemoryUserStore::new())
    } else {
        let db = Database::new(&args.database_url).await?;
        if !args.skip_migrations {
            db.migrate().await?;
        }
        Arc::new(PostgresUserStore::new(db.pool().clone()))
    };

    // 3) Background audit writer
    let (audit, audit_task) = spawn_audit_logger(store.clone(), args.audit_buffer);

    // 4) Outbound clients
    let gateway: Arc<dyn SchedulingGateway> = Arc::new(DentalinkClient::from_config(&config)?);
    let sender: Arc<dyn MessageSender> = Arc::new(WhatsAppClient::from_config(&config)?);

    let conversation = Arc::new(ConversationService::new(
        &config,
        store,
        gateway,
        sender,
        audit.clone(),
    ));

    let verifier = SignatureVerifier::new(&config.app_secret);
    if !verifier.is_enabled() {
        warn!("Webhook signatures are NOT being verified.");
    }

    let state = WebhookState {
        conversation,
        verifier,
        verify_token: config.verify_token.clone(),
    };

    // 5) Serve until Ctrl-C
    webhook::serve(addr, state, shutdown_signal()).await?;

    // 6) Let queued audit entries land before exiting.
    if let Err(e) = audit.flush_now().await {
        warn!("Final audit flush failed: {:?}", e);
    }
    drop(audit);
    if tokio::time::timeout(Duration::from_secs(5), audit_task).await.is_err() {
        warn!("Audit logger did not stop within 5s.");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received => shutting down.");
}
