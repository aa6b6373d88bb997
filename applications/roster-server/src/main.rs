/// Roster Server - employee records and performance feedback
use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_core::CreateUser;
use roster_importer::EmployeeImporter;
use roster_server::{config::ServerConfig, services::AuthService, state::AppState};
use roster_storage::Database;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Employee roster and performance feedback server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long, env = "ROSTER_NEW_USER_PASSWORD")]
        password: String,
        /// Grant manager rights
        #[arg(long)]
        manager: bool,
    },
    /// Replace a user's password
    SetPassword {
        /// Username
        #[arg(short, long)]
        username: String,
        /// New password
        #[arg(short, long, env = "ROSTER_NEW_USER_PASSWORD")]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Import employees from a CSV file
    Import {
        /// CSV file to read
        file: PathBuf,
        /// Username of the manager performing the import
        #[arg(long = "as", value_name = "USERNAME")]
        as_user: String,
    },
    /// Export all employees to a CSV file
    Export {
        /// Destination file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            username,
            email,
            password,
            manager,
        } => add_user(&config, username, email, &password, manager).await?,
        Commands::SetPassword { username, password } => {
            set_password(&config, &username, &password).await?;
        }
        Commands::ListUsers => list_users(&config).await?,
        Commands::Import { file, as_user } => import(&config, &file, &as_user).await?,
        Commands::Export { file } => export(&config, &file).await?,
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Roster Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Manager visibility: {:?}", config.access.visibility);

    let db = Arc::new(Database::new(&config.storage.database_url).await?);
    tracing::info!("Database connected");

    let auth_service = Arc::new(auth_service(&config));
    let app_state = AppState::new(db, auth_service, config.access.visibility);

    let app = roster_server::create_router(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    username: String,
    email: String,
    password: &str,
    is_manager: bool,
) -> anyhow::Result<()> {
    let db = Database::new(&config.storage.database_url).await?;

    let password_hash = auth_service(config).hash_password(password)?;
    let user = roster_storage::users::create(
        db.pool(),
        CreateUser {
            username,
            email,
            password_hash,
            is_manager,
        },
    )
    .await?;

    println!(
        "Created {} {} (id {})",
        if user.is_manager { "manager" } else { "user" },
        user.username,
        user.id
    );

    Ok(())
}

async fn set_password(config: &ServerConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let db = Database::new(&config.storage.database_url).await?;

    let user = roster_storage::users::find_by_username(db.pool(), username)
        .await?
        .with_context(|| format!("no user named {username}"))?;

    let password_hash = auth_service(config).hash_password(password)?;
    roster_storage::users::set_password_hash(db.pool(), user.id, &password_hash).await?;

    println!("Password updated for {} (id {})", user.username, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let db = Database::new(&config.storage.database_url).await?;
    let users = roster_storage::users::get_all(db.pool()).await?;

    println!("Users:");
    for user in users {
        let role = if user.is_manager { "manager" } else { "employee" };
        println!("  {} - {} <{}> ({})", user.id, user.username, user.email, role);
    }

    Ok(())
}

async fn import(config: &ServerConfig, file: &Path, as_user: &str) -> anyhow::Result<()> {
    let db = Database::new(&config.storage.database_url).await?;

    let actor = roster_storage::users::find_by_username(db.pool(), as_user)
        .await?
        .with_context(|| format!("no user named {as_user}"))?;

    let summary = EmployeeImporter::new(db.pool().clone())
        .import_file(file, &actor)
        .await?;

    println!(
        "Imported {} rows ({} created, {} updated), skipped {}",
        summary.imported(),
        summary.created,
        summary.updated,
        summary.skipped.len()
    );
    for skipped in &summary.skipped {
        println!(
            "  line {}: {} ({})",
            skipped.line,
            skipped.external_id.as_deref().unwrap_or("-"),
            skipped.reason
        );
    }

    Ok(())
}

async fn export(config: &ServerConfig, file: &Path) -> anyhow::Result<()> {
    let db = Database::new(&config.storage.database_url).await?;

    let csv = roster_importer::export_csv(db.pool()).await?;
    tokio::fs::write(file, csv)
        .await
        .with_context(|| format!("writing {}", file.display()))?;

    println!("Exported employees to {}", file.display());

    Ok(())
}
