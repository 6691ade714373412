use std::net::SocketAddr;
use std::path::Path;
use std::process;

use axum_extra::extract::cookie::Key;
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use citycare::config;
use citycare::error::AppError;
use citycare::models::{AppState, Role};
use citycare::routes::build_router;
use citycare::services::{account_service, seed_service};
use citycare::store::mirror::DocumentMirror;
use citycare::store::sql;

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);

    let db_path = config::get_database_path();
    let conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(%e, path = %db_path, "Failed to open database");
            eprintln!("{} {}: {}", yansi::Paint::red("Failed to open database at"), db_path, e);
            process::exit(1);
        }
    };
    if let Err(e) = sql::init_schema(&conn) {
        tracing::error!(%e, "Failed to initialise database schema");
        eprintln!("{}: {}", yansi::Paint::red("Failed to initialise database schema"), e);
        process::exit(1);
    }

    let mirror = DocumentMirror::connect(&config::get_mirror_url());
    if !mirror.is_available() {
        // The mirror is best-effort; the server runs without it.
        tracing::warn!("document mirror is unavailable; continuing with the relational store only");
    }

    let signing_key = match config::get_session_secret() {
        Some(secret) => signing_key_from_secret(&secret),
        None => Key::generate(),
    };

    AppState::new(conn, mirror, signing_key)
}

/// Stretch the configured secret to the 64 bytes of key material the
/// cookie jar expects.
fn signing_key_from_secret(secret: &str) -> Key {
    let mut material = [0u8; 64];
    let first = Sha256::digest(secret.as_bytes());
    let second = Sha256::digest(first.as_slice());
    material[..32].copy_from_slice(first.as_slice());
    material[32..].copy_from_slice(second.as_slice());
    Key::from(&material)
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_router(state);
    tracing::info!(%addr, "Starting CityCare server");
    println!(
        "{} {}",
        yansi::Paint::new("CityCare portal running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "citycare",
    author,
    version,
    about = "CityCare Hospital record portal",
    long_about = r#"CityCare — role-based hospital record portal.

Runs the web portal (registration, login, role dashboards, patient
records) against a SQLite credential/patient store with a best-effort
document mirror. Configuration comes from the environment or an
`--env-file` (DATABASE_PATH, MIRROR_URL, SESSION_SECRET, HOST, PORT).

Examples:
  1) Run the portal:
      citycare serve --host 127.0.0.1 --port 5000
  2) Import the reference dataset:
      citycare seed stroke_data.csv
  3) Create a doctor account from the terminal:
      citycare users add doc1 pw12345 doctor
"#,
    after_help = "Use `citycare <subcommand> --help` for subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (defaults to HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (defaults to PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Import the reference dataset CSV into the patient store
    Seed {
        /// Path to the dataset CSV (stroke_data.csv)
        csv: String,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Manage accounts in the credential store
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(about = "List accounts", long_about = "Enumerate accounts in the credential store (username, role, created).")]
    List,
    #[command(about = "Add an account", long_about = "Create an account with a role (doctor|patient|staff|admin). The password is hashed before it is stored.")]
    Add {
        username: String,
        password: String,
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    // No subcommand: serve with environment defaults.
    if cli.command.is_none() {
        let state = build_state_from_env(None);
        let (host, port) = (config::get_host(), config::get_port());
        start_server(state, &host, port).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve { host, port, env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            let host = host.unwrap_or_else(config::get_host);
            let port = port.unwrap_or_else(config::get_port);
            start_server(state, &host, port).await;
        }
        Commands::Seed { csv, env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            match seed_service::import_csv(&state, Path::new(&csv)) {
                Ok(report) => {
                    println!(
                        "{} {} {} ({} skipped)",
                        yansi::Paint::new("Imported").green(),
                        report.imported,
                        yansi::Paint::new("patient records").green(),
                        report.skipped
                    );
                    if report.mirror_failures > 0 {
                        println!(
                            "{}",
                            yansi::Paint::new(format!(
                                "{} record(s) could not be mirrored; the relational store is complete",
                                report.mirror_failures
                            ))
                            .yellow()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::red("Import failed"), e);
                    process::exit(1);
                }
            }
        }
        Commands::Users { sub } => {
            let state = build_state_from_env(None);
            match sub {
                UserCommands::List => {
                    let users = {
                        let conn = state.db.lock().unwrap();
                        match sql::list_users(&conn) {
                            Ok(users) => users,
                            Err(e) => {
                                eprintln!("{}: {}", yansi::Paint::red("Failed to list accounts"), e);
                                process::exit(1);
                            }
                        }
                    };
                    let mut table = Table::new();
                    table.load_preset(presets::UTF8_FULL);
                    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    if let Some((Width(w), _)) = terminal_size() {
                        table.set_width(w - 4);
                    }
                    table.set_header(vec!["Username", "Role", "Created"]);
                    for user in &users {
                        table.add_row(vec![&user.username, user.role.as_str(), &user.created_at]);
                    }
                    println!("\n{table}\n");
                }
                UserCommands::Add { username, password, role } => {
                    let role = match Role::parse(&role) {
                        Ok(role) => role,
                        Err(e) => {
                            eprintln!("{}: {}", yansi::Paint::red("Invalid role"), e);
                            process::exit(1);
                        }
                    };
                    match account_service::create_user(&state, &username, &password, role) {
                        Ok(user) => {
                            println!(
                                "{} '{}' {}",
                                yansi::Paint::new("Account").green(),
                                user.username,
                                yansi::Paint::new(format!("created with role {}", user.role.as_str())).green()
                            );
                        }
                        Err(AppError::DuplicateUsername) => {
                            eprintln!(
                                "{} '{}' {}",
                                yansi::Paint::new("Account").red(),
                                username,
                                yansi::Paint::new("already exists").red()
                            );
                            process::exit(1);
                        }
                        Err(AppError::Validation(fields)) => {
                            eprintln!(
                                "{}: {}",
                                yansi::Paint::red("Invalid account details"),
                                fields.join(", ")
                            );
                            process::exit(1);
                        }
                        Err(e) => {
                            eprintln!("{}: {}", yansi::Paint::red("Failed to create account"), e);
                            process::exit(1);
                        }
                    }
                }
            }
        }
    }
}
