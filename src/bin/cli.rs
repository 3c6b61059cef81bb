//! Parley CLI
//!
//! One-shot commands against the chat service:
//! - Sign in, register and sign out
//! - Show and rename the profile
//! - List and send messages
//! - Generate a config file
//!
//! The session is shared with the interactive client through the same
//! storage file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use parley::views::{format_date_time, format_time};
use parley::{App, Config, Member, Message, Profile, RegisterForm};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parley-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for a Parley group chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Chat service URL (default: from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        username: String,
        /// Password (default: read from stdin)
        #[arg(short, long)]
        password: Option<String>,
        /// Password again (default: read from stdin)
        #[arg(short, long)]
        confirm_password: Option<String>,
    },

    /// Sign in
    Login {
        username: String,
        /// Password (default: read from stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in member
    Whoami,

    /// Show the profile, or rename with --username
    Profile {
        /// New username
        #[arg(short, long)]
        username: Option<String>,
    },

    /// List the latest messages
    Messages {
        /// Number of messages (default: from config)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Send a message
    Send {
        /// Message text
        text: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    // Logs would mix with command output on stdout otherwise; keep them quiet
    if std::env::var("RUST_LOG").is_err() && config.logging.file.is_none() {
        config.logging.level = "warn".to_string();
    }
    parley::logging::init(&config.logging).context("Failed to initialize logging")?;

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_ref());
    }

    let app = App::new(config).context("Failed to create the chat client")?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Register {
            username,
            password,
            confirm_password,
        } => {
            let password = password_or_stdin(password, "Password: ")?;
            let confirm_password = password_or_stdin(confirm_password, "Confirm password: ")?;
            let mut form = register_form(&app, username, password, confirm_password);

            if form.submit().await.is_none() {
                fail(form.error().unwrap_or_default());
            }
            print_member(app.session().member(), json)?;
        }

        Commands::Login { username, password } => {
            let password = password_or_stdin(password, "Password: ")?;
            let mut form = app.login_form();
            form.username = username;
            form.password = password;

            if form.submit().await.is_none() {
                fail(form.error().unwrap_or_default());
            }
            print_member(app.session().member(), json)?;
        }

        Commands::Logout => {
            app.session().logout();
            println!("Signed out");
        }

        Commands::Whoami => {
            require_session(&app);
            print_member(app.session().member(), json)?;
        }

        Commands::Profile { username } => {
            require_session(&app);
            let view = app.profile_view();
            view.load().await;

            let state = view.state();
            if let Some(error) = state.error {
                fail(&error);
            }

            if let Some(username) = username {
                view.set_username(username);
                view.save().await;

                let state = view.state();
                if let Some(error) = state.error {
                    fail(&error);
                }
                if let Some(success) = &state.success {
                    eprintln!("{}", success);
                }
            }

            if let Some(profile) = view.state().profile {
                print_profile(&profile, json)?;
            }
            view.unmount();
        }

        Commands::Messages { limit } => {
            require_session(&app);
            let limit = limit.unwrap_or(app.config().chat.message_limit);

            match app.backend().fetch_messages(Some(limit)).await {
                Ok(messages) => print_messages(&messages, json)?,
                Err(e) => {
                    tracing::debug!(error = %e, "Fetch failed");
                    fail(&e.user_message(None, "Failed to load messages."));
                }
            }
        }

        Commands::Send { text } => {
            require_session(&app);
            let chat = app.chat_view();
            chat.send(&text.join(" ")).await;

            let state = chat.state();
            if let Some(error) = state.send_error {
                fail(&error);
            }
            if let Some(message) = state.messages.first() {
                print_messages(std::slice::from_ref(message), json)?;
            }
            chat.unmount();
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn require_session(app: &App) {
    if !app.session().is_authenticated() {
        eprintln!("Not signed in.");
        eprintln!();
        eprintln!("Sign in first with:");
        eprintln!("  parley-cli login <username>");
        std::process::exit(1);
    }
}

fn register_form(
    app: &App,
    username: String,
    password: String,
    confirm_password: String,
) -> RegisterForm {
    let mut form = app.register_form();
    form.username = username;
    form.password = password;
    form.confirm_password = confirm_password;
    form
}

fn password_or_stdin(password: Option<String>, label: &str) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("{}", label);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = parley::config::generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

fn print_member(member: Option<Member>, json: bool) -> anyhow::Result<()> {
    match (member, json) {
        (Some(member), true) => println!("{}", serde_json::to_string_pretty(&member)?),
        (Some(member), false) => println!("Signed in as {} (id {})", member.username, member.id),
        (None, true) => println!("null"),
        (None, false) => println!("Signed in"),
    }
    Ok(())
}

fn print_profile(profile: &Profile, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
        return Ok(());
    }

    println!("{:<12} {}", "ID", profile.id);
    println!("{:<12} {}", "Username", profile.username);
    println!("{:<12} {}", "Registered", format_date_time(&profile.created_at));
    Ok(())
}

fn print_messages(messages: &[Message], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    println!("{:<6} {:<16} {}", "Time", "Author", "Text");
    println!("{}", "-".repeat(60));

    // Oldest first
    for message in messages.iter().rev() {
        println!(
            "{:<6} {:<16} {}",
            format_time(&message.created_at),
            message.author_username,
            message.text
        );
    }
    Ok(())
}
