//! Parley
//!
//! Interactive terminal chat. Follows the route guards: signed-out users get
//! the sign-in and registration prompts, signed-in users land in the chat.
//!
//! In the chat every line is sent as a message, except for:
//! - `/profile` - show the profile and optionally rename
//! - `/rename <username>` - rename without leaving the chat
//! - `/logout` - end the session
//! - `/quit` - leave, keeping the session

use anyhow::Context;
use parley::views::{format_date_time, format_time};
use parley::{App, ChatPhase, ChatState, Config, Route};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load_default();

    // Keep log lines out of the chat
    if config.logging.file.is_none() {
        let path = config.storage.data_path().join("parley.log");
        config.logging.file = Some(path.to_string_lossy().to_string());
    }
    parley::logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("Parley v{}", env!("CARGO_PKG_VERSION"));

    let app = App::new(config).context("Failed to create the chat client")?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let mut route = Route::Home;
    loop {
        let target = app.navigate(route.path()).target();
        tracing::debug!(requested = %route, shown = %target, "Navigating");

        let next = match target {
            Route::Login => login_screen(&app, &mut input).await?,
            Route::Register => register_screen(&app, &mut input).await?,
            Route::Home => chat_screen(&app, &mut input).await?,
            Route::Profile => profile_screen(&app, &mut input).await?,
        };

        match next {
            Some(next) => route = next,
            None => break,
        }
    }

    tracing::info!("Parley shutdown complete");
    Ok(())
}

/// Print `label` and read one line; `None` on end of input
async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

async fn login_screen(app: &App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    println!();
    println!("Sign in (leave the username empty to create an account)");

    let mut form = app.login_form();
    loop {
        let Some(username) = prompt(input, "Username: ").await? else {
            return Ok(None);
        };
        if username.trim().is_empty() {
            return Ok(Some(Route::Register));
        }
        let Some(password) = prompt(input, "Password: ").await? else {
            return Ok(None);
        };

        form.username = username.trim().to_string();
        form.password = password;

        if let Some(route) = form.submit().await {
            return Ok(Some(route));
        }
        if let Some(error) = form.error() {
            eprintln!("{}", error);
        }
    }
}

async fn register_screen(app: &App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    println!();
    println!("Create an account (leave the username empty to sign in instead)");

    let mut form = app.register_form();
    loop {
        let Some(username) = prompt(input, "Username: ").await? else {
            return Ok(None);
        };
        if username.trim().is_empty() {
            return Ok(Some(Route::Login));
        }
        let Some(password) = prompt(input, "Password: ").await? else {
            return Ok(None);
        };
        let Some(confirm) = prompt(input, "Confirm password: ").await? else {
            return Ok(None);
        };

        form.username = username.trim().to_string();
        form.password = password;
        form.confirm_password = confirm;

        if let Some(route) = form.submit().await {
            return Ok(Some(route));
        }
        if let Some(error) = form.error() {
            eprintln!("{}", error);
        }
    }
}

async fn profile_screen(app: &App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let view = app.profile_view();
    view.load().await;

    let state = view.state();
    println!();
    match &state.profile {
        Some(profile) => {
            println!("Username:   {}", profile.username);
            println!("Registered: {}", format_date_time(&profile.created_at));
        }
        None => {
            eprintln!("{}", state.error.as_deref().unwrap_or_default());
            view.unmount();
            return Ok(Some(Route::Home));
        }
    }

    let Some(username) = prompt(input, "New username (empty to go back): ").await? else {
        view.unmount();
        return Ok(None);
    };

    if !username.trim().is_empty() {
        view.set_username(username.trim());
        view.save().await;
        print_outcome(&view.state().error, &view.state().success);
    }

    view.unmount();
    Ok(Some(Route::Home))
}

async fn rename(app: &App, username: &str) {
    let view = app.profile_view();
    view.load().await;

    let state = view.state();
    if state.profile.is_some() {
        view.set_username(username);
        view.save().await;
    }

    let state = view.state();
    print_outcome(&state.error, &state.success);
    view.unmount();
}

fn print_outcome(error: &Option<String>, success: &Option<String>) {
    if let Some(error) = error {
        eprintln!("{}", error);
    } else if let Some(success) = success {
        println!("{}", success);
    }
}

async fn chat_screen(app: &App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let chat = app.chat_view();
    let mut updates = chat.subscribe();

    println!();
    match chat.member() {
        Some(member) => println!("Signed in as {}", member.username),
        None => println!("Signed in"),
    }
    println!("Commands: /profile, /rename <username>, /logout, /quit");
    println!("Loading messages...");

    chat.mount().await;

    let mut shown: Option<ChatState> = None;
    render(&chat.state(), &mut shown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(Some(Route::Home));
                }
                let state = updates.borrow_and_update().clone();
                render(&state, &mut shown);
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    chat.unmount();
                    return Ok(None);
                };
                let line = line.trim();

                match line {
                    "/quit" => {
                        chat.unmount();
                        return Ok(None);
                    }
                    "/logout" => return Ok(Some(chat.logout())),
                    "/profile" => {
                        chat.unmount();
                        return Ok(Some(Route::Profile));
                    }
                    _ => {
                        if let Some(username) = line.strip_prefix("/rename ") {
                            rename(app, username.trim()).await;
                        } else {
                            chat.send(line).await;
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                chat.unmount();
                return Ok(None);
            }
        }
    }
}

/// Print what changed since the last render
fn render(state: &ChatState, shown: &mut Option<ChatState>) {
    let previous = shown.as_ref();

    if state.phase() == ChatPhase::Error && previous.map(|p| &p.error) != Some(&state.error) {
        eprintln!("{}", state.error.as_deref().unwrap_or_default());
    }

    if state.phase() != ChatPhase::Loading
        && previous.map(|p| &p.messages) != Some(&state.messages)
    {
        println!("{}", "-".repeat(60));
        if state.messages.is_empty() {
            println!("No messages yet.");
        }
        // Oldest first, like a terminal scrollback
        for message in state.messages.iter().rev() {
            println!(
                "[{}] {}: {}",
                format_time(&message.created_at),
                message.author_username,
                message.text
            );
        }
    }

    if let Some(error) = &state.send_error {
        if previous.and_then(|p| p.send_error.as_ref()) != Some(error) {
            eprintln!("{}", error);
        }
    }

    *shown = Some(state.clone());
}
