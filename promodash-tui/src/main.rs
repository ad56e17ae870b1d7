// Interactive admin console over the promotions REST API.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use promodash_common_ui::commands::auth::AuthCommands;
use promodash_common_ui::{AppState, ReqwestTransport};
use promodash_tui::{commands::dispatch, render, ConsoleModule, TuiCompleter};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "promodash")]
#[command(author, version, about = "Promodash - admin console for promotional campaigns")]
struct Args {
    /// Base URL of the REST API
    #[arg(long, env = "PROMODASH_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Log in on start-up with this email
    #[arg(long, env = "PROMODASH_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "PROMODASH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Rows per list page
    #[arg(long, default_value = "10")]
    page_size: u32,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    no_color: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("promodash=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

fn history_path() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("promodash");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("history.txt"))
}

/// Prints toasts and session events raised by the last command.
fn flush_feedback(console: &mut ConsoleModule) {
    let toasts = console.take_toasts();
    if !toasts.is_empty() {
        print!("{}", render::render_toasts(&toasts));
    }
    for event in console.state.drain_auth_events() {
        warn!("auth event: {:?}", event);
        println!("{}", render::render_auth_event(&event));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing();
    if args.no_color {
        colored::control::set_override(false);
    }

    let transport = ReqwestTransport::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    let state = AppState::new(Arc::new(transport), args.page_size);
    let mut console = ConsoleModule::new(state);
    info!("Using API at {}", args.api_url);

    println!("Promodash console ({})", args.api_url);

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        match AuthCommands::login(&console.state.client, email, password, &console.state.notifications).await {
            Ok(result) => {
                println!("Logged in as {}.", email);
                print!("{}", render::render_warnings(&result.warnings));
            }
            Err(e) => {
                error!("Start-up login failed: {}", e);
                println!("Login failed: {}", e);
            }
        }
        console.take_toasts();
    } else {
        println!("Not logged in. Use 'login <email> <password>'.");
    }
    println!("Type 'help' for available commands.\n");

    let mut rl: Editor<TuiCompleter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(TuiCompleter::new()));
    let history = history_path();
    if let Some(path) = &history {
        // First run has no history file yet
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = console.prompt_string();
        let line = match tokio::task::block_in_place(|| rl.readline(&prompt)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C (type 'quit' to exit)");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                error!("readline failed: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = rl.add_history_entry(line) {
            warn!("could not record history: {}", e);
        }

        let (quit, output) = dispatch(line, &mut console).await;
        if let Some(text) = output {
            println!("{}", text.trim_end());
        }
        flush_feedback(&mut console);
        if quit {
            break;
        }
    }

    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            warn!("could not save history: {}", e);
        }
    }
    Ok(())
}
