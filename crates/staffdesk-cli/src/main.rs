mod app;
mod commands;
mod context;
mod demo;
mod event;
mod theme;
mod ui;

use app::App;
use clap::{Parser, Subcommand};
use context::Context;
use ratatui::DefaultTerminal;
use staffdesk_core::logging::{init_logger, LogTarget};
use staffdesk_core::services::EmployeeForm;
use staffdesk_core::Settings;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(about = "Employee directory administration: dashboard, CRUD list and reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (defaults to config/settings.toml when present)
    #[arg(short, long, env = "STAFFDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Run against seeded in-memory data instead of the remote store
    #[arg(long, global = true)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI - Default
    Tui,
    /// Print today's and yesterday's counts
    Dashboard {
        /// Print the six counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// List active employees
    List {
        /// Case-insensitive search across all columns
        #[arg(short, long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Print a filtered report (created_today, deleted_yesterday, ...).
    /// Unknown or missing filters show recent activity.
    Report { filter: Option<String> },
    /// Create an employee
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        role: String,
    },
    /// Edit an employee; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Soft-delete an employee
    Delete {
        id: i64,
        /// Who is deleting the record
        #[arg(long, default_value = "")]
        by: String,
    },
    /// Demo login: email plus the four-digit code
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Mark an employee logged out
    Logout { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    color_eyre::install().ok();
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Tui);

    let target = match command {
        Commands::Tui => LogTarget::FileOnly,
        _ => LogTarget::Console,
    };
    init_logger(&settings.logging, target)?;
    info!(demo = cli.demo, "staffdesk starting");

    let ctx = Context::new(settings, cli.demo);

    match command {
        Commands::Tui => start_tui(ctx).await?,
        Commands::Dashboard { json } => commands::dashboard(&ctx, json).await?,
        Commands::List { search, page } => commands::list(&ctx, search, page).await?,
        Commands::Report { filter } => commands::report(&ctx, filter).await?,
        Commands::Add {
            name,
            email,
            department,
            role,
        } => {
            let form = EmployeeForm {
                name,
                email,
                department,
                role,
            };
            commands::add(&ctx, form).await?
        }
        Commands::Edit {
            id,
            name,
            email,
            department,
            role,
        } => {
            let args = commands::EditArgs {
                name,
                email,
                department,
                role,
            };
            commands::edit(&ctx, id, args).await?
        }
        Commands::Delete { id, by } => commands::delete(&ctx, id, &by).await?,
        Commands::Login { email, code } => commands::login(&ctx, &email, &code).await?,
        Commands::Logout { id } => commands::logout(&ctx, id).await?,
    }

    Ok(())
}

async fn start_tui(ctx: Context) -> anyhow::Result<()> {
    // ratatui::init handles raw mode + alternate screen
    let terminal = ratatui::init();

    let result = run_app(terminal, ctx).await;

    // always restore, even on error
    ratatui::restore();

    result
}

async fn run_app(mut terminal: DefaultTerminal, ctx: Context) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut app = App::new(&ctx, event_tx);
    app.start();

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if app.should_quit {
            break;
        }

        // results from background loads and writes
        while let Ok(evt) = event_rx.try_recv() {
            app.on_app_event(evt);
        }

        // non-blocking with 100ms timeout
        if let Some(evt) = event::poll_event(100)? {
            event::handle_event(&mut app, evt)?;
        }
    }

    info!("staffdesk TUI closed");
    Ok(())
}
