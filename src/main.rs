use std::{sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use hydromate::{
    cli::{Cli, Commands, SettingsAction},
    commands::{self, DrinkAmount},
    logging,
    notification::{DesktopNotifier, Notifier},
    state::AppState,
    storage::{default_data_dir, Storage},
};
use tracing::debug;

const SETTINGS_POLL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let storage = Storage::open(&data_dir)
        .with_context(|| format!("Unable to open data directory {}", data_dir.display()))?;
    let _log_guard = logging::init(&data_dir)?;
    debug!("Data path: {:?}", storage.data_dir());

    let notifier = Arc::new(DesktopNotifier::new(!cli.silent));
    notifier.request_permission();

    let mut state = AppState::load(storage);
    let today = Local::now().date_naive();
    if state.refresh_day(today)? {
        debug!("Started a new day on {today}");
    }

    let output = match cli.command {
        Commands::Status => commands::status(&state),
        Commands::Drink {
            amount,
            unit,
            preset,
        } => {
            let amount = match (amount, preset) {
                (Some(value), _) => DrinkAmount::Entered { value, unit },
                (None, Some(preset)) => DrinkAmount::Preset(preset),
                (None, None) => DrinkAmount::Glass,
            };
            commands::drink(&mut state, &*notifier, amount, Local::now())?
        }
        Commands::History => commands::history(&state, today),
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::show_settings(state.settings()),
            SettingsAction::Set(update) => commands::update_settings(&mut state, &update)?,
        },
        Commands::Export { output } => commands::export(&state, output.as_deref(), today)?,
        Commands::Import { file } => commands::import(&mut state, &file, today)?,
        Commands::Watch => {
            println!("Watching for reminders, press Ctrl-C to stop");
            commands::watch(state, notifier, SETTINGS_POLL, async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await?;
            return Ok(());
        }
    };

    println!("{output}");
    Ok(())
}
