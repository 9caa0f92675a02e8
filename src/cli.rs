use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::structs::unit::Unit;

fn parse_number(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{s}' is not a finite, non-negative number"));
    }
    Ok(value)
}

fn parse_drink_amount(s: &str) -> Result<f64, String> {
    match parse_number(s)? {
        value if value > 0.0 => Ok(value),
        _ => Err("a drink must be more than 0".to_string()),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "hydromate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log your water intake, track your daily goal and get reminded to drink",
    long_about = None
)]
pub struct Cli {
    /// Where settings and history are kept
    #[arg(global = true, long, env = "HYDROMATE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Never show notifications or play the tone
    #[arg(global = true, long)]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's intake against the daily goal
    Status,

    /// Log a drink (defaults to one glass)
    Drink {
        /// Amount, in the display unit unless --unit is given
        #[arg(value_parser = parse_drink_amount)]
        amount: Option<f64>,

        #[arg(long, requires = "amount")]
        unit: Option<Unit>,

        #[arg(long, conflicts_with = "amount")]
        preset: Option<Preset>,
    },

    /// Show the last seven days
    History,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Write all data to a JSON backup
    Export {
        /// Directory or file to write to (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all data with a JSON backup
    Import { file: PathBuf },

    /// Stay running and send reminders
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    Set(SettingsUpdate),
}

/// Goal and glass size are read in the new unit if one is given, else the current one.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct SettingsUpdate {
    #[arg(long, value_parser = parse_number)]
    pub goal: Option<f64>,

    #[arg(long)]
    pub unit: Option<Unit>,

    /// Minutes between reminders, 0 turns them off
    #[arg(long)]
    pub interval: Option<u32>,

    #[arg(long, value_parser = parse_number)]
    pub glass: Option<f64>,
}

/// Quick amounts, in milliliters.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Small,
    Medium,
    Large,
}

impl Preset {
    pub const fn ml(self) -> f64 {
        match self {
            Preset::Small => 150.0,
            Preset::Medium => 250.0,
            Preset::Large => 500.0,
        }
    }
}
