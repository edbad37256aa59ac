mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use fitlog_core::time::{parse_human_date, parse_month, today};
use fitlog_core::{
    calibrate, parse_entry_patch, parse_prefs_patch, parse_resistance_set, CalibrationInput, Config,
    DashboardUseCase, DaySession, EntryService, FileEntryRepository, FilePrefsRepository,
    PresetOption, PrefsService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Daily walking, cycling and lifting log with calorie estimates", long_about = None)]
struct Cli {
    /// Directory holding daily_entries.json and prefs.json
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show totals for one day (default: today)
    Today {
        date: Option<String>,
    },
    /// Merge fields into a day (usage: log morning:5000 evening:4200 date:yesterday)
    Log {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Append a resistance set (usage: lift Floor Press sets:3 reps:12 rest:60)
    Lift {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove a resistance set by its number in `today`
    Unlift {
        index: usize,
        date: Option<String>,
    },
    /// Apply the weekday preset: A = walk, B = bike + weights
    Preset {
        option: PresetOption,
        date: Option<String>,
    },
    /// Sunday-to-Saturday summary
    Week {
        date: Option<String>,
    },
    /// Month summary and calendar (YYYY-MM, last, next)
    Month {
        month: Option<String>,
    },
    /// Show or update preferences (usage: prefs weight:82 target:12000)
    Prefs {
        #[arg(long)]
        reset: bool,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Derive steps per km and device bias from a measured walk
    Calibrate {
        #[arg(long)]
        km: f64,
        #[arg(long)]
        steps: u32,
        #[arg(long)]
        minutes: f64,
        #[arg(long)]
        device_kcal: Option<f64>,
        #[arg(long)]
        apply: bool,
    },
    /// Delete every logged day
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Open the dashboard
    Dash,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_date(input: Option<&str>) -> Result<chrono::NaiveDate> {
    let now = today();
    match input {
        Some(s) => parse_human_date(s, now),
        None => Ok(now),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::resolve(cli.data_dir)?;
    info!(data_dir = %config.data_dir.display(), "using data directory");
    let entries = EntryService::new(FileEntryRepository::at(config.entries_path())?);
    let prefs_service = PrefsService::new(FilePrefsRepository::at(config.prefs_path()));

    match cli.command {
        Some(Commands::Today { date }) => {
            let date = resolve_date(date.as_deref())?;
            let prefs = prefs_service.load()?;
            let session = DaySession::open(&entries, date)?;
            let totals = session.totals(&prefs);
            report::show_day(
                session.entry(),
                &totals,
                prefs.effective_daily_target_steps(),
                totals.device_kcal(&prefs),
            );
        }
        Some(Commands::Log { args }) => {
            let (date, patch) = parse_entry_patch(&args, today())?;
            if patch.is_empty() {
                return Err(anyhow!("Nothing to log. Known keys: {}", fitlog_core::input::ENTRY_KEYS.join(", ")));
            }
            let date = date.unwrap_or_else(today);
            let prefs = prefs_service.load()?;
            let mut session = DaySession::open(&entries, date)?;
            session.save(&patch)?;
            let totals = session.totals(&prefs);
            println!("Saved {}.", date);
            report::show_day(session.entry(), &totals, prefs.effective_daily_target_steps(), totals.device_kcal(&prefs));
        }
        Some(Commands::Lift { args }) => {
            let (date, set) = parse_resistance_set(&args, today())?;
            let date = date.unwrap_or_else(today);
            let mut session = DaySession::open(&entries, date)?;
            let name = set.name.clone();
            session.add_set(set)?;
            println!(
                "Added {} to {} ({} sets logged).",
                name,
                date,
                session.entry().weight_sessions.len()
            );
        }
        Some(Commands::Unlift { index, date }) => {
            if index == 0 {
                return Err(anyhow!("Set numbers start at 1"));
            }
            let date = resolve_date(date.as_deref())?;
            let mut session = DaySession::open(&entries, date)?;
            session.remove_set(index - 1)?;
            println!("Removed set #{} from {}.", index, date);
        }
        Some(Commands::Preset { option, date }) => {
            let date = resolve_date(date.as_deref())?;
            let prefs = prefs_service.load()?;
            let mut session = DaySession::open(&entries, date)?;
            session.apply_preset(option)?;
            let totals = session.totals(&prefs);
            println!("Applied preset {} for {}.", option, date.format("%A"));
            report::show_day(session.entry(), &totals, prefs.effective_daily_target_steps(), totals.device_kcal(&prefs));
        }
        Some(Commands::Week { date }) => {
            let anchor = resolve_date(date.as_deref())?;
            let prefs = prefs_service.load()?;
            let week = DashboardUseCase::new(&entries, &prefs).week(anchor)?;
            report::show_week(&week);
        }
        Some(Commands::Month { month }) => {
            let now = today();
            let (year, month) = parse_month(month.as_deref().unwrap_or(""), now)?;
            let prefs = prefs_service.load()?;
            let view = DashboardUseCase::new(&entries, &prefs).month(year, month)?;
            report::show_month(&view, now);
        }
        Some(Commands::Prefs { reset, args }) => {
            let prefs = if reset {
                prefs_service.reset()?
            } else if args.is_empty() {
                prefs_service.load()?
            } else {
                prefs_service.save(&parse_prefs_patch(&args)?)?
            };
            report::show_prefs(&prefs);
        }
        Some(Commands::Calibrate { km, steps, minutes, device_kcal, apply }) => {
            let prefs = prefs_service.load()?;
            let input = CalibrationInput {
                distance_km: km,
                steps,
                duration_min: minutes,
                device_kcal,
            };
            let calibration = calibrate(&input, &prefs)?;
            if apply {
                prefs_service.apply_calibration(&calibration)?;
            }
            report::show_calibration(&calibration, apply);
        }
        Some(Commands::Clear { yes }) => {
            if !yes {
                return Err(anyhow!("Refusing to delete all entries without --yes"));
            }
            let removed = entries.clear_all()?;
            println!("Deleted {} logged days.", removed);
        }
        Some(Commands::Dash) | None => {
            let prefs = prefs_service.load()?;
            tui::run(entries.repo().clone(), prefs)?;
        }
    }
    Ok(())
}
