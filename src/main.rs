mod handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use maintrack::engine::clock::{parse_instant, Clock, FixedClock, SystemClock};
use maintrack::engine::config::Config;
use maintrack::engine::types::USAGE_TRACKING_DISABLED;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maintrack", version, about = "Know which maintenance is due")]
struct Cli {
    /// Path to the store database
    #[arg(long, global = true, env = "MAINTRACK_DB")]
    db: Option<PathBuf>,
    /// Evaluate as of this date instead of now (YYYY-MM-DD or RFC 3339)
    #[arg(long, global = true)]
    now: Option<String>,
    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Initialize the maintenance store
    Init,
    /// Manage equipment
    Equipment {
        #[command(subcommand)]
        command: EquipmentCommands,
    },
    /// Manage maintenance tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Record that a task was serviced
    Log {
        task: i64,
        /// Usage-hours reading at service (defaults to the current reading)
        #[arg(long, short = 'H')]
        hours: Option<i64>,
        /// Service date (defaults to now)
        #[arg(long, short = 'd')]
        date: Option<String>,
        #[arg(long, short = 'r')]
        remarks: Option<String>,
    },
    /// Remove a logged service entry
    Unlog { entry: i64 },
    /// Show the service history of a task
    History { task: i64 },
    /// Show due status of every task, most urgent first
    Status {
        /// Only tasks of this equipment
        #[arg(long, short = 'e')]
        equipment: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Explain the due status of a task
    Why { task: i64 },
}

#[derive(Subcommand, Clone)]
enum EquipmentCommands {
    /// Register equipment
    Add {
        name: String,
        /// Current usage-hours reading
        #[arg(long, short = 'H', default_value_t = 0.0)]
        hours: f64,
        /// Commission date (defaults to now)
        #[arg(long, short = 'c')]
        commissioned: Option<String>,
    },
    /// List equipment
    List,
    /// Record a new usage-hours reading
    Hours { equipment: i64, hours: f64 },
}

#[derive(Subcommand, Clone)]
enum TaskCommands {
    /// Add a recurring task
    Add {
        equipment: i64,
        name: String,
        /// Usage hours between services
        #[arg(long, default_value_t = USAGE_TRACKING_DISABLED, allow_negative_numbers = true)]
        every_hours: i64,
        /// Calendar months between services
        #[arg(long, default_value_t = 0)]
        every_months: u32,
        #[arg(long, short = 'D')]
        description: Option<String>,
    },
    /// List task definitions
    List {
        #[arg(long, short = 'e')]
        equipment: Option<i64>,
    },
    /// Remove a task and its history
    Remove { task: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::default()
        .with_db_path(cli.db.clone())
        .with_verbose(cli.verbose);
    init_logging(&config);

    let clock: Box<dyn Clock> = match cli.now.as_deref() {
        Some(s) => Box::new(FixedClock(parse_instant(s)?)),
        None => Box::new(SystemClock),
    };

    match cli.command {
        Commands::Init
        | Commands::Equipment { .. }
        | Commands::Task { .. }
        | Commands::Log { .. }
        | Commands::Unlog { .. } => dispatch_write_ops(cli.command, &config, clock.as_ref()),
        Commands::History { .. } | Commands::Status { .. } | Commands::Why { .. } => {
            dispatch_read_ops(cli.command, &config, clock.as_ref())
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch_write_ops(cmd: Commands, config: &Config, clock: &dyn Clock) -> Result<()> {
    match cmd {
        Commands::Init => handlers::init::handle(config),
        Commands::Equipment { command } => match command {
            EquipmentCommands::Add {
                name,
                hours,
                commissioned,
            } => {
                let commissioned = match commissioned.as_deref() {
                    Some(s) => parse_instant(s)?,
                    None => clock.now(),
                };
                handlers::equipment::add(config, &name, hours, commissioned)
            }
            EquipmentCommands::List => handlers::equipment::list(config),
            EquipmentCommands::Hours { equipment, hours } => {
                handlers::equipment::hours(config, equipment, hours)
            }
        },
        Commands::Task { command } => match command {
            TaskCommands::Add {
                equipment,
                name,
                every_hours,
                every_months,
                description,
            } => handlers::task::add(
                config,
                equipment,
                &name,
                description.as_deref(),
                every_hours,
                every_months,
            ),
            TaskCommands::List { equipment } => handlers::task::list(config, equipment),
            TaskCommands::Remove { task } => handlers::task::remove(config, task),
        },
        Commands::Log {
            task,
            hours,
            date,
            remarks,
        } => {
            let date = match date.as_deref() {
                Some(s) => parse_instant(s)?,
                None => clock.now(),
            };
            handlers::log::handle(config, task, hours, date, remarks.as_deref())
        }
        Commands::Unlog { entry } => handlers::unlog::handle(config, entry),
        _ => unreachable!("Invalid write command dispatch"),
    }
}

fn dispatch_read_ops(cmd: Commands, config: &Config, clock: &dyn Clock) -> Result<()> {
    let now = clock.now();
    match cmd {
        Commands::History { task } => handlers::history::handle(config, task),
        Commands::Status { equipment, json } => {
            handlers::status::handle(config, now, equipment, json)
        }
        Commands::Why { task } => handlers::why::handle(config, now, task),
        _ => unreachable!("Invalid read command dispatch"),
    }
}
