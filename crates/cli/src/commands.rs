use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "stratum", version, about = "Application-XML to relational-table migration driver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs a migration pass against the configured source and destination.
    Run(Box<RunArgs>),
    /// Inspects the local resumption checkpoint for a session/partition.
    Progress {
        #[arg(long, help = "Session id the run was started with")]
        session_id: String,

        #[arg(long, default_value_t = 0, help = "Partition residue to inspect")]
        partition_rem: u32,

        #[arg(long, help = "Print the checkpoint as JSON instead of a table")]
        json: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    #[arg(long, help = "Path to the mapping contract document")]
    pub contract: String,

    #[arg(long, help = "Session id recorded on every processing_log row written this run")]
    pub session_id: String,

    #[arg(long, default_value_t = 4, help = "Worker count")]
    pub workers: usize,

    #[arg(long, default_value_t = 500, help = "Fetch size per staging read")]
    pub batch_size: i64,

    #[arg(long, help = "Safety cap on total applications processed this run")]
    pub limit: Option<u64>,

    #[arg(long, help = "Lower bound (inclusive) of the app_id range to process")]
    pub app_id_start: Option<i64>,

    #[arg(long, help = "Upper bound (inclusive) of the app_id range to process")]
    pub app_id_end: Option<i64>,

    #[arg(long, default_value_t = 0, help = "This instance's residue in the partitioned modulo scheme")]
    pub instance_id: u32,

    #[arg(long, default_value_t = 1, help = "Total instance count for partitioned concurrent runs")]
    pub instance_count: u32,

    #[arg(long, help = "Retry previously-failed applications instead of skipping them")]
    pub retry_failed: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Info, help = "Log verbosity")]
    pub log_level: LogLevel,

    #[arg(long, help = "Directory to write the per-run log file and JSON metrics document into")]
    pub run_dir: Option<String>,

    #[arg(long, help = "Destination server hostname or address")]
    pub server: String,

    #[arg(long, help = "Destination database name")]
    pub database: String,

    #[arg(long, help = "Destination username")]
    pub username: Option<String>,

    #[arg(long, help = "Destination password")]
    pub password: Option<String>,

    #[arg(long, help = "Per-connection connect timeout, in seconds")]
    pub connect_timeout_secs: Option<u64>,

    #[arg(
        long,
        help = "Path to persist the local resumption checkpoint (sled); omit to rely solely on the processing log"
    )]
    pub state_dir: Option<String>,

    #[arg(
        long = "env-file",
        help = "KEY=VALUE file to load into the process environment before connecting; may be repeated, later files win"
    )]
    pub env_file: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
