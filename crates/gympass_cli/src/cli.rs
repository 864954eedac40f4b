use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Args {
    /// SQLite database file
    #[arg(long, env = "GYMPASS_DB", global = true, value_hint = ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "GYMPASS_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, env = "GYMPASS_LOG_DIR", global = true, value_hint = ValueHint::DirPath)]
    pub log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new user
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Check email and password, print the user
    Authenticate {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Print a user profile
    Profile { user_id: Uuid },

    /// Create a gym
    #[clap(name = "create-gym")]
    CreateGym {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Search gyms by title
    #[clap(name = "search-gyms")]
    SearchGyms {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List gyms within 10 km
    #[clap(name = "nearby-gyms")]
    NearbyGyms {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Check a user in at a gym
    #[clap(name = "check-in")]
    CheckIn {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        gym_id: Uuid,
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Validate a check-in
    Validate { check_in_id: Uuid },

    /// List a user's check-ins, newest first
    History {
        user_id: Uuid,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Print check-in metrics for a user
    Metrics { user_id: Uuid },
}
