//! GymPass command-line entry point.
//!
//! # Responsibility
//! - Drive core use cases against a SQLite file.
//! - Print results as JSON on stdout and failures on stderr.

mod cli;
mod config;

use clap::Parser;
use cli::{Args, Commands};
use config::AppConfig;
use gympass_core::db::{open_db, DbError};
use gympass_core::{
    init_logging, CheckInRequest, CheckInService, CheckInServiceError, Coordinate,
    CreateGymRequest, GymService, GymServiceError, LoggingError, MetricsService,
    MetricsServiceError, RegisterRequest, RepoError, SqliteCheckInRepository,
    SqliteGymRepository, SqliteUserRepository, UserService, UserServiceError,
};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    User(UserServiceError),
    Gym(GymServiceError),
    CheckIn(CheckInServiceError),
    Metrics(MetricsServiceError),
    Output(serde_json::Error),
    Io(std::io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::User(err) if err.is_resource_not_found() => 3,
            Self::CheckIn(err) if err.is_resource_not_found() => 3,
            Self::User(_) | Self::Gym(_) | Self::CheckIn(_) => 2,
            _ => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::User(err) => write!(f, "{err}"),
            Self::Gym(err) => write!(f, "{err}"),
            Self::CheckIn(err) => write!(f, "{err}"),
            Self::Metrics(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to encode output: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for CliError {
            fn from(value: $source) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

impl_from! {
    LoggingError => Logging,
    DbError => Db,
    RepoError => Repo,
    UserServiceError => User,
    GymServiceError => Gym,
    CheckInServiceError => CheckIn,
    MetricsServiceError => Metrics,
    serde_json::Error => Output,
    std::io::Error => Io,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = AppConfig::resolve(&args, &std::env::current_dir()?);
    init_logging(&config.log_level, &config.log_dir)?;
    let conn = open_db(&config.db_path)?;

    match args.command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            let service = UserService::new(SqliteUserRepository::new(&conn));
            print_json(&service.register(&RegisterRequest {
                name,
                email,
                password,
            })?)
        }
        Commands::Authenticate { email, password } => {
            let service = UserService::new(SqliteUserRepository::new(&conn));
            print_json(&service.authenticate(&email, &password)?)
        }
        Commands::Profile { user_id } => {
            let service = UserService::new(SqliteUserRepository::new(&conn));
            print_json(&service.get_user_profile(user_id)?)
        }
        Commands::CreateGym {
            title,
            description,
            phone,
            latitude,
            longitude,
        } => {
            let service = GymService::new(SqliteGymRepository::new(&conn));
            print_json(&service.create_gym(&CreateGymRequest {
                title,
                description,
                phone,
                latitude,
                longitude,
            })?)
        }
        Commands::SearchGyms { query, page } => {
            let service = GymService::new(SqliteGymRepository::new(&conn));
            print_json(&service.search_gyms(&query, page)?)
        }
        Commands::NearbyGyms {
            latitude,
            longitude,
        } => {
            let service = GymService::new(SqliteGymRepository::new(&conn));
            print_json(&service.fetch_nearby_gyms(Coordinate::new(latitude, longitude))?)
        }
        Commands::CheckIn {
            user_id,
            gym_id,
            latitude,
            longitude,
        } => {
            let service = CheckInService::new(
                SqliteCheckInRepository::new(&conn),
                SqliteGymRepository::new(&conn),
            );
            print_json(&service.check_in(&CheckInRequest {
                user_id,
                gym_id,
                user_latitude: latitude,
                user_longitude: longitude,
            })?)
        }
        Commands::Validate { check_in_id } => {
            let service = CheckInService::new(
                SqliteCheckInRepository::new(&conn),
                SqliteGymRepository::new(&conn),
            );
            print_json(&service.validate_check_in(check_in_id)?)
        }
        Commands::History { user_id, page } => {
            let service = CheckInService::new(
                SqliteCheckInRepository::new(&conn),
                SqliteGymRepository::new(&conn),
            );
            print_json(&service.fetch_user_check_ins_history(user_id, page)?)
        }
        Commands::Metrics { user_id } => {
            let service = MetricsService::new(SqliteCheckInRepository::new(&conn));
            print_json(&service.get_user_metrics(user_id)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
