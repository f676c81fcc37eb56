use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use home_alloc::config::AppConfig;
use home_alloc::error::AppError;
use home_alloc::telemetry;
use home_alloc::workflows::allocation::{
    ApplicationStatus, FamilySizeBand, HouseStatus, PriorityBand, ReviewAction, UnitType,
};
use tracing::debug;

use crate::commands;
use crate::demo::{run_demo, DemoArgs};
use crate::infra::{self, RosterSource};

#[derive(Parser, Debug)]
#[command(
    name = "home-alloc-desk",
    about = "Review applications, browse houses and confirm match-scored allocations",
    version
)]
struct Cli {
    /// Applicant roster CSV. The built-in sample is used when both CSV flags are absent.
    #[arg(long, global = true, requires = "houses_csv")]
    applicants_csv: Option<PathBuf>,
    /// House registry CSV.
    #[arg(long, global = true, requires = "applicants_csv")]
    houses_csv: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List applications, optionally filtered
    Applications(ApplicationsArgs),
    /// Approve, reject or otherwise review an application
    Review(ReviewArgs),
    /// List registered houses, optionally filtered
    Houses(HousesArgs),
    /// Register a house
    AddHouse(AddHouseArgs),
    /// Remove a house that is not occupied
    RemoveHouse(RemoveHouseArgs),
    /// Available houses within a road distance of a house
    Nearby(NearbyArgs),
    /// Every application ordered by priority score, then application date
    WaitingList,
    /// Score one applicant against one house without allocating
    Score(ScoreArgs),
    /// Confirm an allocation
    Allocate(AllocateArgs),
    /// Suggested pairings for the most urgent approved applicants
    Suggest,
    /// Walk through selection, preview and confirmation (default command)
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ApplicationsArgs {
    #[arg(long, value_parser = infra::parse_application_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// high, medium or low
    #[arg(long, value_parser = infra::parse_priority)]
    pub(crate) priority: Option<PriorityBand>,
    /// 1-3, 4-6 or 7+
    #[arg(long, value_parser = infra::parse_family)]
    pub(crate) family: Option<FamilySizeBand>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    #[arg(long)]
    pub(crate) applicant: String,
    /// approve, reject, mark-reviewed or return-to-pending
    #[arg(long, value_parser = infra::parse_review_action)]
    pub(crate) action: ReviewAction,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HousesArgs {
    #[arg(long, value_parser = infra::parse_house_status)]
    pub(crate) status: Option<HouseStatus>,
    #[arg(long, value_parser = infra::parse_unit_type)]
    pub(crate) unit_type: Option<UnitType>,
    #[arg(long)]
    pub(crate) min_bedrooms: Option<u32>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AddHouseArgs {
    /// Explicit id; the next H-NNN is assigned otherwise
    #[arg(long)]
    pub(crate) id: Option<String>,
    #[arg(long)]
    pub(crate) address: String,
    #[arg(long, value_parser = infra::parse_unit_type)]
    pub(crate) unit_type: UnitType,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) bedrooms: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) floor_area: u32,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) rent: f64,
    #[arg(long, default_value_t = 0)]
    pub(crate) floor: i32,
    /// Repeat for each facility; Parking, Water and Electricity are used when omitted
    #[arg(long = "facility")]
    pub(crate) facilities: Vec<String>,
    #[arg(long, value_parser = infra::parse_house_status)]
    pub(crate) status: Option<HouseStatus>,
}

#[derive(Args, Debug)]
pub(crate) struct RemoveHouseArgs {
    #[arg(long)]
    pub(crate) house: String,
}

#[derive(Args, Debug)]
pub(crate) struct NearbyArgs {
    #[arg(long)]
    pub(crate) house: String,
    /// Maximum road distance
    #[arg(long)]
    pub(crate) within: f64,
    /// Road links as `from,to,distance` rows
    #[arg(long)]
    pub(crate) links_csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[arg(long)]
    pub(crate) applicant: String,
    #[arg(long)]
    pub(crate) house: String,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    #[arg(long)]
    pub(crate) applicant: String,
    #[arg(long)]
    pub(crate) house: String,
    /// Operator recorded in the allocation ledger
    #[arg(long, default_value = "admin")]
    pub(crate) by: String,
    /// Allocation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = infra::parse_date)]
    pub(crate) on: Option<NaiveDate>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "desk configuration loaded");

    let source = RosterSource {
        csv_paths: cli.applicants_csv.zip(cli.houses_csv),
    };
    let service = infra::build_service(source.load()?, &config);

    match cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()))
    {
        Command::Applications(args) => commands::list_applications(&service, args),
        Command::Review(args) => commands::review(&service, args),
        Command::Houses(args) => commands::list_houses(&service, args),
        Command::AddHouse(args) => commands::add_house(&service, args),
        Command::RemoveHouse(args) => commands::remove_house(&service, args),
        Command::Nearby(args) => commands::nearby(&service, args),
        Command::WaitingList => commands::waiting_list(&service),
        Command::Score(args) => commands::score(&service, args),
        Command::Allocate(args) => commands::allocate(&service, args),
        Command::Suggest => commands::suggest(&service),
        Command::Demo(args) => run_demo(&service, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_paths_must_be_given_together() {
        let lone = Cli::try_parse_from([
            "home-alloc-desk",
            "--applicants-csv",
            "applicants.csv",
            "suggest",
        ]);
        assert!(lone.is_err());

        let both = Cli::try_parse_from([
            "home-alloc-desk",
            "suggest",
            "--applicants-csv",
            "applicants.csv",
            "--houses-csv",
            "houses.csv",
        ])
        .expect("both paths accepted");
        assert!(both.applicants_csv.zip(both.houses_csv).is_some());
    }

    #[test]
    fn review_and_house_commands_parse() {
        let review = Cli::try_parse_from([
            "home-alloc-desk",
            "review",
            "--applicant",
            "APP-002",
            "--action",
            "approve",
        ])
        .expect("review parses");
        assert!(matches!(
            review.command,
            Some(Command::Review(ReviewArgs {
                action: ReviewAction::Approve,
                ..
            }))
        ));

        let add = Cli::try_parse_from([
            "home-alloc-desk",
            "add-house",
            "--address",
            "11 Lake View",
            "--unit-type",
            "apartment",
            "--bedrooms",
            "0",
        ]);
        assert!(add.is_err(), "houses need at least one bedroom");
    }
}
