use chrono::{Local, NaiveDate};
use clap::Args;
use home_alloc::error::AppError;
use home_alloc::workflows::allocation::{AllocationDesk, AllocationServiceError};

use crate::commands::{print_applicant_row, print_house_row, print_outcome};
use crate::infra::DeskService;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Date recorded for the allocation (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Operator name written to the ledger.
    #[arg(long, default_value = "admin")]
    pub(crate) by: String,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            today: None,
            by: "admin".to_string(),
        }
    }
}

pub(crate) fn run_demo(service: &DeskService, args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Housing allocation desk demo");
    let eligible = service.eligible_applicants()?;
    let available = service.available_houses()?;

    println!("\nApproved applications awaiting a house");
    for applicant in &eligible {
        print_applicant_row(applicant);
    }
    println!("\nAvailable houses");
    for unit in &available {
        print_house_row(unit);
    }

    let (Some(applicant), Some(house)) = (eligible.first(), available.first()) else {
        println!("\nNothing to allocate: no eligible applicant or no available house.");
        return render_dashboard(service, today);
    };

    let mut desk = AllocationDesk::new();
    desk.select_applicant(applicant.clone());
    desk.select_house(house.clone());
    if let Some(preview) = desk.preview(service.scorer()) {
        println!(
            "\nSelected {} and {}",
            preview.applicant_label, preview.house_label
        );
        print_outcome(&preview.outcome);
    }

    match service.confirm_selection(&mut desk, &args.by, today) {
        Ok(receipt) => println!("\n{}", receipt.message),
        Err(AllocationServiceError::BelowThreshold { score, threshold }) => {
            println!("\nNot confirmed: score {score} is below {threshold}.");
            println!("Suggested pairings instead:");
            for suggestion in service.suggestions()? {
                println!(
                    "- {} -> {}: {}",
                    suggestion.applicant_name,
                    suggestion.outcome.house_id,
                    suggestion.outcome.summary()
                );
            }
        }
        Err(err) => return Err(err.into()),
    }

    println!("\nAvailable houses after confirmation");
    for unit in service.available_houses()? {
        print_house_row(&unit);
    }

    render_dashboard(service, today)
}

fn render_dashboard(service: &DeskService, today: NaiveDate) -> Result<(), AppError> {
    let stats = service.dashboard(today)?;
    println!("\nDashboard for {today}");
    println!(
        "- {} applications ({} pending) | {} houses available | {} allocated today",
        stats.total_applications,
        stats.pending_applications,
        stats.available_houses,
        stats.allocated_today
    );
    if !stats.recent_allocations.is_empty() {
        println!("Recent activity:");
        for entry in &stats.recent_allocations {
            println!(
                "  - {} -> {} (score {}) by {} on {}",
                entry.applicant_id,
                entry.house_id,
                entry.match_score,
                entry.allocated_by,
                entry.allocated_on
            );
        }
    }
    Ok(())
}
