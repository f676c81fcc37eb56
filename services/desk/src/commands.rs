use std::fs::File;
use std::io::{self, Write};

use chrono::Local;
use home_alloc::error::AppError;
use home_alloc::workflows::allocation::location::parse_links;
use home_alloc::workflows::allocation::{
    AllocationRequest, Applicant, ApplicantId, ApplicationFilter, HouseFilter, HouseId,
    HousingUnit, MatchOutcome, NewHouse,
};
use serde::Serialize;

use crate::cli::{
    AddHouseArgs, AllocateArgs, ApplicationsArgs, HousesArgs, NearbyArgs, RemoveHouseArgs,
    ReviewArgs, ScoreArgs,
};
use crate::infra::DeskService;

pub(crate) fn list_applications(
    service: &DeskService,
    args: ApplicationsArgs,
) -> Result<(), AppError> {
    let filter = ApplicationFilter {
        status: args.status,
        priority: args.priority,
        family: args.family,
    };
    let applicants = service.applications(&filter)?;

    if args.json {
        return print_json(&applicants);
    }
    if applicants.is_empty() {
        println!("No applications match the selected filters.");
        return Ok(());
    }
    for applicant in &applicants {
        print_applicant_row(applicant);
    }
    Ok(())
}

pub(crate) fn review(service: &DeskService, args: ReviewArgs) -> Result<(), AppError> {
    let applicant = service.review(&ApplicantId(args.applicant), args.action)?;
    println!(
        "Application {} is now {}",
        applicant.id,
        applicant.status.label()
    );
    print_applicant_row(&applicant);
    Ok(())
}

pub(crate) fn list_houses(service: &DeskService, args: HousesArgs) -> Result<(), AppError> {
    let filter = HouseFilter {
        status: args.status,
        unit_type: args.unit_type,
        min_bedrooms: args.min_bedrooms,
    };
    let houses = service.houses(&filter)?;

    if args.json {
        return print_json(&houses);
    }
    if houses.is_empty() {
        println!("No houses match the selected filters.");
        return Ok(());
    }
    for unit in &houses {
        print_house_row(unit);
    }
    Ok(())
}

pub(crate) fn add_house(service: &DeskService, args: AddHouseArgs) -> Result<(), AppError> {
    let unit = service.register_house(NewHouse {
        id: args.id.map(HouseId),
        address: args.address,
        unit_type: args.unit_type,
        bedrooms: args.bedrooms,
        floor_area: args.floor_area,
        rent: args.rent,
        floor: args.floor,
        facilities: args.facilities,
        status: args.status,
    })?;
    println!("Registered house {}", unit.id);
    print_house_row(&unit);
    println!("  Facilities: {}", unit.facilities.join(", "));
    Ok(())
}

pub(crate) fn remove_house(service: &DeskService, args: RemoveHouseArgs) -> Result<(), AppError> {
    let unit = service.remove_house(&HouseId(args.house))?;
    println!("Removed house {} ({})", unit.id, unit.address);
    Ok(())
}

pub(crate) fn nearby(service: &DeskService, args: NearbyArgs) -> Result<(), AppError> {
    let graph = parse_links(File::open(&args.links_csv)?)?;
    let origin = HouseId(args.house);
    let houses = service.nearby_available_houses(&graph, &origin, args.within)?;

    if houses.is_empty() {
        println!("No available house within {} of {origin}.", args.within);
        return Ok(());
    }
    for house in &houses {
        println!("- {} at {:.1}", house.house_id, house.distance);
    }
    Ok(())
}

pub(crate) fn waiting_list(service: &DeskService) -> Result<(), AppError> {
    for entry in service.waiting_list()? {
        let applicant = &entry.applicant;
        println!(
            "{:>2}. {} {:<14} priority {:>3} | applied {} | {}",
            entry.position,
            applicant.id,
            applicant.name,
            applicant.priority_score,
            applicant.applied_on,
            applicant.status.label()
        );
    }
    Ok(())
}

pub(crate) fn score(service: &DeskService, args: ScoreArgs) -> Result<(), AppError> {
    let outcome = service.preview(&ApplicantId(args.applicant), &HouseId(args.house))?;
    if args.json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    Ok(())
}

pub(crate) fn allocate(service: &DeskService, args: AllocateArgs) -> Result<(), AppError> {
    let receipt = service.allocate(AllocationRequest {
        applicant_id: ApplicantId(args.applicant),
        house_id: HouseId(args.house),
        allocated_by: args.by,
        allocated_on: args.on.unwrap_or_else(|| Local::now().date_naive()),
    })?;

    println!("{}", receipt.message);
    println!("  Address: {}", receipt.address);
    println!("  Match: {}", receipt.outcome.summary());
    println!(
        "  Recorded by {} on {}",
        receipt.record.allocated_by, receipt.record.allocated_on
    );
    Ok(())
}

pub(crate) fn suggest(service: &DeskService) -> Result<(), AppError> {
    let suggestions = service.suggestions()?;
    if suggestions.is_empty() {
        println!("No pairing clears the suggestion threshold.");
        return Ok(());
    }
    for suggestion in &suggestions {
        println!(
            "- {} ({}) -> {}: {}",
            suggestion.applicant_name,
            suggestion.outcome.applicant_id,
            suggestion.outcome.house_id,
            suggestion.outcome.summary()
        );
    }
    Ok(())
}

pub(crate) fn print_applicant_row(applicant: &Applicant) {
    println!(
        "- {} {:<14} family {:>2} | priority {:>3} ({}) | {:<9} | {}",
        applicant.id,
        applicant.name,
        applicant.household_size,
        applicant.priority_score,
        applicant.priority_band().label(),
        applicant.status.label(),
        applicant.needs
    );
}

pub(crate) fn print_house_row(unit: &HousingUnit) {
    println!(
        "- {} {:<9} {} bed | {} sq ft | rent {:.0} | {:<11} | {}",
        unit.id,
        unit.unit_type.label(),
        unit.bedrooms,
        unit.floor_area,
        unit.rent,
        unit.status.label(),
        unit.address
    );
}

pub(crate) fn print_outcome(outcome: &MatchOutcome) {
    println!(
        "{} x {}: {}",
        outcome.applicant_id,
        outcome.house_id,
        outcome.summary()
    );
    println!(
        "  {}",
        if outcome.accepted {
            "Can be allocated"
        } else {
            "Below the acceptance threshold"
        }
    );
    for component in &outcome.components {
        println!(
            "  - {:?}: {:+.1} ({})",
            component.factor, component.points, component.notes
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}
