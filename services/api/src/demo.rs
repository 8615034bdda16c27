use crate::infra::{
    parse_area_finding, parse_item_finding, AreaFinding, InMemoryInspectionRepository, ItemFinding,
};
use crate::printer::format_report;
use chrono::Utc;
use clap::Args;
use inventory_inspection::config::AppConfig;
use inventory_inspection::error::AppError;
use inventory_inspection::workflows::inspection::{
    AreaIssueTag, AreaSpec, CompletionWarning, Inspection, InspectionCommand, InspectionService,
    ItemId, ItemStatus, StartInspection,
};
use inventory_inspection::workflows::inventory::InventoryImporter;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_INVENTORY: &str =
    include_str!("../../../crates/inventory-inspection/sample_inventory.csv");

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop before completing the walkthrough so the pending report is shown.
    #[arg(long)]
    pub(crate) skip_completion: bool,
    /// Print the report document as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct InspectionReportArgs {
    /// Inventory CSV export (columns: Item ID, Item Name, Category, Area)
    #[arg(long)]
    pub(crate) inventory: PathBuf,
    /// Apartment under inspection
    #[arg(long)]
    pub(crate) apartment: String,
    /// Verifier performing the walk-through
    #[arg(long)]
    pub(crate) verifier: String,
    /// Area to inspect; repeat for several. Defaults to INSPECTION_DEFAULT_AREAS.
    #[arg(long = "area")]
    pub(crate) areas: Vec<String>,
    /// Item finding as ITEM=STATUS[:NOTES]; repeat for several.
    #[arg(long = "finding", value_parser = parse_item_finding)]
    pub(crate) findings: Vec<ItemFinding>,
    /// Area finding as AREA=TAG[+TAG][:NOTES]; repeat for several.
    #[arg(long = "area-issue", value_parser = parse_area_finding)]
    pub(crate) area_issues: Vec<AreaFinding>,
    /// General notes for the whole inspection
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Complete the inspection before rendering
    #[arg(long)]
    pub(crate) complete: bool,
    /// Print the report document as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

/// Everything one walk-through records before the report is rendered.
#[derive(Debug, Default)]
struct Walkthrough {
    findings: Vec<ItemFinding>,
    area_issues: Vec<AreaFinding>,
    notes: Option<String>,
    complete: bool,
}

struct WalkthroughOutcome {
    inspection: Inspection,
    warnings: Vec<CompletionWarning>,
}

pub(crate) fn run_inspection_report(args: InspectionReportArgs) -> Result<(), AppError> {
    let InspectionReportArgs {
        inventory,
        apartment,
        verifier,
        areas,
        findings,
        area_issues,
        notes,
        complete,
        json,
    } = args;

    let config = AppConfig::load()?;
    let inventory = InventoryImporter::from_path(inventory)?;
    let areas = if areas.is_empty() {
        None
    } else {
        Some(areas.into_iter().map(AreaSpec::new).collect())
    };

    let service = InspectionService::new(
        Arc::new(InMemoryInspectionRepository::default()),
        &config.inspection,
    );
    let outcome = run_walkthrough(
        &service,
        StartInspection {
            apartment_id: apartment,
            verifier_id: verifier,
            inventory,
            areas,
        },
        Walkthrough {
            findings,
            area_issues,
            notes,
            complete,
        },
    )?;

    print_outcome(&outcome, json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_completion,
        json,
    } = args;

    let config = AppConfig::load()?;
    let inventory = InventoryImporter::from_reader(Cursor::new(SAMPLE_INVENTORY))?;
    let service = InspectionService::new(
        Arc::new(InMemoryInspectionRepository::default()),
        &config.inspection,
    );

    if !json {
        println!("Inventory inspection demo");
        println!(
            "Loaded {} items across {} default areas\n",
            inventory.len(),
            config.inspection.default_areas.len()
        );
    }

    let outcome = run_walkthrough(
        &service,
        StartInspection {
            apartment_id: "apt-12b".to_string(),
            verifier_id: "verifier-demo".to_string(),
            inventory,
            areas: None,
        },
        scripted_walkthrough(!skip_completion),
    )?;

    print_outcome(&outcome, json)
}

fn scripted_walkthrough(complete: bool) -> Walkthrough {
    let finding = |item_id: &str, status, notes: &str| ItemFinding {
        item_id: ItemId::new(item_id),
        status,
        notes: Some(notes.to_string()),
    };

    Walkthrough {
        findings: vec![
            finding("kit-stove", ItemStatus::Issue, "Front burner does not ignite"),
            finding("bed-lamp", ItemStatus::Missing, "Not found in the unit"),
            finding("liv-sofa", ItemStatus::Issue, "Torn cushion seam"),
        ],
        area_issues: vec![AreaFinding {
            area_name: "Bathroom".to_string(),
            tags: [AreaIssueTag::Ceiling, AreaIssueTag::OdorMoisturePest]
                .into_iter()
                .collect(),
            notes: Some("Mildew above the shower".to_string()),
        }],
        notes: Some("Tenant informed about stove repair".to_string()),
        complete,
    }
}

fn run_walkthrough(
    service: &InspectionService<InMemoryInspectionRepository>,
    request: StartInspection,
    walkthrough: Walkthrough,
) -> Result<WalkthroughOutcome, AppError> {
    let mut inspection = service.start(request, Utc::now())?;

    for command in walkthrough_commands(&inspection, walkthrough.findings, walkthrough.area_issues)
    {
        inspection = service.apply(inspection.id(), inspection.version(), command)?;
    }
    if let Some(notes) = walkthrough.notes {
        inspection = service.apply(
            inspection.id(),
            inspection.version(),
            InspectionCommand::SetGeneralNotes { notes: Some(notes) },
        )?;
    }

    let mut warnings = Vec::new();
    if walkthrough.complete {
        let (completed, report) =
            service.complete(inspection.id(), inspection.version(), Utc::now())?;
        inspection = completed;
        warnings = report.warnings;
    }

    Ok(WalkthroughOutcome {
        inspection,
        warnings,
    })
}

/// Translates findings into tracker commands, registering areas that were not part of the start set.
fn walkthrough_commands(
    inspection: &Inspection,
    findings: Vec<ItemFinding>,
    area_issues: Vec<AreaFinding>,
) -> Vec<InspectionCommand> {
    let mut commands = Vec::new();

    for finding in findings {
        commands.push(InspectionCommand::SetItemStatus {
            item_id: finding.item_id.clone(),
            status: finding.status,
        });
        if let Some(notes) = finding.notes {
            commands.push(InspectionCommand::SetItemNotes {
                item_id: finding.item_id,
                notes,
            });
        }
    }

    for issue in merge_area_issues(area_issues) {
        if inspection.areas().evaluation(&issue.area_name).is_none() {
            commands.push(InspectionCommand::RegisterArea {
                area_name: issue.area_name.clone(),
                allowed_tags: None,
            });
        }
        commands.push(InspectionCommand::SetAreaCondition {
            area_name: issue.area_name.clone(),
            is_good: false,
        });
        for tag in issue.tags {
            commands.push(InspectionCommand::ToggleAreaTag {
                area_name: issue.area_name.clone(),
                tag,
            });
        }
        if let Some(notes) = issue.notes {
            commands.push(InspectionCommand::SetAreaNotes {
                area_name: issue.area_name,
                notes,
            });
        }
    }

    commands
}

/// Folds repeated flags for one area into a single finding so each tag is toggled once.
fn merge_area_issues(area_issues: Vec<AreaFinding>) -> Vec<AreaFinding> {
    let mut merged: Vec<AreaFinding> = Vec::new();
    for issue in area_issues {
        match merged
            .iter_mut()
            .find(|existing| existing.area_name == issue.area_name)
        {
            Some(existing) => {
                existing.tags.extend(issue.tags);
                existing.notes = match (existing.notes.take(), issue.notes) {
                    (Some(first), Some(second)) => Some(format!("{first}; {second}")),
                    (first, second) => first.or(second),
                };
            }
            None => merged.push(issue),
        }
    }
    merged
}

fn print_outcome(outcome: &WalkthroughOutcome, json: bool) -> Result<(), AppError> {
    let document = outcome.inspection.report(Utc::now());
    if json {
        let payload = serde_json::json!({
            "report": document,
            "warnings": outcome.warnings,
        });
        println!("{payload:#}");
    } else {
        print!("{}", format_report(&document, &outcome.warnings));
    }
    Ok(())
}
