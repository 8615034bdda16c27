use inventory_inspection::workflows::inspection::report::views::{EMPTY_CELL, ReportDocument};
use inventory_inspection::workflows::inspection::CompletionWarning;
use std::fmt::Write;

/// Plain-text layout of a report for terminals and print previews.
pub(crate) fn format_report(document: &ReportDocument, warnings: &[CompletionWarning]) -> String {
    let mut out = String::new();
    let header = &document.header;
    let summary = &document.summary;

    let _ = writeln!(out, "Inspection report {}", header.folio);
    let _ = writeln!(
        out,
        "Apartment {} | Verifier {} | Status {}",
        header.apartment_id, header.verifier_id, header.status_label
    );
    let _ = writeln!(out, "Started {}", header.created_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(completed_at) = header.completed_at {
        let _ = writeln!(out, "Completed {}", completed_at.format("%Y-%m-%d %H:%M UTC"));
    }

    let _ = writeln!(out, "\nSummary");
    if summary.no_items_evaluated {
        let _ = writeln!(out, "  No items were evaluated (health {}%)", summary.health_percentage);
    } else {
        let _ = writeln!(
            out,
            "  Health {}% | {} items | {} issues | {} missing",
            summary.health_percentage, summary.total_items, summary.issue_count, summary.missing_count
        );
    }
    let _ = writeln!(out, "  Areas with issues: {}", summary.areas_with_issues);
    let _ = writeln!(
        out,
        "  General notes: {}",
        summary.general_notes.as_deref().unwrap_or(EMPTY_CELL)
    );

    for section in &document.sections {
        let _ = writeln!(
            out,
            "\n{} (ok {}, issue {}, missing {})",
            section.category, section.counts.ok, section.counts.issue, section.counts.missing
        );
        for row in &section.rows {
            let _ = writeln!(
                out,
                "  [{:<7}] {:<24} {:<14} {}",
                row.status_label, row.name, row.area, row.notes
            );
        }
    }

    if !document.incidents.is_empty() {
        let _ = writeln!(out, "\nIncidents");
        for missing in &document.incidents.missing_items {
            let _ = writeln!(
                out,
                "  Missing: {} ({}, {}) {}",
                missing.name, missing.category, missing.area, missing.notes
            );
        }
        for area in &document.incidents.area_issues {
            let _ = writeln!(
                out,
                "  Area {}: {} {}",
                area.area_name,
                area.tag_labels.join(", "),
                area.notes
            );
        }
    }

    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings");
        for warning in warnings {
            let _ = writeln!(out, "  - {}", warning.message());
        }
    }

    let _ = writeln!(
        out,
        "\nGenerated {} for {}",
        document.footer.generated_at.format("%Y-%m-%d %H:%M UTC"),
        document.footer.inspection_id
    );
    out
}
