use super::ui;
use crate::core::order::OrderId;
use crate::sync::{PassReport, Reconciler};
use anyhow::{Context, Result};
use comfy_table::Cell;

fn format_ids(ids: &[OrderId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PassReport {
    pub fn display_as_table(&self, currency: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Action"),
            ui::header_cell("Count"),
            ui::header_cell("Orders"),
        ]);

        for (action, ids) in [
            ("Created", &self.created),
            ("Updated", &self.updated),
            ("Deleted", &self.deleted),
        ] {
            table.add_row(vec![
                Cell::new(action),
                ui::number_cell(ids.len()),
                Cell::new(format_ids(ids)),
            ]);
        }

        let mut output = format!(
            "{} ({}/RUB {})\n\n",
            ui::style_text("Reconciliation", ui::StyleType::Title),
            currency,
            self.rate
        );
        output.push_str(&table.to_string());

        let status = if self.committed {
            ui::style_text("Changes committed", ui::StyleType::TotalValue)
        } else if self.is_noop() {
            ui::style_text("Store already up to date", ui::StyleType::Subtle)
        } else {
            ui::style_text("Dry run, nothing written", ui::StyleType::Subtle)
        };
        output.push_str(&format!("\n\n{status}"));
        output
    }
}

pub async fn run(reconciler: &Reconciler, currency: &str, dry_run: bool) -> Result<()> {
    let pb = ui::new_spinner("Reconciling orders...");
    let result = reconciler.run_pass(dry_run).await;
    pb.finish_and_clear();

    let report = result.context("Reconciliation pass failed")?;
    println!("{}", report.display_as_table(currency));
    Ok(())
}
