use crate::batch::{BatchOutcome, BatchRunner};
use crate::config::RunSettings;
use crate::identifiers::read_vendor_item_ids;
use crate::inventory::InventoryLookup;
use crate::report::{ReportWrite, write_report};
use crate::{InventoryError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: BatchOutcome,
    /// `None` when persisting the report failed; the failure is logged.
    pub report: Option<ReportWrite>,
}

/// Reads ids, runs the batch, writes the report and logs a summary.
///
/// Returns `Ok(None)` without touching the API when the input holds no ids.
pub async fn run_inventory_report<L: InventoryLookup>(
    settings: &RunSettings,
    runner: &BatchRunner<L>,
) -> Result<Option<RunReport>> {
    let vendor_item_ids = read_vendor_item_ids(&settings.input)
        .await
        .map_err(|err| match err {
            InventoryError::Io(io) => InventoryError::Config(format!(
                "failed to read {}: {io}",
                settings.input.display()
            )),
            other => other,
        })?;
    if vendor_item_ids.is_empty() {
        tracing::warn!(input = %settings.input.display(), "no vendor item ids to query");
        return Ok(None);
    }

    tracing::info!(
        count = vendor_item_ids.len(),
        delay_ms = runner.delay().as_millis() as u64,
        "starting inventory lookup"
    );
    let outcome = runner.run(&vendor_item_ids).await;

    let report = match write_report(&settings.output, &outcome.records).await {
        Ok(write) => Some(write),
        Err(err) => {
            tracing::error!(error = %err, "failed to save inventory report");
            None
        }
    };

    tracing::info!(
        total = vendor_item_ids.len(),
        succeeded = outcome.tally.success_count,
        failed = outcome.tally.failure_count,
        "inventory lookup finished"
    );

    Ok(Some(RunReport { outcome, report }))
}
