use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::clock::{Clock, SystemClock};
use crate::inventory::{InventoryLookup, InventoryQueryResult};
use crate::report::{ReportRecord, SaleStatus};

/// Pause between consecutive lookups, to stay under the seller API rate limit.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Waits between lookups.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchTally {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub records: Vec<ReportRecord>,
    pub tally: BatchTally,
}

/// Looks up vendor items one at a time, in input order, pausing between
/// calls. Individual failures are recorded and never stop the run.
pub struct BatchRunner<L> {
    lookup: L,
    delay: Duration,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
}

impl<L: InventoryLookup> BatchRunner<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            delay: DEFAULT_DELAY,
            pacer: Arc::new(TokioPacer),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn run(&self, vendor_item_ids: &[String]) -> BatchOutcome {
        let total = vendor_item_ids.len();
        let mut outcome = BatchOutcome {
            records: Vec::with_capacity(total),
            tally: BatchTally::default(),
        };

        for (index, vendor_item_id) in vendor_item_ids.iter().enumerate() {
            let position = index + 1;
            tracing::info!("[{position}/{total}] querying vendor item {vendor_item_id}");

            let result = self.lookup.fetch_inventory(vendor_item_id).await;
            let queried_at = self.clock.now_local();

            let record = match result {
                InventoryQueryResult::Success {
                    seller_item_id,
                    amount_in_stock,
                    sale_price,
                    on_sale,
                    code,
                    message,
                } if code == crate::inventory::SUCCESS_CODE => {
                    tracing::info!(
                        "[{position}/{total}] ok: stock={amount_in_stock}, price={sale_price}"
                    );
                    outcome.tally.success_count += 1;
                    ReportRecord::success(
                        queried_at,
                        vendor_item_id.as_str(),
                        seller_item_id,
                        amount_in_stock,
                        sale_price,
                        SaleStatus::from_on_sale(on_sale),
                        code,
                        message,
                    )
                }
                InventoryQueryResult::Success { code, message, .. }
                | InventoryQueryResult::Failure { code, message } => {
                    tracing::error!(
                        "[{position}/{total}] failed: code={code}, message={message}"
                    );
                    outcome.tally.failure_count += 1;
                    ReportRecord::failure(queried_at, vendor_item_id.as_str(), code, message)
                }
            };
            outcome.records.push(record);

            if position < total {
                self.pacer.pause(self.delay).await;
            }
        }

        outcome
    }
}
