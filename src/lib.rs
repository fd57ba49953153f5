pub mod app;
pub mod auth;
pub mod batch;
pub mod clock;
pub mod config;
mod error;
pub mod identifiers;
pub mod inventory;
pub mod logging;
pub mod report;
pub mod utils;

pub use app::{RunReport, run_inventory_report};
pub use auth::{CeaSigner, CeaTimestamp, Credentials, SignedRequestHeaders};
pub use batch::{BatchOutcome, BatchRunner, BatchTally, Pacer, TokioPacer};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CredentialSource, RunSettings};
pub use error::{InventoryError, Result};
pub use inventory::{InventoryClient, InventoryLookup, InventoryQueryResult};
pub use report::{ReportField, ReportRecord, ReportWrite, SaleStatus};
