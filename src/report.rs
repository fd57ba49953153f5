//! Per-item report rows and the CSV writer that persists them.
//!
//! Column order is fixed: queried-at, option-id, seller-item-id,
//! stock-quantity, sale-price, sale-status, response-code, message.

use std::fmt;
use std::path::{Path, PathBuf};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::utils::csv::{UTF8_BOM, csv_line};
use crate::{InventoryError, Result};

pub const REPORT_COLUMNS: [&str; 8] = [
    "queried_at",
    "option_id",
    "seller_item_id",
    "stock_quantity",
    "sale_price",
    "sale_status",
    "response_code",
    "message",
];

const ERROR_SENTINEL: &str = "ERROR";
const QUERIED_AT_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A typed report cell, or the `ERROR` placeholder written for failed lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportField<T> {
    Value(T),
    Error,
}

impl<T> ReportField<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ReportField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => value.fmt(f),
            Self::Error => f.write_str(ERROR_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    OnSale,
    Stopped,
}

impl SaleStatus {
    pub fn from_on_sale(on_sale: bool) -> Self {
        if on_sale { Self::OnSale } else { Self::Stopped }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnSale => "ON_SALE",
            Self::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report row. Built only through [`ReportRecord::success`] or
/// [`ReportRecord::failure`], so item fields are either all real or all
/// `ERROR`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    queried_at: OffsetDateTime,
    option_id: String,
    seller_item_id: ReportField<String>,
    stock_quantity: ReportField<i64>,
    sale_price: ReportField<f64>,
    sale_status: ReportField<SaleStatus>,
    response_code: String,
    message: String,
}

impl ReportRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        queried_at: OffsetDateTime,
        option_id: impl Into<String>,
        seller_item_id: impl Into<String>,
        stock_quantity: i64,
        sale_price: f64,
        sale_status: SaleStatus,
        response_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            queried_at,
            option_id: option_id.into(),
            seller_item_id: ReportField::Value(seller_item_id.into()),
            stock_quantity: ReportField::Value(stock_quantity),
            sale_price: ReportField::Value(sale_price),
            sale_status: ReportField::Value(sale_status),
            response_code: response_code.into(),
            message: message.into(),
        }
    }

    pub fn failure(
        queried_at: OffsetDateTime,
        option_id: impl Into<String>,
        response_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            queried_at,
            option_id: option_id.into(),
            seller_item_id: ReportField::Error,
            stock_quantity: ReportField::Error,
            sale_price: ReportField::Error,
            sale_status: ReportField::Error,
            response_code: response_code.into(),
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.sale_status, ReportField::Error)
    }

    pub fn queried_at(&self) -> OffsetDateTime {
        self.queried_at
    }

    pub fn option_id(&self) -> &str {
        &self.option_id
    }

    pub fn seller_item_id(&self) -> &ReportField<String> {
        &self.seller_item_id
    }

    pub fn stock_quantity(&self) -> &ReportField<i64> {
        &self.stock_quantity
    }

    pub fn sale_price(&self) -> &ReportField<f64> {
        &self.sale_price
    }

    pub fn sale_status(&self) -> &ReportField<SaleStatus> {
        &self.sale_status
    }

    pub fn response_code(&self) -> &str {
        &self.response_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn queried_at_display(&self) -> String {
        self.queried_at
            .format(QUERIED_AT_FORMAT)
            .unwrap_or_else(|_| self.queried_at.to_string())
    }

    /// Cells in [`REPORT_COLUMNS`] order.
    pub fn cells(&self) -> [String; 8] {
        [
            self.queried_at_display(),
            self.option_id.clone(),
            self.seller_item_id.to_string(),
            self.stock_quantity.to_string(),
            self.sale_price.to_string(),
            self.sale_status.to_string(),
            self.response_code.clone(),
            self.message.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWrite {
    Written { path: PathBuf, rows: usize },
    Skipped,
}

pub fn render_report(records: &[ReportRecord]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&csv_line(REPORT_COLUMNS));
    for record in records {
        let cells = record.cells();
        out.push_str(&csv_line(cells.iter().map(String::as_str)));
    }
    out
}

/// Writes the report, or skips it with a warning when there is nothing to
/// write.
pub async fn write_report(path: &Path, records: &[ReportRecord]) -> Result<ReportWrite> {
    if records.is_empty() {
        tracing::warn!(path = %path.display(), "no inventory records to save; report not written");
        return Ok(ReportWrite::Skipped);
    }

    tokio::fs::write(path, render_report(records))
        .await
        .map_err(|err| {
            InventoryError::Io(std::io::Error::new(
                err.kind(),
                format!("failed to write report {}: {err}", path.display()),
            ))
        })?;
    tracing::info!(path = %path.display(), rows = records.len(), "inventory report saved");
    Ok(ReportWrite::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}
