//! Vendor-item inventory lookups.

mod client;

use serde::Deserialize;
use serde_json::Value;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, InventoryClient, InventoryLookup, inventory_path,
};

/// Application-level code the seller API returns for a successful lookup.
pub const SUCCESS_CODE: &str = "SUCCESS";
pub const ERROR_CODE: &str = "ERROR";
pub const DEFAULT_FAILURE_MESSAGE: &str = "API call failed";

/// Outcome of one inventory call.
///
/// `Success` only means the transport and HTTP layers succeeded and the body
/// carried item data; its `code` may still be something other than
/// [`SUCCESS_CODE`]. Use [`InventoryQueryResult::is_success`] for the final
/// verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryQueryResult {
    Success {
        seller_item_id: String,
        amount_in_stock: i64,
        sale_price: f64,
        on_sale: bool,
        code: String,
        message: String,
    },
    Failure {
        code: String,
        message: String,
    },
}

impl InventoryQueryResult {
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { code, .. } if code == SUCCESS_CODE)
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Success { code, .. } | Self::Failure { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }
}

/// Raw response body. Every field is optional here; [`InventoryEnvelope::into_result`]
/// decides whether enough is present for a `Success`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct InventoryEnvelope {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl InventoryEnvelope {
    pub(crate) fn into_result(self) -> InventoryQueryResult {
        let code = self.code.as_ref().and_then(scalar_to_string);
        let message = self.message.as_ref().and_then(scalar_to_string);

        let data = self.data.as_ref().and_then(Value::as_object);
        let seller_item_id = data
            .and_then(|data| data.get("sellerItemId"))
            .and_then(scalar_to_string);
        let amount_in_stock = data
            .and_then(|data| data.get("amountInStock"))
            .and_then(Value::as_i64);
        let sale_price = data
            .and_then(|data| data.get("salePrice"))
            .and_then(Value::as_f64);
        let on_sale = data
            .and_then(|data| data.get("onSale"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match (code, seller_item_id, amount_in_stock, sale_price) {
            (Some(code), Some(seller_item_id), Some(amount_in_stock), Some(sale_price)) => {
                InventoryQueryResult::Success {
                    seller_item_id,
                    amount_in_stock,
                    sale_price,
                    on_sale,
                    code,
                    message: message.unwrap_or_default(),
                }
            }
            (code, ..) => InventoryQueryResult::Failure {
                code: code.unwrap_or_else(|| ERROR_CODE.to_string()),
                message: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            },
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: Value) -> InventoryQueryResult {
        serde_json::from_value::<InventoryEnvelope>(body)
            .expect("envelope")
            .into_result()
    }

    #[test]
    fn decodes_success_body() {
        let result = decode(json!({
            "code": "SUCCESS",
            "message": "",
            "data": {
                "sellerItemId": "S1",
                "amountInStock": 10,
                "salePrice": 9900,
                "onSale": true
            }
        }));
        assert_eq!(
            result,
            InventoryQueryResult::Success {
                seller_item_id: "S1".to_string(),
                amount_in_stock: 10,
                sale_price: 9900.0,
                on_sale: true,
                code: "SUCCESS".to_string(),
                message: String::new(),
            }
        );
        assert!(result.is_success());
    }

    #[test]
    fn accepts_numeric_seller_item_id_and_missing_on_sale() {
        let result = decode(json!({
            "code": "SUCCESS",
            "data": { "sellerItemId": 123456, "amountInStock": 0, "salePrice": 15000.5 }
        }));
        let InventoryQueryResult::Success {
            seller_item_id,
            on_sale,
            sale_price,
            ..
        } = result.clone()
        else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(seller_item_id, "123456");
        assert!(!on_sale);
        assert_eq!(sale_price, 15000.5);
    }

    #[test]
    fn non_success_code_with_data_stays_structurally_successful() {
        let result = decode(json!({
            "code": "WARNING",
            "message": "partial",
            "data": { "sellerItemId": "S1", "amountInStock": 1, "salePrice": 100, "onSale": true }
        }));
        assert!(matches!(result, InventoryQueryResult::Success { .. }));
        assert!(!result.is_success());
        assert_eq!(result.code(), "WARNING");
    }

    #[test]
    fn missing_data_field_falls_back_to_failure() {
        let result = decode(json!({
            "code": "SUCCESS",
            "message": "ok",
            "data": { "sellerItemId": "S1", "salePrice": 100, "onSale": true }
        }));
        assert_eq!(result, InventoryQueryResult::failure("SUCCESS", "ok"));
        assert!(!result.is_success());
    }

    #[test]
    fn error_body_carries_code_and_message() {
        let result = decode(json!({ "code": "ERROR", "message": "vendor item not found" }));
        assert_eq!(
            result,
            InventoryQueryResult::failure("ERROR", "vendor item not found")
        );
    }

    #[test]
    fn empty_body_uses_defaults() {
        let result = decode(json!({}));
        assert_eq!(
            result,
            InventoryQueryResult::failure(ERROR_CODE, DEFAULT_FAILURE_MESSAGE)
        );
    }
}
