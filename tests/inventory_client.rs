use std::sync::Arc;

use coupang_inventory::inventory::inventory_path;
use coupang_inventory::{
    CeaSigner, Credentials, FixedClock, InventoryClient, InventoryLookup, InventoryQueryResult,
};
use httpmock::{Method::GET, MockServer};
use serde_json::json;
use time::macros::datetime;

const VENDOR_ITEM_ID: &str = "3000000001";
const EXPECTED_AUTHORIZATION: &str = "CEA algorithm=HmacSHA256, access-key=test-access-key, signed-date=240305T233000Z, signature=ec7a425f2c8d578321cd796662513f5b57ae98622312418cc8ba04ce0fc8ed34";

fn client(base_url: &str) -> InventoryClient {
    let signer = CeaSigner::new(Credentials::new("test-access-key", "test-secret-key"))
        .with_clock(Arc::new(FixedClock::new(datetime!(2024-03-05 23:30:00 UTC))));
    InventoryClient::new(signer).with_base_url(base_url)
}

#[tokio::test]
async fn signed_lookup_decodes_inventory() {
    if coupang_inventory::utils::test_support::should_skip_httpmock() {
        return;
    }

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(inventory_path(VENDOR_ITEM_ID))
                .header("authorization", EXPECTED_AUTHORIZATION)
                .header("content-type", "application/json;charset=UTF-8");
            then.status(200).json_body(json!({
                "code": "SUCCESS",
                "message": "",
                "data": {
                    "vendorItemId": 3000000001u64,
                    "sellerItemId": "S1",
                    "amountInStock": 10,
                    "salePrice": 9900,
                    "onSale": true
                }
            }));
        })
        .await;

    let result = client(&server.base_url())
        .fetch_inventory(VENDOR_ITEM_ID)
        .await;
    mock.assert_async().await;

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
}

#[tokio::test]
async fn non_200_status_becomes_failure() {
    if coupang_inventory::utils::test_support::should_skip_httpmock() {
        return;
    }

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(inventory_path(VENDOR_ITEM_ID));
            then.status(500)
                .json_body(json!({ "code": "ERROR", "message": "internal" }));
        })
        .await;

    let result = client(&server.base_url())
        .fetch_inventory(VENDOR_ITEM_ID)
        .await;
    mock.assert_async().await;

    assert_eq!(
        result,
        InventoryQueryResult::failure("ERROR", "HTTP error, status=500")
    );
}

#[tokio::test]
async fn unparseable_body_is_a_transport_failure() {
    if coupang_inventory::utils::test_support::should_skip_httpmock() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(inventory_path(VENDOR_ITEM_ID));
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let result = client(&server.base_url())
        .fetch_inventory(VENDOR_ITEM_ID)
        .await;

    let InventoryQueryResult::Failure { code, message } = result else {
        panic!("expected failure");
    };
    assert_eq!(code, "ERROR");
    assert!(message.starts_with("failed to parse json"), "{message}");
}

#[tokio::test]
async fn application_error_body_is_carried_through() {
    if coupang_inventory::utils::test_support::should_skip_httpmock() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(inventory_path(VENDOR_ITEM_ID));
            then.status(200).json_body(json!({
                "code": "ERROR",
                "message": "vendorItemId does not belong to this vendor"
            }));
        })
        .await;

    let result = client(&server.base_url())
        .fetch_inventory(VENDOR_ITEM_ID)
        .await;

    assert_eq!(
        result,
        InventoryQueryResult::failure("ERROR", "vendorItemId does not belong to this vendor")
    );
    assert!(!result.is_success());
}

#[tokio::test]
async fn connection_error_becomes_failure() {
    // Nothing listens on the discard port.
    let result = client("http://127.0.0.1:9").fetch_inventory(VENDOR_ITEM_ID).await;

    let InventoryQueryResult::Failure { code, message } = result else {
        panic!("expected failure");
    };
    assert_eq!(code, "ERROR");
    assert!(message.starts_with("http error"), "{message}");
}

/// Serves one `200` response whose `Content-Length` promises more bytes than
/// are sent, then closes the connection.
fn serve_short_body(body: &'static str) -> std::io::Result<String> {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    let addr = listener.local_addr()?;
    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n",
            body.len() + 500
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(body.as_bytes());
        let _ = stream.flush();
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn connection_dropped_mid_body_is_a_transport_failure() {
    if coupang_inventory::utils::test_support::should_skip_httpmock() {
        return;
    }

    let base_url = serve_short_body(
        r#"{"code":"SUCCESS","message":"","data":{"sellerItemId":"S1","amountInStock":10,"salePrice":9900,"onSale":true}}"#,
    )
    .expect("bind short-body server");

    let result = client(&base_url).fetch_inventory(VENDOR_ITEM_ID).await;

    assert!(!result.is_success());
    let InventoryQueryResult::Failure { code, message } = result else {
        panic!("expected failure");
    };
    assert_eq!(code, "ERROR");
    assert!(message.starts_with("http error"), "{message}");
}
