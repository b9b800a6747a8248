mod common;

use http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn test_admin_routes_need_permission() {
    let mut app = spawn_app().await;

    let (status, body) = app.get("/api/admin/stock").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    app.register("customer@example.com").await;
    for uri in ["/api/admin/stock", "/api/admin/products", "/api/admin/orders"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["code"], 2001);
    }

    let mut admin = app.new_client();
    admin.login_admin().await;
    let (status, body) = admin.get("/api/admin/stock").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn test_stock_management() {
    let mut admin = spawn_app().await;
    admin.login_admin().await;

    let (_, body) = admin.get("/api/admin/stock/low").await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = admin.put("/api/admin/stock/401", json!({ "quantity": 3 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 3);

    let (_, body) = admin.get("/api/admin/stock/low").await;
    let low = body["data"].as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["product_id"], 401);
    let (_, body) = admin.get("/api/admin/stock/low?threshold=2").await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = admin
        .post("/api/admin/stock/401/adjust", json!({ "delta": -10 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);

    let (_, body) = admin
        .post("/api/admin/stock/401/adjust", json!({ "delta": 12 }))
        .await;
    assert_eq!(body["data"]["stock"], 15);

    let (status, body) = admin.put("/api/admin/stock/401", json!({ "quantity": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = admin.put("/api/admin/stock/9999", json!({ "quantity": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_catalog_management() {
    let mut admin = spawn_app().await;
    admin.login_admin().await;

    // kind-specific fields are enforced
    let (status, body) = admin
        .post(
            "/api/admin/products",
            json!({ "kind": "wine", "name": "Barolo", "price": 4500, "alcohol_percent": 14.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = admin
        .post(
            "/api/admin/products",
            json!({
                "kind": "pizza",
                "name": "Capricciosa",
                "price": 1250,
                "stock": 25,
                "ingredient_ids": [1, 2, 3, 4, 5]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["ingredients"].as_array().unwrap().len(), 5);
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = admin.get("/api/products?kind=pizza").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let (status, body) = admin
        .put(
            &format!("/api/admin/products/{id}"),
            json!({ "price": 1300, "ingredient_ids": [1, 2, 3] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 1300);
    assert_eq!(body["data"]["ingredients"].as_array().unwrap().len(), 3);

    let (_, body) = admin
        .put(
            &format!("/api/admin/products/{id}/spotlight"),
            json!({ "is_spotlight": true }),
        )
        .await;
    assert_eq!(body["data"]["is_spotlight"], true);
    let (_, body) = admin.get("/api/products/spotlight").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, _) = admin.delete(&format!("/api/admin/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = admin.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = admin.delete(&format!("/api/admin/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // still listed for the back-office
    let (_, body) = admin.get("/api/admin/products").await;
    assert!(body["data"].as_array().unwrap().iter().any(|p| p["id"] == id));
}

#[tokio::test]
async fn test_ingredient_management() {
    let mut admin = spawn_app().await;
    admin.login_admin().await;

    let (status, body) = admin
        .post(
            "/api/admin/ingredients",
            json!({ "name": "Truffle", "is_supplement": true, "supplement_price": 400 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Truffle");

    let (status, body) = admin
        .post("/api/admin/ingredients", json!({ "name": "Basil" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6005);

    let (_, body) = admin.get("/api/supplements").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 12);
    let (_, body) = admin.get("/api/admin/ingredients").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn test_order_status_and_cancellation() {
    let mut customer = spawn_app().await;
    customer.register("regular@example.com").await;
    customer
        .post(
            "/api/cart/items",
            json!({ "kind": "cocktail", "product_id": 502, "quantity": 4 }),
        )
        .await;
    let (status, body) = customer
        .post(
            "/api/checkout",
            json!({ "delivery_mode": "pickup", "payment_method": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["data"]["id"].as_i64().unwrap();

    let mut admin = customer.new_client();
    admin.login_admin().await;

    let (_, body) = admin.get("/api/admin/orders?status=pending").await;
    let pending = body["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["customer_email"], "regular@example.com");
    assert_eq!(pending[0]["item_count"], 4);

    let (_, body) = admin.get("/api/admin/stock").await;
    let negroni = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["product_id"] == 502)
        .unwrap()
        .clone();
    assert_eq!(negroni["stock"], 26);
    assert_eq!(negroni["units_sold"], 4);

    let status_uri = format!("/api/admin/orders/{order_id}/status");
    let (status, body) = admin.put(&status_uri, json!({ "status": "delivered" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, body) = admin.put(&status_uri, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (_, body) = admin.get("/api/admin/stock").await;
    let negroni = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["product_id"] == 502)
        .unwrap()
        .clone();
    assert_eq!(negroni["stock"], 30);
    assert_eq!(negroni["units_sold"], 0);

    let (_, body) = customer.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = admin.put("/api/admin/orders/9999/status", json!({ "status": "paid" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_order_lifecycle_to_delivery() {
    let mut customer = spawn_app().await;
    customer.register("fan@example.com").await;
    customer
        .post("/api/cart/items", json!({ "kind": "pizza", "product_id": 105 }))
        .await;
    let (_, body) = customer
        .post(
            "/api/checkout",
            json!({
                "delivery_mode": "delivery",
                "street": "1 Piazza Duomo",
                "postal_code": "20122",
                "city": "Milano",
                "payment_method": "card",
                "card_number": "5555-5555-5555-4444"
            }),
        )
        .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let mut admin = customer.new_client();
    admin.login_admin().await;
    let status_uri = format!("/api/admin/orders/{order_id}/status");
    for next in ["preparing", "delivering", "delivered"] {
        let (status, body) = admin.put(&status_uri, json!({ "status": next })).await;
        assert_eq!(status, StatusCode::OK, "{next}: {body}");
        assert_eq!(body["data"]["status"], next);
    }

    let (status, _) = admin.put(&status_uri, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = admin.get(&format!("/api/admin/orders/{order_id}")).await;
    assert_eq!(body["data"]["lines"][0]["product_name"], "Diavola");
}
