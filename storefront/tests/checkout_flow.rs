mod common;

use http::StatusCode;
use serde_json::{Value, json};

use common::{TestClient, spawn_app, spawn_app_with};
use storefront::Config;

fn card_delivery() -> Value {
    json!({
        "delivery_mode": "delivery",
        "street": "12 Via Roma",
        "postal_code": "20121",
        "city": "Milano",
        "payment_method": "card",
        "card_number": "4111 1111 1111 1111",
        "note": "Third floor"
    })
}

async fn stock_of(app: &mut TestClient, id: i64) -> i64 {
    let (_, body) = app.get(&format!("/api/products/{id}")).await;
    body["data"]["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn test_register_login_and_me() {
    let mut app = spawn_app().await;

    let user = app.register("Ada@Example.COM").await;
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["role"], "customer");

    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    let mut other = app.new_client();
    let (status, body) = other
        .post(
            "/api/auth/login",
            json!({ "email": "ADA@example.com", "password": "correct horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 3600);
}

#[tokio::test]
async fn test_auth_failures() {
    let mut app = spawn_app().await;
    app.register("grace@example.com").await;

    let mut visitor = app.new_client();
    let (status, body) = visitor
        .post(
            "/api/auth/register",
            json!({
                "email": "grace@example.com",
                "password": "another secret",
                "first_name": "Grace",
                "last_name": "Hopper"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1008);

    let (status, body) = visitor
        .post(
            "/api/auth/register",
            json!({
                "email": "short@example.com",
                "password": "short",
                "first_name": "Short",
                "last_name": "Password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1009);

    let (status, wrong_password) = visitor
        .post(
            "/api/auth/login",
            json!({ "email": "grace@example.com", "password": "not the one" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, unknown_email) = visitor
        .post(
            "/api/auth/login",
            json!({ "email": "nobody@example.com", "password": "not the one" }),
        )
        .await;
    assert_eq!(wrong_password["code"], 1002);
    assert_eq!(wrong_password, unknown_email);

    let (status, body) = visitor.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    visitor.set_token("not-a-jwt");
    let (status, body) = visitor.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_registration_is_rate_limited() {
    let mut app = spawn_app().await;
    for i in 0..3 {
        app.register(&format!("user{i}@example.com")).await;
    }
    let (status, body) = app
        .post(
            "/api/auth/register",
            json!({
                "email": "user3@example.com",
                "password": "correct horse",
                "first_name": "Too",
                "last_name": "Many"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 9);

    // another address is counted separately
    let mut other = app.new_client();
    other.register("user4@example.com").await;
}

#[tokio::test]
async fn test_forwarded_header_ignored_without_trusted_proxy() {
    let mut config = Config::for_tests();
    config.trust_proxy = false;
    let app = spawn_app_with(config).await;

    // every client sends its own X-Forwarded-For address
    for i in 0..3 {
        app.new_client().register(&format!("spoof{i}@example.com")).await;
    }
    let (status, body) = app
        .new_client()
        .post(
            "/api/auth/register",
            json!({
                "email": "spoof3@example.com",
                "password": "correct horse",
                "first_name": "Too",
                "last_name": "Many"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 9);
}

#[tokio::test]
async fn test_checkout_places_order() {
    let mut app = spawn_app().await;
    app.register("buyer@example.com").await;

    app.post(
        "/api/cart/items",
        json!({ "kind": "pizza", "product_id": 102, "quantity": 2 }),
    )
    .await;
    app.post(
        "/api/cart/custom-pizza",
        json!({
            "base_pizza_id": 101,
            "removed_ingredient_ids": [7],
            "added_supplement_ids": [3]
        }),
    )
    .await;
    app.post("/api/cart/items", json!({ "kind": "soda", "product_id": 301 }))
        .await;

    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = &body["data"];
    assert_eq!(order["status"], "paid");
    assert_eq!(order["total"], 2 * 1150 + 1100 + 300);
    assert_eq!(order["payment_reference"], "SIM-1111");
    assert_eq!(order["lines"].as_array().unwrap().len(), 3);
    let order_id = order["id"].as_i64().unwrap();

    // stock drawn, custom pizza from its base
    assert_eq!(stock_of(&mut app, 102).await, 48);
    assert_eq!(stock_of(&mut app, 101).await, 49);
    assert_eq!(stock_of(&mut app, 301).await, 119);

    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["data"]["item_count"], 0);

    let (_, body) = app.get("/api/orders").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (status, body) = app.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["note"], "Third floor");

    // not visible to another customer
    let mut other = app.new_client();
    other.register("someone@example.com").await;
    let (status, body) = other.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_cash_pickup_is_pending() {
    let mut app = spawn_app().await;
    app.register("cash@example.com").await;
    app.post("/api/cart/items", json!({ "kind": "dessert", "product_id": 402 }))
        .await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({ "delivery_mode": "pickup", "payment_method": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["street"], Value::Null);
    assert_eq!(body["data"]["payment_reference"], Value::Null);
}

#[tokio::test]
async fn test_checkout_refusals() {
    let mut app = spawn_app().await;
    app.post("/api/cart/items", json!({ "kind": "pizza", "product_id": 103 }))
        .await;

    // anonymous
    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    app.register("picky@example.com").await;

    let mut bad_card = card_delivery();
    bad_card["card_number"] = json!("4111 1111 1111 1112");
    let (status, body) = app.post("/api/checkout", bad_card).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let mut no_city = card_delivery();
    no_city["city"] = Value::Null;
    let (_, body) = app.post("/api/checkout", no_city).await;
    assert_eq!(body["code"], 4003);

    // cart survives refused checkouts
    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["data"]["item_count"], 1);

    app.delete("/api/cart").await;
    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_checkout_checks_stock() {
    let mut app = spawn_app().await;
    app.register("hungry@example.com").await;

    // Tiramisu: 20 in stock
    let (status, _) = app
        .post(
            "/api/cart/items",
            json!({ "kind": "dessert", "product_id": 401, "quantity": 21 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);
    assert_eq!(stock_of(&mut app, 401).await, 20);

    app.put("/api/cart/items/dessert/401", json!({ "quantity": 20 }))
        .await;
    let (status, _) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&mut app, 401).await, 0);
}

#[tokio::test]
async fn test_checkout_drops_products_gone_off_sale() {
    let mut app = spawn_app().await;
    app.register("late@example.com").await;
    app.post("/api/cart/items", json!({ "kind": "wine", "product_id": 202 }))
        .await;
    app.post("/api/cart/items", json!({ "kind": "soda", "product_id": 302 }))
        .await;

    storefront::db::repository::product::deactivate(app.state.pool(), 202)
        .await
        .unwrap();

    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 6002);
    assert_eq!(body["details"]["product_ids"], json!([202]));

    let (status, body) = app.post("/api/checkout", card_delivery()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 300);
}
