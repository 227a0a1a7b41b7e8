//! End-to-end tests over the HTTP surface.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use gadget_grove_core::{Email, NewUser, UserRole};
use gadget_grove_integration_tests::{TestContext, json_request, request, response_json};
use gadget_grove_server::repos::UserRepository;
use gadget_grove_server::services::auth::hash_password;

/// Sign up a fresh user and return their bearer token.
async fn signup(ctx: &TestContext, name: &str, email: &str) -> String {
    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            &json!({ "name": name, "email": email, "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["token"].as_str().unwrap().to_owned()
}

/// Create an admin directly in the store and log them in.
async fn admin_token(ctx: &TestContext) -> String {
    UserRepository::new(ctx.store())
        .create(NewUser {
            name: "Root".to_owned(),
            email: Email::parse("root@example.com").unwrap(),
            password: hash_password("hunter22").unwrap(),
            role: UserRole::Admin,
        })
        .await
        .unwrap();

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "root@example.com", "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    body["token"].as_str().unwrap().to_owned()
}

/// Create a product as admin and return its id.
async fn create_product(ctx: &TestContext, token: &str, name: &str, stock: u32) -> String {
    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(token),
            &json!({
                "name": name,
                "description": "A very detailed description.",
                "price": 100.0,
                "image": "https://img.example.com/p.jpg",
                "category": "gadgets",
                "subcategory": "misc",
                "stock": stock
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["product"]["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let response = ctx.app().oneshot(request("GET", "/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_login_me_flow() {
    let ctx = TestContext::new();
    let token = signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    // The password hash must never appear on the wire.
    assert!(body.get("password").is_none());

    // Duplicate email is rejected.
    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            &json!({ "name": "Ada II", "email": "ada@example.com", "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_credentials_and_tokens() {
    let ctx = TestContext::new();
    signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "ada@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "No token provided, authorization denied");

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/auth/me", Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn test_admin_routes_are_gated() {
    let ctx = TestContext::new();
    let user_token = signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/admin/dashboard", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&ctx).await;
    let response = ctx
        .app()
        .oneshot(request("GET", "/api/admin/dashboard", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["stats"]["totalUsers"], 2);
    assert_eq!(body["stats"]["totalOrders"], 0);
}

#[tokio::test]
async fn test_product_listing_filters_and_pagination() {
    let ctx = TestContext::new();
    let admin = admin_token(&ctx).await;
    create_product(&ctx, &admin, "Aurora Smartwatch", 5).await;
    create_product(&ctx, &admin, "Pulse Earbuds", 5).await;
    create_product(&ctx, &admin, "Nimbus Drone", 5).await;

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/products?limit=2&offset=1", None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["offset"], 1);

    // A search query wins over category filters.
    let response = ctx
        .app()
        .oneshot(request(
            "GET",
            "/api/products?category=home-appliances&search=aurora",
            None,
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["name"], "Aurora Smartwatch");
}

#[tokio::test]
async fn test_product_crud_requires_admin() {
    let ctx = TestContext::new();
    let user = signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&user),
            &json!({
                "name": "Sneaky Product",
                "description": "A very detailed description.",
                "price": 1.0,
                "image": "x",
                "category": "gadgets",
                "subcategory": "misc"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&ctx).await;
    let id = create_product(&ctx, &admin, "Aurora Smartwatch", 5).await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "PUT",
            &format!("/api/products/{id}"),
            Some(&admin),
            &json!({ "stock": 9 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["product"]["stock"], 9);

    let response = ctx
        .app()
        .oneshot(request("DELETE", &format!("/api/products/{id}"), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app()
        .oneshot(request("GET", &format!("/api/products/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_flow() {
    let ctx = TestContext::new();
    let admin = admin_token(&ctx).await;
    let id = create_product(&ctx, &admin, "Aurora Smartwatch", 3).await;
    let user = signup(&ctx, "Ada", "ada@example.com").await;

    // Add twice; quantities merge.
    for _ in 0..2 {
        let response = ctx
            .app()
            .oneshot(json_request(
                "POST",
                "/api/cart",
                Some(&user),
                &json!({ "productId": id, "quantity": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/cart", Some(&user)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["quantity"], 2);

    // Exceeding stock is rejected.
    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/cart",
            Some(&user),
            &json!({ "productId": id, "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Insufficient stock");

    // Zero quantity is rejected on update.
    let response = ctx
        .app()
        .oneshot(json_request(
            "PUT",
            &format!("/api/cart/{id}"),
            Some(&user),
            &json!({ "quantity": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Clearing empties the cart.
    let response = ctx
        .app()
        .oneshot(request("DELETE", "/api/cart/clear", Some(&user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cart_merge_with_huge_quantity_is_rejected() {
    let ctx = TestContext::new();
    let admin = admin_token(&ctx).await;
    let id = create_product(&ctx, &admin, "Aurora Smartwatch", 3).await;
    let user = signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/cart",
            Some(&user),
            &json!({ "productId": id, "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Merging u32::MAX into the existing line must fail the stock check,
    // not wrap around.
    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/cart",
            Some(&user),
            &json!({ "productId": id, "quantity": u32::MAX }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Insufficient stock");

    // The existing line is untouched.
    let response = ctx
        .app()
        .oneshot(request("GET", "/api/cart", Some(&user)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body[0]["quantity"], 2);
}

#[tokio::test]
async fn test_order_flow_and_ownership() {
    let ctx = TestContext::new();
    let admin = admin_token(&ctx).await;
    let id = create_product(&ctx, &admin, "Aurora Smartwatch", 5).await;
    let ada = signup(&ctx, "Ada", "ada@example.com").await;
    let bob = signup(&ctx, "Bob", "bob@example.com").await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&ada),
            &json!({
                "items": [{ "productId": id, "quantity": 2 }],
                "shippingAddress": {
                    "name": "Ada", "address": "12 Analytical Way", "city": "London",
                    "state": "LDN", "zip": "E1 6AN", "country": "GB"
                },
                "paymentMethod": "card"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["order"]["status"], "processing");
    assert_eq!(body["order"]["total"], 200.0);
    let order_id = body["order"]["id"].as_str().unwrap().to_owned();

    // The owner and admins can read the order; another user cannot.
    for (token, expected) in [
        (&ada, StatusCode::OK),
        (&admin, StatusCode::OK),
        (&bob, StatusCode::FORBIDDEN),
    ] {
        let response = ctx
            .app()
            .oneshot(request("GET", &format!("/api/orders/{order_id}"), Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }

    let response = ctx
        .app()
        .oneshot(request("GET", "/api/orders", Some(&ada)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Admin can move the order along.
    let response = ctx
        .app()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&admin),
            &json!({ "status": "shipped" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["order"]["status"], "shipped");

    // Unknown statuses are rejected.
    let response = ctx
        .app()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&admin),
            &json!({ "status": "teleported" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_intent_requires_configuration() {
    let ctx = TestContext::new();
    let admin = admin_token(&ctx).await;
    let id = create_product(&ctx, &admin, "Aurora Smartwatch", 5).await;
    let user = signup(&ctx, "Ada", "ada@example.com").await;

    let response = ctx
        .app()
        .oneshot(json_request(
            "POST",
            "/api/orders/create-payment-intent",
            Some(&user),
            &json!({ "items": [{ "productId": id, "quantity": 1 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["clientSecret"].as_str().unwrap().starts_with("pi_"));
    assert_eq!(body["total"], 100.0);

    // Without a payment secret the endpoint is disabled.
    let disabled = TestContext::without_payments();
    let admin = admin_token(&disabled).await;
    let id = create_product(&disabled, &admin, "Aurora Smartwatch", 5).await;
    let user = signup(&disabled, "Ada", "ada@example.com").await;
    let response = disabled
        .app()
        .oneshot(json_request(
            "POST",
            "/api/orders/create-payment-intent",
            Some(&user),
            &json!({ "items": [{ "productId": id, "quantity": 1 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
