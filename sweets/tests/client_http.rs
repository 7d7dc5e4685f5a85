//! End-to-end tests for `ShopClient` against a mock backend: request shape,
//! bearer attachment, and error normalization.

use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sweets::{ApiError, RegisterRequest, Session, ShopClient, SweetForm, SweetQuery};

fn sweet_json(id: i64, name: &str, price: &str, quantity: u32) -> serde_json::Value {
    json!({ "id": id, "name": name, "category": "Candy", "price": price, "quantity": quantity })
}

#[tokio::test]
async fn login_stores_session_with_admin_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "username": "sam", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "tok",
            "refresh": "ref",
            "is_admin": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = ShopClient::new(server.uri());
    let session = client.login("sam", "pw").await.unwrap();

    assert_eq!(session.access, "tok");
    assert_eq!(session.refresh.as_deref(), Some("ref"));
    assert!(session.is_admin);
    assert_eq!(client.session(), Some(&session));
}

#[tokio::test]
async fn login_rejection_surfaces_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let mut client = ShopClient::new(server.uri());
    let error = client.login("sam", "wrong").await.unwrap_err();

    assert!(matches!(&error, ApiError::Rejected { status: 401, .. }));
    assert_eq!(error.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn register_returns_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "username": "sam",
            "email": "s@x.com",
            "password": "Str0ngPass!",
            "password2": "Str0ngPass!",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access": "tok" })))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri());
    let request = RegisterRequest {
        username: "sam".to_owned(),
        email: "s@x.com".to_owned(),
        password: "Str0ngPass!".to_owned(),
        password2: "Str0ngPass!".to_owned(),
    };
    let access = client.register(&request).await.unwrap();
    assert_eq!(access.as_deref(), Some("tok"));
}

#[tokio::test]
async fn register_rejection_surfaces_first_field_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "username": ["A user with that username already exists."],
        })))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri());
    let request = RegisterRequest {
        username: "sam".to_owned(),
        email: "s@x.com".to_owned(),
        password: "pw123456".to_owned(),
        password2: "pw123456".to_owned(),
    };
    let error = client.register(&request).await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "username error: A user with that username already exists."
    );
}

#[tokio::test]
async fn refresh_replaces_stored_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_json(json!({ "refresh": "ref" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .mount(&server)
        .await;

    let mut client = ShopClient::new(server.uri()).with_session(Session::new("stale", false));
    let access = client.refresh("ref").await.unwrap();

    assert_eq!(access, "fresh");
    assert_eq!(client.session().map(|s| s.access.as_str()), Some("fresh"));
}

#[tokio::test]
async fn list_attaches_bearer_token_and_decodes_prices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sweets/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sweet_json(1, "Choco Delight", "50.00", 10),
            { "id": 2, "name": "Sour Candy", "category": "Candy", "price": 12.5, "quantity": 8 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let sweets = client.sweets(&SweetQuery::all()).await.unwrap();

    assert_eq!(sweets.len(), 2);
    assert_eq!(sweets[0].price, "50.00".parse().unwrap());
    assert_eq!(sweets[1].price, "12.5".parse().unwrap());
}

#[tokio::test]
async fn search_sends_encoded_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sweets/"))
        .and(query_param("search", "choco"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let sweets = client.sweets(&SweetQuery::search("choco")).await.unwrap();
    assert!(sweets.is_empty());
}

#[tokio::test]
async fn filters_compose_on_the_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sweets/"))
        .and(query_param("category", "Chocolate"))
        .and(query_param("min_price", "30"))
        .and(query_param("max_price", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([sweet_json(1, "Choco Delight", "50.00", 10)])),
        )
        .mount(&server)
        .await;

    let query = SweetQuery {
        category: Some("Chocolate".to_owned()),
        min_price: Some("30".parse().unwrap()),
        max_price: Some("100".parse().unwrap()),
        ..SweetQuery::default()
    };
    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let sweets = client.sweets(&query).await.unwrap();
    assert_eq!(sweets[0].name, "Choco Delight");
}

#[tokio::test]
async fn create_posts_parsed_numeric_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sweets/"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "name": "Lollipop",
            "category": "Candy",
            "price": "5.00",
            "quantity": 3,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(sweet_json(9, "Lollipop", "5.00", 3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Raw form input goes through validation before the request is built.
    let input = SweetForm {
        name: "Lollipop".to_owned(),
        category: "Candy".to_owned(),
        price: "5.00".to_owned(),
        quantity: "3".to_owned(),
    }
    .parse()
    .unwrap();

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", true));
    let created = client.create_sweet(&input).await.unwrap();
    assert_eq!(created.id, 9);
}

#[tokio::test]
async fn update_puts_full_body_to_detail_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/sweets/9/"))
        .and(body_json(json!({
            "name": "Lollipop",
            "category": "Candy",
            "price": "6.50",
            "quantity": 4,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(sweet_json(9, "Lollipop", "6.50", 4)),
        )
        .mount(&server)
        .await;

    let input = SweetForm {
        name: "Lollipop".to_owned(),
        category: "Candy".to_owned(),
        price: "6.50".to_owned(),
        quantity: "4".to_owned(),
    }
    .parse()
    .unwrap();

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", true));
    let updated = client.update_sweet(9, &input).await.unwrap();
    assert_eq!(updated.quantity, 4);
}

#[tokio::test]
async fn delete_accepts_204_without_a_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sweets/9/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", true));
    client.delete_sweet(9).await.unwrap();
}

#[tokio::test]
async fn purchase_returns_decremented_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sweets/3/purchase/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sweet_json(3, "Lollipop", "5.00", 2)))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let sweet = client.purchase_sweet(3).await.unwrap();
    assert_eq!(sweet.quantity, 2);
}

#[tokio::test]
async fn purchase_out_of_stock_surfaces_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sweets/3/purchase/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "Out of stock" })))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let error = client.purchase_sweet(3).await.unwrap_err();
    assert_eq!(error.to_string(), "Out of stock");
}

#[tokio::test]
async fn restock_posts_amount_and_returns_updated_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sweets/3/restock/"))
        .and(body_json(json!({ "amount": 5 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(sweet_json(3, "Lollipop", "5.00", 15)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", true));
    let sweet = client.restock_sweet(3, 5).await.unwrap();
    assert_eq!(sweet.quantity, 15);
}

#[tokio::test]
async fn restock_permission_rejection_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sweets/3/restock/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You do not have permission to perform this action.",
        })))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let error = client.restock_sweet(3, 5).await.unwrap_err();
    assert!(matches!(&error, ApiError::Rejected { status: 403, .. }));
    assert_eq!(
        error.to_string(),
        "You do not have permission to perform this action."
    );
}

#[tokio::test]
async fn non_json_error_body_maps_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sweets/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Server Error</html>"))
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri()).with_session(Session::new("tok", false));
    let error = client.sweets(&SweetQuery::all()).await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "request failed with status 500 and a non-JSON body"
    );
}

#[tokio::test]
async fn missing_token_short_circuits_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = ShopClient::new(server.uri());
    let error = client.sweets(&SweetQuery::all()).await.unwrap_err();
    assert!(matches!(error, ApiError::MissingToken));

    let error = client.purchase_sweet(1).await.unwrap_err();
    assert!(matches!(error, ApiError::MissingToken));
}
