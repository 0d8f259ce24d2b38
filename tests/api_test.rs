use axum::body::Body;
use axum::http::{Request, StatusCode};
use rusty_circulation_ddd::adapters::memory::{
    Catalog, ChangeNotifier, CustomerRegistry, EventRecorder,
};
use rusty_circulation_ddd::api::handlers::AppState;
use rusty_circulation_ddd::api::router::create_router;
use rusty_circulation_ddd::api::types::*;
use rusty_circulation_ddd::application::lending::{LendingService, ServiceDependencies};
use rusty_circulation_ddd::domain::value_objects::{CustomerId, ItemId};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// APIテスト用のアプリケーションセットアップ
///
/// インメモリアダプターと実際のAPIルーターを使用する。
/// カタログと台帳はテスト側から注入できるように引数で受け取る。
fn setup_app(catalog: Arc<Catalog>, customer_registry: Arc<CustomerRegistry>) -> axum::Router {
    let service_deps = ServiceDependencies {
        catalog,
        customer_registry,
        event_recorder: Arc::new(EventRecorder::new()),
        change_notifier: Arc::new(ChangeNotifier::new()),
    };

    let lending = Arc::new(LendingService::new(service_deps));
    let app_state = Arc::new(AppState { lending });

    create_router(app_state)
}

/// テスト用の物品と顧客をセットアップ
fn setup_test_entities(
    catalog: &Catalog,
    customer_registry: &CustomerRegistry,
) -> (ItemId, CustomerId) {
    let item_id = ItemId::new();
    let customer_id = CustomerId::new();

    catalog.add_item(item_id);
    customer_registry.add_customer(customer_id);

    (item_id, customer_id)
}

// ============================================================================
// APIテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let app = setup_app(catalog, customer_registry);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_lending_flow() {
    // Arrange
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let (item_id, customer_id) = setup_test_entities(&catalog, &customer_registry);
    let second_item = ItemId::new();
    catalog.add_item(second_item);

    let app = setup_app(catalog, customer_registry);

    // Step 1: 貸出作成（POST /loans）
    let checkout_request = json!({
        "customer_id": customer_id.value(),
        "item_ids": [item_id.value(), second_item.value()],
        "loan_date": "2024-04-01",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|r| r.customer_id == customer_id.value()));

    // Step 2: 借主照会（GET /items/:item_id/borrower）
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/items/{}/borrower", item_id.value()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let borrower: BorrowerResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(borrower.customer_id, customer_id.value());

    // Step 3: 貸出一覧（GET /loans）
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/loans")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let loans: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(loans.len(), 2);

    // Step 4: 返却（POST /loans/return）
    let return_request = json!({
        "item_ids": [item_id.value(), second_item.value()],
        "return_date": "2024-04-15",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans/return")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&return_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let closed: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(closed.len(), 2);

    // 返却後は借主がいない（GET /items/:item_id/borrower → 404）
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/items/{}/borrower", item_id.value()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "NOT_ON_LOAN");
}

#[tokio::test]
async fn test_reservation_flow() {
    // Arrange
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let (item_id, customer_a) = setup_test_entities(&catalog, &customer_registry);
    let customer_b = CustomerId::new();
    customer_registry.add_customer(customer_b);

    let app = setup_app(catalog, customer_registry);

    // Step 1: Aが予約（POST /reservations）
    let reserve_request = json!({
        "customer_id": customer_a.value(),
        "item_id": item_id.value(),
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reservations")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&reserve_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    // Step 2: 行列の照会（GET /items/:item_id/reservations）
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/items/{}/reservations", item_id.value()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let queue: ReservationQueueResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(queue.customer_ids, vec![customer_a.value()]);

    // Step 3: 先頭でないBのチェックアウトは422（POST /loans）
    let checkout_request = json!({
        "customer_id": customer_b.value(),
        "item_ids": [item_id.value()],
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "RESERVATION_PRIORITY_VIOLATION");

    // Step 4: 先頭のA本人は借りられる（貸出日は省略して今日扱い）
    let checkout_request = json!({
        "customer_id": customer_a.value(),
        "item_ids": [item_id.value()],
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    // 予約は消費されている
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/items/{}/reservations", item_id.value()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let queue: ReservationQueueResponse = serde_json::from_slice(&body).unwrap();
    assert!(queue.customer_ids.is_empty());
}

#[tokio::test]
async fn test_claimable_items_endpoint() {
    // Arrange: Aが誰も借りていない物品を予約している
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let (item_id, customer_id) = setup_test_entities(&catalog, &customer_registry);

    let app = setup_app(catalog, customer_registry);

    let reserve_request = json!({
        "customer_id": customer_id.value(),
        "item_id": item_id.value(),
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reservations")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&reserve_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Act: 引き取り可能一覧（GET /reservations/claimable）
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/reservations/claimable?customer_id={}",
                    customer_id.value()
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let claimable: ClaimableItemsResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(claimable.item_ids, vec![item_id.value()]);

    // customer_idなしは400
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/reservations/claimable")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_loans_filtered_by_customer() {
    // Arrange: AとBがそれぞれ1点ずつ借りている
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let (item_a, customer_a) = setup_test_entities(&catalog, &customer_registry);
    let (item_b, customer_b) = setup_test_entities(&catalog, &customer_registry);

    let app = setup_app(catalog, customer_registry);

    for (customer_id, item_id) in [(customer_a, item_a), (customer_b, item_b)] {
        let checkout_request = json!({
            "customer_id": customer_id.value(),
            "item_ids": [item_id.value()],
            "loan_date": "2024-04-01",
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/loans")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Act: Aで絞り込む
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/loans?customer_id={}", customer_a.value()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let loans: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].item_id, item_a.value());
}

// ============================================================================
// APIテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_check_out_unknown_customer_maps_to_422() {
    // Arrange: 顧客を登録しない
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let item_id = ItemId::new();
    catalog.add_item(item_id);

    let app = setup_app(catalog, customer_registry);

    let checkout_request = json!({
        "customer_id": CustomerId::new().value(),
        "item_ids": [item_id.value()],
    });

    // Act
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "UNKNOWN_CUSTOMER");
    assert!(error.message.contains("not registered"));
}

#[tokio::test]
async fn test_reserve_self_reservation_maps_to_422() {
    // Arrange: 自分が借りている物品を予約しようとする
    let catalog = Arc::new(Catalog::new());
    let customer_registry = Arc::new(CustomerRegistry::new());
    let (item_id, customer_id) = setup_test_entities(&catalog, &customer_registry);

    let app = setup_app(catalog, customer_registry);

    let checkout_request = json!({
        "customer_id": customer_id.value(),
        "item_ids": [item_id.value()],
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/loans")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&checkout_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let reserve_request = json!({
        "customer_id": customer_id.value(),
        "item_id": item_id.value(),
    });

    // Act
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reservations")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&reserve_request).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "SELF_RESERVATION_FORBIDDEN");
}
