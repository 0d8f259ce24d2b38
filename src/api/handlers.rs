use crate::application::lending::LendingService;
use crate::domain::value_objects::{CustomerId, ItemId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BorrowerResponse, CheckInRequest, CheckOutRequest, ClaimableItemsResponse,
        ClaimableQuery, ListLoansQuery, LoanResponse, ReservationAcceptedResponse,
        ReservationQueueResponse, ReserveRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub lending: Arc<LendingService>,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /loans - 物品をまとめて貸し出す
///
/// 強制されるビジネスルール:
/// - 顧客が台帳に登録されていること
/// - すべての物品がカタログに存在し、貸出中でないこと
/// - 予約のある物品は先頭の予約者だけが借りられること
/// - バッチは不可分（1件でも失敗すれば何も貸し出されない）
pub async fn check_out(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckOutRequest>,
) -> Result<(StatusCode, Json<Vec<LoanResponse>>), ApiError> {
    let customer_id = CustomerId::from_uuid(req.customer_id);
    let item_ids: Vec<ItemId> = req.item_ids.iter().copied().map(ItemId::from_uuid).collect();
    let loan_date = req.loan_date.unwrap_or_else(|| Utc::now().date_naive());

    let created = state
        .lending
        .check_out(customer_id, &item_ids, loan_date)
        .await?;

    let response: Vec<LoanResponse> = created.into_iter().map(LoanResponse::from).collect();
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /loans/return - 物品をまとめて返却する
///
/// 強制されるビジネスルール:
/// - すべての物品が貸出中であること
/// - バッチは不可分（1件でも失敗すれば何も返却されない）
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<Vec<LoanResponse>>), ApiError> {
    let item_ids: Vec<ItemId> = req.item_ids.iter().copied().map(ItemId::from_uuid).collect();
    let return_date = req.return_date.unwrap_or_else(|| Utc::now().date_naive());

    let closed = state.lending.check_in(&item_ids, return_date).await?;

    let response: Vec<LoanResponse> = closed.into_iter().map(LoanResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// POST /reservations - 物品を予約する
///
/// 強制されるビジネスルール:
/// - 顧客と物品が存在すること
/// - 現在の借主は自分の物品を予約できないこと
/// - 同じ行列に二度並べないこと、行列は3人まで
pub async fn reserve(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<ReservationAcceptedResponse>), ApiError> {
    let customer_id = CustomerId::from_uuid(req.customer_id);
    let item_id = ItemId::from_uuid(req.item_id);

    state.lending.reserve(customer_id, item_id).await?;

    let response = ReservationAcceptedResponse {
        item_id: req.item_id,
        customer_id: req.customer_id,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans - 現在有効な貸出の一覧
///
/// クエリパラメータ:
/// - customer_id: 顧客IDでフィルタリング（オプション）
///
/// フィルタが指定されない場合は全貸出を返す。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLoansQuery>,
) -> Json<Vec<LoanResponse>> {
    let records = match query.customer_id {
        Some(customer_id) => {
            state
                .lending
                .loans_for(CustomerId::from_uuid(customer_id))
                .await
        }
        None => state.lending.loans().await,
    };

    Json(records.into_iter().map(LoanResponse::from).collect())
}

/// GET /items/:item_id/borrower - 物品の現在の借主
///
/// 貸出中でない物品は404を返す。
pub async fn get_borrower(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<BorrowerResponse>, ApiError> {
    let item_id = ItemId::from_uuid(item_id);

    let customer_id = state.lending.borrower_of(item_id).await?;

    Ok(Json(BorrowerResponse {
        item_id: item_id.value(),
        customer_id: customer_id.value(),
    }))
}

/// GET /items/:item_id/reservations - 物品の予約待ち行列
///
/// 先頭から順に返す。行列のない物品には空列を返す。
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Json<ReservationQueueResponse> {
    let item_id = ItemId::from_uuid(item_id);

    let customer_ids = state
        .lending
        .reservations_for(item_id)
        .await
        .into_iter()
        .map(|customer_id| customer_id.value())
        .collect();

    Json(ReservationQueueResponse {
        item_id: item_id.value(),
        customer_ids,
    })
}

/// GET /reservations/claimable - 顧客が今すぐ引き取れる物品の一覧
///
/// クエリパラメータ:
/// - customer_id: 対象の顧客（必須）
pub async fn list_claimable(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClaimableQuery>,
) -> Result<Json<ClaimableItemsResponse>, QueryError> {
    let customer_id = query.customer_id.ok_or_else(|| {
        QueryError::BadRequest("customer_id query parameter is required".to_string())
    })?;
    let customer_id = CustomerId::from_uuid(customer_id);

    let item_ids = state
        .lending
        .claimable_items(customer_id)
        .await
        .into_iter()
        .map(|item_id| item_id.value())
        .collect();

    Ok(Json(ClaimableItemsResponse {
        customer_id: customer_id.value(),
        item_ids,
    }))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    BadRequest(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
