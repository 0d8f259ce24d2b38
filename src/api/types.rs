use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::loan::Loan;

/// チェックアウトリクエスト（POST /loans）
#[derive(Debug, Deserialize)]
pub struct CheckOutRequest {
    pub customer_id: Uuid,
    pub item_ids: Vec<Uuid>,
    /// 省略時は今日の日付
    pub loan_date: Option<NaiveDate>,
}

/// 返却リクエスト（POST /loans/return）
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub item_ids: Vec<Uuid>,
    /// 省略時は今日の日付
    pub return_date: Option<NaiveDate>,
}

/// 予約リクエスト（POST /reservations）
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub customer_id: Uuid,
    pub item_id: Uuid,
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// 顧客IDでフィルタリング
    pub customer_id: Option<Uuid>,
}

/// 引き取り可能一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ClaimableQuery {
    pub customer_id: Option<Uuid>,
}

/// 貸出記録レスポンス（POST /loans、POST /loans/return、GET /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub item_id: Uuid,
    pub customer_id: Uuid,
    pub loan_date: NaiveDate,
}

impl From<Loan> for LoanResponse {
    fn from(record: Loan) -> Self {
        Self {
            item_id: record.item_id.value(),
            customer_id: record.customer_id.value(),
            loan_date: record.loan_date,
        }
    }
}

/// 予約受付レスポンス（POST /reservations）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationAcceptedResponse {
    pub item_id: Uuid,
    pub customer_id: Uuid,
}

/// 借主レスポンス（GET /items/:item_id/borrower）
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowerResponse {
    pub item_id: Uuid,
    pub customer_id: Uuid,
}

/// 予約待ち行列レスポンス（GET /items/:item_id/reservations）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationQueueResponse {
    pub item_id: Uuid,
    /// 先頭から順
    pub customer_ids: Vec<Uuid>,
}

/// 引き取り可能レスポンス（GET /reservations/claimable）
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimableItemsResponse {
    pub customer_id: Uuid,
    pub item_ids: Vec<Uuid>,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
