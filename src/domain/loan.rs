use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CustomerId, ItemId, LendingEvent, LendingEventKind};

/// 貸出記録 - 1つの物品が1人の顧客に貸し出されている事実
///
/// チェックアウト成功時に生成され、チェックインで破棄される。
/// 生成後は不変。同じ物品に対する記録は常に高々1件（サービス層が保証する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub item_id: ItemId,
    pub customer_id: CustomerId,
    pub loan_date: NaiveDate,
}

/// 純粋関数：物品を貸し出す
///
/// 新しい貸出記録と監査イベントを返す。副作用なし。
/// 前提条件（物品が貸出中でない等）の検証はサービス層の責務。
pub fn check_out_item(
    item_id: ItemId,
    customer_id: CustomerId,
    loan_date: NaiveDate,
) -> (Loan, LendingEvent) {
    let loan = Loan {
        item_id,
        customer_id,
        loan_date,
    };

    let event = LendingEvent {
        kind: LendingEventKind::Checkout,
        loan: loan.clone(),
        occurred_on: loan_date,
    };

    (loan, event)
}

/// 純粋関数：貸出を終了する
///
/// 記録を消費し、返却の監査イベントを返す。副作用なし。
pub fn check_in_item(loan: Loan, return_date: NaiveDate) -> LendingEvent {
    LendingEvent {
        kind: LendingEventKind::Return,
        loan,
        occurred_on: return_date,
    }
}
