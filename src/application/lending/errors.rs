use thiserror::Error;

use crate::domain::value_objects::{CustomerId, ItemId};

/// 貸出アプリケーション層のエラー
///
/// 業務ルール違反はすべて型付きの値として返し、呼び出し側（UI層）が
/// メッセージ文字列を解析せずに違反の種類と対象の物品・顧客を特定できる
/// ようにする。
#[derive(Debug, Error)]
pub enum LendingError {
    /// 物品が在庫カタログに存在しない
    #[error("item {item} is not in the catalog")]
    UnknownItem { item: ItemId },

    /// 顧客が台帳に登録されていない
    #[error("customer {customer} is not registered")]
    UnknownCustomer { customer: CustomerId },

    /// 既に貸出中の物品をチェックアウトしようとした
    #[error("item {item} is already on loan")]
    AlreadyOnLoan { item: ItemId },

    /// 貸出中でない物品を返却・照会しようとした
    #[error("item {item} is not on loan")]
    NotOnLoan { item: ItemId },

    /// 予約待ち行列の先頭でない顧客がチェックアウトしようとした
    #[error("item {item} is reserved; only the first customer in the queue may check it out")]
    ReservationPriorityViolation { item: ItemId },

    /// 現在の借主がその物品を予約しようとした
    #[error("customer {customer} already holds the loan of item {item}")]
    SelfReservationForbidden { item: ItemId, customer: CustomerId },

    /// 顧客が既にその物品の行列に並んでいる
    #[error("customer {customer} is already queued for item {item}")]
    AlreadyQueued { item: ItemId, customer: CustomerId },

    /// 予約待ち行列が上限（3人）に達している
    #[error("reservation queue for item {item} is full")]
    CapacityExceeded { item: ItemId },

    /// 在庫カタログポートのエラー
    #[error("catalog error")]
    CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 顧客台帳ポートのエラー
    #[error("customer registry error")]
    CustomerRegistryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingError>;
