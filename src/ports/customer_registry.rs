use crate::domain::value_objects::CustomerId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 顧客台帳ポート
///
/// 貸出コンテキストと顧客コンテキストの境界を維持する。
/// 貸出側はCustomerIdのみを知り、顧客の詳細は知らない。
#[async_trait]
pub trait CustomerRegistry: Send + Sync {
    /// 顧客が台帳に登録されているか確認する
    ///
    /// チェックアウト・予約の前提条件の検証に使用される。
    async fn exists(&self, customer_id: CustomerId) -> Result<bool>;
}
