use crate::domain::value_objects::ItemId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 在庫カタログポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出側は「その物品が在庫として存在するか」だけを問い合わせ、
/// カタログを変更することは決してない。
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 物品が在庫に存在するか確認する
    ///
    /// チェックアウト・予約の前提条件の検証に使用される。
    async fn exists(&self, item_id: ItemId) -> Result<bool>;
}
