use crate::domain::events::LendingEvent;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出イベント記録係ポート
///
/// 監査目的の書き込み専用シンク。記録の失敗は呼び出し側でログに残して
/// 無視される。既に確定した貸出状態の変更を巻き戻すことはない。
#[async_trait]
pub trait EventRecorder: Send + Sync {
    /// チェックアウト／返却イベントを1件記録する
    ///
    /// ベストエフォート配送。失敗しても貸出状態のエラーとしては扱われない。
    async fn record(&self, event: &LendingEvent) -> Result<()>;
}
