/// 変更通知ポート
///
/// 貸出状態が変化したことを外部の観測者（UI・レポート等）へ知らせる
/// 発火専用の仕組み。ペイロードも応答もなく、同期的に呼ばれるため
/// ブロックしてはならない。
pub trait ChangeNotifier: Send + Sync {
    /// 貸出状態の変更を通知する
    ///
    /// 成功した変更操作の完了ごとに1回呼ばれる。購読者がいなくても
    /// 失敗しない。
    fn notify(&self);
}
