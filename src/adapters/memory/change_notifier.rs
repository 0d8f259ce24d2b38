use crate::ports::change_notifier::ChangeNotifier as ChangeNotifierTrait;
use tokio::sync::watch;

/// 変更通知のインプロセス実装
///
/// tokio の watch チャネルで「状態が変わった」という事実だけを配る。
/// 内容は運ばない。知りたい側はサービスに問い合わせ直す。
pub struct ChangeNotifier {
    sender: watch::Sender<()>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(());
        Self { sender }
    }

    /// 変更通知の受信口を開く
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifierTrait for ChangeNotifier {
    /// 受信側が全員いなくなっていても送信は失敗にしない
    fn notify(&self) {
        self.sender.send_replace(());
    }
}
