use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::loan::Loan;

/// 貸出イベントの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingEventKind {
    /// 物品が貸し出された
    Checkout,
    /// 物品が返却された
    Return,
}

impl LendingEventKind {
    /// ログ・監査行で使う文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            LendingEventKind::Checkout => "checkout",
            LendingEventKind::Return => "return",
        }
    }
}

/// イベント：貸出状態が変化した
///
/// 監査目的で記録係（EventRecorder）へ渡される。チェックアウトでは
/// `occurred_on` は貸出日、返却では返却日を運ぶ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingEvent {
    pub kind: LendingEventKind,
    pub loan: Loan,
    pub occurred_on: NaiveDate,
}
