use std::collections::VecDeque;

use super::CustomerId;

/// 1つの物品を予約待ちできる顧客数の上限
pub const MAX_WAITING: usize = 3;

/// 予約待ち行列の操作エラー
///
/// `EmptyQueue` と `NotQueued` はサービス層の誤用を示す内部エラーで、
/// 正しい呼び出し順序では外部に漏れない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationError {
    /// 行列が既に上限（3人）に達している
    CapacityExceeded,
    /// 顧客が既に行列に並んでいる
    AlreadyQueued,
    /// 空の行列から先頭を取り除こうとした
    EmptyQueue,
    /// 行列に存在しない顧客を取り除こうとした
    NotQueued,
}

/// 予約待ち行列 - 1つの物品を待つ顧客のFIFO列
///
/// 挿入順がそのまま優先順。同じ顧客は高々1回しか現れず、長さは
/// `MAX_WAITING` を超えない。外部へは常にスナップショット（コピー）を
/// 返し、内部構造は貸出サービス以外から変更できない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationQueue {
    waiting: VecDeque<CustomerId>,
}

impl ReservationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 顧客を受け入れ可能か（未登録かつ空きがある）
    pub fn can_admit(&self, customer_id: CustomerId) -> bool {
        !self.contains(customer_id) && self.waiting.len() < MAX_WAITING
    }

    /// 顧客を行列の末尾に加える
    ///
    /// 既存の並び順は保たれる。重複は `AlreadyQueued`、満員は
    /// `CapacityExceeded` で拒否する（重複判定が先）。
    pub fn admit(&mut self, customer_id: CustomerId) -> Result<(), ReservationError> {
        if self.contains(customer_id) {
            return Err(ReservationError::AlreadyQueued);
        }
        if self.waiting.len() >= MAX_WAITING {
            return Err(ReservationError::CapacityExceeded);
        }
        self.waiting.push_back(customer_id);
        Ok(())
    }

    /// 先頭（最も早く並んだ顧客）を覗く。変更なし。
    pub fn head(&self) -> Option<CustomerId> {
        self.waiting.front().copied()
    }

    /// 先頭の顧客を取り除いて返す
    pub fn remove_head(&mut self) -> Result<CustomerId, ReservationError> {
        self.waiting.pop_front().ok_or(ReservationError::EmptyQueue)
    }

    /// 位置に関係なく特定の顧客を取り除く
    pub fn remove(&mut self, customer_id: CustomerId) -> Result<(), ReservationError> {
        let position = self
            .waiting
            .iter()
            .position(|waiting| *waiting == customer_id)
            .ok_or(ReservationError::NotQueued)?;
        self.waiting.remove(position);
        Ok(())
    }

    pub fn contains(&self, customer_id: CustomerId) -> bool {
        self.waiting.contains(&customer_id)
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// 並び順を保ったスナップショットを返す
    pub fn snapshot(&self) -> Vec<CustomerId> {
        self.waiting.iter().copied().collect()
    }
}
