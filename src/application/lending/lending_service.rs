use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::domain::loan::{self, Loan};
use crate::domain::reservation::{ReservationError, ReservationQueue};
use crate::domain::value_objects::{CustomerId, ItemId};
use crate::domain::LendingEvent;
use crate::ports::{Catalog, ChangeNotifier, CustomerRegistry, EventRecorder};

use super::errors::{LendingError, Result};

/// サービスの依存関係
///
/// すべての協力者はポート（トレイト）として注入される。
/// 具体的なアダプタ実装はこの層からは見えない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog: Arc<dyn Catalog>,
    pub customer_registry: Arc<dyn CustomerRegistry>,
    pub event_recorder: Arc<dyn EventRecorder>,
    pub change_notifier: Arc<dyn ChangeNotifier>,
}

/// 貸出と予約の全状態
///
/// LendingService だけが読み書きする。外部にはスナップショットのみを返す。
#[derive(Debug, Default)]
struct LendingState {
    /// 物品ID → 現在有効な貸出記録（1物品につき高々1件）
    loans: HashMap<ItemId, Loan>,
    /// 物品ID → 予約待ち行列。行列は必要になった時点で作られ、
    /// 空になった時点で取り除かれる。
    reservations: HashMap<ItemId, ReservationQueue>,
}

/// 状態レベルの貸出可否判定
///
/// 全物品が顧客に貸出可能なら None、そうでなければ最初に見つかった
/// 違反を返す。check_out と can_check_out が同じ判定を共有することで、
/// 「可と答えたのに実行は失敗する」という不一致を防ぐ。
fn check_out_blocker(
    state: &LendingState,
    customer_id: CustomerId,
    item_ids: &[ItemId],
) -> Option<LendingError> {
    let mut seen = HashSet::new();
    for &item_id in item_ids {
        // 同一バッチ内の重複も二重貸出として扱う
        if state.loans.contains_key(&item_id) || !seen.insert(item_id) {
            return Some(LendingError::AlreadyOnLoan { item: item_id });
        }
        if let Some(queue) = state.reservations.get(&item_id) {
            if !queue.is_empty() && queue.head() != Some(customer_id) {
                return Some(LendingError::ReservationPriorityViolation { item: item_id });
            }
        }
    }
    None
}

/// 貸出サービス
///
/// 貸出記録と予約待ち行列の唯一の書き換え手。状態はひとつのミューテックスの
/// 内側にあり、各操作は検証から書き換えまでを同じクリティカルセクションの中で
/// 行う。半分だけ適用されたバッチを他の呼び出しが観測することはない。
pub struct LendingService {
    deps: ServiceDependencies,
    state: Mutex<LendingState>,
}

impl LendingService {
    pub fn new(deps: ServiceDependencies) -> Self {
        Self {
            deps,
            state: Mutex::new(LendingState::default()),
        }
    }

    /// 既存の貸出記録から初期状態を組み立てる
    ///
    /// 同じ物品に複数の記録がある場合は後の記録が優先される。
    pub fn with_loans(deps: ServiceDependencies, initial_loans: Vec<Loan>) -> Self {
        let mut loans = HashMap::new();
        for loan in initial_loans {
            loans.insert(loan.item_id, loan);
        }
        Self {
            deps,
            state: Mutex::new(LendingState {
                loans,
                reservations: HashMap::new(),
            }),
        }
    }

    // ============================================================
    // 状態変更操作
    // ============================================================

    /// 物品をまとめて貸し出す
    ///
    /// ビジネスルール：
    /// - 顧客が台帳に登録されていること
    /// - すべての物品が在庫カタログに存在すること
    /// - すべての物品が貸出中でないこと
    /// - 予約待ち行列のある物品は、先頭の予約者本人だけが借りられること
    ///
    /// バッチは不可分に扱う。1件でも検証に失敗すれば貸出記録も行列も
    /// 一切変更されない。先頭の予約者が借りた物品では、その予約が
    /// 行列から取り除かれる。
    ///
    /// # 引数
    /// * `customer_id` - 借りる顧客
    /// * `item_ids` - 貸し出す物品の集合
    /// * `loan_date` - 貸出日
    ///
    /// # 戻り値
    /// 成功時は作成された貸出記録
    pub async fn check_out(
        &self,
        customer_id: CustomerId,
        item_ids: &[ItemId],
        loan_date: NaiveDate,
    ) -> Result<Vec<Loan>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (created, events) = {
            let mut state = self.state.lock().await;

            // 1. 顧客と物品の存在確認
            self.ensure_customer_known(customer_id).await?;
            for &item_id in item_ids {
                self.ensure_item_known(item_id).await?;
            }

            // 2. 貸出可否の検証。ここで失敗した呼び出しは状態に触れない。
            if let Some(violation) = check_out_blocker(&state, customer_id, item_ids) {
                return Err(violation);
            }

            // 3. 全物品の承認が済んでから記録を作る
            let mut created = Vec::with_capacity(item_ids.len());
            let mut events = Vec::with_capacity(item_ids.len());
            for &item_id in item_ids {
                let (loan, event) = loan::check_out_item(item_id, customer_id, loan_date);
                created.push(loan.clone());
                state.loans.insert(item_id, loan);
                events.push(event);

                // 4. 先頭の予約を消費する。借主は自分の物品の行列に残らない。
                if let Some(queue) = state.reservations.get_mut(&item_id) {
                    if queue.head() == Some(customer_id) {
                        let _ = queue.remove_head();
                        if queue.is_empty() {
                            state.reservations.remove(&item_id);
                        }
                    }
                }
            }
            (created, events)
        };

        // 5. 確定後にだけ周辺系へ知らせる（ロックの外）
        self.record_events(&events).await;
        self.deps.change_notifier.notify();

        Ok(created)
    }

    /// 物品をまとめて返却する
    ///
    /// ビジネスルール：
    /// - すべての物品が貸出中であること
    ///
    /// バッチは不可分に扱う。1件でも貸出中でなければ何も返却されない。
    /// 予約待ち行列には触れない。次のチェックアウトが先頭の優先権を
    /// 強制する。
    ///
    /// # 引数
    /// * `item_ids` - 返却する物品の集合
    /// * `return_date` - 返却日
    ///
    /// # 戻り値
    /// 成功時は閉じられた貸出記録
    pub async fn check_in(
        &self,
        item_ids: &[ItemId],
        return_date: NaiveDate,
    ) -> Result<Vec<Loan>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (closed, events) = {
            let mut state = self.state.lock().await;

            // 1. 全物品が貸出中であることの検証
            let mut seen = HashSet::new();
            for &item_id in item_ids {
                if !state.loans.contains_key(&item_id) || !seen.insert(item_id) {
                    return Err(LendingError::NotOnLoan { item: item_id });
                }
            }

            // 2. 記録を閉じる
            let mut closed = Vec::with_capacity(item_ids.len());
            let mut events = Vec::with_capacity(item_ids.len());
            for &item_id in item_ids {
                if let Some(record) = state.loans.remove(&item_id) {
                    closed.push(record.clone());
                    events.push(loan::check_in_item(record, return_date));
                }
            }
            (closed, events)
        };

        self.record_events(&events).await;
        self.deps.change_notifier.notify();

        Ok(closed)
    }

    /// 物品を予約する
    ///
    /// ビジネスルール：
    /// - 顧客が台帳に登録されていること
    /// - 物品が在庫カタログに存在すること
    /// - 現在の借主は自分の物品を予約できないこと
    /// - 同じ顧客が同じ行列に二度並べないこと
    /// - 行列は3人まで
    ///
    /// # 引数
    /// * `customer_id` - 予約する顧客
    /// * `item_id` - 予約する物品
    pub async fn reserve(&self, customer_id: CustomerId, item_id: ItemId) -> Result<()> {
        {
            let mut state = self.state.lock().await;

            // 1. 顧客と物品の存在確認
            self.ensure_customer_known(customer_id).await?;
            self.ensure_item_known(item_id).await?;

            // 2. 借主本人の予約を拒否
            if state
                .loans
                .get(&item_id)
                .is_some_and(|record| record.customer_id == customer_id)
            {
                return Err(LendingError::SelfReservationForbidden {
                    item: item_id,
                    customer: customer_id,
                });
            }

            // 3. 行列に加える。行列は最初の予約で作られる。
            let queue = state.reservations.entry(item_id).or_default();
            queue.admit(customer_id).map_err(|error| match error {
                ReservationError::AlreadyQueued => LendingError::AlreadyQueued {
                    item: item_id,
                    customer: customer_id,
                },
                ReservationError::CapacityExceeded => {
                    LendingError::CapacityExceeded { item: item_id }
                }
                ReservationError::EmptyQueue | ReservationError::NotQueued => {
                    unreachable!("admit fails only with AlreadyQueued or CapacityExceeded")
                }
            })?;
        }

        self.deps.change_notifier.notify();
        Ok(())
    }

    // ============================================================
    // 判定
    // ============================================================

    /// 顧客がすべての物品を今すぐ借りられるか
    ///
    /// check_out と同じ状態レベルの判定を使う。存在確認は行わない。
    pub async fn can_check_out(&self, customer_id: CustomerId, item_ids: &[ItemId]) -> bool {
        let state = self.state.lock().await;
        check_out_blocker(&state, customer_id, item_ids).is_none()
    }

    /// 顧客がその物品を予約できるか
    ///
    /// 借主本人でなく、行列に未登録で、行列に空きがあれば可。
    pub async fn can_reserve(&self, customer_id: CustomerId, item_id: ItemId) -> bool {
        let state = self.state.lock().await;
        if state
            .loans
            .get(&item_id)
            .is_some_and(|record| record.customer_id == customer_id)
        {
            return false;
        }
        match state.reservations.get(&item_id) {
            Some(queue) => queue.can_admit(customer_id),
            None => true,
        }
    }

    // ============================================================
    // 照会
    // ============================================================

    /// 現在有効なすべての貸出記録
    pub async fn loans(&self) -> Vec<Loan> {
        let state = self.state.lock().await;
        state.loans.values().cloned().collect()
    }

    /// 顧客が現在借りている物品の貸出記録
    pub async fn loans_for(&self, customer_id: CustomerId) -> Vec<Loan> {
        let state = self.state.lock().await;
        state
            .loans
            .values()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// 物品が貸出中か
    pub async fn is_on_loan(&self, item_id: ItemId) -> bool {
        let state = self.state.lock().await;
        state.loans.contains_key(&item_id)
    }

    /// 物品がその顧客に貸出中か
    pub async fn is_on_loan_to(&self, customer_id: CustomerId, item_id: ItemId) -> bool {
        let state = self.state.lock().await;
        state
            .loans
            .get(&item_id)
            .is_some_and(|record| record.customer_id == customer_id)
    }

    /// 物品の現在の借主
    pub async fn borrower_of(&self, item_id: ItemId) -> Result<CustomerId> {
        let state = self.state.lock().await;
        state
            .loans
            .get(&item_id)
            .map(|record| record.customer_id)
            .ok_or(LendingError::NotOnLoan { item: item_id })
    }

    /// 物品の予約待ち行列のスナップショット（先頭から順）
    ///
    /// 行列のない物品には空列を返す。
    pub async fn reservations_for(&self, item_id: ItemId) -> Vec<CustomerId> {
        let state = self.state.lock().await;
        state
            .reservations
            .get(&item_id)
            .map(|queue| queue.snapshot())
            .unwrap_or_default()
    }

    /// 顧客が今すぐ引き取れる物品
    ///
    /// 顧客が行列の先頭で待っていて、かつ誰にも貸し出されていない物品。
    pub async fn claimable_items(&self, customer_id: CustomerId) -> Vec<ItemId> {
        let state = self.state.lock().await;
        state
            .reservations
            .iter()
            .filter(|&(item_id, queue)| {
                !state.loans.contains_key(item_id) && queue.head() == Some(customer_id)
            })
            .map(|(item_id, _)| *item_id)
            .collect()
    }

    // ============================================================
    // 内部ヘルパー
    // ============================================================

    async fn ensure_customer_known(&self, customer_id: CustomerId) -> Result<()> {
        let known = self
            .deps
            .customer_registry
            .exists(customer_id)
            .await
            .map_err(LendingError::CustomerRegistryError)?;

        if !known {
            return Err(LendingError::UnknownCustomer {
                customer: customer_id,
            });
        }
        Ok(())
    }

    async fn ensure_item_known(&self, item_id: ItemId) -> Result<()> {
        let known = self
            .deps
            .catalog
            .exists(item_id)
            .await
            .map_err(LendingError::CatalogError)?;

        if !known {
            return Err(LendingError::UnknownItem { item: item_id });
        }
        Ok(())
    }

    /// 監査イベントをベストエフォートで記録する
    ///
    /// 記録の失敗は警告ログに残して握りつぶす。確定済みの貸出状態は
    /// 巻き戻さない。
    async fn record_events(&self, events: &[LendingEvent]) {
        for event in events {
            if let Err(error) = self.deps.event_recorder.record(event).await {
                tracing::warn!(
                    "failed to record {} event for item {}: {}",
                    event.kind.as_str(),
                    event.loan.item_id,
                    error
                );
            }
        }
    }
}
