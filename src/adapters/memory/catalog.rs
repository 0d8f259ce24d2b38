use crate::domain::value_objects::ItemId;
use crate::ports::catalog::{Catalog as CatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// 在庫カタログのインメモリ実装
///
/// 登録された物品IDの集合だけを持つ。物品の書誌情報は
/// このサービスの関心外。
pub struct Catalog {
    items: Mutex<HashSet<ItemId>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashSet::new()),
        }
    }

    /// 物品をカタログに登録
    pub fn add_item(&self, item_id: ItemId) {
        self.items.lock().unwrap().insert(item_id);
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogTrait for Catalog {
    /// 登録済みの物品かチェック
    async fn exists(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.items.lock().unwrap().contains(&item_id))
    }
}
