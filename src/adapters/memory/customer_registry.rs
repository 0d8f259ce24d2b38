use crate::domain::value_objects::CustomerId;
use crate::ports::customer_registry::{CustomerRegistry as CustomerRegistryTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// 顧客台帳のインメモリ実装
///
/// 登録された顧客IDの集合だけを持つ。氏名や連絡先は
/// このサービスの関心外。
pub struct CustomerRegistry {
    customers: Mutex<HashSet<CustomerId>>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashSet::new()),
        }
    }

    /// 顧客を台帳に登録
    pub fn add_customer(&self, customer_id: CustomerId) {
        self.customers.lock().unwrap().insert(customer_id);
    }
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRegistryTrait for CustomerRegistry {
    /// 登録済みの顧客かチェック
    async fn exists(&self, customer_id: CustomerId) -> Result<bool> {
        Ok(self.customers.lock().unwrap().contains(&customer_id))
    }
}
