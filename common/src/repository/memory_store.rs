use crate::entity::DbEntity;
use crate::errors::AppError;
use crate::repository::EntityStore;
use async_trait::async_trait;
use dashmap::DashMap;

/// 内存实体存储
///
/// 测试与内嵌场景使用。版本检查在分片写锁内完成，
/// 对同一记录的并发写回等价于一次 CAS。
pub struct MemoryEntityStore<T: DbEntity> {
    records: DashMap<String, T>,
}

impl<T: DbEntity> MemoryEntityStore<T> {
    pub fn new() -> Self {
        Self { records: DashMap::new() }
    }
}

impl<T: DbEntity> Default for MemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: DbEntity> EntityStore<T> for MemoryEntityStore<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn query_all(&self) -> Result<Vec<T>, AppError> {
        let mut result: Vec<T> = self.records.iter().map(|r| r.value().clone()).collect();
        // DashMap 迭代顺序不稳定，按创建时间给出确定的集合顺序
        result.sort_by(|a, b| (a.create_time(), a.id().to_string()).cmp(&(b.create_time(), b.id().to_string())));
        Ok(result)
    }

    async fn insert(&self, entity: &T) -> Result<(), AppError> {
        if self.records.contains_key(entity.id()) {
            return Err(AppError::Internal(format!("duplicate id: {}", entity.id())));
        }
        self.records.insert(entity.id().to_string(), entity.clone());
        Ok(())
    }

    async fn remove_by_id(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.records.remove(id).is_some())
    }

    async fn save(&self, entity: &T, expected_revision: u64) -> Result<bool, AppError> {
        match self.records.get_mut(entity.id()) {
            Some(mut current) if current.revision() == expected_revision => {
                *current = entity.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DbEntity;
    use entity_macro::DbEntity as DbEntityDerive;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, DbEntityDerive)]
    struct Record {
        id: String,
        name: String,
        is_enable: bool,
        create_time: i64,
        update_time: i64,
        revision: u64,
    }

    fn record(id: &str, rev: u64) -> Record {
        Record {
            id: id.into(),
            name: "r".into(),
            is_enable: true,
            create_time: 0,
            update_time: 0,
            revision: rev,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryEntityStore::new();
        store.insert(&record("a", 0)).await.unwrap();
        assert!(store.find_by_id("a").await.unwrap().is_some());
        assert!(store.find_by_id("b").await.unwrap().is_none());
        // 重复主键插入是存储故障而不是业务结果
        assert!(store.insert(&record("a", 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_save_is_compare_and_swap() {
        let store = MemoryEntityStore::new();
        store.insert(&record("a", 0)).await.unwrap();

        let next = record("a", 1);
        assert!(store.save(&next, 0).await.unwrap());
        // 第二个携带过期版本号的写回失败
        assert!(!store.save(&record("a", 1), 0).await.unwrap());
        assert_eq!(store.find_by_id("a").await.unwrap().unwrap().revision, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryEntityStore::new();
        store.insert(&record("a", 0)).await.unwrap();
        assert!(store.remove_by_id("a").await.unwrap());
        assert!(!store.remove_by_id("a").await.unwrap());
    }
}
