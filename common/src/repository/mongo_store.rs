use crate::entity::DbEntity;
use crate::errors::AppError;
use crate::repository::EntityStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;

/// MongoDB 实体存储
///
/// 乐观并发通过 revision 字段实现：写回以 {id, revision} 过滤，
/// 版本已推进时 replace 匹配不到记录，按冲突上报。
pub struct MongoEntityStore<T: DbEntity> {
    pub collection: Collection<T>,
}

impl<T: DbEntity> MongoEntityStore<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<T: DbEntity> EntityStore<T> for MongoEntityStore<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let result = self.collection.find_one(doc! { "id": id }).await?;
        Ok(result)
    }

    async fn query_all(&self) -> Result<Vec<T>, AppError> {
        let mut cursor = self.collection.find(doc! {}).await?;
        let mut result = vec![];
        while let Some(entity) = cursor.try_next().await? {
            result.push(entity);
        }
        Ok(result)
    }

    async fn insert(&self, entity: &T) -> Result<(), AppError> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn remove_by_id(&self, id: &str) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn save(&self, entity: &T, expected_revision: u64) -> Result<bool, AppError> {
        let filter = doc! { "id": entity.id(), "revision": expected_revision as i64 };
        let result = self.collection.replace_one(filter, entity).await?;
        Ok(result.matched_count > 0)
    }
}
