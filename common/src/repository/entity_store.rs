use crate::entity::DbEntity;
use crate::errors::AppError;
use async_trait::async_trait;

/// 实体存储契约
///
/// 物理存储被视为外部协作者，引擎只依赖这组能力：
/// 按主键查找、全量读取、插入、删除、带乐观并发检查的写回。
#[async_trait]
pub trait EntityStore<T: DbEntity>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError>;

    /// 全量读取。无同步快照保证，扫描期间的并发写入不一定可见
    async fn query_all(&self) -> Result<Vec<T>, AppError>;

    async fn insert(&self, entity: &T) -> Result<(), AppError>;

    /// 按主键硬删除，返回是否确实删除了记录
    async fn remove_by_id(&self, id: &str) -> Result<bool, AppError>;

    /// 乐观并发写回：携带读取时的版本号，版本已被其他写入推进时返回 Ok(false)
    async fn save(&self, entity: &T, expected_revision: u64) -> Result<bool, AppError>;
}
