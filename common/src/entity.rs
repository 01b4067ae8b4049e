use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// 数据库实体基础契约
///
/// 所有受通用引擎管理的实体都携带这组公共字段：
/// 主键、创建/更新时间（毫秒时间戳）、启用标记、乐观锁版本号。
/// 访问器实现由 `entity_macro::DbEntity` 派生宏生成。
pub trait DbEntity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Unpin + 'static {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn create_time(&self) -> i64;
    fn set_create_time(&mut self, time: i64);
    fn update_time(&self) -> i64;
    fn set_update_time(&mut self, time: i64);
    fn is_enable(&self) -> bool;
    fn set_is_enable(&mut self, enable: bool);
    fn revision(&self) -> u64;
    fn set_revision(&mut self, revision: u64);
}
