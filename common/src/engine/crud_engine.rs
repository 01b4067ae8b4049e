use crate::engine::policy::{DefaultPolicy, EntityPolicy, SensitiveFieldAction};
use crate::entity::DbEntity;
use crate::errors::AppError;
use crate::patch::{PatchOp, apply_patch};
use crate::repository::EntityStore;
use crate::result::ApiResponse;
use crate::schema::FieldSchemaProvider;
use crate::util::common_utils::build_uuid;
use crate::util::date_util::now_millis;
use serde_json::Value;
use std::sync::Arc;

/// 通用 CRUD 引擎
///
/// 对任意注册了字段表的实体类型提供六个操作：按字段搜索、按主键查询、
/// 创建、全量更新、补丁更新、删除、停用。存储与策略通过构造函数显式注入。
/// 业务失败（未找到、校验不过、并发冲突）写入统一响应信封，
/// 只有存储层故障才作为错误向上传播。
pub struct CrudEngine<T: DbEntity + FieldSchemaProvider> {
    store: Arc<dyn EntityStore<T>>,
    policy: Arc<dyn EntityPolicy<T>>,
}

impl<T: DbEntity + FieldSchemaProvider> CrudEngine<T> {
    pub fn new(store: Arc<dyn EntityStore<T>>) -> Self {
        Self { store, policy: Arc::new(DefaultPolicy) }
    }

    pub fn with_policy(store: Arc<dyn EntityStore<T>>, policy: Arc<dyn EntityPolicy<T>>) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore<T>> {
        &self.store
    }

    /// 按字段值子串搜索（大小写敏感）
    ///
    /// 全量读取后内存过滤，只适用于小集合；扫描期间的并发写入
    /// 不保证反映在结果里
    pub async fn search_by_field(&self, field_name: &str, search_value: &str) -> Result<ApiResponse<Vec<T>>, AppError> {
        if field_name.trim().is_empty() {
            return Ok(ApiResponse::error("搜索字段不能为空"));
        }
        let schema = T::field_schema();
        if schema.get(field_name).is_none() {
            return Ok(ApiResponse::error("无效的搜索字段"));
        }

        let entities = self.store.query_all().await?;
        let mut matches = vec![];
        for entity in entities {
            let projected = serde_json::to_value(&entity)?;
            if stringify_field(&projected, field_name).contains(search_value) {
                matches.push(entity);
            }
        }

        if matches.is_empty() {
            return Ok(ApiResponse::error("没有找到匹配的数据"));
        }
        Ok(ApiResponse::ok(matches))
    }

    /// 按主键查询
    pub async fn get_by_id(&self, id: &str) -> Result<ApiResponse<T>, AppError> {
        if id.trim().is_empty() {
            return Ok(ApiResponse::error("ID 不能为空"));
        }
        match self.store.find_by_id(id).await? {
            Some(entity) => Ok(ApiResponse::ok(entity)),
            None => Ok(ApiResponse::error("未找到匹配的数据")),
        }
    }

    /// 创建实体：调用方提供的 id 一律丢弃，由引擎分配
    pub async fn create(&self, mut entity: T) -> Result<ApiResponse<T>, AppError> {
        entity.set_id(build_uuid());
        let now = now_millis();
        entity.set_create_time(now);
        entity.set_update_time(now);
        entity.set_revision(0);

        if let Err(e) = self.policy.before_create(&mut entity) {
            return capture(e);
        }

        self.store.insert(&entity).await?;
        log::debug!("created {} {}", T::field_schema().entity_name(), entity.id());
        Ok(ApiResponse::ok(entity))
    }

    /// 全量更新
    ///
    /// 传入实体的每个字段覆盖库中记录，除了：create_time 还原为库中值、
    /// update_time 强制为当前时间、敏感字段按策略钩子的决定还原或保留
    pub async fn update(&self, mut entity: T) -> Result<ApiResponse<T>, AppError> {
        if entity.id().trim().is_empty() {
            return Ok(ApiResponse::error("ID 不能为空"));
        }
        let stored = match self.store.find_by_id(entity.id()).await? {
            Some(stored) => stored,
            None => return Ok(ApiResponse::error("未找到匹配的数据")),
        };

        let action = match self.policy.before_update(&mut entity, &stored) {
            Ok(action) => action,
            Err(e) => return capture(e),
        };
        if action == SensitiveFieldAction::RestoreFromStored {
            restore_sensitive_fields(&mut entity, &stored)?;
        }

        entity.set_create_time(stored.create_time());
        entity.set_update_time(now_millis());
        let expected = stored.revision();
        entity.set_revision(expected + 1);

        if !self.store.save(&entity, expected).await? {
            log::warn!("concurrency conflict on {} {}", T::field_schema().entity_name(), entity.id());
            return capture(AppError::ConcurrencyConflict);
        }
        Ok(ApiResponse::ok(entity))
    }

    /// 补丁更新：策略门禁 → 全批应用 → 乐观写回
    pub async fn patch(&self, id: &str, ops: &[PatchOp]) -> Result<ApiResponse<T>, AppError> {
        if id.trim().is_empty() {
            return Ok(ApiResponse::error("ID 不能为空"));
        }
        if ops.is_empty() {
            return Ok(ApiResponse::error("补丁操作不能为空"));
        }
        let stored = match self.store.find_by_id(id).await? {
            Some(stored) => stored,
            None => return Ok(ApiResponse::error("未找到匹配的数据")),
        };

        if let Err(e) = self.policy.patch_gate(ops) {
            return capture(e);
        }
        let mut patched = match apply_patch(T::field_schema(), &stored, ops) {
            Ok(patched) => patched,
            Err(e) => return capture(e),
        };

        patched.set_update_time(now_millis());
        let expected = stored.revision();
        patched.set_revision(expected + 1);

        if !self.store.save(&patched, expected).await? {
            log::warn!("concurrency conflict on {} {}", T::field_schema().entity_name(), id);
            return capture(AppError::ConcurrencyConflict);
        }
        Ok(ApiResponse::ok(patched))
    }

    /// 按主键硬删除，返回被删除的实体
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<T>, AppError> {
        if id.trim().is_empty() {
            return Ok(ApiResponse::error("ID 不能为空"));
        }
        let stored = match self.store.find_by_id(id).await? {
            Some(stored) => stored,
            None => return Ok(ApiResponse::error("未找到匹配的数据")),
        };
        if !self.store.remove_by_id(id).await? {
            return Ok(ApiResponse::error("未找到匹配的数据"));
        }
        Ok(ApiResponse::ok(stored))
    }

    /// 停用（软删除）：只改 is_enable 与 update_time，可重复调用
    pub async fn disable(&self, id: &str) -> Result<ApiResponse<T>, AppError> {
        if id.trim().is_empty() {
            return Ok(ApiResponse::error("ID 不能为空"));
        }
        let mut stored = match self.store.find_by_id(id).await? {
            Some(stored) => stored,
            None => return Ok(ApiResponse::error("未找到匹配的数据")),
        };

        let expected = stored.revision();
        stored.set_is_enable(false);
        stored.set_update_time(now_millis());
        stored.set_revision(expected + 1);

        if !self.store.save(&stored, expected).await? {
            return capture(AppError::ConcurrencyConflict);
        }
        Ok(ApiResponse::ok(stored))
    }
}

/// 业务错误进信封，存储故障向上传播
fn capture<D>(err: AppError) -> Result<ApiResponse<D>, AppError> {
    if err.is_domain() { Ok(ApiResponse::error(err.to_string())) } else { Err(err) }
}

fn stringify_field(projected: &Value, field_name: &str) -> String {
    match projected.get(field_name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// 用库中值覆盖传入实体的全部敏感字段
fn restore_sensitive_fields<T>(incoming: &mut T, stored: &T) -> Result<(), AppError>
where
    T: DbEntity + FieldSchemaProvider,
{
    let schema = T::field_schema();
    if schema.sensitive_fields().next().is_none() {
        return Ok(());
    }

    let mut incoming_value = serde_json::to_value(&*incoming)?;
    let stored_value = serde_json::to_value(stored)?;
    let map = incoming_value
        .as_object_mut()
        .ok_or_else(|| AppError::Internal("entity projection is not an object".to_string()))?;
    for spec in schema.sensitive_fields() {
        let value = stored_value.get(spec.name()).cloned().unwrap_or(Value::Null);
        map.insert(spec.name().to_string(), value);
    }
    *incoming = serde_json::from_value(incoming_value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DbEntity;
    use crate::patch::PatchKind;
    use crate::repository::MemoryEntityStore;
    use crate::schema::{FieldKind, FieldSchema, FieldSchemaProvider, FieldSpec, MutationClass};
    use entity_macro::{DbEntity as DbEntityDerive, FieldSchemaProvider as FieldSchemaDerive};
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, DbEntityDerive, FieldSchemaDerive)]
    struct NoteEntity {
        #[field(immutable)]
        id: String,
        title: String,
        body: Option<String>,
        is_enable: bool,
        #[field(immutable)]
        create_time: i64,
        #[field(server_managed)]
        update_time: i64,
        update_user: String,
        #[field(server_managed)]
        #[serde(default)]
        revision: u64,
    }

    fn note(title: &str) -> NoteEntity {
        NoteEntity {
            id: String::new(),
            title: title.into(),
            body: None,
            is_enable: true,
            create_time: 0,
            update_time: 0,
            update_user: "tester".into(),
            revision: 0,
        }
    }

    fn engine() -> CrudEngine<NoteEntity> {
        CrudEngine::new(Arc::new(MemoryEntityStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_times() {
        let engine = engine();
        let mut incoming = note("hello");
        incoming.id = "caller-id".into();

        let created = engine.create(incoming).await.unwrap().data.unwrap();
        assert_ne!(created.id, "caller-id");
        assert!(!created.id.is_empty());
        assert_eq!(created.create_time, created.update_time);
        assert!(created.is_enable);
        assert_eq!(created.revision, 0);

        let other = engine.create(note("world")).await.unwrap().data.unwrap();
        assert_ne!(created.id, other.id);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        let found = engine.get_by_id(&created.id).await.unwrap();
        assert!(found.success);
        assert_eq!(found.data.unwrap().title, "hello");

        assert!(!engine.get_by_id("missing").await.unwrap().success);
        assert!(!engine.get_by_id("").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_search_by_field() {
        let engine = engine();
        engine.create(note("rust guide")).await.unwrap();
        engine.create(note("cook book")).await.unwrap();

        let hit = engine.search_by_field("title", "rust").await.unwrap();
        assert!(hit.success);
        assert_eq!(hit.data.unwrap().len(), 1);

        // 大小写敏感
        assert!(!engine.search_by_field("title", "RUST").await.unwrap().success);
        assert!(!engine.search_by_field("title", "nothing").await.unwrap().success);
        assert!(!engine.search_by_field("", "x").await.unwrap().success);
        assert!(!engine.search_by_field("missing_field", "x").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_update_preserves_create_time() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut incoming = created.clone();
        incoming.title = "changed".into();
        incoming.create_time = 42;

        let updated = engine.update(incoming).await.unwrap().data.unwrap();
        assert_eq!(updated.title, "changed");
        assert_eq!(updated.create_time, created.create_time);
        assert!(updated.update_time > created.update_time);
        assert_eq!(updated.revision, 1);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let engine = engine();
        assert!(!engine.update(note("ghost")).await.unwrap().success);

        let mut gone = note("ghost");
        gone.id = "nope".into();
        assert!(!engine.update(gone).await.unwrap().success);
    }

    /// 读取返回固定快照、写入落到真实存储的包装，
    /// 用于复现“第二次读取发生在第一次写入提交之前”的交错
    struct SnapshotStore {
        live: Arc<MemoryEntityStore<NoteEntity>>,
        snapshot: NoteEntity,
    }

    #[async_trait::async_trait]
    impl EntityStore<NoteEntity> for SnapshotStore {
        async fn find_by_id(&self, id: &str) -> Result<Option<NoteEntity>, AppError> {
            if id == self.snapshot.id {
                return Ok(Some(self.snapshot.clone()));
            }
            self.live.find_by_id(id).await
        }
        async fn query_all(&self) -> Result<Vec<NoteEntity>, AppError> {
            self.live.query_all().await
        }
        async fn insert(&self, entity: &NoteEntity) -> Result<(), AppError> {
            self.live.insert(entity).await
        }
        async fn remove_by_id(&self, id: &str) -> Result<bool, AppError> {
            self.live.remove_by_id(id).await
        }
        async fn save(&self, entity: &NoteEntity, expected_revision: u64) -> Result<bool, AppError> {
            self.live.save(entity, expected_revision).await
        }
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let live = Arc::new(MemoryEntityStore::new());
        let engine = CrudEngine::new(live.clone() as Arc<dyn EntityStore<NoteEntity>>);
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        // 第二个调用方在第一个写入提交前完成了读取
        let stale_engine = CrudEngine::new(Arc::new(SnapshotStore { live: live.clone(), snapshot: created.clone() })
            as Arc<dyn EntityStore<NoteEntity>>);

        let mut first = created.clone();
        first.title = "first".into();
        let first_result = engine.update(first).await.unwrap();
        assert!(first_result.success);

        let mut second = created.clone();
        second.title = "second".into();
        let second_result = stale_engine.update(second).await.unwrap();
        assert!(!second_result.success);
        assert!(second_result.message.contains("conflict"));

        // 恰好一个成功，库中是先提交者的版本
        let stored = engine.get_by_id(&created.id).await.unwrap().data.unwrap();
        assert_eq!(stored.title, "first");
        assert_eq!(stored.revision, 1);
    }

    #[tokio::test]
    async fn test_patch_rejection_leaves_record_untouched() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        let ops = [
            PatchOp::new(PatchKind::Replace, "title", Some(json!("changed"))),
            PatchOp::new(PatchKind::Replace, "create_time", Some(json!(1))),
        ];
        let result = engine.patch(&created.id, &ops).await.unwrap();
        assert!(!result.success);

        let stored = engine.get_by_id(&created.id).await.unwrap().data.unwrap();
        assert_eq!(stored.title, "hello");
        assert_eq!(stored.update_time, created.update_time);
        assert_eq!(stored.revision, created.revision);
    }

    #[tokio::test]
    async fn test_patch_applies_and_bumps_update_time() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let ops = [PatchOp::new(PatchKind::Replace, "title", Some(json!("patched")))];
        let patched = engine.patch(&created.id, &ops).await.unwrap().data.unwrap();
        assert_eq!(patched.title, "patched");
        assert!(patched.update_time > created.update_time);
        assert_eq!(patched.revision, 1);

        assert!(!engine.patch(&created.id, &[]).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_delete() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        let removed = engine.delete(&created.id).await.unwrap();
        assert!(removed.success);
        assert_eq!(removed.data.unwrap().id, created.id);

        assert!(!engine.delete(&created.id).await.unwrap().success);
        assert!(!engine.get_by_id(&created.id).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_disable_is_repeatable() {
        let engine = engine();
        let created = engine.create(note("hello")).await.unwrap().data.unwrap();

        let disabled = engine.disable(&created.id).await.unwrap().data.unwrap();
        assert!(!disabled.is_enable);
        assert_eq!(disabled.title, created.title);

        // 重复停用仍然成功：is_enable 保持 false，update_time 继续推进
        tokio::time::sleep(Duration::from_millis(5)).await;
        let again = engine.disable(&created.id).await.unwrap().data.unwrap();
        assert!(!again.is_enable);
        assert!(again.update_time > disabled.update_time);
    }
}
