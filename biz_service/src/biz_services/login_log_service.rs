use crate::entitys::login_log_entity::LoginLogEntity;
use common::engine::CrudEngine;
use common::repository::EntityStore;
use std::sync::Arc;

/// 登录日志服务
///
/// 只追加的审计实体，引擎形态与其他实体一致但不带特化策略
pub struct LoginLogService {
    pub engine: CrudEngine<LoginLogEntity>,
}

impl LoginLogService {
    pub fn new(store: Arc<dyn EntityStore<LoginLogEntity>>) -> Self {
        Self { engine: CrudEngine::new(store) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::repository::MemoryEntityStore;
    use common::util::date_util::now_millis;

    #[tokio::test]
    async fn test_append_log() {
        let service = LoginLogService::new(Arc::new(MemoryEntityStore::new()));

        let entry = LoginLogEntity {
            user_id: "u1".into(),
            login_time: now_millis(),
            ip_address: Some("10.0.0.1".into()),
            update_user: "u1".into(),
            ..Default::default()
        };
        let created = service.engine.create(entry).await.unwrap().data.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.logout_time, None);

        let found = service.engine.search_by_field("user_id", "u1").await.unwrap();
        assert!(found.success);
        assert_eq!(found.data.unwrap().len(), 1);
    }
}
