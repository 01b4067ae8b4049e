use crate::entitys::user_entity::UserEntity;
use crate::policy::user_policy::UserPolicy;
use common::engine::CrudEngine;
use common::errors::AppError;
use common::repository::EntityStore;
use std::sync::Arc;

/// 用户服务：通用引擎绑定 User 特化策略
pub struct UserService {
    pub engine: CrudEngine<UserEntity>,
}

impl UserService {
    pub fn new(store: Arc<dyn EntityStore<UserEntity>>) -> Self {
        Self { engine: CrudEngine::with_policy(store, Arc::new(UserPolicy)) }
    }

    /// 按账号精确查找
    ///
    /// 与字段搜索一样走全量扫描，只适用于小规模账号集合
    pub async fn find_by_account(&self, account: &str) -> Result<Option<UserEntity>, AppError> {
        let users = self.engine.store().query_all().await?;
        Ok(users.into_iter().find(|u| u.account == account))
    }
}
