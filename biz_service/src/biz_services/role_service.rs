use crate::entitys::role_entity::RoleEntity;
use common::engine::CrudEngine;
use common::repository::EntityStore;
use std::sync::Arc;

/// 角色服务：无特化策略的通用引擎实例
pub struct RoleService {
    pub engine: CrudEngine<RoleEntity>,
}

impl RoleService {
    pub fn new(store: Arc<dyn EntityStore<RoleEntity>>) -> Self {
        Self { engine: CrudEngine::new(store) }
    }
}
