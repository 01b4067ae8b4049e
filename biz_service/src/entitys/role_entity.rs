use super::default_enable;
use common::entity::DbEntity;
use common::schema::{FieldKind, FieldSchema, FieldSchemaProvider, FieldSpec, MutationClass};
use entity_macro::{DbEntity as DbEntityDerive, FieldSchemaProvider as FieldSchemaDerive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 角色信息结构体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, DbEntityDerive, FieldSchemaDerive)]
pub struct RoleEntity {
    /// 角色唯一 ID
    #[field(immutable)]
    pub id: String,
    /// 角色名称（如 "管理员"、"编辑"）
    pub name: String,
    /// 是否启用
    #[serde(default = "default_enable")]
    pub is_enable: bool,
    /// 创建时间（Unix 时间戳，毫秒）
    #[field(immutable)]
    pub create_time: i64,
    /// 最后更新时间（Unix 时间戳，毫秒）
    #[field(server_managed)]
    pub update_time: i64,
    /// 最后修改人 ID
    pub update_user: String,
    /// 乐观锁版本号
    #[field(server_managed)]
    #[serde(default)]
    pub revision: u64,
}

impl Default for RoleEntity {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            is_enable: true,
            create_time: 0,
            update_time: 0,
            update_user: String::new(),
            revision: 0,
        }
    }
}
