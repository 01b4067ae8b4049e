use super::default_enable;
use common::entity::DbEntity;
use common::schema::{FieldKind, FieldSchema, FieldSchemaProvider, FieldSpec, MutationClass};
use entity_macro::{DbEntity as DbEntityDerive, FieldSchemaProvider as FieldSchemaDerive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 用户信息结构体，用于存储系统用户账号和身份信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, DbEntityDerive, FieldSchemaDerive)]
pub struct UserEntity {
    /// 用户唯一 ID（字符串形式）
    #[field(immutable)]
    pub id: String,
    /// 登录账号
    pub account: String,
    /// 加密后的密码（仅存储 SHA-256 十六进制哈希）
    #[field(sensitive)]
    pub password: String,
    /// 显示名称
    pub name: String,
    /// 邮箱（格式约束在外部边界校验，核心不校验）
    pub email: String,
    /// 手机号，可选
    pub phone: Option<String>,
    /// 是否启用（true=启用, false=停用/冻结）
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

impl Default for UserEntity {
    fn default() -> Self {
        Self {
            id: String::new(),
            account: String::new(),
            password: String::new(),
            name: String::new(),
            email: String::new(),
            phone: None,
            is_enable: true,
            create_time: 0,
            update_time: 0,
            update_user: String::new(),
            revision: 0,
        }
    }
}
