use super::default_enable;
use common::entity::DbEntity;
use common::schema::{FieldKind, FieldSchema, FieldSchemaProvider, FieldSpec, MutationClass};
use entity_macro::{DbEntity as DbEntityDerive, FieldSchemaProvider as FieldSchemaDerive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 登录日志结构体，登录成功时追加记录
///
/// 只追加不改写，由通用引擎以默认策略管理
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, DbEntityDerive, FieldSchemaDerive)]
pub struct LoginLogEntity {
    /// 日志唯一 ID
    #[field(immutable)]
    pub id: String,
    /// 登录用户 ID
    pub user_id: String,
    /// 登录时间（Unix 时间戳，毫秒）
    pub login_time: i64,
    /// 登出时间，未登出为空
    pub logout_time: Option<i64>,
    /// 登录来源 IP
    pub ip_address: Option<String>,
    /// 登录地点
    pub location: Option<String>,
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

impl Default for LoginLogEntity {
    fn default() -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            login_time: 0,
            logout_time: None,
            ip_address: None,
            location: None,
            is_enable: true,
            create_time: 0,
            update_time: 0,
            update_user: String::new(),
            revision: 0,
        }
    }
}
