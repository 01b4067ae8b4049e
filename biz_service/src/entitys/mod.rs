pub mod login_log_entity;
pub mod role_entity;
pub mod user_entity;

/// 实体启用标记的缺省值：创建时默认启用
pub fn default_enable() -> bool {
    true
}
