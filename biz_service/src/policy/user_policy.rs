use crate::entitys::user_entity::UserEntity;
use common::engine::{EntityPolicy, SensitiveFieldAction};
use common::errors::AppError;
use common::patch::PatchOp;
use common::util::common_utils::build_sha256;

/// User 实体特化策略
///
/// 创建与全量更新前把明文密码替换为单向哈希（密码可经全量更新改写，
/// 但绝不经补丁改写）；补丁门禁要求整批携带修改人字段。
pub struct UserPolicy;

impl EntityPolicy<UserEntity> for UserPolicy {
    fn before_create(&self, entity: &mut UserEntity) -> Result<(), AppError> {
        entity.password = build_sha256(&entity.password);
        Ok(())
    }

    fn before_update(
        &self,
        incoming: &mut UserEntity,
        _stored: &UserEntity,
    ) -> Result<SensitiveFieldAction, AppError> {
        // 入参密码按明文对待，重新哈希后整体保留
        incoming.password = build_sha256(&incoming.password);
        Ok(SensitiveFieldAction::KeepIncoming)
    }

    fn patch_gate(&self, ops: &[PatchOp]) -> Result<(), AppError> {
        let touches_password = ops.iter().any(|op| {
            op.root_field().as_deref() == Some("password")
                || op.from_root_field().as_deref() == Some("password")
        });
        if touches_password {
            return Err(AppError::PolicyViolation("密码不支持补丁修改".to_string()));
        }

        let has_update_user = ops.iter().any(|op| op.root_field().as_deref() == Some("update_user"));
        if !has_update_user {
            return Err(AppError::PolicyViolation("缺少字段: 修改人信息".to_string()));
        }
        Ok(())
    }
}
