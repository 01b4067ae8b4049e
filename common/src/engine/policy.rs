use crate::entity::DbEntity;
use crate::errors::AppError;
use crate::patch::PatchOp;

/// Update 时敏感字段的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveFieldAction {
    /// 从库中记录还原（默认）：通用 Update 不改写敏感字段
    RestoreFromStored,
    /// 钩子已自行生成合法值（如重新哈希），保留传入值
    KeepIncoming,
}

/// 实体策略钩子
///
/// 引擎在各操作的固定位置调用，按实体类型注入不同实现，
/// 替代基类继承式的方法覆写。钩子返回的业务错误会被
/// 引擎捕获进统一响应信封。
pub trait EntityPolicy<T: DbEntity>: Send + Sync {
    /// Create 持久化前调用，可改写待存实体（如密码哈希）
    fn before_create(&self, _entity: &mut T) -> Result<(), AppError> {
        Ok(())
    }

    /// Update 合并前调用，决定敏感字段去留
    fn before_update(&self, _incoming: &mut T, _stored: &T) -> Result<SensitiveFieldAction, AppError> {
        Ok(SensitiveFieldAction::RestoreFromStored)
    }

    /// Patch 应用前调用，可整批否决
    fn patch_gate(&self, _ops: &[PatchOp]) -> Result<(), AppError> {
        Ok(())
    }
}

/// 无特化行为的默认策略
pub struct DefaultPolicy;

impl<T: DbEntity> EntityPolicy<T> for DefaultPolicy {}
