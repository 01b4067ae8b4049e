use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 统一的 API 响应信封
///
/// 所有引擎操作的业务结果（包括未找到、校验失败、并发冲突）
/// 都以 success=false 的信封返回，只有存储层故障才作为错误向上传播。
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: String::new() }
    }

    pub fn ok_empty() -> Self {
        Self { success: true, data: None, message: String::new() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: message.into() }
    }
}
