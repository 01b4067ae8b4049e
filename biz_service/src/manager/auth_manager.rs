use crate::biz_services::login_log_service::LoginLogService;
use crate::biz_services::user_service::UserService;
use async_trait::async_trait;
use common::errors::AppError;
use common::util::jwt::{TokenClaims, TokenService};
use std::sync::Arc;

/// 认证管理器
///
/// 登录即信任边界：账号口令换取带签名的限时令牌，
/// 后续请求由（外部的）过滤层调 validate 换回声明。
pub struct AuthManager {
    pub(crate) user_service: Arc<UserService>,
    pub(crate) login_log_service: Arc<LoginLogService>,
    pub(crate) token_service: TokenService,
}

impl AuthManager {
    pub fn new(
        user_service: Arc<UserService>,
        login_log_service: Arc<LoginLogService>,
        token_service: TokenService,
    ) -> Self {
        Self { user_service, login_log_service, token_service }
    }
}

#[async_trait]
pub trait AuthManagerOpt: Send + Sync {
    /// 校验账号口令并签发令牌，成功时记录登录日志
    ///
    /// 账号不存在、口令不符、账号已停用统一返回同一错误，不泄露差异
    async fn login(
        &self,
        account: &str,
        password: &str,
        ip_address: Option<String>,
        location: Option<String>,
    ) -> Result<String, AppError>;

    /// 校验令牌并返回声明
    fn validate(&self, token: &str) -> Result<TokenClaims, AppError>;
}
