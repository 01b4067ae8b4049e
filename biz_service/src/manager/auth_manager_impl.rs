use crate::entitys::login_log_entity::LoginLogEntity;
use crate::manager::auth_manager::{AuthManager, AuthManagerOpt};
use async_trait::async_trait;
use common::errors::AppError;
use common::util::common_utils::build_sha256;
use common::util::date_util::{now_millis, time_to_str};
use common::util::jwt::TokenClaims;

#[async_trait]
impl AuthManagerOpt for AuthManager {
    async fn login(
        &self,
        account: &str,
        password: &str,
        ip_address: Option<String>,
        location: Option<String>,
    ) -> Result<String, AppError> {
        if account.is_empty() || password.is_empty() {
            return Err(AppError::Unauthorized("user.or.password.error".to_string()));
        }

        let user = match self.user_service.find_by_account(account).await? {
            Some(user) => user,
            None => return Err(AppError::Unauthorized("user.or.password.error".to_string())),
        };
        if user.password != build_sha256(password) {
            return Err(AppError::Unauthorized("user.or.password.error".to_string()));
        }
        if !user.is_enable {
            return Err(AppError::Unauthorized("user.or.password.error".to_string()));
        }

        let token = self.token_service.generate_token(&user.account)?;

        let login_time = now_millis();
        let entry = LoginLogEntity {
            user_id: user.id.clone(),
            login_time,
            ip_address,
            location,
            update_user: user.id.clone(),
            ..Default::default()
        };
        let recorded = self.login_log_service.engine.create(entry).await?;
        if !recorded.success {
            log::warn!("login log not recorded: {}", recorded.message);
        }

        log::info!("user {} login at {}", user.account, time_to_str(login_time));
        Ok(token)
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.token_service.parse_token(token)
    }
}
