use crate::config::JwtConfig;
use crate::errors::AppError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_EXPIRE_DAYS: i64 = 7;
const HEADER: &[u8] = br#"{"alg":"HS256","typ":"JWT"}"#;

/// 令牌声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 主体（账号标识）
    pub sub: String,
    /// 签发者
    pub iss: String,
    /// 签发时间（Unix 秒）
    pub iat: i64,
    /// 过期时间（Unix 秒）
    pub exp: i64,
}

/// 对称密钥令牌服务
///
/// HS256 签名的 JWT：签发只由（主体、当前时间、密钥）决定，无副作用；
/// 校验区分结构损坏、签名/签发者不符、已过期三种结果，过期判定零时钟偏移。
pub struct TokenService {
    issuer: String,
    secret_key: String,
    expire_secs: i64,
}

impl TokenService {
    pub fn new(issuer: &str, secret_key: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            secret_key: secret_key.to_string(),
            expire_secs: DEFAULT_EXPIRE_DAYS * 86_400,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            issuer: cfg.issuer.clone(),
            secret_key: cfg.secret_key.clone(),
            expire_secs: cfg.expire_days.unwrap_or(DEFAULT_EXPIRE_DAYS) * 86_400,
        }
    }

    /// 签发令牌
    pub fn generate_token(&self, subject: &str) -> Result<String, AppError> {
        self.generate_token_at(subject, chrono::Utc::now().timestamp())
    }

    fn generate_token_at(&self, subject: &str, issued_at: i64) -> Result<String, AppError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at + self.expire_secs,
        };
        let header = URL_SAFE_NO_PAD.encode(HEADER);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{}.{}", header, payload);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);
        Ok(format!("{}.{}", signing_input, signature))
    }

    /// 校验令牌并返回声明
    pub fn parse_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None) => (header, payload, signature),
            _ => return Err(AppError::TokenMalformed),
        };

        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| AppError::TokenMalformed)?;
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| AppError::Internal("invalid HMAC key".to_string()))?;
        mac.update(format!("{}.{}", header, payload).as_bytes());
        // 常数时间比较
        mac.verify_slice(&signature).map_err(|_| AppError::TokenInvalidSignature)?;

        let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| AppError::TokenMalformed)?;
        let claims: TokenClaims = serde_json::from_slice(&payload).map_err(|_| AppError::TokenMalformed)?;

        if claims.iss != self.issuer {
            return Err(AppError::TokenInvalidSignature);
        }
        if claims.exp <= chrono::Utc::now().timestamp() {
            return Err(AppError::TokenExpired);
        }
        Ok(claims)
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| AppError::Internal("invalid HMAC key".to_string()))?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("admin-center", "0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_round_trip() {
        let service = service();
        let token = service.generate_token("alice").unwrap();
        let claims = service.parse_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "admin-center");
        assert_eq!(claims.exp - claims.iat, 7 * 86_400);
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let issued_at = chrono::Utc::now().timestamp() - 8 * 86_400;
        let token = service.generate_token_at("alice", issued_at).unwrap();
        assert!(matches!(service.parse_token(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_key_signature() {
        let token = service().generate_token("alice").unwrap();
        let other = TokenService::new("admin-center", "another-secret-key-another-secret");
        assert!(matches!(other.parse_token(&token), Err(AppError::TokenInvalidSignature)));
    }

    #[test]
    fn test_issuer_mismatch() {
        // 同一密钥、不同签发者配置
        let token = service().generate_token("alice").unwrap();
        let other = TokenService::new("someone-else", "0123456789abcdef0123456789abcdef");
        assert!(matches!(other.parse_token(&token), Err(AppError::TokenInvalidSignature)));
    }

    #[test]
    fn test_malformed_token() {
        let service = service();
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.@@.##"] {
            assert!(matches!(service.parse_token(token), Err(AppError::TokenMalformed)), "token {}", token);
        }
    }

    #[test]
    fn test_tampered_payload() {
        let service = service();
        let token = service.generate_token("alice").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory","iss":"admin-center","iat":0,"exp":99999999999}"#);
        parts[1] = &forged;
        let tampered = parts.join(".");
        assert!(matches!(service.parse_token(&tampered), Err(AppError::TokenInvalidSignature)));
    }
}
