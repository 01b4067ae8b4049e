use hex::encode;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn build_uuid() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}

/// SHA-256 十六进制摘要（定长 64 字符），用于密码的单向存储
pub fn build_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let hex_string = encode(result);
    hex_string
}
