//! 口令哈希与强度校验。
//!
//! 存储格式 `{digest}:{salt}:{algorithm}`，digest = hex(H(salt ‖ 明文))，
//! salt 为 16 字节随机数的十六进制串。旧记录可能只有 `{digest}:{salt}` 两段，按 sha256 处理。

use crate::AuthError;
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_BYTES: usize = 16;
const MIN_PASSWORD_CHARS: usize = 8;
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// 摘要算法。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// 默认算法，新记录一律使用
    Sha256,
    /// 历史记录，仅用于校验
    Md5,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Md5 => "md5",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sha256" => Some(HashAlgorithm::Sha256),
            "md5" => Some(HashAlgorithm::Md5),
            _ => None,
        }
    }

    fn digest(self, salt: &str, password: &str) -> String {
        match self {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(salt.as_bytes());
                hasher.update(password.as_bytes());
                hex::encode(hasher.finalize())
            }
            HashAlgorithm::Md5 => {
                let mut context = md5::Context::new();
                context.consume(salt.as_bytes());
                context.consume(password.as_bytes());
                format!("{:x}", context.compute())
            }
        }
    }
}

fn new_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// 生成带盐哈希。
pub fn hash_password(password: &str, algorithm: HashAlgorithm) -> String {
    let salt = new_salt();
    let digest = algorithm.digest(&salt, password);
    format!("{digest}:{salt}:{}", algorithm.as_str())
}

fn parse_stored(stored: &str) -> Option<(&str, &str, HashAlgorithm)> {
    let parts: Vec<&str> = stored.split(':').collect();
    match parts.as_slice() {
        [digest, salt, algorithm] => Some((digest, salt, HashAlgorithm::parse(algorithm)?)),
        [digest, salt] => Some((digest, salt, HashAlgorithm::Sha256)),
        _ => None,
    }
}

/// 校验口令；格式错误一律返回 false。
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((digest, salt, algorithm)) = parse_stored(stored) else {
        return false;
    };
    let computed = algorithm.digest(salt, password);
    computed.as_bytes().ct_eq(digest.as_bytes()).into()
}

/// 存储记录使用的算法（格式错误返回 None）。
pub fn stored_algorithm(stored: &str) -> Option<HashAlgorithm> {
    parse_stored(stored).map(|(_, _, algorithm)| algorithm)
}

/// 口令强度：长度 → 大写 → 小写 → 数字 → 特殊字符，返回第一条不满足的规则。
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    let rules: [(bool, &'static str); 5] = [
        (password.chars().count() >= MIN_PASSWORD_CHARS, "密码长度至少8位"),
        (password.chars().any(|c| c.is_ascii_uppercase()), "密码必须包含大写字母"),
        (password.chars().any(|c| c.is_ascii_lowercase()), "密码必须包含小写字母"),
        (password.chars().any(|c| c.is_ascii_digit()), "密码必须包含数字"),
        (password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)), "密码必须包含特殊字符"),
    ];
    match rules.into_iter().find(|(passed, _)| !passed) {
        Some((_, message)) => Err(AuthError::WeakPassword(message)),
        None => Ok(()),
    }
}
