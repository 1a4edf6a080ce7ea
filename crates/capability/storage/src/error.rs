//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - SQL 执行错误 / 约束冲突
//! - 连接错误（Postgres、Redis）
//! - 数据一致性错误（内存实现的外键、唯一键、检查约束）

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// 删除的记录仍被其它表引用，或引用了不存在的记录
    ForeignKey,
    Other,
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::ForeignKey,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.kind == StorageErrorKind::ForeignKey
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // SQLSTATE 23503
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::foreign_key(err.to_string())
            }
            _ => Self::new(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::new(err.to_string())
    }
}
