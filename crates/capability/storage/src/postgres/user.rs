//! Postgres 用户与角色存储实现
//!
//! 设计要点：
//! - 用户与 user_roles 在同一事务内写入
//! - 角色通过 user_roles ⋈ roles 按 role_id 顺序加载

use crate::error::StorageError;
use crate::models::{RoleRecord, UserCreate, UserProfileUpdate, UserRecord};
use crate::traits::{RoleStore, UserStore};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "user_id, username, email, phone, full_name, password_hash";

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }

    async fn load_roles(&self, user_id: &str) -> Result<Vec<String>, StorageError> {
        let roles: Vec<String> = sqlx::query_scalar(
            "select r.role_code from user_roles ur \
             join roles r on r.role_id = ur.role_id \
             where ur.user_id = $1 order by r.role_id asc",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn hydrate(&self, row: Option<PgRow>) -> Result<Option<UserRecord>, StorageError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut user = user_from_row(&row)?;
        user.roles = self.load_roles(&user.user_id).await?;
        Ok(Some(user))
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        full_name: row.try_get("full_name")?,
        password_hash: row.try_get("password_hash")?,
        roles: Vec::new(),
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!("select {USER_COLUMNS} from users where username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        self.hydrate(row).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!("select {USER_COLUMNS} from users where user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        self.hydrate(row).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!("select {USER_COLUMNS} from users where email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        self.hydrate(row).await
    }

    async fn create_user(&self, record: UserCreate) -> Result<UserRecord, StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "insert into users (user_id, username, email, phone, full_name, password_hash) \
             values ($1,$2,$3,$4,$5,$6)",
        )
        .bind(&record.user_id)
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.full_name)
        .bind(&record.password_hash)
        .execute(&mut *tx)
        .await?;

        for role_code in &record.roles {
            sqlx::query(
                "insert into user_roles (user_id, role_id) \
                 select $1, role_id from roles where role_code = $2 \
                 on conflict do nothing",
            )
            .bind(&record.user_id)
            .bind(role_code)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(UserRecord {
            user_id: record.user_id,
            username: record.username,
            email: record.email,
            phone: record.phone,
            full_name: record.full_name,
            password_hash: record.password_hash,
            roles: record.roles,
        })
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: UserProfileUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update users set email = coalesce($2, email), phone = coalesce($3, phone), \
             full_name = coalesce($4, full_name) where user_id = $1 returning {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(update.email)
        .bind(update.phone)
        .bind(update.full_name)
        .fetch_optional(&self.pool)
        .await?;
        self.hydrate(row).await
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set password_hash = $2 where user_id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows = sqlx::query(&format!("select {USER_COLUMNS} from users order by user_id asc"))
            .fetch_all(&self.pool)
            .await?;

        let mut users: Vec<UserRecord> = Vec::with_capacity(rows.len());
        for row in &rows {
            users.push(user_from_row(row)?);
        }
        if users.is_empty() {
            return Ok(users);
        }

        let rows = sqlx::query(
            "select ur.user_id, r.role_code from user_roles ur \
             join roles r on r.role_id = ur.role_id order by r.role_id asc",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut role_map: std::collections::HashMap<String, Vec<String>> =
            std::collections::HashMap::new();
        for row in rows {
            let user_id: String = row.try_get("user_id")?;
            let role_code: String = row.try_get("role_code")?;
            role_map.entry(user_id).or_default().push(role_code);
        }
        for user in &mut users {
            if let Some(roles) = role_map.remove(&user.user_id) {
                user.roles = roles;
            }
        }
        Ok(users)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from users where user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgRoleStore {
    pub pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RoleStore for PgRoleStore {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StorageError> {
        let rows = sqlx::query(
            "select role_id, role_code, role_name, description from roles order by role_id asc",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut roles = Vec::with_capacity(rows.len());
        for row in rows {
            roles.push(RoleRecord {
                role_id: row.try_get("role_id")?,
                role_code: row.try_get("role_code")?,
                role_name: row.try_get("role_name")?,
                description: row.try_get("description")?,
            });
        }
        Ok(roles)
    }

    async fn seed_roles_if_empty(&self, roles: Vec<RoleRecord>) -> Result<usize, StorageError> {
        let mut tx = self.pool.begin().await?;
        let count: i64 = sqlx::query_scalar("select count(*) from roles")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }
        for role in &roles {
            sqlx::query(
                "insert into roles (role_id, role_code, role_name, description) \
                 values ($1,$2,$3,$4) on conflict do nothing",
            )
            .bind(role.role_id)
            .bind(&role.role_code)
            .bind(&role.role_name)
            .bind(&role.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(roles.len())
    }
}
