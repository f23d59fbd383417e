//! User directory - username-keyed lookup and insert.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User directory trait for dependency injection.
///
/// Users are only ever looked up and inserted; there is no update or delete.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by exact username. Absence is `Ok(None)`.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user.
    ///
    /// Fails with `AppError::DuplicateUsername` when the username unique
    /// index rejects the row, so concurrent inserts cannot both succeed.
    async fn insert(&self, new_user: NewUser) -> AppResult<User>;
}

/// SeaORM-backed implementation of UserDirectory.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new directory instance over a connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            hashed_password: Set(new_user.hashed_password),
            profile_pic: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::DuplicateUsername)
            }
            Err(err) => Err(AppError::from(err)),
        }
    }
}
