//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{DomainError, UserRepository};
use crate::models::user::{Column, Entity as UserEntity};
use crate::models::User;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await?;
        Ok(users.into_iter().map(User::from).collect())
    }
}
