use chrono::Utc;
use sea_orm::{ActiveValue, SqlErr, TransactionTrait, prelude::*};

use crate::{
    EngineError, RegisterCmd, ResultEngine, User, ValidationErrors,
    password::{hash_password, verify_password},
    users, validation,
};

use super::{Engine, with_tx};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

impl Engine {
    /// Creates an account. The password is stored as an Argon2id hash.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<User> {
        let valid = validation::registration(&cmd)?;
        let hash = hash_password(&valid.password)?;

        let user = with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(valid.username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(ValidationErrors::single("username", USERNAME_TAKEN).into());
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(valid.username.clone()),
                email: ActiveValue::Set(valid.email.clone()),
                password: ActiveValue::Set(hash),
                date_joined: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    EngineError::from(ValidationErrors::single("username", USERNAME_TAKEN))
                }
                _ => EngineError::Database(err),
            })?;
            Ok(User::from(model))
        })?;

        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Checks a username/password pair. Unknown users and wrong passwords
    /// are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        match model {
            Some(model) if verify_password(password, &model.password) => {
                Ok(User::from(model))
            }
            _ => {
                tracing::debug!(username, "authentication failed");
                Err(EngineError::Credentials)
            }
        }
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
