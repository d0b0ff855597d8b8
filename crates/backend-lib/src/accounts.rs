// ============================
// crates/backend-lib/src/accounts.rs
// ============================
//! User registration and password reset over the user store.
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password_async;
use crate::error::AppError;
use crate::models::User;
use crate::storage::{Filter, ObjectStore};

/// Account operations that write to the user store.
///
/// Each write is saved and flushed under one lock; a failed flush puts the
/// previous record back in the cache.
pub struct Accounts {
    users: Arc<dyn ObjectStore<User>>,
    password_cost: u8,
    write_lock: Mutex<()>,
}

impl Accounts {
    pub fn new(users: Arc<dyn ObjectStore<User>>, password_cost: u8) -> Self {
        Self {
            users,
            password_cost,
            write_lock: Mutex::new(()),
        }
    }

    pub fn users(&self) -> &Arc<dyn ObjectStore<User>> {
        &self.users
    }

    /// Create a user; the email must not be taken
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<User, AppError> {
        let _guard = self.write_lock.lock().await;
        if self.find(&|user: &User| user.email == email).is_some() {
            return Err(AppError::UserExists(email.to_owned()));
        }

        let hashed = hash_password_async(password, self.password_cost).await?;
        let user = User::from_hash(email, hashed).with_name(first_name, last_name);
        self.commit(user.clone(), None).await?;

        info!(target: "security", user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Issue a fresh reset token for `email`, replacing any pending one
    pub async fn get_reset_password_token(&self, email: &str) -> Result<String, AppError> {
        let _guard = self.write_lock.lock().await;
        let user = self
            .find(&|user: &User| user.email == email)
            .ok_or(AppError::UserNotFound)?;

        let token = Uuid::new_v4().to_string();
        let mut updated = user.clone();
        updated.reset_token = Some(token.clone());
        updated.updated_at = Utc::now();
        self.commit(updated, Some(user)).await?;

        info!(target: "security", "reset token issued");
        Ok(token)
    }

    /// Set a new password for the holder of `reset_token` and burn the token
    pub async fn update_password(&self, reset_token: &str, password: &str) -> Result<User, AppError> {
        if reset_token.is_empty() {
            return Err(AppError::InvalidResetToken);
        }
        let _guard = self.write_lock.lock().await;
        let user = self
            .find(&|user: &User| user.reset_token.as_deref() == Some(reset_token))
            .ok_or(AppError::InvalidResetToken)?;

        let mut updated = user.clone();
        updated.hashed_password = hash_password_async(password, self.password_cost).await?;
        updated.reset_token = None;
        updated.updated_at = Utc::now();
        self.commit(updated.clone(), Some(user)).await?;

        info!(target: "security", user_id = %updated.id, "password updated");
        Ok(updated)
    }

    fn find(&self, filter: Filter<'_, User>) -> Option<User> {
        self.users.search(filter).into_iter().next()
    }

    /// Save `record` and flush; on failure restore `previous` (or drop a new record)
    async fn commit(&self, record: User, previous: Option<User>) -> Result<(), AppError> {
        self.users.save(record.clone());
        if let Err(err) = self.users.save_all().await {
            match previous {
                Some(previous) => self.users.save(previous),
                None => {
                    let _ = self.users.remove(&record);
                },
            }
            return Err(err.into());
        }
        Ok(())
    }
}
