//! User service - registration and profile lookup

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::UserStore;

use super::auth::hash_password;

/// User service - account registration and profile reads
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new user
    ///
    /// The email precheck produces the friendly failure; the store's
    /// unique constraint covers the race between two concurrent
    /// registrations of the same address.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(Error::EmailAlreadyInUse);
        }

        let password_hash = hash_password(password)?;
        let user = User::new(name, email, password_hash);
        self.users.save_user(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Fetch a user's profile by id
    pub async fn profile(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(Error::UserNotFound)
    }
}
