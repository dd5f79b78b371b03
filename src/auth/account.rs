//! Account records and their password-free projection.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user. `password_hash` stays inside the store/hasher boundary;
/// anything that leaves the core is built from [`Account::profile`].
#[derive(Clone, Debug)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password_hash: SecretString,
    pub email: String,
}

impl Account {
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// What login returns and what the session cache holds under `profile:<id>`.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn profile_drops_password() -> Result<()> {
        let account = Account {
            id: "123".to_string(),
            name: "John Doe".to_string(),
            username: "test".to_string(),
            password_hash: SecretString::from("$argon2id$stored".to_string()),
            email: "test@example.com".to_string(),
        };
        let value = serde_json::to_value(account.profile())?;
        assert_eq!(
            value,
            serde_json::json!({
                "id": "123",
                "name": "John Doe",
                "username": "test",
                "email": "test@example.com",
            })
        );
        assert!(!format!("{account:?}").contains("$argon2id$stored"));
        Ok(())
    }
}
