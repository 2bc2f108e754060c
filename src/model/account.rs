use serde::{Deserialize, Serialize};

use crate::storage::{ReadOnlyConvertible, ReadOnlyType};
use crate::StorageEntity;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "id")]
    pub user_id: i64,

    /// Default: empty.
    #[serde(default)]
    pub username: String,

    /// Default: empty.
    #[serde(default)]
    pub email: String,

    /// Default: empty.
    #[serde(default)]
    pub display_name: String,

    /// Default: none.
    #[serde(default)]
    pub gravatar_url: Option<String>,

    /// Default: false. Not persisted.
    #[serde(default)]
    pub email_verified: bool,
}

impl ReadOnlyType for Account {
    fn primary_key(&self) -> i64 {
        self.user_id
    }
}

/// Stored account. Does not track `email_verified`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, StorageEntity)]
#[entity(name = "Account")]
pub struct StorageAccount {
    #[entity(key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub gravatar_url: Option<String>,
}

impl ReadOnlyConvertible for StorageAccount {
    type ReadOnly = Account;

    fn update_with(&mut self, account: &Account) {
        self.id = account.user_id;
        self.username = account.username.clone();
        self.email = account.email.clone();
        self.display_name = account.display_name.clone();
        self.gravatar_url = account.gravatar_url.clone();
    }

    fn to_read_only(&self) -> Account {
        Account {
            user_id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            gravatar_url: self.gravatar_url.clone(),
            email_verified: false,
        }
    }
}

/// Payload for creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageEntity;

    #[test]
    fn decodes_with_defaults() {
        let account: Account = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(account.user_id, 3);
        assert_eq!(account.username, "");
        assert!(account.gravatar_url.is_none());
        assert!(!account.email_verified);
    }

    #[test]
    fn storage_round_trip_drops_verification_flag() {
        let account = Account {
            user_id: 9,
            username: "grace".into(),
            email: "grace@example.com".into(),
            display_name: "Grace".into(),
            gravatar_url: Some("https://gravatar.example/g".into()),
            email_verified: true,
        };

        let mut stored = StorageAccount::default();
        stored.update_with(&account);

        assert_eq!(stored.primary_key(), 9);
        assert_eq!(StorageAccount::ENTITY_NAME, "Account");
        assert_eq!(
            stored.to_read_only(),
            Account {
                email_verified: false,
                ..account
            }
        );
    }
}
