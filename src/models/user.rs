//! User account model.
//!
//! A user is identified by an email (with password credentials) or a wallet
//! address; at least one must be present, enforced by a CHECK constraint and
//! surfaced in Rust as the [`UserIdentity`] variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Internal user row, including the password hash. Never serialized;
/// convert to [`PublicUser`] before anything leaves the service.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub wallet_address: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a user authenticates, as stored.
#[allow(dead_code)]
#[derive(Debug, PartialEq, Eq)]
pub enum UserIdentity<'a> {
    Email {
        email: &'a str,
        password_hash: Option<&'a str>,
    },
    Wallet {
        address: &'a str,
    },
}

impl User {
    /// Resolve the stored identity. `None` only if the row violates the
    /// identity CHECK constraint, which the store rules out.
    pub fn identity(&self) -> Option<UserIdentity<'_>> {
        if let Some(email) = self.email.as_deref() {
            return Some(UserIdentity::Email {
                email,
                password_hash: self.password_hash.as_deref(),
            });
        }
        self.wallet_address
            .as_deref()
            .map(|address| UserIdentity::Wallet { address })
    }
}

/// Identity material for a user being created.
#[allow(dead_code)]
#[derive(Debug)]
pub enum NewUserIdentity {
    Email {
        email: String,
        password_hash: String,
    },
    Wallet {
        address: String,
    },
}

impl NewUserIdentity {
    /// Column values `(email, password_hash, wallet_address)` for insertion.
    pub fn columns(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            NewUserIdentity::Email {
                email,
                password_hash,
            } => (Some(email), Some(password_hash), None),
            NewUserIdentity::Wallet { address } => (None, None, Some(address)),
        }
    }
}

/// User representation for API responses - no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            fullname: user.fullname,
            username: user.username,
            email: user.email,
            wallet_address: user.wallet_address,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Validate the username constraint: lowercase alphanumerics plus `-_.`,
/// 3 to 30 characters. Mirrors the store's CHECK constraint.
pub fn valid_username(username: &str) -> bool {
    let len = username.len();
    (3..=30).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
}

/// Minimal shape check for emails: something@something.tld, no whitespace.
pub fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.split_once('.').is_some_and(|(host, tld)| {
                !host.is_empty() && !tld.is_empty()
            })
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            fullname: "Jane Doe".to_string(),
            username: "janedoe".to_string(),
            email: Some("jane@x.com".to_string()),
            password_hash: Some("$2b$10$abcdefghijklmnopqrstuv".to_string()),
            wallet_address: None,
            roles: vec!["user".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_user_has_no_credentials() {
        let public = PublicUser::from(test_user());
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "janedoe");
    }

    #[test]
    fn test_identity_prefers_email() {
        let user = test_user();
        match user.identity() {
            Some(UserIdentity::Email {
                email,
                password_hash,
            }) => {
                assert_eq!(email, "jane@x.com");
                assert!(password_hash.is_some());
            }
            other => panic!("unexpected identity: {:?}", other),
        }
    }

    #[test]
    fn test_identity_wallet() {
        let mut user = test_user();
        user.email = None;
        user.password_hash = None;
        user.wallet_address = Some("0xabc".to_string());
        assert_eq!(
            user.identity(),
            Some(UserIdentity::Wallet { address: "0xabc" })
        );
    }

    #[test]
    fn test_valid_username() {
        assert!(valid_username("janedoe"));
        assert!(valid_username("jane_doe.99"));
        assert!(valid_username("abc"));
        assert!(!valid_username("ab"));
        assert!(!valid_username("JaneDoe"));
        assert!(!valid_username("jane doe"));
        assert!(!valid_username(&"a".repeat(31)));
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("jane@x.com"));
        assert!(valid_email("a.b+c@mail.example.org"));
        assert!(!valid_email("janex.com"));
        assert!(!valid_email("jane@xcom"));
        assert!(!valid_email("jane doe@x.com"));
        assert!(!valid_email("@x.com"));
    }
}
