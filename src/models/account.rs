use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Customers and admins share one record shape but live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Customer,
    Admin,
}

impl AccountKind {
    pub fn table(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customers",
            AccountKind::Admin => "admins",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customer",
            AccountKind::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Input that passed validation. The password is still in clear and must be
/// hashed before it becomes an [`Account`].
#[derive(Debug, Clone)]
pub struct ValidAccount {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    pub fn validate(self) -> AppResult<ValidAccount> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::Validation("full name is required".into()));
        }

        let email = self.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(AppError::Validation(format!("invalid email address: {email}")));
        }

        if self.password.is_empty() {
            return Err(AppError::Validation("password is required".into()));
        }

        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        Ok(ValidAccount {
            id,
            full_name: full_name.to_string(),
            email,
            password: self.password,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str) -> NewAccount {
        NewAccount {
            id: None,
            full_name: "John Doe".to_string(),
            email: email.to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn test_email_normalized() {
        let account = input("  JohnDoe@Example.com ").validate().unwrap();
        assert_eq!(account.email, "johndoe@example.com");
        assert!(!account.id.is_empty());
    }

    #[test]
    fn test_bad_emails_rejected() {
        for email in ["", "johndoe", "@example.com", "john@", "a@b@c", "john doe@example.com"] {
            assert!(
                matches!(input(email).validate(), Err(AppError::Validation(_))),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_password_rejected() {
        let mut account = input("jane@example.com");
        account.password = String::new();
        assert!(matches!(account.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = Account {
            id: "C1".to_string(),
            full_name: "John Doe".to_string(),
            email: "johndoe@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["fullName"], "John Doe");
    }
}
