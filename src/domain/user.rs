use serde::Serialize;

use super::errors::ValidationError;
use super::password::PasswordHash;
use super::value_objects::{Role, UserId, required_text};

/// システム利用者（会員とは別）
///
/// パスワードハッシュはシリアライズしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip)]
    pub password_hash: PasswordHash,
    pub display_name: String,
    pub role: Role,
}

/// 新規利用者（検証・ハッシュ化済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: PasswordHash,
    pub display_name: String,
    pub role: Role,
}

const DISPLAY_NAME_MAX_LEN: usize = 255;

impl NewUser {
    pub fn new(
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: parse_username(username)?,
            password_hash: PasswordHash::generate(password)?,
            display_name: required_text("display_name", display_name, DISPLAY_NAME_MAX_LEN)?,
            role,
        })
    }
}

fn parse_username(value: &str) -> Result<String, ValidationError> {
    let valid_len = (3..=64).contains(&value.len());
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid_len && valid_chars {
        Ok(value.to_string())
    } else {
        Err(ValidationError::InvalidUsername(value.to_string()))
    }
}
