use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// パスワードの最小長
pub const MIN_PASSWORD_LEN: usize = 8;

/// ソルト付きパスワードハッシュ（Argon2id）
///
/// 保存形式はPHC文字列：`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn generate(password: &str) -> Result<Self, ValidationError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ValidationError::UnhashablePassword(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// 保存済みの値から復元する（検証はしない）
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 形式が不正な値は常に不一致とする
    pub fn verify(&self, password: &str) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
