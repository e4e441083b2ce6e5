use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// 書籍ID - ストアが採番する連番
    BookId
);
record_id!(
    /// 会員ID
    MemberId
);
record_id!(
    /// 貸出ID
    LoanId
);
record_id!(
    /// システム利用者ID（会員とは無関係）
    UserId
);

/// 空白のみの文字列を拒否し、前後の空白を取り除く
///
/// 長さは文字数で数え、`max_len` を超えると TooLong。
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    bounded(field, trimmed, max_len)
}

/// 文字数の上限を検査する（永続化先の列幅に合わせる）
pub(crate) fn bounded(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong { field, max_len });
    }
    Ok(value.to_string())
}

const EMAIL_MAX_LEN: usize = 255;

/// メールアドレス
///
/// 不変条件：`@` を1つ含み、その前後が空でない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(bounded("email", trimmed, EMAIL_MAX_LEN)?))
            }
            _ => Err(ValidationError::InvalidEmail(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// 利用者のロール
///
/// 入力では旧名称の `editor` / `bibliotecario` も司書として受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(alias = "editor", alias = "bibliotecario")]
    Librarian,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Librarian => "librarian",
            Role::User => "user",
        }
    }

    /// 書籍・会員・貸出を変更できるか
    pub fn can_manage_records(&self) -> bool {
        matches!(self, Role::Admin | Role::Librarian)
    }

    /// 利用者アカウントを管理できるか
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "librarian" | "editor" | "bibliotecario" => Ok(Role::Librarian),
            "user" => Ok(Role::User),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_accepts_simple_address() {
        let email = Email::parse("  ana@example.com ").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_email_rejects_missing_at() {
        assert_eq!(
            Email::parse("ana.example.com"),
            Err(ValidationError::InvalidEmail("ana.example.com".to_string()))
        );
    }

    #[test]
    fn test_email_rejects_empty_parts() {
        assert!(Email::parse("@example.com").is_err());
        assert!(Email::parse("ana@").is_err());
        assert!(Email::parse("a@b@c").is_err());
    }

    #[test]
    fn test_email_deserialize_validates() {
        let result: Result<Email, _> = serde_json::from_str("\"nobody\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("title", "  Dune ", 255).unwrap(), "Dune");
        assert_eq!(
            required_text("title", "   ", 255),
            Err(ValidationError::Blank("title"))
        );
    }

    #[test]
    fn test_required_text_counts_characters() {
        assert_eq!(required_text("isbn", "ñññ", 3).unwrap(), "ñññ");
        assert_eq!(
            required_text("isbn", "abcd", 3),
            Err(ValidationError::TooLong {
                field: "isbn",
                max_len: 3
            })
        );
    }

    #[test]
    fn test_email_length_is_bounded() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(ValidationError::TooLong { field: "email", .. })
        ));
    }

    #[test]
    fn test_role_aliases() {
        let role: Role = serde_json::from_str("\"bibliotecario\"").unwrap();
        assert_eq!(role, Role::Librarian);
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Librarian);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage_users());
        assert!(Role::Admin.can_manage_records());
        assert!(Role::Librarian.can_manage_records());
        assert!(!Role::Librarian.can_manage_users());
        assert!(!Role::User.can_manage_records());
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&BookId::new(7)).unwrap(), "7");
        let id: LoanId = serde_json::from_str("12").unwrap();
        assert_eq!(id.value(), 12);
    }
}
