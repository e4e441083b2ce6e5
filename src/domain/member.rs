use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::ValidationError;
use super::value_objects::{Email, MemberId, bounded, required_text};

/// 図書館の会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: MemberId,
    #[serde(flatten)]
    pub details: MemberDetails,
    pub registered_at: DateTime<Utc>,
}

/// 会員情報（作成・更新の入力）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
}

const NAME_MAX_LEN: usize = 100;
const PHONE_MAX_LEN: usize = 32;

impl MemberDetails {
    /// 電話番号は任意。空白のみの場合は未設定として扱う。
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            first_name: required_text("first_name", first_name, NAME_MAX_LEN)?,
            last_name: required_text("last_name", last_name, NAME_MAX_LEN)?,
            email: Email::parse(email)?,
            phone: phone
                .map(str::trim)
                .filter(|phone| !phone.is_empty())
                .map(|phone| bounded("phone", phone, PHONE_MAX_LEN))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_details_valid() {
        let details = MemberDetails::new("Ana", "García", "ana@example.com", Some(" 555-0101 "))
            .unwrap();
        assert_eq!(details.email.as_str(), "ana@example.com");
        assert_eq!(details.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn test_member_details_blank_phone_is_none() {
        let details = MemberDetails::new("Ana", "García", "ana@example.com", Some("  ")).unwrap();
        assert_eq!(details.phone, None);
    }

    #[test]
    fn test_member_details_requires_email_with_at() {
        let result = MemberDetails::new("Ana", "García", "ana.example.com", None);
        assert!(matches!(result, Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_member_details_bounds_name_and_phone() {
        let long_name = "x".repeat(101);
        assert!(matches!(
            MemberDetails::new(&long_name, "García", "ana@example.com", None),
            Err(ValidationError::TooLong {
                field: "first_name",
                ..
            })
        ));
        assert!(matches!(
            MemberDetails::new("Ana", "García", "ana@example.com", Some(&"5".repeat(40))),
            Err(ValidationError::TooLong { field: "phone", .. })
        ));
    }

    #[test]
    fn test_member_details_requires_last_name() {
        let result = MemberDetails::new("Ana", "", "ana@example.com", None);
        assert_eq!(result, Err(ValidationError::Blank("last_name")));
    }
}
