use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::book::{BookDetails, BookFilter};
use crate::domain::commands::CreateLoan;
use crate::domain::errors::ValidationError;
use crate::domain::loan::{Loan, LoanFilter, LoanStatus};
use crate::domain::member::MemberDetails;
use crate::domain::user::NewUser;
use crate::domain::value_objects::{BookId, MemberId, Role};

/// 書籍の作成・更新リクエスト（POST /books, PUT /books/:id）
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub category: String,
}

impl BookRequest {
    pub fn to_details(&self) -> Result<BookDetails, ValidationError> {
        BookDetails::new(
            &self.title,
            &self.author,
            &self.isbn,
            self.publication_year,
            &self.category,
        )
    }
}

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    pub available: Option<bool>,
    pub category: Option<String>,
}

impl From<ListBooksQuery> for BookFilter {
    fn from(query: ListBooksQuery) -> Self {
        Self {
            available: query.available,
            category: query.category,
        }
    }
}

/// 会員の作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl MemberRequest {
    pub fn to_details(&self) -> Result<MemberDetails, ValidationError> {
        MemberDetails::new(
            &self.first_name,
            &self.last_name,
            &self.email,
            self.phone.as_deref(),
        )
    }
}

/// 貸出作成リクエスト（POST /loans）
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub book_id: i64,
    pub member_id: i64,
}

impl CreateLoanRequest {
    pub fn to_command(&self) -> CreateLoan {
        CreateLoan {
            book_id: BookId::new(self.book_id),
            member_id: MemberId::new(self.member_id),
            loaned_at: Utc::now(),
        }
    }
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListLoansQuery {
    /// ステータスでフィルタリング（active, returned）
    pub status: Option<String>,
    pub book_id: Option<i64>,
    pub member_id: Option<i64>,
}

impl ListLoansQuery {
    pub fn to_filter(&self) -> Result<LoanFilter, String> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<LoanStatus>)
            .transpose()?;

        Ok(LoanFilter {
            status,
            book_id: self.book_id.map(BookId::new),
            member_id: self.member_id.map(MemberId::new),
        })
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id.value(),
            book_id: loan.book_id.value(),
            member_id: loan.member_id.value(),
            loaned_at: loan.loaned_at,
            returned_at: loan.returned_at(),
            status: loan.status().as_str().to_string(),
        }
    }
}

/// 利用者作成リクエスト（POST /users）
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

impl CreateUserRequest {
    pub fn to_new_user(&self) -> Result<NewUser, ValidationError> {
        NewUser::new(&self.username, &self.password, &self.display_name, self.role)
    }
}

/// ログインリクエスト（POST /auth/login）
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_loans_query_parses_status() {
        let query = ListLoansQuery {
            status: Some("returned".to_string()),
            book_id: Some(4),
            member_id: None,
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.status, Some(LoanStatus::Returned));
        assert_eq!(filter.book_id, Some(BookId::new(4)));
    }

    #[test]
    fn test_list_loans_query_rejects_unknown_status() {
        let query = ListLoansQuery {
            status: Some("lost".to_string()),
            ..ListLoansQuery::default()
        };
        assert!(query.to_filter().is_err());
    }

    #[test]
    fn test_create_user_request_accepts_legacy_role() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"username":"luis","password":"password-1","display_name":"Luis","role":"editor"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::Librarian);
    }
}
