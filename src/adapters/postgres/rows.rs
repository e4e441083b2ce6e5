use crate::domain::book::{Book, BookDetails};
use crate::domain::loan::{Loan, LoanState, LoanStatus};
use crate::domain::member::{Member, MemberDetails};
use crate::domain::password::PasswordHash;
use crate::domain::stats::LibraryStats;
use crate::domain::user::User;
use crate::domain::value_objects::{BookId, Email, LoanId, MemberId, Role, UserId};
use crate::ports::errors::{Result, StoreError};
use sqlx::{Row, postgres::PgRow};
use std::str::FromStr;

pub(super) const BOOK_COLUMNS: &str =
    "id, title, author, isbn, publication_year, category, available";
pub(super) const MEMBER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, registered_at";
pub(super) const LOAN_COLUMNS: &str = "id, book_id, member_id, loaned_at, returned_at, status";
pub(super) const USER_COLUMNS: &str = "id, username, password_hash, display_name, role";

fn invalid_data(message: impl Into<String>) -> StoreError {
    StoreError::backend(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}

/// 保存済みの行は検証済みとして扱い、書誌情報は再検証しない
pub(super) fn map_row_to_book(row: &PgRow) -> Result<Book> {
    Ok(Book {
        id: BookId::new(row.try_get("id")?),
        details: BookDetails {
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            isbn: row.try_get("isbn")?,
            publication_year: row.try_get("publication_year")?,
            category: row.try_get("category")?,
        },
        available: row.try_get("available")?,
    })
}

pub(super) fn map_row_to_member(row: &PgRow) -> Result<Member> {
    let email: String = row.try_get("email")?;
    let email = Email::parse(&email).map_err(|e| invalid_data(e.to_string()))?;

    Ok(Member {
        id: MemberId::new(row.try_get("id")?),
        details: MemberDetails {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email,
            phone: row.try_get("phone")?,
        },
        registered_at: row.try_get("registered_at")?,
    })
}

/// status と returned_at が矛盾する行は破損データとして報告する
pub(super) fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let status: &str = row.try_get("status")?;
    let status = LoanStatus::from_str(status).map_err(invalid_data)?;
    let state = LoanState::from_parts(status, row.try_get("returned_at")?)
        .map_err(|e| invalid_data(e.to_string()))?;

    Ok(Loan {
        id: LoanId::new(row.try_get("id")?),
        book_id: BookId::new(row.try_get("book_id")?),
        member_id: MemberId::new(row.try_get("member_id")?),
        loaned_at: row.try_get("loaned_at")?,
        state,
    })
}

pub(super) fn map_row_to_user(row: &PgRow) -> Result<User> {
    let role: &str = row.try_get("role")?;
    let role = Role::from_str(role).map_err(|e| invalid_data(e.to_string()))?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        username: row.try_get("username")?,
        password_hash: PasswordHash::from_stored(row.try_get("password_hash")?),
        display_name: row.try_get("display_name")?,
        role,
    })
}

pub(super) fn map_row_to_stats(row: &PgRow) -> Result<LibraryStats> {
    Ok(LibraryStats {
        total_books: row.try_get("total_books")?,
        available_books: row.try_get("available_books")?,
        total_members: row.try_get("total_members")?,
        active_loans: row.try_get("active_loans")?,
    })
}
