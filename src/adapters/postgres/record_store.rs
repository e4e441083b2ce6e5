use crate::domain::book::{Book, BookDetails, BookFilter};
use crate::domain::loan::{Loan, LoanFilter};
use crate::domain::member::{Member, MemberDetails};
use crate::domain::stats::LibraryStats;
use crate::domain::user::{NewUser, User};
use crate::domain::value_objects::{BookId, LoanId, MemberId, UserId};
use crate::ports::errors::{Result, StoreError};
use crate::ports::record_store::RecordStore;
use async_trait::async_trait;

use super::PgStore;
use super::rows::{
    BOOK_COLUMNS, LOAN_COLUMNS, MEMBER_COLUMNS, USER_COLUMNS, map_row_to_book, map_row_to_loan,
    map_row_to_member, map_row_to_stats, map_row_to_user,
};

impl PgStore {
    /// 貸出中の貸出に参照されていなければ親の行を削除する
    ///
    /// 先に親の行をロックするため、同時に作成される貸出は検査の前にコミット済みか、
    /// 削除の完了を待つかのどちらかになる。返却済みの貸出は ON DELETE CASCADE で消える。
    async fn delete_unless_lent(&self, table: &str, loan_column: &str, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query(&format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let lent: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE {loan_column} = $1 AND status = 'active')"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if lent {
            return Err(StoreError::Conflict(format!(
                "{table} row {id} has an active loan"
            )));
        }

        sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_book(&self, details: BookDetails) -> Result<Book> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO books (title, author, isbn, publication_year, category, available)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&details.title)
        .bind(&details.author)
        .bind(&details.isbn)
        .bind(details.publication_year)
        .bind(&details.category)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_book(&row)
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(book_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE ($1::BOOLEAN IS NULL OR available = $1)
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY id ASC
            "#
        ))
        .bind(filter.available)
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn update_book(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, publication_year = $5, category = $6
            WHERE id = $1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(book_id.value())
        .bind(&details.title)
        .bind(&details.author)
        .bind(&details.isbn)
        .bind(details.publication_year)
        .bind(&details.category)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool> {
        self.delete_unless_lent("books", "book_id", book_id.value())
            .await
    }

    async fn insert_member(&self, details: MemberDetails) -> Result<Member> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO members (first_name, last_name, email, phone, registered_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.email.as_str())
        .bind(&details.phone)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_member(&row)
    }

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"
        ))
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_member).collect()
    }

    async fn update_member(
        &self,
        member_id: MemberId,
        details: MemberDetails,
    ) -> Result<Option<Member>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE members
            SET first_name = $2, last_name = $3, email = $4, phone = $5
            WHERE id = $1
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(member_id.value())
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.email.as_str())
        .bind(&details.phone)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool> {
        self.delete_unless_lent("members", "member_id", member_id.value())
            .await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(user.password_hash.as_str())
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => map_row_to_user(&row),
            Err(err) => match StoreError::from(err) {
                StoreError::Conflict(_) => Err(StoreError::Conflict(format!(
                    "username {:?} is already taken",
                    user.username
                ))),
                other => Err(other),
            },
        }
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_user).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_user).collect()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_loan(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"))
            .bind(loan_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<Loan>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR book_id = $2)
              AND ($3::BIGINT IS NULL OR member_id = $3)
            ORDER BY loaned_at DESC, id DESC
            "#
        ))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.book_id.map(|id| id.value()))
        .bind(filter.member_id.map(|id| id.value()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn library_stats(&self) -> Result<LibraryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM books WHERE available) AS available_books,
                (SELECT COUNT(*) FROM members) AS total_members,
                (SELECT COUNT(*) FROM loans WHERE status = 'active') AS active_loans
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        map_row_to_stats(&row)
    }
}
