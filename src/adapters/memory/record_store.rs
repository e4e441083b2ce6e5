use crate::domain::book::{Book, BookDetails, BookFilter};
use crate::domain::loan::{Loan, LoanFilter};
use crate::domain::member::{Member, MemberDetails};
use crate::domain::stats::LibraryStats;
use crate::domain::user::{NewUser, User};
use crate::domain::value_objects::{BookId, LoanId, MemberId, UserId};
use crate::ports::errors::{Result, StoreError};
use crate::ports::record_store::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;

use super::{MemoryStore, next_id};

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_book(&self, details: BookDetails) -> Result<Book> {
        let mut tables = self.tables.lock().await;
        let book = Book {
            id: BookId::new(next_id(&mut tables.book_seq)),
            details,
            available: true,
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.tables.lock().await.books.get(&book_id).cloned())
    }

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn update_book(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.books.get_mut(&book_id).map(|book| {
            book.details = details;
            book.clone()
        }))
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if !tables.books.contains_key(&book_id) {
            return Ok(false);
        }
        if tables.has_active_loan(|loan| loan.book_id == book_id) {
            return Err(StoreError::Conflict(format!(
                "book {} has an active loan",
                book_id
            )));
        }
        tables.loans.retain(|_, loan| loan.book_id != book_id);
        tables.books.remove(&book_id);
        Ok(true)
    }

    async fn insert_member(&self, details: MemberDetails) -> Result<Member> {
        let mut tables = self.tables.lock().await;
        let member = Member {
            id: MemberId::new(next_id(&mut tables.member_seq)),
            details,
            registered_at: Utc::now(),
        };
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.tables.lock().await.members.get(&member_id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        Ok(self.tables.lock().await.members.values().cloned().collect())
    }

    async fn update_member(
        &self,
        member_id: MemberId,
        details: MemberDetails,
    ) -> Result<Option<Member>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.members.get_mut(&member_id).map(|member| {
            member.details = details;
            member.clone()
        }))
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if !tables.members.contains_key(&member_id) {
            return Ok(false);
        }
        if tables.has_active_loan(|loan| loan.member_id == member_id) {
            return Err(StoreError::Conflict(format!(
                "member {} has an active loan",
                member_id
            )));
        }
        tables.loans.retain(|_, loan| loan.member_id != member_id);
        tables.members.remove(&member_id);
        Ok(true)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username {:?} is already taken",
                user.username
            )));
        }
        let user = User {
            id: UserId::new(next_id(&mut tables.user_seq)),
            username: user.username,
            password_hash: user.password_hash,
            display_name: user.display_name,
            role: user.role,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.lock().await.users.values().cloned().collect())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        Ok(self.tables.lock().await.users.remove(&user_id).is_some())
    }

    async fn get_loan(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.tables.lock().await.loans.get(&loan_id).cloned())
    }

    async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<Loan>> {
        let tables = self.tables.lock().await;
        let mut loans: Vec<Loan> = tables
            .loans
            .values()
            .filter(|loan| filter.matches(loan))
            .cloned()
            .collect();
        loans.sort_by_key(|loan| Reverse((loan.loaned_at, loan.id)));
        Ok(loans)
    }

    async fn library_stats(&self) -> Result<LibraryStats> {
        let tables = self.tables.lock().await;
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        Ok(LibraryStats {
            total_books: count(tables.books.len()),
            available_books: count(tables.books.values().filter(|b| b.available).count()),
            total_members: count(tables.members.len()),
            active_loans: count(tables.loans.values().filter(|l| l.is_active()).count()),
        })
    }
}
