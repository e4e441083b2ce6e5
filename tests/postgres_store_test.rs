//! PostgreSQLアダプターの統合テスト
//!
//! 実行には DATABASE_URL が必要：
//! `cargo test --test postgres_store_test -- --ignored`

use chrono::Utc;
use rusty_library_records::adapters::postgres::PgStore;
use rusty_library_records::application::loan::{create_loan, delete_loan, return_loan};
use rusty_library_records::application::{
    ApplicationError, ServiceDependencies, accounts, catalog, membership, stats,
};
use rusty_library_records::domain::ValidationError;
use rusty_library_records::domain::book::{BookDetails, BookFilter};
use rusty_library_records::domain::commands::{CreateLoan, ReturnLoan};
use rusty_library_records::domain::loan::{LoanFilter, LoanStatus};
use rusty_library_records::domain::user::NewUser;
use rusty_library_records::domain::value_objects::Role;
use serial_test::serial;
use sqlx::PgPool;

mod common;

use common::{assert_availability_invariant, seed_book, seed_member};

/// 各テストの前にすべてのテーブルを空にし、採番をリセットする
async fn setup(pool: &PgPool) -> ServiceDependencies {
    sqlx::query("TRUNCATE TABLE loans, books, members, users RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .expect("Failed to truncate tables");

    ServiceDependencies::from_store(PgStore::new(pool.clone()))
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_loan_lifecycle_persists() {
    // Arrange
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;
    let book = seed_book(&deps, "El túnel").await;
    let member = seed_member(&deps, "Ana").await;

    // Act: 貸出
    let loan = create_loan(
        &deps,
        CreateLoan {
            book_id: book.id,
            member_id: member.id,
            loaned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(loan.status(), LoanStatus::Active);
    assert!(!catalog::get_book(&deps, book.id).await.unwrap().available);
    assert!(matches!(
        create_loan(
            &deps,
            CreateLoan {
                book_id: book.id,
                member_id: member.id,
                loaned_at: Utc::now(),
            },
        )
        .await,
        Err(ApplicationError::BookNotAvailable)
    ));

    // Act: 返却
    let returned = return_loan(
        &deps,
        ReturnLoan {
            loan_id: loan.id,
            returned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    assert_eq!(returned.status(), LoanStatus::Returned);
    assert!(catalog::get_book(&deps, book.id).await.unwrap().available);
    let counts = stats::library_stats(&deps).await.unwrap();
    assert_eq!(counts.available_books, 1);
    assert_eq!(counts.active_loans, 0);
    assert!(matches!(
        return_loan(
            &deps,
            ReturnLoan {
                loan_id: loan.id,
                returned_at: Utc::now(),
            },
        )
        .await,
        Err(ApplicationError::AlreadyReturned)
    ));
    assert_availability_invariant(&deps).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_active_loan_restores_availability() {
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;
    let book = seed_book(&deps, "El túnel").await;
    let member = seed_member(&deps, "Ana").await;
    let loan = create_loan(
        &deps,
        CreateLoan {
            book_id: book.id,
            member_id: member.id,
            loaned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    delete_loan(&deps, loan.id).await.unwrap();

    assert!(catalog::get_book(&deps, book.id).await.unwrap().available);
    assert!(
        deps.record_store
            .list_loans(LoanFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_loans_have_single_winner() {
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;
    let book = seed_book(&deps, "El túnel").await;
    let mut members = Vec::new();
    for name in ["Ana", "Luis", "Marta", "Pablo"] {
        members.push(seed_member(&deps, name).await);
    }

    let attempts = members.iter().map(|member| {
        let deps = deps.clone();
        let cmd = CreateLoan {
            book_id: book.id,
            member_id: member.id,
            loaned_at: Utc::now(),
        };
        tokio::spawn(async move { create_loan(&deps, cmd).await })
    });
    let results = futures::future::join_all(attempts).await;

    let successes = results
        .iter()
        .filter(|result| matches!(result, Ok(Ok(_))))
        .count();
    assert_eq!(successes, 1);
    assert_availability_invariant(&deps).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_guards_and_cascade() {
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;
    let book = seed_book(&deps, "El túnel").await;
    let member = seed_member(&deps, "Ana").await;
    let loan = create_loan(
        &deps,
        CreateLoan {
            book_id: book.id,
            member_id: member.id,
            loaned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        catalog::delete_book(&deps, book.id).await,
        Err(ApplicationError::Conflict(_))
    ));
    assert!(matches!(
        membership::delete_member(&deps, member.id).await,
        Err(ApplicationError::Conflict(_))
    ));

    return_loan(
        &deps,
        ReturnLoan {
            loan_id: loan.id,
            returned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    membership::delete_member(&deps, member.id).await.unwrap();
    assert!(
        deps.record_store
            .list_loans(LoanFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        deps.record_store
            .list_books(BookFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_overlong_isbn_never_reaches_the_database() {
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;

    let result = BookDetails::new("El túnel", "Ernesto Sabato", &"9".repeat(200), 1948, "Novela");

    assert!(matches!(result, Err(ValidationError::TooLong { field: "isbn", .. })));
    let longest = BookDetails::new("El túnel", "Ernesto Sabato", &"9".repeat(32), 1948, "Novela")
        .unwrap();
    assert!(catalog::create_book(&deps, longest).await.is_ok());
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_users_round_trip() {
    let pool = common::create_test_pool().await;
    let deps = setup(&pool).await;

    let user = NewUser::new("maria", "password-1", "María", Role::Librarian).unwrap();
    let created = accounts::create_user(&deps, user.clone()).await.unwrap();

    assert!(matches!(
        accounts::create_user(&deps, user).await,
        Err(ApplicationError::Conflict(_))
    ));

    let authenticated = accounts::authenticate(&deps, "maria", "password-1")
        .await
        .unwrap();
    assert_eq!(authenticated.id, created.id);
    assert_eq!(authenticated.role, Role::Librarian);
}
