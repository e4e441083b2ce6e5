use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, auth, books, loans, members, stats, users};

/// Creates the API router with all library endpoints
///
/// Reads of books, members, loans and stats are public. Mutations require Basic
/// credentials of an admin or librarian; `/users` requires an admin.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/auth/login", post(auth::login))
        .route("/stats", get(stats::library_stats))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Members
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route(
            "/loans/:id",
            get(loans::get_loan).delete(loans::delete_loan),
        )
        .route("/loans/:id/return", put(loans::return_loan))
        // User accounts
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user).delete(users::delete_user),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
