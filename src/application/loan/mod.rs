mod loan_service;

pub use loan_service::{create_loan, delete_loan, get_loan, list_loans, return_loan};
