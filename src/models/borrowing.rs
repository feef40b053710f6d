//! Borrowing (ledger entry) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrowing record from database.
///
/// Open while `return_date` is null; closing it is a one-way transition and a
/// closed borrowing is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Borrowing {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrowing {
    pub member_id: i32,
    pub book_id: i32,
}
