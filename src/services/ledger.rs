//! Lending ledger service.
//!
//! Thin orchestration over [`BorrowingsRepository`]: the atomicity of the
//! borrow/return transitions lives in the repository transactions, not here.

use crate::{error::AppResult, models::borrowing::Borrowing, repository::Repository};

#[derive(Clone)]
pub struct LedgerService {
    repository: Repository,
}

impl LedgerService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a member
    pub async fn borrow(&self, member_id: i32, book_id: i32) -> AppResult<Borrowing> {
        self.repository.borrowings.borrow(member_id, book_id).await
    }

    /// Return a borrowed book
    pub async fn return_borrowing(&self, borrow_id: i32) -> AppResult<Borrowing> {
        self.repository.borrowings.return_borrowing(borrow_id).await
    }

    /// Get a borrowing by ID
    pub async fn get_borrowing(&self, borrow_id: i32) -> AppResult<Borrowing> {
        self.repository.borrowings.get_by_id(borrow_id).await
    }

    /// Get borrowings for a member
    pub async fn get_member_borrowings(&self, member_id: i32) -> AppResult<Vec<Borrowing>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.borrowings.get_member_borrowings(member_id).await
    }

    /// Count open borrowings
    pub async fn count_open(&self) -> AppResult<i64> {
        self.repository.borrowings.count_open().await
    }
}
