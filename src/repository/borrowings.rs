//! Borrowings repository: the lending ledger.
//!
//! `borrow` and `return_borrowing` are the only writers of `books.available`
//! and `borrowings.return_date`. Each runs its check-then-act sequence inside
//! a single transaction with the decisive row locked (`SELECT ... FOR UPDATE`),
//! so concurrent callers are serialized by Postgres: of two borrow attempts on
//! the same book, one commits and the other sees the committed state and is
//! rejected. A rejection rolls back without any visible state change.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, RejectReason},
    models::borrowing::Borrowing,
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    /// Get all borrowings for a member, open ones first
    pub async fn get_member_borrowings(&self, member_id: i32) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            r#"
            SELECT * FROM borrowings
            WHERE member_id = $1
            ORDER BY return_date IS NOT NULL, borrow_date DESC, id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrowings)
    }

    /// Borrow a book: flip its availability and open a ledger entry, atomically.
    pub async fn borrow(&self, member_id: i32, book_id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row so a concurrent borrow waits here and then sees
        // available = false.
        let available: Option<bool> =
            sqlx::query_scalar("SELECT available FROM books WHERE id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let available = match available {
            Some(available) => available,
            None => return Err(AppError::Rejected(RejectReason::NotFound)),
        };

        if !available {
            return Err(AppError::Rejected(RejectReason::Unavailable));
        }

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
                .bind(member_id)
                .fetch_one(&mut *tx)
                .await?;

        if !member_exists {
            return Err(AppError::Rejected(RejectReason::NotFound));
        }

        sqlx::query("UPDATE books SET available = false WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (member_id, book_id, borrow_date)
            VALUES ($1, $2, CURRENT_DATE)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            borrowing_id = borrowing.id,
            member_id,
            book_id,
            "book borrowed"
        );

        Ok(borrowing)
    }

    /// Return a borrowing: close the ledger entry and restore the book's
    /// availability, atomically.
    pub async fn return_borrowing(&self, borrow_id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        // Lock the ledger row; a concurrent return of the same borrowing
        // waits here and then sees it closed.
        let borrowing =
            sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1 FOR UPDATE")
                .bind(borrow_id)
                .fetch_optional(&mut *tx)
                .await?;

        let borrowing = match borrowing {
            Some(borrowing) => borrowing,
            None => return Err(AppError::Rejected(RejectReason::NotFound)),
        };

        if borrowing.return_date.is_some() {
            return Err(AppError::Rejected(RejectReason::AlreadyReturned));
        }

        let closed = sqlx::query_as::<_, Borrowing>(
            r#"
            UPDATE borrowings
            SET return_date = CURRENT_DATE
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(borrow_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available = true WHERE id = $1")
            .bind(borrowing.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            borrowing_id = closed.id,
            book_id = closed.book_id,
            "book returned"
        );

        Ok(closed)
    }

    /// Count open borrowings
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrowings WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
