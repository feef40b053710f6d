//! Lending ledger endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrowing::{Borrowing, CreateBorrowing},
};

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// The newly opened borrowing
    pub borrowing: Borrowing,
    /// Status message
    pub message: String,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// The closed borrowing
    pub borrowing: Borrowing,
}

/// Get borrowing by ID
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = Borrowing),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrowing>> {
    let borrowing = state.services.ledger.get_borrowing(id).await?;
    Ok(Json(borrowing))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    request_body = CreateBorrowing,
    responses(
        (status = 201, description = "Borrowing opened", body = BorrowResponse),
        (status = 400, description = "Rejected: book missing, book unavailable or member missing",
            body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBorrowing>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrowing = state
        .services
        .ledger
        .borrow(request.member_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            borrowing,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing closed", body = ReturnResponse),
        (status = 400, description = "Rejected: unknown borrowing or already returned",
            body = crate::error::ErrorResponse)
    )
)]
pub async fn return_borrowing(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let borrowing = state.services.ledger.return_borrowing(id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        borrowing,
    }))
}
