//! Member management service

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all members
    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list().await
    }

    /// Get a member by ID
    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Register a new member
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        if self.repository.members.email_exists(&member.email, None).await? {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                member.email
            )));
        }

        self.repository.members.create(&member).await
    }

    /// Update a member
    pub async fn update_member(&self, id: i32, update: UpdateMember) -> AppResult<Member> {
        if let Some(ref email) = update.email {
            if self.repository.members.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
        }

        self.repository.members.update(id, &update).await
    }

    /// Delete a member. Refused while the member still holds a book.
    pub async fn delete_member(&self, id: i32) -> AppResult<()> {
        self.repository.members.get_by_id(id).await?;

        if self.repository.members.has_open_borrowings(id).await? {
            return Err(AppError::BadRequest(format!(
                "Member {} still has open borrowings",
                id
            )));
        }

        self.repository.members.delete(id).await
    }
}
