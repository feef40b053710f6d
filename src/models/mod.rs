//! Data models for Cardex

pub mod book;
pub mod borrowing;
pub mod member;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use borrowing::{Borrowing, CreateBorrowing};
pub use member::{CreateMember, Member, UpdateMember};
