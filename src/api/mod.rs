//! API handlers for Cardex REST endpoints

pub mod books;
pub mod borrowings;
pub mod health;
pub mod members;
pub mod openapi;
