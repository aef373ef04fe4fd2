//! `userhub-core`: user domain building blocks.
//!
//! This crate contains **pure domain** code (no infrastructure concerns): the
//! `User` entity, its boundary DTOs, input validation and the entity/DTO mapper.

pub mod error;
pub mod id;
pub mod mapper;
pub mod user;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use mapper::UserMapper;
pub use user::{User, UserRequest, UserResponse};
pub use validation::{FieldViolation, ValidationResult};
