//! Domain layer - User records, validation rules and authentication outcomes

pub mod error;
pub mod user;

pub use error::DomainError;
pub use user::{
    Authentication, FieldFailure, NewUser, User, UserChanges, UserId, UserRepository,
    ValidationResult,
};
