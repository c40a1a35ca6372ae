//! User domain
//!
//! This module provides domain types and traits for user registration and
//! authentication: the user entity, email canonicalization, field validation
//! rules, authentication outcomes and the repository trait.

mod authentication;
mod email;
mod entity;
mod repository;
mod validation;

pub use authentication::Authentication;
pub use email::{canonicalize_email, is_valid_email};
pub use entity::{NewUser, PasswordDigest, User, UserChanges, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_fields, validate_name, validate_password, Field, FieldFailure,
    ValidationContext, ValidationFailures, ValidationResult, MAX_NAME_LENGTH,
    MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
