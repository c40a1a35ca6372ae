//! Infrastructure layer - Password hashing, storage and logging

pub mod logging;
pub mod user;
