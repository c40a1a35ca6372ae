//! User service for registration and authentication

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::domain::user::{
    canonicalize_email, validate_fields, Authentication, Field, FieldFailure, NewUser,
    PasswordDigest, User, UserChanges, UserId, UserRepository, ValidationContext,
    ValidationResult,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Password digested once and verified against when a login names an
/// unknown email, so both failure paths cost one verification.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-email";

/// User service for registration, updates and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    decoy_digest: OnceCell<PasswordDigest>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            decoy_digest: OnceCell::new(),
        }
    }

    /// Validate a candidate for registration, including the email
    /// uniqueness pre-check against stored users
    pub async fn validate(&self, candidate: &NewUser) -> Result<ValidationResult, DomainError> {
        self.check(candidate, ValidationContext::Create, None).await
    }

    /// Validate, digest and store a new user
    #[instrument(skip_all)]
    pub async fn register(&self, candidate: NewUser) -> Result<User, DomainError> {
        if let ValidationResult::Invalid(failures) = self.validate(&candidate).await? {
            debug!(failures = %failures, "Registration rejected");
            return Err(DomainError::Rejected(failures));
        }

        let password = candidate
            .password
            .as_deref()
            .ok_or_else(|| DomainError::internal("Validated candidate has no password"))?;
        let digest = self.hasher.hash(password)?;

        let user = User::new(UserId::generate(), candidate.name, &candidate.email, digest);

        let user = self
            .repository
            .create(user)
            .await
            .map_err(reject_email_conflict)?;

        info!(user_id = %user.id(), "User registered");

        Ok(user)
    }

    /// Apply changes to an existing user, re-running the same validation
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let candidate = changes.apply_to(&user);
        if let ValidationResult::Invalid(failures) = self
            .check(&candidate, ValidationContext::Update, Some(id))
            .await?
        {
            debug!(failures = %failures, "Update rejected");
            return Err(DomainError::Rejected(failures));
        }

        if let Some(name) = changes.name {
            user.set_name(name);
        }

        if let Some(email) = changes.email.as_deref() {
            user.set_email(email);
        }

        if let Some(password) = changes.password.as_deref() {
            user.set_password_digest(self.hasher.hash(password)?);
        }

        let user = self
            .repository
            .update(&user)
            .await
            .map_err(reject_email_conflict)?;

        info!(user_id = %user.id(), "User updated");

        Ok(user)
    }

    /// Check a candidate password against a user's stored digest
    pub fn authenticate(&self, user: &User, password: &str) -> Authentication {
        if self.hasher.verify(password, user.password_digest()) {
            Authentication::AuthenticatedAs(user.clone())
        } else {
            Authentication::Failed
        }
    }

    /// Look up a user by email and check the candidate password.
    ///
    /// An unknown email and a wrong password both yield
    /// [`Authentication::Failed`]; only storage faults are errors.
    #[instrument(skip_all)]
    pub async fn authenticate_by_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Authentication, DomainError> {
        let outcome = match self.find_by_email(email).await? {
            Some(user) => self.authenticate(&user, password),
            None => {
                let decoy = self
                    .decoy_digest
                    .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))?;
                self.hasher.verify(password, decoy);
                Authentication::Failed
            }
        };

        match outcome.user() {
            Some(user) => info!(user_id = %user.id(), "User authenticated"),
            None => warn!("Authentication failed"),
        }

        Ok(outcome)
    }

    /// Get a user by email, compared in canonical form
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository
            .find_by_email(&canonicalize_email(email))
            .await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Delete a user
    pub async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;

        if deleted {
            info!(user_id = %id, "User deleted");
        }

        Ok(deleted)
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Run every field rule plus the uniqueness pre-check. `current` is the
    /// user being updated, whose own email never counts as taken.
    async fn check(
        &self,
        candidate: &NewUser,
        context: ValidationContext,
        current: Option<&UserId>,
    ) -> Result<ValidationResult, DomainError> {
        let mut failures = validate_fields(candidate, context);

        if !candidate.email.trim().is_empty() {
            let email = candidate.canonical_email();

            if let Some(existing) = self.repository.find_by_email(&email).await? {
                if Some(existing.id()) != current {
                    // Keep field order: name and email failures come first
                    let at = failures
                        .iter()
                        .take_while(|f| matches!(f.field(), Field::Name | Field::Email))
                        .count();
                    failures.insert(at, FieldFailure::EmailTaken);
                }
            }
        }

        Ok(ValidationResult::from_failures(failures))
    }
}

/// The storage constraint lost a race with the pre-check; report it the same
/// way the pre-check would have.
fn reject_email_conflict(error: DomainError) -> DomainError {
    if error.is_conflict() {
        DomainError::rejected(vec![FieldFailure::EmailTaken])
    } else {
        error
    }
}
