//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::email::canonicalize_email;
use crate::domain::DomainError;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| DomainError::validation(format!("Invalid user ID '{}': {}", id, e)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-way digest of a password, in PHC string format
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Candidate record submitted for registration.
///
/// Password fields are transient: only their digest is ever persisted.
#[derive(Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: None,
            password_confirmation: None,
        }
    }

    pub fn with_password(
        mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        self.password = Some(password.into());
        self.password_confirmation = Some(confirmation.into());
        self
    }

    /// Email in canonical (lowercase) form
    pub fn canonical_email(&self) -> String {
        canonicalize_email(&self.email)
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field(
                "password_confirmation",
                &self.password_confirmation.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Changes applied to an existing user; `None` leaves a field untouched
#[derive(Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UserChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>, confirmation: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self.password_confirmation = Some(confirmation.into());
        self
    }

    /// Candidate record formed by applying these changes on top of `user`
    pub fn apply_to(&self, user: &User) -> NewUser {
        NewUser {
            name: self.name.clone().unwrap_or_else(|| user.name().to_string()),
            email: self.email.clone().unwrap_or_else(|| user.email().to_string()),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        }
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Persisted user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    /// Always stored in canonical form
    email: String,
    #[serde(skip_serializing, default)]
    password_digest: PasswordDigest,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user; the email is canonicalized on the way in
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: &str,
        password_digest: PasswordDigest,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            email: canonicalize_email(email),
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns
    pub fn restore(
        id: UserId,
        name: String,
        email: String,
        password_digest: PasswordDigest,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_digest,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = canonicalize_email(email);
        self.touch();
    }

    pub fn set_password_digest(&mut self, digest: PasswordDigest) {
        self.password_digest = digest;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            UserId::generate(),
            "Example User",
            "User@Example.com",
            PasswordDigest::new("$argon2id$fake"),
        )
    }

    #[test]
    fn test_user_id_round_trip() {
        let id = UserId::generate();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_email_is_canonical() {
        let user = create_test_user();
        assert_eq!(user.email(), "user@example.com");
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_set_email_canonicalizes() {
        let mut user = create_test_user();
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_email("Foo@ExaMPle.Com");
        assert_eq!(user.email(), "foo@example.com");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_serialization_excludes_digest() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_digest"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("user@example.com"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let draft = NewUser::new("Example User", "user@example.com").with_password("foobar", "foobar");
        let debug = format!("{:?}", draft);
        assert!(!debug.contains("foobar"));

        let user = create_test_user();
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn test_changes_apply_to_user() {
        let user = create_test_user();

        let draft = UserChanges::default().name("Renamed").apply_to(&user);
        assert_eq!(draft.name, "Renamed");
        assert_eq!(draft.email, "user@example.com");
        assert!(draft.password.is_none());

        let draft = UserChanges::default()
            .email("New@Example.com")
            .password("secret1", "secret1")
            .apply_to(&user);
        assert_eq!(draft.name, "Example User");
        assert_eq!(draft.canonical_email(), "new@example.com");
        assert_eq!(draft.password.as_deref(), Some("secret1"));
    }
}
