//! User validation rules

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::email::is_valid_email;
use super::entity::NewUser;

/// Maximum length of a user's name, in characters
pub const MAX_NAME_LENGTH: usize = 50;

/// Minimum length of a password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Field a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Password,
    PasswordConfirmation,
}

/// A single violated rule
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldFailure {
    #[error("Name can't be blank")]
    NameMissing,

    #[error("Name is too long (maximum is {max} characters)")]
    NameTooLong { max: usize },

    #[error("Email can't be blank")]
    EmailMissing,

    #[error("Email is invalid")]
    EmailInvalid,

    #[error("Email has already been taken")]
    EmailTaken,

    #[error("Password can't be blank")]
    PasswordMissing,

    #[error("Password is too short (minimum is {min} characters)")]
    PasswordTooShort { min: usize },

    #[error("Password confirmation can't be blank")]
    ConfirmationMissing,

    #[error("Password confirmation doesn't match Password")]
    ConfirmationMismatch,
}

impl FieldFailure {
    /// Field the failure is reported against
    pub fn field(&self) -> Field {
        match self {
            Self::NameMissing | Self::NameTooLong { .. } => Field::Name,
            Self::EmailMissing | Self::EmailInvalid | Self::EmailTaken => Field::Email,
            Self::PasswordMissing | Self::PasswordTooShort { .. } => Field::Password,
            Self::ConfirmationMissing | Self::ConfirmationMismatch => Field::PasswordConfirmation,
        }
    }
}

/// Non-empty collection of failures carried by a rejected record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailures(Vec<FieldFailure>);

impl ValidationFailures {
    pub fn as_slice(&self) -> &[FieldFailure] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, failure: &FieldFailure) -> bool {
        self.0.contains(failure)
    }

    /// Check whether any failure is reported against the given field
    pub fn has_field(&self, field: Field) -> bool {
        self.0.iter().any(|f| f.field() == field)
    }

    pub fn into_vec(self) -> Vec<FieldFailure> {
        self.0
    }
}

impl From<Vec<FieldFailure>> for ValidationFailures {
    fn from(failures: Vec<FieldFailure>) -> Self {
        Self(failures)
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

/// Verdict of validating a candidate record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "failures", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationFailures),
}

impl ValidationResult {
    /// Build a verdict; no failures is the only valid outcome
    pub fn from_failures(failures: Vec<FieldFailure>) -> Self {
        if failures.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(ValidationFailures(failures))
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failures(&self) -> &[FieldFailure] {
        match self {
            Self::Valid => &[],
            Self::Invalid(failures) => failures.as_slice(),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationFailures> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(failures) => Err(failures),
        }
    }
}

/// Which lifecycle step a record is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationContext {
    /// A password is mandatory
    #[default]
    Create,
    /// A password is optional, but checked when supplied
    Update,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a name
///
/// Rules:
/// - Cannot be blank
/// - Maximum 50 characters
pub fn validate_name(name: &str) -> Vec<FieldFailure> {
    let mut failures = Vec::new();

    if is_blank(name) {
        failures.push(FieldFailure::NameMissing);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        failures.push(FieldFailure::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }

    failures
}

/// Validate an email's presence and format; uniqueness needs storage and
/// is checked by the service.
pub fn validate_email(email: &str) -> Vec<FieldFailure> {
    let mut failures = Vec::new();

    if is_blank(email) {
        failures.push(FieldFailure::EmailMissing);
    }

    if !is_valid_email(email) {
        failures.push(FieldFailure::EmailInvalid);
    }

    failures
}

/// Validate a password and its confirmation
///
/// Rules:
/// - Required (non-blank) on create
/// - Minimum 6 characters when supplied
/// - A supplied password needs a confirmation equal to it
pub fn validate_password(
    password: Option<&str>,
    confirmation: Option<&str>,
    context: ValidationContext,
) -> Vec<FieldFailure> {
    let mut failures = Vec::new();

    // Only an absent password on update skips the presence rule
    let missing = match password {
        Some(password) => is_blank(password),
        None => context == ValidationContext::Create,
    };
    if missing {
        failures.push(FieldFailure::PasswordMissing);
    }

    if let Some(password) = password {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            failures.push(FieldFailure::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        match confirmation {
            None => failures.push(FieldFailure::ConfirmationMissing),
            Some(confirmation) if confirmation != password => {
                failures.push(FieldFailure::ConfirmationMismatch)
            }
            Some(_) => {}
        }
    } else if confirmation.is_some() {
        failures.push(FieldFailure::ConfirmationMismatch);
    }

    failures
}

/// Evaluate every field rule except uniqueness.
///
/// Rules never short-circuit; the returned list holds every violation in
/// field order.
pub fn validate_fields(user: &NewUser, context: ValidationContext) -> Vec<FieldFailure> {
    let mut failures = validate_name(&user.name);
    failures.extend(validate_email(&user.email));
    failures.extend(validate_password(
        user.password.as_deref(),
        user.password_confirmation.as_deref(),
        context,
    ));
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_user() -> NewUser {
        NewUser::new("Example User", "user@example.com").with_password("foobar", "foobar")
    }

    fn failures_for(user: &NewUser) -> Vec<FieldFailure> {
        validate_fields(user, ValidationContext::Create)
    }

    #[test]
    fn test_example_user_is_valid() {
        assert!(failures_for(&example_user()).is_empty());
    }

    #[test]
    fn test_blank_name() {
        let mut user = example_user();
        user.name = " ".to_string();
        assert_eq!(failures_for(&user), vec![FieldFailure::NameMissing]);

        user.name = String::new();
        assert_eq!(failures_for(&user), vec![FieldFailure::NameMissing]);
    }

    #[test]
    fn test_name_length_boundary() {
        let mut user = example_user();
        user.name = "a".repeat(50);
        assert!(failures_for(&user).is_empty());

        user.name = "a".repeat(51);
        assert_eq!(
            failures_for(&user),
            vec![FieldFailure::NameTooLong { max: 50 }]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut user = example_user();
        user.name = "é".repeat(50);
        assert!(failures_for(&user).is_empty());
    }

    #[test]
    fn test_blank_email_reports_presence_and_format() {
        let mut user = example_user();
        user.email = " ".to_string();

        let failures = failures_for(&user);
        assert!(failures.contains(&FieldFailure::EmailMissing));
        assert!(failures.contains(&FieldFailure::EmailInvalid));
    }

    #[test]
    fn test_invalid_email_formats() {
        for address in [
            "user@foo,com",
            "user_at_foo.org",
            "example.user@foo.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
        ] {
            let mut user = example_user();
            user.email = address.to_string();
            assert_eq!(
                failures_for(&user),
                vec![FieldFailure::EmailInvalid],
                "{} should be invalid",
                address
            );
        }
    }

    #[test]
    fn test_valid_email_formats() {
        for address in ["user@foo.COM", "A_US-ER@f.b.org", "frst.lst@foo.jp", "a+b@baz.cn"] {
            let mut user = example_user();
            user.email = address.to_string();
            assert!(failures_for(&user).is_empty(), "{} should be valid", address);
        }
    }

    #[test]
    fn test_blank_password() {
        let user = NewUser::new("Example User", "user@example.com").with_password(" ", " ");

        let failures = failures_for(&user);
        assert!(failures.contains(&FieldFailure::PasswordMissing));
        assert!(!failures.contains(&FieldFailure::ConfirmationMismatch));
    }

    #[test]
    fn test_absent_password_on_create() {
        let user = NewUser::new("Example User", "user@example.com");
        assert_eq!(failures_for(&user), vec![FieldFailure::PasswordMissing]);
    }

    #[test]
    fn test_absent_password_on_update_is_allowed() {
        let user = NewUser::new("Example User", "user@example.com");
        assert!(validate_fields(&user, ValidationContext::Update).is_empty());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let mut user = example_user();
        user.password_confirmation = Some("mismatch".to_string());
        assert_eq!(failures_for(&user), vec![FieldFailure::ConfirmationMismatch]);
    }

    #[test]
    fn test_missing_confirmation() {
        let mut user = example_user();
        user.password_confirmation = None;
        assert_eq!(failures_for(&user), vec![FieldFailure::ConfirmationMissing]);
    }

    #[test]
    fn test_password_length_boundary() {
        let user = NewUser::new("Example User", "user@example.com").with_password("a*5", "a*5");
        assert_eq!(
            failures_for(&user),
            vec![FieldFailure::PasswordTooShort { min: 6 }]
        );

        let user = NewUser::new("Example User", "user@example.com").with_password("aaaaa", "aaaaa");
        assert_eq!(
            failures_for(&user),
            vec![FieldFailure::PasswordTooShort { min: 6 }]
        );

        let user =
            NewUser::new("Example User", "user@example.com").with_password("aaaaaa", "aaaaaa");
        assert!(failures_for(&user).is_empty());
    }

    #[test]
    fn test_update_rejects_blank_password() {
        let user =
            NewUser::new("Example User", "user@example.com").with_password("      ", "      ");

        assert_eq!(
            validate_fields(&user, ValidationContext::Update),
            vec![FieldFailure::PasswordMissing]
        );
    }

    #[test]
    fn test_update_checks_supplied_password() {
        let user = NewUser::new("Example User", "user@example.com").with_password("abc", "abd");

        assert_eq!(
            validate_fields(&user, ValidationContext::Update),
            vec![
                FieldFailure::PasswordTooShort { min: 6 },
                FieldFailure::ConfirmationMismatch,
            ]
        );
    }

    #[test]
    fn test_all_rules_are_evaluated() {
        let user = NewUser {
            name: " ".to_string(),
            email: "nope".to_string(),
            password: Some("abc".to_string()),
            password_confirmation: None,
        };

        let failures = failures_for(&user);
        assert_eq!(
            failures,
            vec![
                FieldFailure::NameMissing,
                FieldFailure::EmailInvalid,
                FieldFailure::PasswordTooShort { min: 6 },
                FieldFailure::ConfirmationMissing,
            ]
        );
    }

    #[test]
    fn test_failure_fields() {
        assert_eq!(FieldFailure::NameTooLong { max: 50 }.field(), Field::Name);
        assert_eq!(FieldFailure::EmailTaken.field(), Field::Email);
        assert_eq!(FieldFailure::PasswordMissing.field(), Field::Password);
        assert_eq!(
            FieldFailure::ConfirmationMismatch.field(),
            Field::PasswordConfirmation
        );
    }

    #[test]
    fn test_validation_result() {
        assert!(ValidationResult::from_failures(vec![]).is_valid());
        assert!(ValidationResult::from_failures(vec![]).failures().is_empty());

        let invalid = ValidationResult::from_failures(vec![FieldFailure::EmailTaken]);
        assert!(!invalid.is_valid());
        assert_eq!(invalid.failures(), &[FieldFailure::EmailTaken]);

        let failures = invalid.into_result().unwrap_err();
        assert!(failures.has_field(Field::Email));
        assert!(!failures.has_field(Field::Name));
    }

    #[test]
    fn test_validation_result_serialization() {
        let invalid = ValidationResult::from_failures(vec![FieldFailure::NameTooLong { max: 50 }]);
        let json = serde_json::to_value(&invalid).unwrap();

        assert_eq!(json["status"], "invalid");
        assert_eq!(json["failures"][0]["rule"], "name_too_long");
        assert_eq!(json["failures"][0]["max"], 50);

        let valid = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(valid["status"], "valid");
    }
}
