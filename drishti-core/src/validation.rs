//! Client-side form validation.
//!
//! These checks mirror what the sign-up and account screens enforce before
//! anything is sent to the backend.

use crate::error::ValidationError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Email address used as login identity.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
}

impl Registration {
    /// Validates the form and returns the trimmed name and email.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok((name.to_string(), email.to_string()))
    }
}

/// Checks login credentials are present.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for a blank identity or secret.
pub fn require_credentials(identity: &str, secret: &str) -> Result<(), ValidationError> {
    if identity.trim().is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if secret.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    Ok(())
}

/// Checks the password typed to confirm account deletion.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when blank.
pub fn require_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, pw: &str, confirm: &str) -> Registration {
        Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: pw.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_is_trimmed() {
        let (name, email) = form("  Ada ", " ada@example.com ", "longenough", "longenough")
            .validate()
            .unwrap();
        assert_eq!(name, "Ada");
        assert_eq!(email, "ada@example.com");
    }

    #[test]
    fn test_registration_rejects_blank_fields() {
        assert_eq!(
            form("  ", "a@b.c", "longenough", "longenough").validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            form("Ada", "", "longenough", "longenough").validate(),
            Err(ValidationError::MissingField("email"))
        );
    }

    #[test]
    fn test_registration_password_rules() {
        assert_eq!(
            form("Ada", "a@b.c", "longenough", "longenougH").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            form("Ada", "a@b.c", "short", "short").validate(),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
    }

    #[test]
    fn test_require_credentials() {
        assert!(require_credentials("a@b.c", "pw").is_ok());
        assert!(require_credentials(" ", "pw").is_err());
        assert!(require_credentials("a@b.c", "").is_err());
    }

    #[test]
    fn test_require_password() {
        assert!(require_password("secret").is_ok());
        assert_eq!(
            require_password("   "),
            Err(ValidationError::MissingField("password"))
        );
    }
}
