//! Input normalisation and validation for registry and gateway inputs.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::error::DomainError;

pub(crate) const MAX_EMAIL_LENGTH: usize = 254;

static SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // constant pattern
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap()
});

/// Lower-case and check a DNS-label subdomain.
pub(crate) fn normalize_subdomain(raw: &str) -> Result<String, DomainError> {
    let subdomain = raw.trim().to_ascii_lowercase();
    if subdomain.is_empty() {
        return Err(DomainError::validation("subdomain", "must not be empty"));
    }
    if !SUBDOMAIN_RE.is_match(&subdomain) {
        return Err(DomainError::validation(
            "subdomain",
            "must be 1-63 characters of a-z, 0-9 or '-', not starting or ending with '-'",
        ));
    }
    Ok(subdomain)
}

pub(crate) fn validate_company_name(raw: &str, max_len: usize) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("companyName", "must not be empty"));
    }
    if name.chars().count() > max_len {
        return Err(DomainError::validation(
            "companyName",
            format!("exceeds maximum length of {max_len}"),
        ));
    }
    Ok(name.to_owned())
}

/// Emails are the login handle and compared case-insensitively.
pub(crate) fn normalize_email(field: &str, raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LENGTH
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(DomainError::validation(field, "must be a valid email address"));
    }
    Ok(email)
}

pub(crate) fn require_password(field: &str, password: &SecretString) -> Result<(), DomainError> {
    if password.expose_secret().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn subdomain_is_lower_cased() {
        assert_eq!(normalize_subdomain(" Acme-Corp ").unwrap(), "acme-corp");
    }

    #[test]
    fn subdomain_rejects_bad_labels() {
        for bad in ["", "-acme", "acme-", "ac_me", "acme.corp", "a".repeat(64).as_str()] {
            assert!(
                matches!(
                    normalize_subdomain(bad),
                    Err(DomainError::Validation { ref field, .. }) if field == "subdomain"
                ),
                "{bad} should be rejected"
            );
        }
        assert!(normalize_subdomain(&"a".repeat(63)).is_ok());
        assert!(normalize_subdomain("7").is_ok());
    }

    #[test]
    fn company_name_is_trimmed_and_bounded() {
        assert_eq!(validate_company_name("  Acme ", 10).unwrap(), "Acme");
        assert!(validate_company_name("   ", 10).is_err());
        assert!(validate_company_name("Acme Industries", 10).is_err());
    }

    #[test]
    fn email_needs_local_and_domain_parts() {
        assert_eq!(
            normalize_email("adminEmail", "Admin@Acme.Test").unwrap(),
            "admin@acme.test"
        );
        assert!(normalize_email("adminEmail", "admin").is_err());
        assert!(normalize_email("adminEmail", "@acme.test").is_err());
        assert!(normalize_email("adminEmail", "admin@").is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(require_password("adminPassword", &SecretString::from(String::new())).is_err());
        assert!(require_password("adminPassword", &SecretString::from("pw".to_owned())).is_ok());
    }
}
