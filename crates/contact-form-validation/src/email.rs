//! Email validation functions

/// Longest local part accepted before the `@`
const MAX_LOCAL_LEN: usize = 64;

/// Longest domain accepted after the `@`
const MAX_DOMAIN_LEN: usize = 255;

/// Validates basic email format
///
/// Checks for:
/// - Exactly one '@' with content on both sides
/// - A local part made of alphanumerics, dots and the RFC 5322 atext symbols
/// - A dotted domain that does not start or end with '.' or '-'
/// - A non-empty top-level domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.')
        || domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }

    if domain.contains("..") || local.starts_with('.') || local.ends_with('.') {
        return false;
    }

    let valid_local_chars = |c: char| c.is_alphanumeric() || c == '.' || is_atext_symbol(c);
    if !local.chars().all(valid_local_chars) {
        return false;
    }

    let valid_domain_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-';
    if !domain.chars().all(valid_domain_chars) {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((_, tld)) => !tld.is_empty(),
        None => false,
    }
}

/// Non-alphanumeric characters allowed unquoted in a local part
fn is_atext_symbol(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '/' | '=' | '?' | '^' | '_' | '`' | '{'
            | '|' | '}' | '~' | '-'
    )
}

/// Returns the domain part of an address, if it has one
pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain).filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));
        assert!(is_valid_email("user_name@example-domain.com"));
        assert!(is_valid_email("o'brien@example.com"));
        assert!(is_valid_email("a!#$%&*/=?^`{|}~@example.com"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("us(er@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(".user@example.com"));
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("user@example.com"), Some("example.com"));
        assert_eq!(email_domain("user@"), None);
        assert_eq!(email_domain("no-at-sign"), None);
    }
}
