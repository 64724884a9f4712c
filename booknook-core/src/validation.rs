//! Registration and login form rules.
//!
//! Consumers run these before dispatching to the auth store. Every failing
//! rule is reported, not just the first.

use std::fmt;
use thiserror::Error;

const PASSWORD_SPECIALS: &str = "!@#$%^&*()";

/// One failed rule on one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input: {}", join(.0))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn finish(errors: Vec<FieldError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_username(username, &mut errors);
    check_email(email, &mut errors);
    check_password(password, &mut errors);
    finish(errors)
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(password, &mut errors);
    finish(errors)
}

fn check_username(username: &str, errors: &mut Vec<FieldError>) {
    let username = username.trim();
    let len = username.chars().count();
    let mut push = |message| errors.push(FieldError { field: "username", message });

    if len < 3 {
        push("Username must be at least 3 characters");
    }
    if len > 30 {
        push("Username must be less than 30 characters");
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        push("Username may only contain letters, numbers, and underscores");
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_plausible_email(email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Invalid email address",
        });
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    let len = password.chars().count();
    let mut push = |message| errors.push(FieldError { field: "password", message });

    if len < 8 {
        push("Password must be at least 8 characters");
    }
    if len > 64 {
        push("Password must be less than 64 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        push("Must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        push("Must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        push("Must contain at least one number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        push("Must contain at least one special character");
    }
}
