//! Utility functions
use std::fmt;

use crate::errors::{MigrateError, MigrateErrorKind};

/// A credential that never shows up in logs or debug output
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    /// The actual credential, for building requests and remote URLs only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the credential is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Interpret a "boolean-ish" setting: `true`, `yes` and `1` (any case) are true
pub fn is_truthy<S: AsRef<str>>(value: S) -> bool {
    matches!(
        value.as_ref().trim().to_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// Get input from the user
pub(crate) fn input() -> Result<String, MigrateError> {
    use std::io::{stdin, stdout, Write};
    let mut s = String::new();
    let _ = stdout().flush();
    let read = stdin().read_line(&mut s).map_err(|e| {
        MigrateError::new(MigrateErrorKind::Config)
            .with_text(&format!("Did not enter a correct string: {e}"))
    })?;
    if read == 0 {
        return Err(MigrateError::new(MigrateErrorKind::Config).with_text("stdin is closed"));
    }
    if let Some('\n') = s.chars().next_back() {
        s.pop();
    }
    if let Some('\r') = s.chars().next_back() {
        s.pop();
    }
    Ok(s)
}

/// Get a yes/no input from the user
pub(crate) fn yes_no_input<S: AsRef<str>>(msg: S) -> Result<bool, MigrateError> {
    let msg = msg.as_ref();
    loop {
        println!("{msg}");
        let input = input()?;
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => println!("Invalid input"),
        }
    }
}

/// Get password from the user
pub(crate) fn get_password() -> Result<String, MigrateError> {
    rpassword::read_password().map_err(|e| {
        MigrateError::new(MigrateErrorKind::Config)
            .with_text(&format!("Error reading password: {e}"))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truthy_values() {
        for value in ["true", "Yes", "1", "TRUE", "yes"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["false", "", "0", "no", "enabled"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn secret_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret}"), "***");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "hunter2");
    }
}
