use anyhow::{anyhow, Result};
use std::path::Path;

use crate::report::Rgb;

/// Validation utilities for command-line input and configuration values
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate contact name
    ///
    /// The name is both a file-name filter and the output sub-directory, so
    /// path separators and parent references are rejected.
    pub fn validate_contact_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Contact name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(anyhow!("Contact name too long (max 100 characters)"));
        }

        if name.chars().any(char::is_control) {
            return Err(anyhow!("Contact name contains invalid characters"));
        }

        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(anyhow!(
                "Contact name cannot contain path separators or '..': {name:?}"
            ));
        }

        Ok(())
    }

    /// Validate the conversation directory
    pub fn validate_conversation_dir(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Conversation directory cannot be empty"));
        }

        if !path.exists() {
            return Err(anyhow!("Conversation directory does not exist: {path:?}"));
        }

        if !path.is_dir() {
            return Err(anyhow!("Conversation path is not a directory: {path:?}"));
        }

        Ok(())
    }

    /// Validate an explicitly requested configuration file
    pub fn validate_config_file(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(anyhow!("Configuration file not found: {path:?}"));
        }

        Ok(())
    }

    /// Validate the number of most-common words to show
    pub fn validate_top_words(count: usize) -> Result<()> {
        if count == 0 {
            return Err(anyhow!("Top word count must be greater than 0"));
        }

        if count > 1000 {
            return Err(anyhow!("Top word count too large (max 1000)"));
        }

        Ok(())
    }

    /// Parse a `#rrggbb` colour
    pub fn parse_hex_color(value: &str) -> Result<Rgb> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("Colour must start with '#': {value:?}"))?;

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow!("Colour must be six hex digits: {value:?}"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| anyhow!("Invalid colour {value:?}: {e}"))
        };

        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_name_rules() {
        assert!(InputValidator::validate_contact_name("Alex Smith").is_ok());
        assert!(InputValidator::validate_contact_name("  ").is_err());
        assert!(InputValidator::validate_contact_name("../etc").is_err());
        assert!(InputValidator::validate_contact_name("a/b").is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            InputValidator::parse_hex_color("#008000").expect("colour"),
            Rgb(0, 128, 0)
        );
        assert!(InputValidator::parse_hex_color("008000").is_err());
        assert!(InputValidator::parse_hex_color("#00800").is_err());
        assert!(InputValidator::parse_hex_color("#00g000").is_err());
    }
}
