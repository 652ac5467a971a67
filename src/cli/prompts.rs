//! Interactive input layer
//!
//! Each prompt is a thin retry loop around a pure `parse_* -> Result`
//! function; validation lives in the parsers, re-prompting stays at this
//! boundary and never leaks into the store.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use thiserror::Error;

/// A raw input value that failed validation
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Parse a non-empty string
pub fn parse_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError("the name cannot be empty".into()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse an integer within `[min, max]`
pub fn parse_u32_in(raw: &str, min: u32, max: u32) -> Result<u32, ValidationError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError(format!("'{}' is not a whole number", raw.trim())))?;
    if value < min || value > max {
        return Err(ValidationError(format!(
            "the value must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Parse a real number within `[min, max]`
pub fn parse_f64_in(raw: &str, min: f64, max: f64) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError(format!("'{}' is not a number", raw.trim())))?;
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError(format!(
            "the value must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Parse a strictly positive real number
pub fn parse_positive_f64(raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError(format!("'{}' is not a number", raw.trim())))?;
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError("the value must be positive".into()));
    }
    Ok(value)
}

/// Prompt until [`parse_name`] accepts the input
pub fn name(prompt: &str) -> Result<String> {
    let theme = ColorfulTheme::default();
    loop {
        let raw: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        match parse_name(&raw) {
            Ok(value) => return Ok(value),
            Err(err) => println!("{}", style(err).red()),
        }
    }
}

/// Prompt until the input is an integer in `[min, max]`
pub fn bounded_u32(prompt: &str, min: u32, max: u32) -> Result<u32> {
    let theme = ColorfulTheme::default();
    loop {
        let raw: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()
            .into_diagnostic()?;
        match parse_u32_in(&raw, min, max) {
            Ok(value) => return Ok(value),
            Err(err) => println!("{}", style(err).red()),
        }
    }
}

/// Prompt until the input is a real number in `[min, max]`
pub fn bounded_f64(prompt: &str, min: f64, max: f64) -> Result<f64> {
    let theme = ColorfulTheme::default();
    loop {
        let raw: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()
            .into_diagnostic()?;
        match parse_f64_in(&raw, min, max) {
            Ok(value) => return Ok(value),
            Err(err) => println!("{}", style(err).red()),
        }
    }
}

/// Prompt until the input is a strictly positive real number
pub fn positive_f64(prompt: &str) -> Result<f64> {
    let theme = ColorfulTheme::default();
    loop {
        let raw: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()
            .into_diagnostic()?;
        match parse_positive_f64(&raw) {
            Ok(value) => return Ok(value),
            Err(err) => println!("{}", style(err).red()),
        }
    }
}

/// Prompt for a raw ID-list selection: IDs separated by commas, or `all`.
/// Token validation happens in the store, which knows the live IDs.
pub fn id_list(prompt: &str) -> Result<String> {
    let theme = ColorfulTheme::default();
    let raw: String = Input::with_theme(&theme)
        .with_prompt(format!("{prompt} (IDs separated by commas, or 'all')"))
        .interact_text()
        .into_diagnostic()?;
    Ok(raw)
}

/// Arrow-key selection between a fixed set of choices, returning the index
pub fn choose(prompt: &str, items: &[&str]) -> Result<usize> {
    let theme = ColorfulTheme::default();
    Select::with_theme(&theme)
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_rejects_blank_input() {
        assert!(parse_name("").is_err());
        assert!(parse_name("   ").is_err());
        assert_eq!(parse_name("  Main line ").unwrap(), "Main line");
    }

    #[test]
    fn parse_u32_in_enforces_bounds() {
        assert_eq!(parse_u32_in("5", 1, 10).unwrap(), 5);
        assert!(parse_u32_in("0", 1, 10).is_err());
        assert!(parse_u32_in("11", 1, 10).is_err());
        assert!(parse_u32_in("five", 1, 10).is_err());
        assert!(parse_u32_in("-3", 0, 10).is_err());
    }

    #[test]
    fn parse_f64_in_enforces_bounds() {
        assert_eq!(parse_f64_in("12.5", 0.0, 100.0).unwrap(), 12.5);
        assert!(parse_f64_in("100.5", 0.0, 100.0).is_err());
        assert!(parse_f64_in("NaN", 0.0, 100.0).is_err());
        assert!(parse_f64_in("abc", 0.0, 100.0).is_err());
    }

    #[test]
    fn parse_positive_f64_rejects_zero_and_below() {
        assert!(parse_positive_f64("0").is_err());
        assert!(parse_positive_f64("-1.5").is_err());
        assert_eq!(parse_positive_f64("0.001").unwrap(), 0.001);
    }
}
