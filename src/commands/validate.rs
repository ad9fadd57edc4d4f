//! Validate and placeholder command handlers.

use anyhow::Result;
use serde_json::json;
use social_hub_core::validator::{Platform, platform_placeholder, validate};

use crate::output;

pub fn run_validate_command(url: &str, platform: Option<&str>, json: bool) -> Result<()> {
    let result = validate(url, platform);
    if json {
        output::print_json(&result)?;
    }

    let valid = result
        .into_result()
        .map_err(|rejection| rejection.to_app_error(url))?;
    if !json {
        println!("valid = true");
        println!("platform = {}", valid.platform.map_or("none", Platform::name));
        println!("normalized_url = {}", valid.normalized_url);
    }
    Ok(())
}

pub fn run_placeholder_command(key: &str, json: bool) -> Result<()> {
    let placeholder = platform_placeholder(key);
    if json {
        output::print_json(&json!({ "key": key, "placeholder": placeholder }))?;
    } else {
        println!("{placeholder}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_hub_core::{AppError, ErrorKind};

    #[test]
    fn test_validate_command_accepts_valid_url() {
        assert!(run_validate_command("youtube.com/@rustlang", Some("youtube"), false).is_ok());
    }

    #[test]
    fn test_validate_command_returns_app_error() {
        let err = run_validate_command("https://x.com/rust", Some("youtube"), true).unwrap_err();
        let app_error = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code(), ErrorKind::UrlPlatformMismatch);
    }

    #[test]
    fn test_placeholder_command_unknown_key() {
        assert!(run_placeholder_command("myspace", false).is_ok());
    }
}
