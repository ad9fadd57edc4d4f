//! CLI output formatting and display helpers.

use anyhow::Result;
use serde::Serialize;
use social_hub_core::failure::DisplayError;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Human-readable lines for a failed command.
pub fn display_error_lines(error: &DisplayError) -> Vec<String> {
    let mut lines = vec![
        format!("Error: {}", error.title),
        format!("  {}", error.description),
    ];
    if let Some(suggestions) = &error.suggestions {
        lines.push("Suggestions:".to_string());
        lines.extend(suggestions.iter().map(|s| format!("  - {s}")));
    }
    lines
}

/// Formats a byte count with a binary unit.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_hub_core::Severity;

    #[test]
    fn test_truncate_to_width_keeps_short_text() {
        assert_eq!(truncate_to_width("rust", 10), "rust");
    }

    #[test]
    fn test_truncate_to_width_adds_ellipsis() {
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 1), "…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_display_error_lines_with_suggestions() {
        let error = DisplayError {
            title: "Invalid URL format".into(),
            description: "The URL \"x\" is not properly formatted".into(),
            suggestions: Some(vec!["Include https://".into()]),
            severity: Severity::Medium,
        };
        let lines = display_error_lines(&error);
        assert_eq!(lines[0], "Error: Invalid URL format");
        assert_eq!(lines[2], "Suggestions:");
        assert_eq!(lines[3], "  - Include https://");
    }

    #[test]
    fn test_display_error_lines_without_suggestions() {
        let error = DisplayError {
            title: "t".into(),
            description: "d".into(),
            suggestions: None,
            severity: Severity::Low,
        };
        assert_eq!(display_error_lines(&error).len(), 2);
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
