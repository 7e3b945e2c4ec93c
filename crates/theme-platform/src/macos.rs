//! macOS color-scheme detection

use std::process::Command;

/// Detect the macOS appearance
///
/// `AppleInterfaceStyle` only exists while dark mode is active, so a
/// clean read failure means light mode. A failure to run `defaults` at
/// all means the preference is unknown.
pub fn prefers_dark() -> Option<bool> {
    match Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
    {
        Ok(output) if output.status.success() => Some(
            String::from_utf8_lossy(&output.stdout)
                .trim()
                .eq_ignore_ascii_case("dark"),
        ),
        Ok(_) => Some(false),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_dark_does_not_panic() {
        let _ = prefers_dark();
    }
}
