//! Windows color-scheme detection

use std::process::Command;

/// Detect the Windows app theme from the registry
///
/// `AppsUseLightTheme` is `0x0` when dark mode is active. Returns
/// `None` when the value cannot be read.
pub fn prefers_dark() -> Option<bool> {
    let output = Command::new("reg")
        .args([
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .last()
        .map(|value| value.trim_start_matches("0x") == "0")
}
