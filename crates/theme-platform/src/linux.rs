//! Linux color-scheme detection

use std::process::Command;

/// Detect the desktop color scheme via `gsettings`
///
/// Reads `org.gnome.desktop.interface color-scheme`, which is set by
/// GNOME and honored by most desktops implementing the freedesktop
/// settings portal. Returns `None` when the setting cannot be read.
pub fn prefers_dark() -> Option<bool> {
    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).contains("dark"))
}
