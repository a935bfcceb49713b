//! Desktop notification side-channel
//!
//! Best-effort system notification for countdown completions, so a
//! backgrounded page still gets a visible cue. Absence of the capability
//! never blocks alarm logic.

use tokio::process::Command;
use tracing::info;

use crate::timer::AlarmCue;

/// Fixed notification title.
pub const NOTIFICATION_TITLE: &str = "Flow Zone";
/// Fixed notification body.
pub const NOTIFICATION_BODY: &str = "Your timer is complete!";

/// Raise a system notification for a countdown completion.
pub async fn send_completion_notification(cue: AlarmCue) -> Result<(), String> {
    info!("Raising completion notification for {:?}", cue);

    let output = Command::new("notify-send")
        .args([NOTIFICATION_TITLE, NOTIFICATION_BODY])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    Ok(())
}
