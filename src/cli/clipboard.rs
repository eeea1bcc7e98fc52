//! Clipboard access (macOS only, through `pbcopy`)

use anyhow::Result;

#[cfg(target_os = "macos")]
pub fn copy(text: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    use anyhow::Context;

    let mut child = Command::new("pbcopy")
        .stdin(Stdio::piped())
        .spawn()
        .context("Failed to run pbcopy")?;

    child
        .stdin
        .take()
        .context("pbcopy stdin unavailable")?
        .write_all(text.as_bytes())
        .context("Failed to write to pbcopy")?;

    let status = child.wait().context("Failed to wait for pbcopy")?;
    if !status.success() {
        anyhow::bail!("pbcopy exited with {}", status);
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn copy(_text: &str) -> Result<()> {
    anyhow::bail!("clipboard copy is only supported on macOS")
}
