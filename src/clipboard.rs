use std::io::Write;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Program and arguments that accept clipboard contents on stdin.
/// pbcopy on macOS, wl-copy on Wayland, xclip elsewhere.
fn clipboard_command(session_type: &str) -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("pbcopy", &[])
    } else if session_type == "wayland" {
        ("wl-copy", &[])
    } else {
        ("xclip", &["-selection", "clipboard"])
    }
}

/// Pipe `text` into the child's stdin, then reap it. The child is waited on
/// even when the write fails, so a broken pipe leaves no zombie behind.
fn feed_and_wait(child: &mut Child, text: &str) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    Ok(status)
}

/// Write text to the system clipboard. There is no read side.
pub fn copy_to_clipboard(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let session_type = std::env::var("XDG_SESSION_TYPE").unwrap_or_default();
    let (cmd, args) = clipboard_command(&session_type);

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("Failed to spawn {cmd}: {e}"))?;

    let status = feed_and_wait(&mut child, text)?;
    if !status.success() {
        return Err(format!("{cmd} exited with status {status}").into());
    }

    log::debug!("Copied {} bytes via {cmd}", text.len());
    Ok(())
}
