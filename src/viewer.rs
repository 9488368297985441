//! Opening documents in the host's default viewer

use std::path::Path;
use std::process::Command;
use std::thread;
use tracing::debug;
use crate::error::{Error, Result};

/// Something that can show a document to the operator
pub trait Launcher {
    /// Open `path`; failures are reported, never fatal to the caller
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Opens files with the system default application
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        debug!("Opening {} in default viewer", path.display());
        spawn_detached(viewer_command(path)).map_err(|e| Error::Launch {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Start `command` without blocking and reap it once it exits
fn spawn_detached(mut command: Command) -> std::io::Result<()> {
    let mut child = command.spawn()?;
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            debug!("Viewer process wait failed: {}", e);
        }
    });
    Ok(())
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

/// Launcher that opens nothing, for unattended runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLauncher;

impl Launcher for NoopLauncher {
    fn launch(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
