//! Clipboard sessions.
//!
//! A [`Clipboard`] is opened for one invocation and released when dropped.
//! On Termux the text is piped into `termux-clipboard-set` (Termux:API);
//! elsewhere the system clipboard is reached through `arboard`.
//!
//! On Linux the X11/Wayland selection is served by this process, so a
//! system session keeps serving it for a hold period after `set_text`,
//! returning early once a clipboard manager (or another copy) takes it over.

use std::ffi::OsString;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::str::FromStr;
use std::time::Duration;

pub const TERMUX_CLIPBOARD_SET: &str = "termux-clipboard-set";

/// How long a Linux system session keeps serving the copied text.
pub const DEFAULT_HOLD: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("termux-clipboard-set not found (install the termux-api package)")]
    TermuxMissing,
    #[error("termux-clipboard-set failed: {0}")]
    TermuxIo(#[source] io::Error),
    #[error("termux-clipboard-set exited with {0}")]
    TermuxStatus(ExitStatus),
    #[cfg(not(target_os = "android"))]
    #[error("System clipboard error: {0}")]
    System(#[from] arboard::Error),
    #[error("System clipboard is not available on this platform")]
    SystemUnavailable,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid clipboard backend '{0}'. Accepted values: 'auto', 'termux', 'system'")]
pub struct BackendParseError(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Termux when `termux-clipboard-set` is on `PATH`, the system clipboard otherwise.
    #[default]
    Auto,
    Termux,
    System,
}

impl FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "termux" => Ok(Backend::Termux),
            "system" => Ok(Backend::System),
            _ => Err(BackendParseError(s.to_string())),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Auto => write!(f, "auto"),
            Backend::Termux => write!(f, "termux"),
            Backend::System => write!(f, "system"),
        }
    }
}

enum Session {
    Termux { program: OsString },
    #[cfg(not(target_os = "android"))]
    System(arboard::Clipboard),
}

pub struct Clipboard {
    session: Session,
    hold: Duration,
}

impl Clipboard {
    pub fn open(backend: Backend) -> Result<Self, ClipboardError> {
        let backend = match backend {
            Backend::Auto if termux_available() => Backend::Termux,
            Backend::Auto => Backend::System,
            other => other,
        };
        log::debug!("Opening {} clipboard", backend);

        match backend {
            Backend::Termux => Ok(Self::termux(TERMUX_CLIPBOARD_SET)),
            _ => Self::system(),
        }
    }

    fn termux(program: impl Into<OsString>) -> Self {
        Self {
            session: Session::Termux {
                program: program.into(),
            },
            hold: DEFAULT_HOLD,
        }
    }

    #[cfg(not(target_os = "android"))]
    fn system() -> Result<Self, ClipboardError> {
        Ok(Self {
            session: Session::System(arboard::Clipboard::new()?),
            hold: DEFAULT_HOLD,
        })
    }

    #[cfg(target_os = "android")]
    fn system() -> Result<Self, ClipboardError> {
        Err(ClipboardError::SystemUnavailable)
    }

    /// Sets how long a Linux system session serves the text after
    /// [`Clipboard::set_text`]. Zero returns immediately, and the text is then
    /// only kept if a clipboard manager is running. Other backends ignore it.
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match &mut self.session {
            Session::Termux { program } => pipe_to_program(program, text)?,
            #[cfg(target_os = "linux")]
            Session::System(clipboard) => set_and_hold(clipboard, text, self.hold)?,
            #[cfg(all(not(target_os = "android"), not(target_os = "linux")))]
            Session::System(clipboard) => clipboard.set_text(text)?,
        }

        log::info!("Copied {} characters to the clipboard", text.chars().count());
        Ok(())
    }
}

fn pipe_to_program(program: &OsString, text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ClipboardError::TermuxMissing,
            _ => ClipboardError::TermuxIo(e),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()) {
            // The exit status below says more than the broken pipe does.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(ClipboardError::TermuxIo(e)),
            Ok(()) => {}
        }
    }

    let status = child.wait().map_err(ClipboardError::TermuxIo)?;
    if !status.success() {
        return Err(ClipboardError::TermuxStatus(status));
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn set_and_hold(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    hold: Duration,
) -> Result<(), ClipboardError> {
    use arboard::SetExtLinux;

    if hold.is_zero() {
        log::warn!(
            "Not holding the clipboard; the text is lost on exit unless a clipboard manager runs"
        );
        clipboard.set_text(text)?;
        return Ok(());
    }

    log::info!(
        "Serving the clipboard for up to {}s (until another owner takes it)",
        hold.as_secs()
    );
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + hold)
        .text(text)?;
    Ok(())
}

fn termux_available() -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths)
                .any(|dir| is_file(&dir.join(TERMUX_CLIPBOARD_SET)))
        })
        .unwrap_or(false)
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
