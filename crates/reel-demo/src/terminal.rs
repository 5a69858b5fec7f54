#![forbid(unsafe_code)]

//! RAII terminal setup for the demo host.
//!
//! [`TerminalGuard::enter`] switches to raw mode, the alternate screen and
//! mouse capture; dropping the guard undoes each step in reverse order, on
//! every exit path including `?` returns. A panic hook performs the same
//! restore for builds that abort instead of unwinding. Cleanup errors are
//! ignored since the terminal may already be gone.

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::{cursor, event, execute, terminal};

#[derive(Debug)]
pub struct TerminalGuard {
    alternate_screen: bool,
    mouse_capture: bool,
}

impl TerminalGuard {
    /// Enter raw mode, then the alternate screen, then mouse capture.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or the setup sequences
    /// cannot be written.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        tracing::info!(target: "reel.demo", "terminal raw mode enabled");

        let mut guard = Self {
            alternate_screen: false,
            mouse_capture: false,
        };
        let mut stdout = io::stdout();

        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;
        guard.alternate_screen = true;

        execute!(stdout, event::EnableMouseCapture)?;
        guard.mouse_capture = true;
        tracing::info!(target: "reel.demo", "mouse capture enabled");

        Ok(guard)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.mouse_capture {
            let _ = execute!(stdout, event::DisableMouseCapture);
            self.mouse_capture = false;
        }

        let _ = execute!(stdout, cursor::Show);

        if self.alternate_screen {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }

        // Exit raw mode last
        let _ = terminal::disable_raw_mode();
        tracing::info!(target: "reel.demo", "terminal restored");
        let _ = stdout.flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, event::DisableMouseCapture);
    let _ = execute!(stdout, cursor::Show);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
