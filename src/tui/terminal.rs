use std::io;

use crossterm::cursor;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

/// Runs its restore action when dropped, including on an early `?` return.
pub struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Guard returned by [`enter`].
pub type TerminalSession = RestoreGuard<fn()>;

/// Switch stdout into raw mode on the alternate screen.
///
/// The terminal is put back when the returned session is dropped. If entering
/// the alternate screen fails, raw mode is already undone on return.
pub fn enter() -> io::Result<TerminalSession> {
    enable_raw_mode()?;
    let session = RestoreGuard::new(restore as fn());
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(session)
}

/// Best-effort terminal restore. Also safe to call from a panic hook.
pub fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn draw() -> io::Result<()> {
        Err(io::Error::other("draw failed"))
    }

    fn failing_draw(restored: &Cell<u32>) -> io::Result<()> {
        let _guard = RestoreGuard::new(|| restored.set(restored.get() + 1));
        draw()?;
        Ok(())
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        let restored = Cell::new(0);
        assert!(failing_draw(&restored).is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_guard_restores_once_on_normal_exit() {
        let restored = Cell::new(0);
        {
            let _guard = RestoreGuard::new(|| restored.set(restored.get() + 1));
            assert_eq!(restored.get(), 0);
        }
        assert_eq!(restored.get(), 1);
    }
}
