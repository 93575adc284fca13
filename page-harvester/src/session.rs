use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::{debug, warn};
use trendscope_core::BrowserError;

/// A controllable rendering surface: something that can load a page, scroll it
/// and hand back the markup it currently shows.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Blocks until an element matching `selector` exists or `timeout` elapses.
    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Scrolls the viewport vertically by `delta_y` pixels.
    fn scroll_by(&mut self, delta_y: i64) -> Result<(), BrowserError>;

    /// Full markup of the currently rendered document.
    fn page_source(&mut self) -> Result<String, BrowserError>;

    fn close(&mut self) -> Result<(), BrowserError>;
}

/// Opens fresh browser sessions.
pub trait SessionLauncher {
    type Session: BrowserSession;

    fn launch(&self, headless: bool) -> Result<Self::Session, BrowserError>;
}

/// Owns a session and closes it exactly once: either through [`SessionGuard::close`]
/// or, on any other exit path including unwinding, when dropped.
pub struct SessionGuard<S: BrowserSession> {
    session: S,
    closed: bool,
}

impl<S: BrowserSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    pub fn close(mut self) -> Result<(), BrowserError> {
        self.closed = true;
        debug!("Closing browser session");
        self.session.close()
    }
}

impl<S: BrowserSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: BrowserSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!("Closing browser session on early exit");
        if let Err(e) = self.session.close() {
            warn!("Failed to close browser session: {}", e);
        }
    }
}
