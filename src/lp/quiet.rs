//! CBC prints progress chatter straight to stdout; silence it while a solve
//! is running. The gag crate permits one redirection per stream per process,
//! so concurrent solves must share a single handle.

use gag::Gag;
use std::sync::{Arc, Mutex, Weak};

static STDOUT_SLOT: Mutex<Weak<Gag>> = Mutex::new(Weak::new());

/// Shared stdout suppression handle. Output stays silenced until the last
/// handle is dropped.
pub struct Silencer {
    _gag: Arc<Gag>,
}

impl Silencer {
    pub fn stdout() -> std::io::Result<Self> {
        let mut slot = STDOUT_SLOT.lock().unwrap();
        if let Some(gag) = slot.upgrade() {
            return Ok(Self { _gag: gag });
        }
        let gag = Arc::new(Gag::stdout()?);
        *slot = Arc::downgrade(&gag);
        Ok(Self { _gag: gag })
    }
}
