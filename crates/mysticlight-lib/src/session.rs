//! SDK session: one `MLAPI_Initialize` / `MLAPI_Release` pair per run.

use crate::sdk::{LightingSdk, Result};

/// An initialized SDK.
///
/// [`Session::close`] releases explicitly and reports failure. A session
/// dropped without `close` (early return on an error) still releases, and
/// only logs if that fails.
pub struct Session<'a, S: LightingSdk> {
    sdk: &'a S,
    open: bool,
}

impl<'a, S: LightingSdk> Session<'a, S> {
    pub fn open(sdk: &'a S) -> Result<Self> {
        sdk.initialize()?;
        log::debug!("SDK initialized");
        Ok(Session { sdk, open: true })
    }

    pub fn sdk(&self) -> &'a S {
        self.sdk
    }

    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.sdk.release()?;
        log::debug!("SDK released");
        Ok(())
    }
}

impl<S: LightingSdk> Drop for Session<'_, S> {
    fn drop(&mut self) {
        if self.open
            && let Err(e) = self.sdk.release()
        {
            log::warn!("SDK release failed: {e}");
        }
    }
}
