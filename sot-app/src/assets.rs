//! Loads the catalog and the optional font off the UI thread, bounded by a timeout.

use sot_core::{Catalog, Error, Result};
use sot_render::FontVec;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Assets {
    pub catalog: Catalog,
    pub font: Option<FontVec>,
}

pub fn read_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

fn load_now(catalog: Option<PathBuf>, font: Option<PathBuf>) -> Result<Assets> {
    let catalog = match catalog {
        Some(path) => {
            debug!(path = %path.display(), "loading catalog");
            Catalog::load(&path)?
        }
        None => Catalog::standard(),
    };
    if let Err(e) = catalog.validate() {
        warn!("catalog has broken trials, they will be skipped: {e}");
    }

    let font = match font {
        Some(path) => Some(read_font(&path)?),
        None => {
            warn!("no --font given; screens will show shapes only");
            None
        }
    };
    Ok(Assets { catalog, font })
}

/// Runs `loader` on a worker thread and waits at most `timeout` for it.
pub fn load_with<F>(loader: F, timeout: Duration) -> Result<Assets>
where
    F: FnOnce() -> Result<Assets> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // the receiver is gone once we have timed out
        let _ = tx.send(loader());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::AssetLoadTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(Error::Io("asset loader exited without a result".into()))
        }
    }
}

pub fn load(catalog: Option<PathBuf>, font: Option<PathBuf>, timeout: Duration) -> Result<Assets> {
    let assets = load_with(move || load_now(catalog, font), timeout)?;
    info!(
        objects = assets.catalog.objects.len(),
        practice = assets.catalog.practice_trials.len(),
        test = assets.catalog.test_trials.len(),
        font = assets.font.is_some(),
        "assets loaded"
    );
    Ok(assets)
}
