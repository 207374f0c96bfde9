//! Local artifact output.

use std::fs;
use std::path::Path;

use tracing::info;

use cambio_common::{QuoteError, Result};

/// Write the artifact file: exactly `Dólar: <bid>`, UTF-8, no trailing
/// newline, overwritten on each run. Called only after a fully successful
/// round trip, so a failed run leaves no partial output.
pub fn write_artifact(path: &Path, bid: &str) -> Result<()> {
    fs::write(path, format!("Dólar: {}", bid))
        .map_err(|e| QuoteError::Artifact(format!("write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), bid = %bid, "Artifact written");
    Ok(())
}
