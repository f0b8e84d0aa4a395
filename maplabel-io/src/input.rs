use std::fs::File;
use std::io::Read;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use flate2::read::GzDecoder;

/// Open a path for reading, transparently decompressing it if its
/// extension is `.gz` (the same convention `original_source`'s loader
/// used for its TSV city files).
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
    if path.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}
