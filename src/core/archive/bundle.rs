//! Gzip-compressed tar bundle of a backup's artifacts.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;
use tar::{Archive, Builder};

use crate::error::Result;

/// Write `entries` (source path, name inside the archive) to a `.tar.gz`
pub fn write_bundle(bundle_path: &Path, entries: &[(&Path, &str)]) -> Result<()> {
    let file = File::create(bundle_path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = Builder::new(encoder);

    for (source, name) in entries {
        builder.append_path_with_name(source, name)?;
    }

    // finish the tar stream, then the gzip trailer
    let encoder = builder.into_inner()?;
    let mut writer = encoder.finish()?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}

/// Entry names and their contents, in archive order
pub fn bundle_contents(bundle_path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = Archive::new(GzDecoder::new(File::open(bundle_path)?));
    let mut out = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        out.push((name, data));
    }
    Ok(out)
}
