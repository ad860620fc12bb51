//! Archive merging building blocks.
//!
//! A merge is three steps over one [`StagingDir`](crate::StagingDir):
//! [`extract`] overlays source archives onto the staging tree, [`walker`]
//! lists the staged files and [`zip`] writes them into the output archive.

pub mod extract;
pub mod walker;
pub mod zip;

pub use extract::ExtractStats;
pub use extract::Source;
pub use extract::extract_into;
pub use walker::StagedFile;
pub use walker::collect_files;
pub use zip::write_archive;

use std::io::Read;
use std::io::Write;

/// Buffer size for entry copies (64 KB).
pub(crate) const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Copies `reader` into `writer` through a reusable buffer, reporting each
/// chunk to `on_chunk`.
pub(crate) fn copy_with_buffer<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut [u8],
    mut on_chunk: F,
) -> std::io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let mut total = 0u64;
    loop {
        let read = match reader.read(buffer) {
            Ok(0) => return Ok(total),
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        total += read as u64;
        on_chunk(read as u64);
    }
}
