//! Output ZIP archive writer.

use crate::PackError;
use crate::ProgressCallback;
use crate::Result;
use crate::error::Phase;
use crate::merge::COPY_BUFFER_SIZE;
use crate::merge::StagedFile;
use crate::merge::copy_with_buffer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Entries at or above this size need ZIP64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Returns the compression method applied to every output entry.
#[must_use]
pub const fn compression_method(use_compression: bool) -> CompressionMethod {
    if use_compression {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    }
}

/// Writes staged files into a new ZIP archive at `output`.
///
/// The compression method is chosen once for the whole archive. Any
/// existing file at `output` is replaced. Returns the number of
/// uncompressed bytes written.
///
/// # Errors
///
/// Returns `PackError::Io` (phase `WriteOutput`) if the output cannot be
/// created, a staged file cannot be read or the archive cannot be finished.
pub fn write_archive(
    output: &Path,
    files: &[StagedFile],
    use_compression: bool,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let io_err = |path: &Path, e: std::io::Error| PackError::io(Phase::WriteOutput, path, e);
    let zip_err = |e: zip::result::ZipError| {
        PackError::io(
            Phase::WriteOutput,
            output,
            std::io::Error::other(format!("failed to write ZIP archive: {e}")),
        )
    };

    let file = File::create(output).map_err(|e| io_err(output, e))?;
    let mut zip = ZipWriter::new(BufWriter::with_capacity(COPY_BUFFER_SIZE, file));
    let options =
        SimpleFileOptions::default().compression_method(compression_method(use_compression));

    let total = files.len();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes_written = 0u64;

    for (index, staged) in files.iter().enumerate() {
        let archive_path = Path::new(&staged.entry_name);
        progress.on_entry_start(archive_path, total, index + 1);

        zip.start_file(
            staged.entry_name.as_str(),
            options.large_file(staged.size >= ZIP64_THRESHOLD),
        )
        .map_err(zip_err)?;

        let mut input = File::open(&staged.path).map_err(|e| io_err(&staged.path, e))?;
        bytes_written += copy_with_buffer(&mut input, &mut zip, &mut buffer, |n| {
            progress.on_bytes_written(n);
        })
        .map_err(|e| io_err(&staged.path, e))?;

        progress.on_entry_complete(archive_path);
    }

    let writer = zip.finish().map_err(zip_err)?;
    writer
        .into_inner()
        .map_err(|e| io_err(output, e.into_error()))?
        .sync_all()
        .map_err(|e| io_err(output, e))?;

    progress.on_complete();

    tracing::debug!(
        output = %output.display(),
        entries = total,
        bytes = bytes_written,
        compressed = use_compression,
        "wrote output archive"
    );

    Ok(bytes_written)
}
