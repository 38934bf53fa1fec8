//! Writes results as JSON to a file or standard output.
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum OutputError {
    #[error("Cannot create {0}: {1}")]
    Create(String, io::Error),
    #[error("Serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Write failed: {0}")]
    Io(#[from] io::Error),
}

/// Opens the file at `path` for writing, or standard output if no path is given.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, OutputError> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).map_err(|e| OutputError::Create(path.display().to_string(), e))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

/// Writes `value` to `writer` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: W,
    value: &T,
) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
