//! Zip-backed archive sink.
//!
//! Builds the container in memory over a cursor; each interior label
//! becomes an explicit directory entry and each file a deflated entry
//! under its folder path.

use super::ArchiveSink;
use crate::error::ArchiveError;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct ZipSink {
    writer: Option<ZipWriter<Cursor<Vec<u8>>>>,
    options: FileOptions,
}

impl ZipSink {
    pub fn new() -> Self {
        Self {
            writer: Some(ZipWriter::new(Cursor::new(Vec::new()))),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn writer(&mut self) -> Result<&mut ZipWriter<Cursor<Vec<u8>>>, ArchiveError> {
        self.writer.as_mut().ok_or_else(|| {
            ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "archive already finalized",
            ))
        })
    }

    fn entry_name(path: &[String], name: Option<&str>) -> String {
        let mut entry = path.join("/");
        if let Some(name) = name {
            if !entry.is_empty() {
                entry.push('/');
            }
            entry.push_str(name);
        }
        entry
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ZipSink {
    fn open_folder(&mut self, path: &[String]) -> Result<(), ArchiveError> {
        let entry = Self::entry_name(path, None);
        let options = self.options;
        self.writer()?
            .add_directory(&entry, options)
            .map_err(|source| ArchiveError::EntryWrite { entry, source })?;
        Ok(())
    }

    fn write_file(&mut self, path: &[String], name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let entry = Self::entry_name(path, Some(name));
        let options = self.options;
        let writer = self.writer()?;
        writer
            .start_file(&entry, options)
            .map_err(|source| ArchiveError::EntryWrite {
                entry: entry.clone(),
                source,
            })?;
        writer.write_all(bytes)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = self.writer.take().ok_or_else(|| {
            ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "archive already finalized",
            ))
        })?;
        let cursor = writer.finish().map_err(ArchiveError::Finalize)?;
        Ok(cursor.into_inner())
    }
}
