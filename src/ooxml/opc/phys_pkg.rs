//! Physical (ZIP) container for an OPC package.

use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;

/// Writes package items into an in-memory ZIP archive.
pub struct PhysPkgWriter {
    zip_writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            zip_writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write an item with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(pack_uri.membername(), options)?;
        self.zip_writer.write_all(blob)?;
        Ok(())
    }

    /// Write an item without compression, for already-compressed media.
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip_writer.start_file(pack_uri.membername(), options)?;
        self.zip_writer.write_all(blob)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip_writer.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
