//! Package I/O and validation
//!
//! A .docx file is a ZIP package; only `word/document.xml` is rewritten,
//! every other entry passes through byte-for-byte with its original order
//! preserved. The output package is assembled in memory and flushed with a
//! single filesystem write, so a failed run never leaves a partial file on
//! the output path.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::ZipArchive;

use super::error::DocError;

pub(crate) const DOCUMENT_XML: &str = "word/document.xml";

/// Pre-flight check on the input path: .docx extension, readable ZIP, and
/// a `word/document.xml` entry. Spreadsheets get their own error since an
/// .xlsx package is the usual mix-up.
pub(crate) fn validate_docx_file(path: &Path) -> Result<(), DocError> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    if extension != "docx" {
        return Err(DocError::UnsupportedExtension(extension.to_string()));
    }

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    if archive.by_name(DOCUMENT_XML).is_err() {
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(DocError::ExcelPackage);
        }
        return Err(DocError::MissingDocumentXml);
    }

    Ok(())
}

/// Read the package into an ordered list of (entry_name, bytes).
pub(crate) fn read_package(path: &Path) -> Result<Vec<(String, Vec<u8>)>, DocError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        entries.push((name, data));
    }
    Ok(entries)
}

/// Write the entries back out as a .docx package. Media entries are stored
/// uncompressed and everything else deflated, matching the layout Word
/// produces.
pub(crate) fn write_package(path: &Path, entries: &[(String, Vec<u8>)]) -> Result<(), DocError> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let stored =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, data) in entries {
        let opts = if name.starts_with("word/media/") {
            stored
        } else {
            deflated
        };
        zip.start_file(name.as_str(), opts)?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    std::fs::write(path, cursor.into_inner())?;
    Ok(())
}
