//! Library error type for package and markup failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("failed to read .docx package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("not a .docx file (.{0}): doctrim reads Word .docx documents, not .doc/.xlsx/.zip")]
    UnsupportedExtension(String),

    #[error("this package is an Excel workbook (.xlsx), not a Word document")]
    ExcelPackage,

    #[error("invalid .docx file: missing word/document.xml")]
    MissingDocumentXml,

    #[error("word/document.xml is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
