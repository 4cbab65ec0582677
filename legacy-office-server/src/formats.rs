//! Fixed format tables: legacy extension → modern extension → converter filter.

use std::path::Path;

use strum::{EnumIter, IntoEnumIterator};

/// A legacy Office format accepted by `POST /convert`.
///
/// Declaration order is the order in which supported formats are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LegacyFormat {
    Doc,
    Xls,
    Ppt,
}

impl LegacyFormat {
    /// Extension of the uploaded file, including the leading dot.
    pub fn legacy_extension(self) -> &'static str {
        match self {
            LegacyFormat::Doc => ".doc",
            LegacyFormat::Xls => ".xls",
            LegacyFormat::Ppt => ".ppt",
        }
    }

    /// Extension of the converted file, including the leading dot.
    pub fn modern_extension(self) -> &'static str {
        match self {
            LegacyFormat::Doc => ".docx",
            LegacyFormat::Xls => ".xlsx",
            LegacyFormat::Ppt => ".pptx",
        }
    }

    /// Format identifier passed to `--convert-to`.
    pub fn filter(self) -> &'static str {
        filter_for(self.modern_extension()).unwrap_or_default()
    }

    /// Case-insensitive lookup of a `.ext` string.
    pub fn from_extension(ext: &str) -> Option<Self> {
        LegacyFormat::iter().find(|f| f.legacy_extension().eq_ignore_ascii_case(ext))
    }

    /// Resolve the format from an uploaded file name. `None` when the name has
    /// no extension or an unsupported one.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?;
        Self::from_extension(&format!(".{ext}"))
    }
}

/// Modern extension → converter filter identifier.
fn filter_for(modern_extension: &str) -> Option<&'static str> {
    match modern_extension {
        ".docx" => Some("docx"),
        ".xlsx" => Some("xlsx"),
        ".pptx" => Some("pptx"),
        _ => None,
    }
}

/// Every supported legacy extension, in table order.
pub fn supported_extensions() -> Vec<&'static str> {
    LegacyFormat::iter().map(LegacyFormat::legacy_extension).collect()
}

/// Name of the file returned to the caller: the uploaded name without its
/// extension, followed by the modern extension.
pub fn response_file_name(uploaded: &str, format: LegacyFormat) -> String {
    let stem = Path::new(uploaded)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{}", format.modern_extension())
}
