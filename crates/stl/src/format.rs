use std::{fmt, path::Path};

use crate::binary::PREAMBLE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Ascii,
    Binary,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Ascii => f.write_str("ascii"),
            FileFormat::Binary => f.write_str("binary"),
        }
    }
}

/// Guesses the format of a file from its first bytes.
///
/// A file is ASCII when its first line contains `solid`, binary otherwise. This is only a
/// heuristic: a binary file whose free-form header happens to contain `solid` is reported as
/// ASCII. Callers that know better should force the format through
/// [`crate::DecodeConfig::format`].
pub fn detect_format(header: &[u8]) -> FileFormat {
    let first_line = header.split(|&b| b == b'\n').next().unwrap_or_default();
    if String::from_utf8_lossy(first_line).contains("solid") {
        FileFormat::Ascii
    } else {
        FileFormat::Binary
    }
}

/// Returns true if `sniff`, the first bytes of a file, could start an STL file this crate can
/// read: either an ASCII header line or a complete binary preamble.
pub fn can_decode(sniff: &[u8]) -> bool {
    detect_format(sniff) == FileFormat::Ascii || sniff.len() >= PREAMBLE_SIZE
}

/// Returns true for paths ending in `.stl` or `.STL`.
pub fn is_stl_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().and_then(|e| e.to_str()),
        Some("stl" | "STL")
    )
}
