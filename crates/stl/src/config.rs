use crate::format::FileFormat;

/// Banner written into the 80-byte header of binary files.
pub const DEFAULT_HEADER: &str = "binary STL generated by stlcodec";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Forces the input to be read as this format. `None` detects it from the first line.
    pub format: Option<FileFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeConfig {
    pub format: FileFormat,
    /// Binary header text. Padded with spaces or truncated to exactly 80 bytes. Unused for
    /// ASCII output, which always starts with `solid ascii`.
    pub header: String,
}

impl EncodeConfig {
    pub fn new(format: FileFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            format: FileFormat::Binary,
            header: DEFAULT_HEADER.to_string(),
        }
    }
}
