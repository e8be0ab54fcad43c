use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StlError>;

/// Everything that can abort a decode or encode call.
///
/// None of these are recoverable: a failed call never hands back a partially built mesh.
#[derive(Debug, Error)]
pub enum StlError {
    /// The file could not be opened for reading or created for writing.
    #[error("unable to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A binary stream ended before the header, the triangle count, or all declared facets
    /// could be read.
    #[error("unexpected end of input at byte {offset} while reading {section}")]
    Truncated { offset: u64, section: String },

    /// An ASCII line did not hold the keyword expected at this position.
    #[error("parsing error: missed {expected:?} in line {line}, found: {found:?}")]
    Grammar {
        expected: &'static str,
        found: String,
        line: usize,
    },

    #[error("STL only supports 3D points, got {dimension} components per point")]
    UnsupportedDimension { dimension: usize },

    #[error("coordinate buffer of length {len} does not hold whole points")]
    IncompletePoint { len: usize },

    /// A caller supplied coordinate could not be converted to or from `f32`.
    #[error("point component type {type_name} has no conversion for value {value}")]
    UnsupportedComponentType {
        type_name: &'static str,
        value: String,
    },

    #[error("facet {facet} references point {id}, but the mesh has {point_count} points")]
    InvalidPointId {
        facet: usize,
        id: u32,
        point_count: usize,
    },

    #[error("{count} facets do not fit in a binary STL triangle count")]
    TooManyFacets { count: usize },

    /// Every point identifier is taken, so a new point cannot be added to the mesh.
    #[error("mesh already holds {count} unique points, the most a point identifier can address")]
    TooManyPoints { count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StlError {
    /// Classifies a failed read of `section` starting at `offset`. Running out of input becomes
    /// [`StlError::Truncated`], anything else is passed through as an I/O error.
    pub(crate) fn from_read(err: io::Error, offset: u64, section: impl FnOnce() -> String) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated {
                offset,
                section: section(),
            }
        } else {
            Self::Io(err)
        }
    }

    pub(crate) fn grammar(expected: &'static str, found: &str, line: usize) -> Self {
        Self::Grammar {
            expected,
            found: found.to_string(),
            line,
        }
    }
}
