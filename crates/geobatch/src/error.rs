//! Boundary error type.

use std::fmt;

/// Failures surfaced by the batched operations.
///
/// Engine exceptions carry no text here; the engine's diagnostic message (if
/// any) arrives separately through an [`ErrorRelay`](crate::relay::ErrorRelay).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarshalError {
    /// The engine signalled an exception (or a shim stood in for a missing
    /// entry point) during `op`.
    Engine { op: &'static str },
    /// A flat buffer does not hold exactly `size * dims` values.
    BufferLength { expected: usize, actual: usize },
    /// Coordinate arity outside {2, 3, 4}.
    InvalidDims { dims: usize },
    /// Engine version string that could not be parsed.
    InvalidVersion { text: String },
}

impl MarshalError {
    /// True for failures reported by the engine (or by a shim).
    pub fn is_engine(&self) -> bool {
        matches!(self, Self::Engine { .. })
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine { op } => write!(f, "engine exception during {op}"),
            Self::BufferLength { expected, actual } => write!(
                f,
                "flat buffer holds {actual} values, expected size*dims = {expected}"
            ),
            Self::InvalidDims { dims } => {
                write!(f, "coordinate dimension {dims} is not one of 2, 3, 4")
            }
            Self::InvalidVersion { text } => write!(f, "unrecognized engine version {text:?}"),
        }
    }
}

impl std::error::Error for MarshalError {}

/// Maps the engine's `None` sentinel to [`MarshalError::Engine`].
pub(crate) trait OrEngine<T> {
    fn or_engine(self, op: &'static str) -> Result<T, MarshalError>;
}

impl<T> OrEngine<T> for Option<T> {
    #[inline]
    fn or_engine(self, op: &'static str) -> Result<T, MarshalError> {
        self.ok_or(MarshalError::Engine { op })
    }
}
