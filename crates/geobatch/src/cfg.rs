//! Engine version gates.
//!
//! Policy
//! - Gates are fixed constants; the capability table reads them once when it
//!   is resolved and call sites never compare versions themselves.

use crate::engine::EngineVersion;

/// Oldest engine version the batched operations are written against.
pub const MIN_SUPPORTED: EngineVersion = EngineVersion::new(3, 8, 0);
/// Bulk buffer copy for coordinate sequences, precision-aware overlay,
/// densify, Fréchet distance, GeoJSON I/O and parameterized make-valid.
pub const BULK_COPY_SINCE: EngineVersion = EngineVersion::new(3, 10, 0);
/// Ratio-based concave hull.
pub const CONCAVE_HULL_SINCE: EngineVersion = EngineVersion::new(3, 11, 0);
/// Length-based concave hull and prepared XY predicates.
pub const PREPARED_XY_SINCE: EngineVersion = EngineVersion::new(3, 12, 0);
