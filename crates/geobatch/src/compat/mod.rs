//! Version-gated entry points behind one resolved table.
//!
//! Purpose
//! - Keep call sites free of version checks: `Capabilities` and `EntryPoints`
//!   are resolved once from the handle's reported version.
//! - For each entry point newer than the handle, the table holds a shim with
//!   the same signature that returns the failure sentinel and never calls the
//!   engine. Callers see the same `MarshalError::Engine` as for a genuine
//!   failure.
//!
//! References
//! - Code cross-refs: `crate::cfg` (gates), `crate::engine::Extensions`,
//!   `crate::codec::CopyStrategy`

mod shims;
mod table;

pub use crate::engine::MakeValidMethod;
pub use table::EntryPoints;

use crate::cfg::{BULK_COPY_SINCE, CONCAVE_HULL_SINCE, MIN_SUPPORTED, PREPARED_XY_SINCE};
use crate::codec::CopyStrategy;
use crate::engine::{Engine, EngineVersion};

/// Gated entry points and the version that introduced each.
pub const GATED: &[(&str, EngineVersion)] = &[
    ("densify", BULK_COPY_SINCE),
    ("difference_prec", BULK_COPY_SINCE),
    ("intersection_prec", BULK_COPY_SINCE),
    ("maximum_inscribed_circle", BULK_COPY_SINCE),
    ("distance_within", BULK_COPY_SINCE),
    ("frechet_distance", BULK_COPY_SINCE),
    ("frechet_distance_densify", BULK_COPY_SINCE),
    ("geojson_reader_create", BULK_COPY_SINCE),
    ("geojson_reader_destroy", BULK_COPY_SINCE),
    ("geojson_reader_read", BULK_COPY_SINCE),
    ("geojson_writer_create", BULK_COPY_SINCE),
    ("geojson_writer_destroy", BULK_COPY_SINCE),
    ("geojson_writer_write", BULK_COPY_SINCE),
    ("make_valid_params_create", BULK_COPY_SINCE),
    ("make_valid_params_destroy", BULK_COPY_SINCE),
    ("make_valid_params_set_keep_collapsed", BULK_COPY_SINCE),
    ("make_valid_params_set_method", BULK_COPY_SINCE),
    ("make_valid_with_params", BULK_COPY_SINCE),
    ("concave_hull", CONCAVE_HULL_SINCE),
    ("concave_hull_by_length", PREPARED_XY_SINCE),
    ("prepared_contains_xy", PREPARED_XY_SINCE),
    ("prepared_intersects_xy", PREPARED_XY_SINCE),
];

/// What a handle of a given version offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub version: EngineVersion,
    pub copy: CopyStrategy,
}

impl Capabilities {
    pub fn for_version(version: EngineVersion) -> Self {
        Self {
            version,
            copy: CopyStrategy::for_version(version),
        }
    }

    /// Resolve from the handle's reported version.
    pub fn detect<E: Engine>(ctx: &E) -> Self {
        let caps = Self::for_version(ctx.version());
        if !caps.is_supported() {
            tracing::warn!(
                version = %caps.version,
                min = %MIN_SUPPORTED,
                "engine is older than the oldest supported version"
            );
        }
        tracing::debug!(
            version = %caps.version,
            copy = ?caps.copy,
            shimmed = caps.shimmed().len(),
            "resolved engine capabilities"
        );
        caps
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.version.at_least(MIN_SUPPORTED)
    }

    /// True if `entry` is served by the engine. Entry points outside
    /// [`GATED`] exist in every supported version.
    pub fn provides(&self, entry: &str) -> bool {
        GATED
            .iter()
            .find(|(name, _)| *name == entry)
            .map_or(true, |(_, since)| self.version.at_least(*since))
    }

    /// Gated entry points served by a shim, in [`GATED`] order.
    pub fn shimmed(&self) -> Vec<&'static str> {
        GATED
            .iter()
            .filter(|(_, since)| !self.version.at_least(*since))
            .map(|(name, _)| *name)
            .collect()
    }
}
