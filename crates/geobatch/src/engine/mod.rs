//! Engine contract (handle-based, re-entrant).
//!
//! The native engine is reached only through a handle. Here the handle is any
//! value implementing [`Engine`]; every batched operation borrows it and never
//! creates or destroys it.
//!
//! Conventions
//! - `None` means the engine signalled an exception (the 0/NULL/2 sentinels of
//!   a C API). Callers in this crate map it to `MarshalError` at the boundary.
//! - Read-only geometry parameters are borrowed; children come back borrowed
//!   from their parent, so they can never be destroyed independently.
//! - Constructors consume their inputs. On failure the inputs are handed back
//!   (`Err(..)`) and stay owned by the caller, who must release them.
//!
//! References
//! - Code cross-refs: `memory::MemoryEngine`, `crate::compat::EntryPoints`

use std::fmt;

use crate::error::MarshalError;

pub mod memory;

/// Host callback receiving engine diagnostics.
pub type MessageSink = Box<dyn Fn(&str)>;

/// Inputs returned by a failed polygon construction: shell, then holes.
pub type Rejected<G> = (G, Vec<G>);

/// Engine version triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    #[inline]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse an engine version string such as `"3.12.1-CAPI-1.18.1"` or
    /// `"3.13.0dev"`. Major and minor are required; patch defaults to 0.
    pub fn parse(text: &str) -> Result<Self, MarshalError> {
        let invalid = || MarshalError::InvalidVersion {
            text: text.to_string(),
        };
        let core = text
            .trim()
            .split(|c: char| c == '-' || c == ' ')
            .next()
            .unwrap_or("");
        let mut parts = core.split('.');
        let major = parts.next().and_then(leading_number).ok_or_else(invalid)?;
        let minor = parts.next().and_then(leading_number).ok_or_else(invalid)?;
        let patch = match parts.next() {
            Some(p) => leading_number(p).ok_or_else(invalid)?,
            None => 0,
        };
        Ok(Self::new(major, minor, patch))
    }

    #[inline]
    pub fn at_least(&self, other: EngineVersion) -> bool {
        *self >= other
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Closed set of geometry variants the batched traversals understand.
///
/// Raw ids follow the engine's numbering; ids outside this set (curved types
/// in newer engines) have no tag and are skipped by traversals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl TypeTag {
    pub const ALL: [TypeTag; 8] = [
        TypeTag::Point,
        TypeTag::LineString,
        TypeTag::LinearRing,
        TypeTag::Polygon,
        TypeTag::MultiPoint,
        TypeTag::MultiLineString,
        TypeTag::MultiPolygon,
        TypeTag::GeometryCollection,
    ];

    #[inline]
    pub fn raw(self) -> i32 {
        match self {
            TypeTag::Point => 0,
            TypeTag::LineString => 1,
            TypeTag::LinearRing => 2,
            TypeTag::Polygon => 3,
            TypeTag::MultiPoint => 4,
            TypeTag::MultiLineString => 5,
            TypeTag::MultiPolygon => 6,
            TypeTag::GeometryCollection => 7,
        }
    }

    #[inline]
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.raw() == raw)
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Point => "Point",
            TypeTag::LineString => "LineString",
            TypeTag::LinearRing => "LinearRing",
            TypeTag::Polygon => "Polygon",
            TypeTag::MultiPoint => "MultiPoint",
            TypeTag::MultiLineString => "MultiLineString",
            TypeTag::MultiPolygon => "MultiPolygon",
            TypeTag::GeometryCollection => "GeometryCollection",
        }
    }
}

/// Repair strategy for parameterized make-valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MakeValidMethod {
    Linework,
    Structure,
}

/// Per-primitive engine API available in every supported version.
pub trait Engine {
    /// Engine-owned geometry.
    type Geom;
    /// Engine-owned coordinate sequence of fixed arity.
    type CoordSeq;

    fn version(&self) -> EngineVersion;
    /// Install (or clear) the diagnostic message handler.
    fn set_message_handler(&mut self, handler: Option<MessageSink>);

    // Geometry queries.
    fn is_empty(&self, g: &Self::Geom) -> Option<bool>;
    fn type_id(&self, g: &Self::Geom) -> Option<i32>;
    fn num_geometries(&self, g: &Self::Geom) -> Option<usize>;
    fn num_points(&self, g: &Self::Geom) -> Option<usize>;
    fn num_interior_rings(&self, g: &Self::Geom) -> Option<usize>;
    fn point_x(&self, g: &Self::Geom) -> Option<f64>;
    fn point_y(&self, g: &Self::Geom) -> Option<f64>;
    fn coord_seq<'g>(&self, g: &'g Self::Geom) -> Option<&'g Self::CoordSeq>;
    fn exterior_ring<'g>(&self, g: &'g Self::Geom) -> Option<&'g Self::Geom>;
    fn interior_ring_n<'g>(&self, g: &'g Self::Geom, n: usize) -> Option<&'g Self::Geom>;
    fn geometry_n<'g>(&self, g: &'g Self::Geom, n: usize) -> Option<&'g Self::Geom>;
    fn user_data(&self, g: &Self::Geom) -> usize;
    fn set_user_data(&self, g: &mut Self::Geom, data: usize);

    // Coordinate sequences.
    fn seq_create(&self, size: usize, dims: usize) -> Option<Self::CoordSeq>;
    fn seq_destroy(&self, s: Self::CoordSeq);
    fn seq_size(&self, s: &Self::CoordSeq) -> Option<usize>;
    fn seq_dims(&self, s: &Self::CoordSeq) -> Option<usize>;
    fn seq_x(&self, s: &Self::CoordSeq, idx: usize) -> Option<f64>;
    fn seq_y(&self, s: &Self::CoordSeq, idx: usize) -> Option<f64>;
    fn seq_ordinate(&self, s: &Self::CoordSeq, idx: usize, dim: usize) -> Option<f64>;
    fn seq_set_x(&self, s: &mut Self::CoordSeq, idx: usize, v: f64) -> Option<()>;
    fn seq_set_y(&self, s: &mut Self::CoordSeq, idx: usize, v: f64) -> Option<()>;
    fn seq_set_ordinate(&self, s: &mut Self::CoordSeq, idx: usize, dim: usize, v: f64)
        -> Option<()>;
    /// Bulk copy out; `out` holds `size * (2 + has_z + has_m)` values.
    fn seq_copy_to_buffer(
        &self,
        s: &Self::CoordSeq,
        out: &mut [f64],
        has_z: bool,
        has_m: bool,
    ) -> Option<()>;
    /// Bulk copy in; allocates a new sequence of `size` tuples.
    fn seq_copy_from_buffer(
        &self,
        buf: &[f64],
        size: usize,
        has_z: bool,
        has_m: bool,
    ) -> Option<Self::CoordSeq>;

    // Construction and release.
    fn create_empty_point(&self) -> Option<Self::Geom>;
    fn create_point(&self, s: Self::CoordSeq) -> Result<Self::Geom, Self::CoordSeq>;
    fn create_linear_ring(&self, s: Self::CoordSeq) -> Result<Self::Geom, Self::CoordSeq>;
    fn create_polygon(
        &self,
        shell: Self::Geom,
        holes: Vec<Self::Geom>,
    ) -> Result<Self::Geom, Rejected<Self::Geom>>;
    fn geom_destroy(&self, g: Self::Geom);
}

/// Entry points introduced after [`crate::cfg::MIN_SUPPORTED`].
///
/// Only reached through [`crate::compat::EntryPoints`], which substitutes a
/// shim when the handle reports an older version.
pub trait Extensions: Engine {
    type Prepared;
    type GeoJsonReader;
    type GeoJsonWriter;
    type MakeValidParams;

    fn densify(&self, g: &Self::Geom, tolerance: f64) -> Option<Self::Geom>;
    fn difference_prec(&self, a: &Self::Geom, b: &Self::Geom, grid_size: f64)
        -> Option<Self::Geom>;
    fn intersection_prec(
        &self,
        a: &Self::Geom,
        b: &Self::Geom,
        grid_size: f64,
    ) -> Option<Self::Geom>;
    fn distance_within(&self, a: &Self::Geom, b: &Self::Geom, dist: f64) -> Option<bool>;
    fn frechet_distance(&self, a: &Self::Geom, b: &Self::Geom) -> Option<f64>;
    fn frechet_distance_densify(
        &self,
        a: &Self::Geom,
        b: &Self::Geom,
        densify_frac: f64,
    ) -> Option<f64>;
    fn maximum_inscribed_circle(&self, g: &Self::Geom, tolerance: f64) -> Option<Self::Geom>;

    fn geojson_reader_create(&self) -> Option<Self::GeoJsonReader>;
    fn geojson_reader_destroy(&self, r: Self::GeoJsonReader);
    fn geojson_reader_read(&self, r: &Self::GeoJsonReader, geojson: &str) -> Option<Self::Geom>;
    fn geojson_writer_create(&self) -> Option<Self::GeoJsonWriter>;
    fn geojson_writer_destroy(&self, w: Self::GeoJsonWriter);
    fn geojson_writer_write(
        &self,
        w: &Self::GeoJsonWriter,
        g: &Self::Geom,
        indent: i32,
    ) -> Option<String>;

    fn make_valid_params_create(&self) -> Option<Self::MakeValidParams>;
    fn make_valid_params_destroy(&self, p: Self::MakeValidParams);
    fn make_valid_params_set_keep_collapsed(
        &self,
        p: &mut Self::MakeValidParams,
        keep: bool,
    ) -> Option<()>;
    fn make_valid_params_set_method(
        &self,
        p: &mut Self::MakeValidParams,
        method: MakeValidMethod,
    ) -> Option<()>;
    fn make_valid_with_params(
        &self,
        g: &Self::Geom,
        p: &Self::MakeValidParams,
    ) -> Option<Self::Geom>;

    fn concave_hull(&self, g: &Self::Geom, ratio: f64, allow_holes: bool) -> Option<Self::Geom>;
    fn concave_hull_by_length(
        &self,
        g: &Self::Geom,
        length: f64,
        allow_holes: bool,
    ) -> Option<Self::Geom>;

    fn prepare(&self, g: &Self::Geom) -> Option<Self::Prepared>;
    fn prepared_destroy(&self, p: Self::Prepared);
    fn prepared_contains_xy(&self, p: &Self::Prepared, x: f64, y: f64) -> Option<bool>;
    fn prepared_intersects_xy(&self, p: &Self::Prepared, x: f64, y: f64) -> Option<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parse_capi_string() {
        let v = EngineVersion::parse("3.12.1-CAPI-1.18.1").unwrap();
        assert_eq!(v, EngineVersion::new(3, 12, 1));
        let dev = EngineVersion::parse("3.13.0dev").unwrap();
        assert_eq!(dev, EngineVersion::new(3, 13, 0));
        let short = EngineVersion::parse("3.9").unwrap();
        assert_eq!(short, EngineVersion::new(3, 9, 0));
        assert!(matches!(
            EngineVersion::parse("geos"),
            Err(MarshalError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn version_ordering_is_lexicographic() {
        assert!(EngineVersion::new(3, 10, 0).at_least(EngineVersion::new(3, 9, 7)));
        assert!(!EngineVersion::new(2, 99, 0).at_least(EngineVersion::new(3, 0, 0)));
        assert_eq!(EngineVersion::new(3, 11, 2).to_string(), "3.11.2");
    }

    #[test]
    fn type_tag_raw_ids_round_trip() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_raw(tag.raw()), Some(tag));
        }
        assert_eq!(TypeTag::from_raw(8), None);
        assert_eq!(TypeTag::from_raw(-1), None);
    }
}
