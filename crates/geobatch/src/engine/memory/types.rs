//! Storage types of the in-process engine.
//!
//! - `MemSeq`: tuple-major ordinates with a fixed arity.
//! - `MemGeom`: geometry tree; rings and children are owned inline.
//! - `Shape`: serde description used to load fixtures and CLI input.
//!
//! Neither `MemSeq` nor `MemGeom` is `Clone`: every value is created through the
//! engine so the engine can account for it.

use serde::{Deserialize, Serialize};

use crate::engine::TypeTag;

/// Coordinate sequence owned by [`super::MemoryEngine`].
#[derive(Debug, PartialEq)]
pub struct MemSeq {
    pub(super) dims: usize,
    pub(super) coords: Vec<f64>,
}

impl MemSeq {
    pub(super) fn zeroed(size: usize, dims: usize) -> Self {
        Self {
            dims,
            coords: vec![0.0; size * dims],
        }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    #[inline]
    pub fn size(&self) -> usize {
        if self.dims == 0 {
            0
        } else {
            self.coords.len() / self.dims
        }
    }

    /// Flat, tuple-major view of the ordinates.
    #[inline]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub(super) fn tuple(&self, idx: usize) -> &[f64] {
        &self.coords[idx * self.dims..(idx + 1) * self.dims]
    }

    pub(super) fn is_closed(&self) -> bool {
        let n = self.size();
        n > 0 && self.tuple(0)[..2] == self.tuple(n - 1)[..2]
    }
}

/// Geometry owned by [`super::MemoryEngine`].
#[derive(Debug)]
pub struct MemGeom {
    pub(super) kind: GeomKind,
    pub(super) user_data: usize,
}

#[derive(Debug)]
pub(super) enum GeomKind {
    /// An empty point holds an empty sequence.
    Point(MemSeq),
    LineString(MemSeq),
    LinearRing(MemSeq),
    /// An empty polygon holds an empty shell ring.
    Polygon {
        shell: Box<MemGeom>,
        holes: Vec<MemGeom>,
    },
    Collection {
        tag: TypeTag,
        children: Vec<MemGeom>,
    },
    /// A variant outside [`TypeTag`] (e.g. a curved type of a newer engine).
    Other { raw: i32 },
}

impl MemGeom {
    pub(super) fn new(kind: GeomKind) -> Self {
        Self { kind, user_data: 0 }
    }

    pub(super) fn raw_type(&self) -> i32 {
        match &self.kind {
            GeomKind::Point(_) => TypeTag::Point.raw(),
            GeomKind::LineString(_) => TypeTag::LineString.raw(),
            GeomKind::LinearRing(_) => TypeTag::LinearRing.raw(),
            GeomKind::Polygon { .. } => TypeTag::Polygon.raw(),
            GeomKind::Collection { tag, .. } => tag.raw(),
            GeomKind::Other { raw } => *raw,
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        match &self.kind {
            GeomKind::Point(s) | GeomKind::LineString(s) | GeomKind::LinearRing(s) => {
                s.size() == 0
            }
            GeomKind::Polygon { shell, .. } => shell.is_empty(),
            GeomKind::Collection { children, .. } => children.iter().all(MemGeom::is_empty),
            GeomKind::Other { .. } => false,
        }
    }

    /// Number of (seqs, geoms) this value accounts for, children included.
    pub(super) fn footprint(&self) -> (usize, usize) {
        match &self.kind {
            GeomKind::Point(_) | GeomKind::LineString(_) | GeomKind::LinearRing(_) => (1, 1),
            GeomKind::Polygon { shell, holes } => {
                let (s, g) = shell.footprint();
                holes.iter().fold((s, g + 1), |(s, g), h| {
                    let (hs, hg) = h.footprint();
                    (s + hs, g + hg)
                })
            }
            GeomKind::Collection { children, .. } => children.iter().fold((0, 1), |(s, g), c| {
                let (cs, cg) = c.footprint();
                (s + cs, g + cg)
            }),
            GeomKind::Other { .. } => (0, 1),
        }
    }
}

/// Serializable geometry description.
///
/// Coordinates are tuples of 2–4 ordinates; every tuple of one sequence must
/// have the same arity. `Point([])` and `Polygon([])` are the empty variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Shape {
    Point(Vec<f64>),
    LineString(Vec<Vec<f64>>),
    LinearRing(Vec<Vec<f64>>),
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPoint(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
    GeometryCollection(Vec<Shape>),
}
