//! In-process reference engine.
//!
//! Purpose
//! - Implement the [`Engine`]/[`Extensions`] contracts without a native
//!   library, so the batched operations can be exercised end to end.
//! - Make resource handling observable: every sequence, geometry and auxiliary
//!   object is accounted for (`live()`), every entry point is counted
//!   (`calls()`), and any entry point can be told to fail on its n-th call
//!   (`fail_nth()`), reporting through the message handler like a real engine.
//!
//! Scope
//! - Storage and traversal only. Entry points that would need a geometric
//!   algorithm (overlay, hulls, distances, predicates) report an exception.
//! - Not `Sync`: one engine per thread, like any engine handle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use super::{Engine, EngineVersion, MessageSink, Rejected, TypeTag};

mod extensions;
mod index;
mod types;

pub use extensions::{MemGeoJsonReader, MemGeoJsonWriter, MemMakeValidParams, MemPrepared};
pub use index::MemoryIndex;
pub use types::{MemGeom, MemSeq, Shape};

use types::GeomKind;

/// Memory engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct MemoryCfg {
    /// Version reported to capability resolution.
    pub version: EngineVersion,
}

impl Default for MemoryCfg {
    fn default() -> Self {
        Self {
            version: EngineVersion::new(3, 12, 0),
        }
    }
}

/// Objects currently allocated by the engine and not yet destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Live {
    pub seqs: usize,
    pub geoms: usize,
    /// Prepared geometries, GeoJSON readers/writers, make-valid params.
    pub other: usize,
}

impl Live {
    #[inline]
    pub fn total(&self) -> usize {
        self.seqs + self.geoms + self.other
    }
}

/// Engine handle backed by plain Rust values.
pub struct MemoryEngine {
    cfg: MemoryCfg,
    handler: Option<MessageSink>,
    calls: RefCell<HashMap<&'static str, usize>>,
    faults: RefCell<HashMap<&'static str, usize>>,
    live: Cell<Live>,
}

impl fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("cfg", &self.cfg)
            .field("has_handler", &self.handler.is_some())
            .field("live", &self.live.get())
            .finish()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(MemoryCfg::default())
    }
}

impl MemoryEngine {
    pub fn new(cfg: MemoryCfg) -> Self {
        Self {
            cfg,
            handler: None,
            calls: RefCell::new(HashMap::new()),
            faults: RefCell::new(HashMap::new()),
            live: Cell::new(Live::default()),
        }
    }

    pub fn with_version(version: EngineVersion) -> Self {
        Self::new(MemoryCfg { version })
    }

    /// Allocation accounting.
    #[inline]
    pub fn live(&self) -> Live {
        self.live.get()
    }

    /// How often entry point `op` (the trait method name) has been called.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.borrow().get(op).copied().unwrap_or(0)
    }

    /// Calls across all entry points.
    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Make entry point `op` raise an exception on its `nth` call (1-based,
    /// counted from the last `reset_calls`).
    pub fn fail_nth(&self, op: &'static str, nth: usize) {
        self.faults.borrow_mut().insert(op, nth);
    }

    pub fn clear_faults(&self) {
        self.faults.borrow_mut().clear();
    }

    /// Build a geometry from its serde description.
    ///
    /// Counts as an allocation like any other constructor; release the result
    /// with [`Engine::geom_destroy`].
    pub fn load(&self, shape: &Shape) -> Option<MemGeom> {
        self.enter("load")?;
        let geom = self.build_shape(shape)?;
        self.adopt(&geom);
        Some(geom)
    }

    /// Describe a geometry as a [`Shape`]; the inverse of [`Self::load`].
    ///
    /// Variants outside [`TypeTag`] have no description and yield `None`.
    pub fn to_shape(&self, g: &MemGeom) -> Option<Shape> {
        Some(match &g.kind {
            GeomKind::Point(s) => Shape::Point(s.coords().to_vec()),
            GeomKind::LineString(s) => Shape::LineString(tuples(s)),
            GeomKind::LinearRing(s) => Shape::LinearRing(tuples(s)),
            GeomKind::Polygon { shell, holes } => Shape::Polygon(polygon_rings(shell, holes)),
            GeomKind::Collection { tag, children } => match tag {
                TypeTag::MultiPoint => Shape::MultiPoint(
                    children
                        .iter()
                        .map(|c| match &c.kind {
                            GeomKind::Point(s) => Some(s.coords().to_vec()),
                            _ => None,
                        })
                        .collect::<Option<_>>()?,
                ),
                TypeTag::MultiLineString => Shape::MultiLineString(
                    children
                        .iter()
                        .map(|c| match &c.kind {
                            GeomKind::LineString(s) => Some(tuples(s)),
                            _ => None,
                        })
                        .collect::<Option<_>>()?,
                ),
                TypeTag::MultiPolygon => Shape::MultiPolygon(
                    children
                        .iter()
                        .map(|c| match &c.kind {
                            GeomKind::Polygon { shell, holes } => {
                                Some(polygon_rings(shell, holes))
                            }
                            _ => None,
                        })
                        .collect::<Option<_>>()?,
                ),
                _ => Shape::GeometryCollection(
                    children
                        .iter()
                        .map(|c| self.to_shape(c))
                        .collect::<Option<_>>()?,
                ),
            },
            GeomKind::Other { .. } => return None,
        })
    }

    /// A geometry whose raw type id lies outside [`TypeTag`].
    pub fn unknown_geometry(&self, raw: i32) -> MemGeom {
        let g = MemGeom::new(GeomKind::Other { raw });
        self.adopt(&g);
        g
    }

    // Internal plumbing ----------------------------------------------------

    fn count(&self, op: &'static str) -> usize {
        let mut calls = self.calls.borrow_mut();
        let count = calls.entry(op).or_insert(0);
        *count += 1;
        *count
    }

    /// Count a call to `op` and apply any injected fault.
    fn enter(&self, op: &'static str) -> Option<()> {
        let n = self.count(op);
        if self.faults.borrow().get(op) == Some(&n) {
            return self.raise(format!("injected fault in {op} (call {n})"));
        }
        Some(())
    }

    fn notify(&self, message: &str) {
        if let Some(handler) = &self.handler {
            handler(message);
        }
    }

    fn raise<T>(&self, message: impl AsRef<str>) -> Option<T> {
        self.notify(message.as_ref());
        None
    }

    fn adjust(&self, f: impl FnOnce(&mut Live)) {
        let mut live = self.live.get();
        f(&mut live);
        self.live.set(live);
    }

    fn adopt(&self, g: &MemGeom) {
        let (seqs, geoms) = g.footprint();
        self.adjust(|l| {
            l.seqs += seqs;
            l.geoms += geoms;
        });
    }

    fn seq_from_tuples(&self, tuples: &[Vec<f64>]) -> Option<MemSeq> {
        let dims = tuples.first().map_or(2, Vec::len);
        if !(2..=4).contains(&dims) {
            return self.raise(format!("coordinate arity {dims} is not supported"));
        }
        if tuples.iter().any(|t| t.len() != dims) {
            return self.raise("mixed coordinate arity in one sequence");
        }
        Some(MemSeq {
            dims,
            coords: tuples.concat(),
        })
    }

    fn ring_from_tuples(&self, tuples: &[Vec<f64>]) -> Option<MemGeom> {
        let seq = self.seq_from_tuples(tuples)?;
        self.check_ring(&seq)?;
        Some(MemGeom::new(GeomKind::LinearRing(seq)))
    }

    fn check_ring(&self, seq: &MemSeq) -> Option<()> {
        let n = seq.size();
        if n != 0 && n < 4 {
            return self.raise(format!(
                "Invalid number of points in LinearRing found {n} - must be 0 or >= 4"
            ));
        }
        if n != 0 && !seq.is_closed() {
            return self.raise("Points of LinearRing do not form a closed linestring");
        }
        Some(())
    }

    fn polygon_from_rings(&self, rings: &[Vec<Vec<f64>>]) -> Option<MemGeom> {
        let shell = match rings.first() {
            Some(r) => self.ring_from_tuples(r)?,
            None => MemGeom::new(GeomKind::LinearRing(MemSeq::zeroed(0, 2))),
        };
        let holes = rings
            .iter()
            .skip(1)
            .map(|r| self.ring_from_tuples(r))
            .collect::<Option<Vec<_>>>()?;
        Some(MemGeom::new(GeomKind::Polygon {
            shell: Box::new(shell),
            holes,
        }))
    }

    fn build_shape(&self, shape: &Shape) -> Option<MemGeom> {
        let kind = match shape {
            Shape::Point(c) if c.is_empty() => GeomKind::Point(MemSeq::zeroed(0, 2)),
            Shape::Point(c) => GeomKind::Point(self.seq_from_tuples(std::slice::from_ref(c))?),
            Shape::LineString(ts) => GeomKind::LineString(self.seq_from_tuples(ts)?),
            Shape::LinearRing(ts) => return self.ring_from_tuples(ts),
            Shape::Polygon(rings) => return self.polygon_from_rings(rings),
            Shape::MultiPoint(pts) => GeomKind::Collection {
                tag: TypeTag::MultiPoint,
                children: pts
                    .iter()
                    .map(|p| self.build_shape(&Shape::Point(p.clone())))
                    .collect::<Option<_>>()?,
            },
            Shape::MultiLineString(lines) => GeomKind::Collection {
                tag: TypeTag::MultiLineString,
                children: lines
                    .iter()
                    .map(|l| Some(MemGeom::new(GeomKind::LineString(self.seq_from_tuples(l)?))))
                    .collect::<Option<_>>()?,
            },
            Shape::MultiPolygon(polys) => GeomKind::Collection {
                tag: TypeTag::MultiPolygon,
                children: polys
                    .iter()
                    .map(|p| self.polygon_from_rings(p))
                    .collect::<Option<_>>()?,
            },
            Shape::GeometryCollection(items) => GeomKind::Collection {
                tag: TypeTag::GeometryCollection,
                children: items
                    .iter()
                    .map(|s| self.build_shape(s))
                    .collect::<Option<_>>()?,
            },
        };
        Some(MemGeom::new(kind))
    }

    fn ordinate_index(&self, s: &MemSeq, idx: usize, dim: usize) -> Option<usize> {
        if idx >= s.size() {
            return self.raise(format!(
                "coordinate index {idx} out of range for sequence of size {}",
                s.size()
            ));
        }
        if dim >= s.dims {
            return self.raise(format!(
                "ordinate {dim} out of range for sequence of dimension {}",
                s.dims
            ));
        }
        Some(idx * s.dims + dim)
    }

    fn wrong_type<T>(&self, op: &str, g: &MemGeom) -> Option<T> {
        let name = TypeTag::from_raw(g.raw_type()).map_or("unknown", TypeTag::name);
        self.raise(format!("{op}: argument of type {name} is not supported"))
    }
}

/// Ordinate picks for a bulk copy of `width` values per tuple out of `s`.
fn bulk_layout(dims: usize, has_z: bool, has_m: bool) -> Option<Vec<usize>> {
    let mut picks = vec![0, 1];
    if has_z {
        if dims < 3 {
            return None;
        }
        picks.push(2);
    }
    if has_m {
        if dims < 4 {
            return None;
        }
        picks.push(3);
    }
    Some(picks)
}

fn tuples(s: &MemSeq) -> Vec<Vec<f64>> {
    (0..s.size()).map(|i| s.tuple(i).to_vec()).collect()
}

fn polygon_rings(shell: &MemGeom, holes: &[MemGeom]) -> Vec<Vec<Vec<f64>>> {
    let ring = |g: &MemGeom| match &g.kind {
        GeomKind::LinearRing(s) => tuples(s),
        _ => Vec::new(),
    };
    if shell.is_empty() {
        return Vec::new();
    }
    std::iter::once(shell).chain(holes).map(ring).collect()
}

impl Engine for MemoryEngine {
    type Geom = MemGeom;
    type CoordSeq = MemSeq;

    fn version(&self) -> EngineVersion {
        self.cfg.version
    }

    fn set_message_handler(&mut self, handler: Option<MessageSink>) {
        self.handler = handler;
    }

    fn is_empty(&self, g: &MemGeom) -> Option<bool> {
        self.enter("is_empty")?;
        Some(g.is_empty())
    }

    fn type_id(&self, g: &MemGeom) -> Option<i32> {
        self.enter("type_id")?;
        Some(g.raw_type())
    }

    fn num_geometries(&self, g: &MemGeom) -> Option<usize> {
        self.enter("num_geometries")?;
        Some(match &g.kind {
            GeomKind::Collection { children, .. } => children.len(),
            _ => 1,
        })
    }

    fn num_points(&self, g: &MemGeom) -> Option<usize> {
        self.enter("num_points")?;
        match &g.kind {
            GeomKind::LineString(s) | GeomKind::LinearRing(s) => Some(s.size()),
            _ => self.wrong_type("num_points", g),
        }
    }

    fn num_interior_rings(&self, g: &MemGeom) -> Option<usize> {
        self.enter("num_interior_rings")?;
        match &g.kind {
            GeomKind::Polygon { holes, .. } => Some(holes.len()),
            _ => self.wrong_type("num_interior_rings", g),
        }
    }

    fn point_x(&self, g: &MemGeom) -> Option<f64> {
        self.enter("point_x")?;
        match &g.kind {
            GeomKind::Point(s) if s.size() == 1 => Some(s.coords[0]),
            GeomKind::Point(_) => self.raise("point_x: empty point has no coordinate"),
            _ => self.wrong_type("point_x", g),
        }
    }

    fn point_y(&self, g: &MemGeom) -> Option<f64> {
        self.enter("point_y")?;
        match &g.kind {
            GeomKind::Point(s) if s.size() == 1 => Some(s.coords[1]),
            GeomKind::Point(_) => self.raise("point_y: empty point has no coordinate"),
            _ => self.wrong_type("point_y", g),
        }
    }

    fn coord_seq<'g>(&self, g: &'g MemGeom) -> Option<&'g MemSeq> {
        self.enter("coord_seq")?;
        match &g.kind {
            GeomKind::Point(s) | GeomKind::LineString(s) | GeomKind::LinearRing(s) => Some(s),
            _ => self.wrong_type("coord_seq", g),
        }
    }

    fn exterior_ring<'g>(&self, g: &'g MemGeom) -> Option<&'g MemGeom> {
        self.enter("exterior_ring")?;
        match &g.kind {
            GeomKind::Polygon { shell, .. } => Some(shell),
            _ => self.wrong_type("exterior_ring", g),
        }
    }

    fn interior_ring_n<'g>(&self, g: &'g MemGeom, n: usize) -> Option<&'g MemGeom> {
        self.enter("interior_ring_n")?;
        match &g.kind {
            GeomKind::Polygon { holes, .. } => match holes.get(n) {
                Some(h) => Some(h),
                None => self.raise(format!("interior ring {n} out of range")),
            },
            _ => self.wrong_type("interior_ring_n", g),
        }
    }

    fn geometry_n<'g>(&self, g: &'g MemGeom, n: usize) -> Option<&'g MemGeom> {
        self.enter("geometry_n")?;
        match &g.kind {
            GeomKind::Collection { children, .. } => match children.get(n) {
                Some(c) => Some(c),
                None => self.raise(format!("geometry index {n} out of range")),
            },
            _ if n == 0 => Some(g),
            _ => self.raise(format!("geometry index {n} out of range")),
        }
    }

    fn user_data(&self, g: &MemGeom) -> usize {
        self.count("user_data");
        g.user_data
    }

    fn set_user_data(&self, g: &mut MemGeom, data: usize) {
        self.count("set_user_data");
        g.user_data = data;
    }

    fn seq_create(&self, size: usize, dims: usize) -> Option<MemSeq> {
        self.enter("seq_create")?;
        if !(2..=4).contains(&dims) {
            return self.raise(format!("coordinate arity {dims} is not supported"));
        }
        self.adjust(|l| l.seqs += 1);
        Some(MemSeq::zeroed(size, dims))
    }

    fn seq_destroy(&self, s: MemSeq) {
        self.count("seq_destroy");
        self.adjust(|l| l.seqs = l.seqs.saturating_sub(1));
        drop(s);
    }

    fn seq_size(&self, s: &MemSeq) -> Option<usize> {
        self.enter("seq_size")?;
        Some(s.size())
    }

    fn seq_dims(&self, s: &MemSeq) -> Option<usize> {
        self.enter("seq_dims")?;
        Some(s.dims)
    }

    fn seq_x(&self, s: &MemSeq, idx: usize) -> Option<f64> {
        self.enter("seq_x")?;
        let at = self.ordinate_index(s, idx, 0)?;
        Some(s.coords[at])
    }

    fn seq_y(&self, s: &MemSeq, idx: usize) -> Option<f64> {
        self.enter("seq_y")?;
        let at = self.ordinate_index(s, idx, 1)?;
        Some(s.coords[at])
    }

    fn seq_ordinate(&self, s: &MemSeq, idx: usize, dim: usize) -> Option<f64> {
        self.enter("seq_ordinate")?;
        let at = self.ordinate_index(s, idx, dim)?;
        Some(s.coords[at])
    }

    fn seq_set_x(&self, s: &mut MemSeq, idx: usize, v: f64) -> Option<()> {
        self.enter("seq_set_x")?;
        let at = self.ordinate_index(s, idx, 0)?;
        s.coords[at] = v;
        Some(())
    }

    fn seq_set_y(&self, s: &mut MemSeq, idx: usize, v: f64) -> Option<()> {
        self.enter("seq_set_y")?;
        let at = self.ordinate_index(s, idx, 1)?;
        s.coords[at] = v;
        Some(())
    }

    fn seq_set_ordinate(&self, s: &mut MemSeq, idx: usize, dim: usize, v: f64) -> Option<()> {
        self.enter("seq_set_ordinate")?;
        let at = self.ordinate_index(s, idx, dim)?;
        s.coords[at] = v;
        Some(())
    }

    fn seq_copy_to_buffer(
        &self,
        s: &MemSeq,
        out: &mut [f64],
        has_z: bool,
        has_m: bool,
    ) -> Option<()> {
        self.enter("seq_copy_to_buffer")?;
        let Some(picks) = bulk_layout(s.dims, has_z, has_m) else {
            return self.raise(format!(
                "requested ordinates exceed sequence dimension {}",
                s.dims
            ));
        };
        if out.len() != s.size() * picks.len() {
            return self.raise("destination buffer has the wrong length");
        }
        for (idx, chunk) in out.chunks_exact_mut(picks.len()).enumerate() {
            let tuple = s.tuple(idx);
            for (slot, &dim) in chunk.iter_mut().zip(&picks) {
                *slot = tuple[dim];
            }
        }
        Some(())
    }

    fn seq_copy_from_buffer(
        &self,
        buf: &[f64],
        size: usize,
        has_z: bool,
        has_m: bool,
    ) -> Option<MemSeq> {
        self.enter("seq_copy_from_buffer")?;
        let dims = 2 + usize::from(has_z) + usize::from(has_m);
        if buf.len() != size * dims {
            return self.raise("source buffer has the wrong length");
        }
        self.adjust(|l| l.seqs += 1);
        Some(MemSeq {
            dims,
            coords: buf.to_vec(),
        })
    }

    fn create_empty_point(&self) -> Option<MemGeom> {
        self.enter("create_empty_point")?;
        let g = MemGeom::new(GeomKind::Point(MemSeq::zeroed(0, 2)));
        self.adopt(&g);
        Some(g)
    }

    fn create_point(&self, s: MemSeq) -> Result<MemGeom, MemSeq> {
        if self.enter("create_point").is_none() {
            return Err(s);
        }
        if s.size() > 1 {
            self.notify("Point coordinate list must contain a single element");
            return Err(s);
        }
        self.adjust(|l| l.geoms += 1);
        Ok(MemGeom::new(GeomKind::Point(s)))
    }

    fn create_linear_ring(&self, s: MemSeq) -> Result<MemGeom, MemSeq> {
        if self.enter("create_linear_ring").is_none() || self.check_ring(&s).is_none() {
            return Err(s);
        }
        self.adjust(|l| l.geoms += 1);
        Ok(MemGeom::new(GeomKind::LinearRing(s)))
    }

    fn create_polygon(
        &self,
        shell: MemGeom,
        holes: Vec<MemGeom>,
    ) -> Result<MemGeom, Rejected<MemGeom>> {
        if self.enter("create_polygon").is_none() {
            return Err((shell, holes));
        }
        let is_ring = |g: &MemGeom| matches!(g.kind, GeomKind::LinearRing(_));
        if !is_ring(&shell) || !holes.iter().all(is_ring) {
            self.notify("polygon rings must be linear rings");
            return Err((shell, holes));
        }
        self.adjust(|l| l.geoms += 1);
        Ok(MemGeom::new(GeomKind::Polygon {
            shell: Box::new(shell),
            holes,
        }))
    }

    fn geom_destroy(&self, g: MemGeom) {
        self.count("geom_destroy");
        let (seqs, geoms) = g.footprint();
        self.adjust(|l| {
            l.seqs = l.seqs.saturating_sub(seqs);
            l.geoms = l.geoms.saturating_sub(geoms);
        });
    }
}

#[cfg(test)]
mod tests;
