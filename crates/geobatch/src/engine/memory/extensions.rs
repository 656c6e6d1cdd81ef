//! Version-gated entry points of the memory engine.
//!
//! Auxiliary objects (prepared geometries, GeoJSON reader/writer, make-valid
//! params) are real, accounted allocations. The geometric algorithms behind
//! the other entry points are out of reach for an in-process store, so they
//! raise an exception after being counted.

use super::{MemGeom, MemoryEngine};
use crate::engine::{Extensions, MakeValidMethod};

/// Prepared geometry handle.
#[derive(Debug)]
pub struct MemPrepared {
    _private: (),
}

/// GeoJSON reader handle.
#[derive(Debug)]
pub struct MemGeoJsonReader {
    _private: (),
}

/// GeoJSON writer handle.
#[derive(Debug)]
pub struct MemGeoJsonWriter {
    _private: (),
}

/// Make-valid parameter block.
#[derive(Debug)]
pub struct MemMakeValidParams {
    keep_collapsed: bool,
    method: MakeValidMethod,
}

impl MemMakeValidParams {
    pub fn keep_collapsed(&self) -> bool {
        self.keep_collapsed
    }

    pub fn method(&self) -> MakeValidMethod {
        self.method
    }
}

impl MemoryEngine {
    fn unsupported<T>(&self, op: &'static str) -> Option<T> {
        self.enter(op)?;
        self.raise(format!("{op} is not available in the memory engine"))
    }

    fn alloc_other<T>(&self, op: &'static str, value: T) -> Option<T> {
        self.enter(op)?;
        self.adjust(|l| l.other += 1);
        Some(value)
    }

    fn release_other<T>(&self, op: &'static str, value: T) {
        self.count(op);
        self.adjust(|l| l.other = l.other.saturating_sub(1));
        drop(value);
    }
}

impl Extensions for MemoryEngine {
    type Prepared = MemPrepared;
    type GeoJsonReader = MemGeoJsonReader;
    type GeoJsonWriter = MemGeoJsonWriter;
    type MakeValidParams = MemMakeValidParams;

    fn densify(&self, _g: &MemGeom, _tolerance: f64) -> Option<MemGeom> {
        self.unsupported("densify")
    }

    fn difference_prec(&self, _a: &MemGeom, _b: &MemGeom, _grid_size: f64) -> Option<MemGeom> {
        self.unsupported("difference_prec")
    }

    fn intersection_prec(&self, _a: &MemGeom, _b: &MemGeom, _grid_size: f64) -> Option<MemGeom> {
        self.unsupported("intersection_prec")
    }

    fn distance_within(&self, _a: &MemGeom, _b: &MemGeom, _dist: f64) -> Option<bool> {
        self.unsupported("distance_within")
    }

    fn frechet_distance(&self, _a: &MemGeom, _b: &MemGeom) -> Option<f64> {
        self.unsupported("frechet_distance")
    }

    fn frechet_distance_densify(
        &self,
        _a: &MemGeom,
        _b: &MemGeom,
        _densify_frac: f64,
    ) -> Option<f64> {
        self.unsupported("frechet_distance_densify")
    }

    fn maximum_inscribed_circle(&self, _g: &MemGeom, _tolerance: f64) -> Option<MemGeom> {
        self.unsupported("maximum_inscribed_circle")
    }

    fn geojson_reader_create(&self) -> Option<MemGeoJsonReader> {
        self.alloc_other("geojson_reader_create", MemGeoJsonReader { _private: () })
    }

    fn geojson_reader_destroy(&self, r: MemGeoJsonReader) {
        self.release_other("geojson_reader_destroy", r);
    }

    fn geojson_reader_read(&self, _r: &MemGeoJsonReader, _geojson: &str) -> Option<MemGeom> {
        self.unsupported("geojson_reader_read")
    }

    fn geojson_writer_create(&self) -> Option<MemGeoJsonWriter> {
        self.alloc_other("geojson_writer_create", MemGeoJsonWriter { _private: () })
    }

    fn geojson_writer_destroy(&self, w: MemGeoJsonWriter) {
        self.release_other("geojson_writer_destroy", w);
    }

    fn geojson_writer_write(
        &self,
        _w: &MemGeoJsonWriter,
        _g: &MemGeom,
        _indent: i32,
    ) -> Option<String> {
        self.unsupported("geojson_writer_write")
    }

    fn make_valid_params_create(&self) -> Option<MemMakeValidParams> {
        self.alloc_other(
            "make_valid_params_create",
            MemMakeValidParams {
                keep_collapsed: false,
                method: MakeValidMethod::Linework,
            },
        )
    }

    fn make_valid_params_destroy(&self, p: MemMakeValidParams) {
        self.release_other("make_valid_params_destroy", p);
    }

    fn make_valid_params_set_keep_collapsed(
        &self,
        p: &mut MemMakeValidParams,
        keep: bool,
    ) -> Option<()> {
        self.enter("make_valid_params_set_keep_collapsed")?;
        p.keep_collapsed = keep;
        Some(())
    }

    fn make_valid_params_set_method(
        &self,
        p: &mut MemMakeValidParams,
        method: MakeValidMethod,
    ) -> Option<()> {
        self.enter("make_valid_params_set_method")?;
        p.method = method;
        Some(())
    }

    fn make_valid_with_params(&self, _g: &MemGeom, _p: &MemMakeValidParams) -> Option<MemGeom> {
        self.unsupported("make_valid_with_params")
    }

    fn concave_hull(&self, _g: &MemGeom, _ratio: f64, _allow_holes: bool) -> Option<MemGeom> {
        self.unsupported("concave_hull")
    }

    fn concave_hull_by_length(
        &self,
        _g: &MemGeom,
        _length: f64,
        _allow_holes: bool,
    ) -> Option<MemGeom> {
        self.unsupported("concave_hull_by_length")
    }

    fn prepare(&self, _g: &MemGeom) -> Option<MemPrepared> {
        self.alloc_other("prepare", MemPrepared { _private: () })
    }

    fn prepared_destroy(&self, p: MemPrepared) {
        self.release_other("prepared_destroy", p);
    }

    fn prepared_contains_xy(&self, _p: &MemPrepared, _x: f64, _y: f64) -> Option<bool> {
        self.unsupported("prepared_contains_xy")
    }

    fn prepared_intersects_xy(&self, _p: &MemPrepared, _x: f64, _y: f64) -> Option<bool> {
        self.unsupported("prepared_intersects_xy")
    }
}
