//! Stand-ins for entry points the handle does not have.
//!
//! Same signatures as the `Extensions` methods they replace. Each returns the
//! failure sentinel (`None`) without touching the engine; destroy shims drop
//! the value and do nothing else.

use crate::engine::{Extensions, MakeValidMethod};

#[inline]
fn missing<T>(entry: &'static str) -> Option<T> {
    tracing::trace!(entry, "entry point not available; shim returns failure");
    None
}

pub(super) fn densify<E: Extensions>(_: &E, _: &E::Geom, _: f64) -> Option<E::Geom> {
    missing("densify")
}

pub(super) fn difference_prec<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: &E::Geom,
    _: f64,
) -> Option<E::Geom> {
    missing("difference_prec")
}

pub(super) fn intersection_prec<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: &E::Geom,
    _: f64,
) -> Option<E::Geom> {
    missing("intersection_prec")
}

pub(super) fn maximum_inscribed_circle<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: f64,
) -> Option<E::Geom> {
    missing("maximum_inscribed_circle")
}

pub(super) fn distance_within<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: &E::Geom,
    _: f64,
) -> Option<bool> {
    missing("distance_within")
}

pub(super) fn frechet_distance<E: Extensions>(_: &E, _: &E::Geom, _: &E::Geom) -> Option<f64> {
    missing("frechet_distance")
}

pub(super) fn frechet_distance_densify<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: &E::Geom,
    _: f64,
) -> Option<f64> {
    missing("frechet_distance_densify")
}

pub(super) fn geojson_reader_create<E: Extensions>(_: &E) -> Option<E::GeoJsonReader> {
    missing("geojson_reader_create")
}

pub(super) fn geojson_reader_destroy<E: Extensions>(_: &E, r: E::GeoJsonReader) {
    drop(r);
}

pub(super) fn geojson_reader_read<E: Extensions>(
    _: &E,
    _: &E::GeoJsonReader,
    _: &str,
) -> Option<E::Geom> {
    missing("geojson_reader_read")
}

pub(super) fn geojson_writer_create<E: Extensions>(_: &E) -> Option<E::GeoJsonWriter> {
    missing("geojson_writer_create")
}

pub(super) fn geojson_writer_destroy<E: Extensions>(_: &E, w: E::GeoJsonWriter) {
    drop(w);
}

pub(super) fn geojson_writer_write<E: Extensions>(
    _: &E,
    _: &E::GeoJsonWriter,
    _: &E::Geom,
    _: i32,
) -> Option<String> {
    missing("geojson_writer_write")
}

pub(super) fn make_valid_params_create<E: Extensions>(_: &E) -> Option<E::MakeValidParams> {
    missing("make_valid_params_create")
}

pub(super) fn make_valid_params_destroy<E: Extensions>(_: &E, p: E::MakeValidParams) {
    drop(p);
}

pub(super) fn make_valid_params_set_keep_collapsed<E: Extensions>(
    _: &E,
    _: &mut E::MakeValidParams,
    _: bool,
) -> Option<()> {
    missing("make_valid_params_set_keep_collapsed")
}

pub(super) fn make_valid_params_set_method<E: Extensions>(
    _: &E,
    _: &mut E::MakeValidParams,
    _: MakeValidMethod,
) -> Option<()> {
    missing("make_valid_params_set_method")
}

pub(super) fn make_valid_with_params<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: &E::MakeValidParams,
) -> Option<E::Geom> {
    missing("make_valid_with_params")
}

pub(super) fn concave_hull<E: Extensions>(_: &E, _: &E::Geom, _: f64, _: bool) -> Option<E::Geom> {
    missing("concave_hull")
}

pub(super) fn concave_hull_by_length<E: Extensions>(
    _: &E,
    _: &E::Geom,
    _: f64,
    _: bool,
) -> Option<E::Geom> {
    missing("concave_hull_by_length")
}

pub(super) fn prepared_contains_xy<E: Extensions>(
    _: &E,
    _: &E::Prepared,
    _: f64,
    _: f64,
) -> Option<bool> {
    missing("prepared_contains_xy")
}

pub(super) fn prepared_intersects_xy<E: Extensions>(
    _: &E,
    _: &E::Prepared,
    _: f64,
    _: f64,
) -> Option<bool> {
    missing("prepared_intersects_xy")
}
