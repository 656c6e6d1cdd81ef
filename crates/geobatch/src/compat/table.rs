//! The resolved entry-point table.

use std::fmt;

use super::{shims, Capabilities};
use crate::cfg::{BULK_COPY_SINCE, CONCAVE_HULL_SINCE, PREPARED_XY_SINCE};
use crate::engine::{Engine, EngineVersion, Extensions, MakeValidMethod};
use crate::error::{MarshalError, OrEngine};

type Geom<E> = <E as Engine>::Geom;

type GeomParamFn<E> = fn(&E, &Geom<E>, f64) -> Option<Geom<E>>;
type OverlayFn<E> = fn(&E, &Geom<E>, &Geom<E>, f64) -> Option<Geom<E>>;
type WithinFn<E> = fn(&E, &Geom<E>, &Geom<E>, f64) -> Option<bool>;
type FrechetFn<E> = fn(&E, &Geom<E>, &Geom<E>) -> Option<f64>;
type FrechetDensifyFn<E> = fn(&E, &Geom<E>, &Geom<E>, f64) -> Option<f64>;
type HullFn<E> = fn(&E, &Geom<E>, f64, bool) -> Option<Geom<E>>;
type CreateFn<E, T> = fn(&E) -> Option<T>;
type DestroyFn<E, T> = fn(&E, T);
type ReadFn<E> = fn(&E, &<E as Extensions>::GeoJsonReader, &str) -> Option<Geom<E>>;
type WriteFn<E> =
    fn(&E, &<E as Extensions>::GeoJsonWriter, &Geom<E>, i32) -> Option<String>;
type SetFn<E, V> = fn(&E, &mut <E as Extensions>::MakeValidParams, V) -> Option<()>;
type MakeValidFn<E> =
    fn(&E, &Geom<E>, &<E as Extensions>::MakeValidParams) -> Option<Geom<E>>;
type PreparedXyFn<E> = fn(&E, &<E as Extensions>::Prepared, f64, f64) -> Option<bool>;

#[inline]
fn gate<F>(version: EngineVersion, since: EngineVersion, real: F, shim: F) -> F {
    if version.at_least(since) {
        real
    } else {
        shim
    }
}

/// Gated entry points of `E`, each bound to the engine or to its shim.
///
/// Resolved once per handle version; every method maps the sentinel to
/// [`MarshalError::Engine`] named after the entry point.
pub struct EntryPoints<E: Extensions> {
    caps: Capabilities,
    densify: GeomParamFn<E>,
    difference_prec: OverlayFn<E>,
    intersection_prec: OverlayFn<E>,
    maximum_inscribed_circle: GeomParamFn<E>,
    distance_within: WithinFn<E>,
    frechet_distance: FrechetFn<E>,
    frechet_distance_densify: FrechetDensifyFn<E>,
    geojson_reader_create: CreateFn<E, E::GeoJsonReader>,
    geojson_reader_destroy: DestroyFn<E, E::GeoJsonReader>,
    geojson_reader_read: ReadFn<E>,
    geojson_writer_create: CreateFn<E, E::GeoJsonWriter>,
    geojson_writer_destroy: DestroyFn<E, E::GeoJsonWriter>,
    geojson_writer_write: WriteFn<E>,
    make_valid_params_create: CreateFn<E, E::MakeValidParams>,
    make_valid_params_destroy: DestroyFn<E, E::MakeValidParams>,
    make_valid_params_set_keep_collapsed: SetFn<E, bool>,
    make_valid_params_set_method: SetFn<E, MakeValidMethod>,
    make_valid_with_params: MakeValidFn<E>,
    concave_hull: HullFn<E>,
    concave_hull_by_length: HullFn<E>,
    prepared_contains_xy: PreparedXyFn<E>,
    prepared_intersects_xy: PreparedXyFn<E>,
}

impl<E: Extensions> Clone for EntryPoints<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Extensions> Copy for EntryPoints<E> {}

impl<E: Extensions> fmt::Debug for EntryPoints<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoints")
            .field("caps", &self.caps)
            .field("shimmed", &self.caps.shimmed())
            .finish()
    }
}

impl<E: Extensions> EntryPoints<E> {
    /// Resolve against the handle's reported version.
    pub fn resolve(ctx: &E) -> Self {
        Self::for_capabilities(Capabilities::detect(ctx))
    }

    pub fn for_capabilities(caps: Capabilities) -> Self {
        let v = caps.version;
        Self {
            caps,
            densify: gate::<GeomParamFn<E>>(v, BULK_COPY_SINCE, E::densify, shims::densify::<E>),
            difference_prec: gate::<OverlayFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::difference_prec,
                shims::difference_prec::<E>,
            ),
            intersection_prec: gate::<OverlayFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::intersection_prec,
                shims::intersection_prec::<E>,
            ),
            maximum_inscribed_circle: gate::<GeomParamFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::maximum_inscribed_circle,
                shims::maximum_inscribed_circle::<E>,
            ),
            distance_within: gate::<WithinFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::distance_within,
                shims::distance_within::<E>,
            ),
            frechet_distance: gate::<FrechetFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::frechet_distance,
                shims::frechet_distance::<E>,
            ),
            frechet_distance_densify: gate::<FrechetDensifyFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::frechet_distance_densify,
                shims::frechet_distance_densify::<E>,
            ),
            geojson_reader_create: gate::<CreateFn<E, E::GeoJsonReader>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_reader_create,
                shims::geojson_reader_create::<E>,
            ),
            geojson_reader_destroy: gate::<DestroyFn<E, E::GeoJsonReader>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_reader_destroy,
                shims::geojson_reader_destroy::<E>,
            ),
            geojson_reader_read: gate::<ReadFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_reader_read,
                shims::geojson_reader_read::<E>,
            ),
            geojson_writer_create: gate::<CreateFn<E, E::GeoJsonWriter>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_writer_create,
                shims::geojson_writer_create::<E>,
            ),
            geojson_writer_destroy: gate::<DestroyFn<E, E::GeoJsonWriter>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_writer_destroy,
                shims::geojson_writer_destroy::<E>,
            ),
            geojson_writer_write: gate::<WriteFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::geojson_writer_write,
                shims::geojson_writer_write::<E>,
            ),
            make_valid_params_create: gate::<CreateFn<E, E::MakeValidParams>>(
                v,
                BULK_COPY_SINCE,
                E::make_valid_params_create,
                shims::make_valid_params_create::<E>,
            ),
            make_valid_params_destroy: gate::<DestroyFn<E, E::MakeValidParams>>(
                v,
                BULK_COPY_SINCE,
                E::make_valid_params_destroy,
                shims::make_valid_params_destroy::<E>,
            ),
            make_valid_params_set_keep_collapsed: gate::<SetFn<E, bool>>(
                v,
                BULK_COPY_SINCE,
                E::make_valid_params_set_keep_collapsed,
                shims::make_valid_params_set_keep_collapsed::<E>,
            ),
            make_valid_params_set_method: gate::<SetFn<E, MakeValidMethod>>(
                v,
                BULK_COPY_SINCE,
                E::make_valid_params_set_method,
                shims::make_valid_params_set_method::<E>,
            ),
            make_valid_with_params: gate::<MakeValidFn<E>>(
                v,
                BULK_COPY_SINCE,
                E::make_valid_with_params,
                shims::make_valid_with_params::<E>,
            ),
            concave_hull: gate::<HullFn<E>>(
                v,
                CONCAVE_HULL_SINCE,
                E::concave_hull,
                shims::concave_hull::<E>,
            ),
            concave_hull_by_length: gate::<HullFn<E>>(
                v,
                PREPARED_XY_SINCE,
                E::concave_hull_by_length,
                shims::concave_hull_by_length::<E>,
            ),
            prepared_contains_xy: gate::<PreparedXyFn<E>>(
                v,
                PREPARED_XY_SINCE,
                E::prepared_contains_xy,
                shims::prepared_contains_xy::<E>,
            ),
            prepared_intersects_xy: gate::<PreparedXyFn<E>>(
                v,
                PREPARED_XY_SINCE,
                E::prepared_intersects_xy,
                shims::prepared_intersects_xy::<E>,
            ),
        }
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn densify(&self, ctx: &E, g: &E::Geom, tolerance: f64) -> Result<E::Geom, MarshalError> {
        (self.densify)(ctx, g, tolerance).or_engine("densify")
    }

    pub fn difference_prec(
        &self,
        ctx: &E,
        a: &E::Geom,
        b: &E::Geom,
        grid_size: f64,
    ) -> Result<E::Geom, MarshalError> {
        (self.difference_prec)(ctx, a, b, grid_size).or_engine("difference_prec")
    }

    pub fn intersection_prec(
        &self,
        ctx: &E,
        a: &E::Geom,
        b: &E::Geom,
        grid_size: f64,
    ) -> Result<E::Geom, MarshalError> {
        (self.intersection_prec)(ctx, a, b, grid_size).or_engine("intersection_prec")
    }

    pub fn maximum_inscribed_circle(
        &self,
        ctx: &E,
        g: &E::Geom,
        tolerance: f64,
    ) -> Result<E::Geom, MarshalError> {
        (self.maximum_inscribed_circle)(ctx, g, tolerance).or_engine("maximum_inscribed_circle")
    }

    pub fn distance_within(
        &self,
        ctx: &E,
        a: &E::Geom,
        b: &E::Geom,
        dist: f64,
    ) -> Result<bool, MarshalError> {
        (self.distance_within)(ctx, a, b, dist).or_engine("distance_within")
    }

    pub fn frechet_distance(&self, ctx: &E, a: &E::Geom, b: &E::Geom) -> Result<f64, MarshalError> {
        (self.frechet_distance)(ctx, a, b).or_engine("frechet_distance")
    }

    pub fn frechet_distance_densify(
        &self,
        ctx: &E,
        a: &E::Geom,
        b: &E::Geom,
        densify_frac: f64,
    ) -> Result<f64, MarshalError> {
        (self.frechet_distance_densify)(ctx, a, b, densify_frac)
            .or_engine("frechet_distance_densify")
    }

    pub fn geojson_reader_create(&self, ctx: &E) -> Result<E::GeoJsonReader, MarshalError> {
        (self.geojson_reader_create)(ctx).or_engine("geojson_reader_create")
    }

    pub fn geojson_reader_destroy(&self, ctx: &E, r: E::GeoJsonReader) {
        (self.geojson_reader_destroy)(ctx, r);
    }

    pub fn geojson_reader_read(
        &self,
        ctx: &E,
        r: &E::GeoJsonReader,
        geojson: &str,
    ) -> Result<E::Geom, MarshalError> {
        (self.geojson_reader_read)(ctx, r, geojson).or_engine("geojson_reader_read")
    }

    pub fn geojson_writer_create(&self, ctx: &E) -> Result<E::GeoJsonWriter, MarshalError> {
        (self.geojson_writer_create)(ctx).or_engine("geojson_writer_create")
    }

    pub fn geojson_writer_destroy(&self, ctx: &E, w: E::GeoJsonWriter) {
        (self.geojson_writer_destroy)(ctx, w);
    }

    pub fn geojson_writer_write(
        &self,
        ctx: &E,
        w: &E::GeoJsonWriter,
        g: &E::Geom,
        indent: i32,
    ) -> Result<String, MarshalError> {
        (self.geojson_writer_write)(ctx, w, g, indent).or_engine("geojson_writer_write")
    }

    /// Parameterized make-valid in one call.
    ///
    /// Creates the parameter block, sets keep-collapsed and method, runs, and
    /// destroys the block on every path after it was created.
    pub fn make_valid_with_params(
        &self,
        ctx: &E,
        g: &E::Geom,
        method: MakeValidMethod,
        keep_collapsed: bool,
    ) -> Result<E::Geom, MarshalError> {
        let mut params =
            (self.make_valid_params_create)(ctx).or_engine("make_valid_params_create")?;
        let out = self.run_make_valid(ctx, g, &mut params, method, keep_collapsed);
        if out.is_err() {
            tracing::debug!(?method, keep_collapsed, "releasing make-valid params after failure");
        }
        (self.make_valid_params_destroy)(ctx, params);
        out
    }

    fn run_make_valid(
        &self,
        ctx: &E,
        g: &E::Geom,
        params: &mut E::MakeValidParams,
        method: MakeValidMethod,
        keep_collapsed: bool,
    ) -> Result<E::Geom, MarshalError> {
        (self.make_valid_params_set_keep_collapsed)(ctx, params, keep_collapsed)
            .or_engine("make_valid_params_set_keep_collapsed")?;
        (self.make_valid_params_set_method)(ctx, params, method)
            .or_engine("make_valid_params_set_method")?;
        (self.make_valid_with_params)(ctx, g, params).or_engine("make_valid_with_params")
    }

    pub fn concave_hull(
        &self,
        ctx: &E,
        g: &E::Geom,
        ratio: f64,
        allow_holes: bool,
    ) -> Result<E::Geom, MarshalError> {
        (self.concave_hull)(ctx, g, ratio, allow_holes).or_engine("concave_hull")
    }

    pub fn concave_hull_by_length(
        &self,
        ctx: &E,
        g: &E::Geom,
        length: f64,
        allow_holes: bool,
    ) -> Result<E::Geom, MarshalError> {
        (self.concave_hull_by_length)(ctx, g, length, allow_holes)
            .or_engine("concave_hull_by_length")
    }

    /// Not gated; prepared geometries exist in every supported version.
    pub fn prepare(&self, ctx: &E, g: &E::Geom) -> Result<E::Prepared, MarshalError> {
        ctx.prepare(g).or_engine("prepare")
    }

    pub fn prepared_destroy(&self, ctx: &E, p: E::Prepared) {
        ctx.prepared_destroy(p);
    }

    pub fn prepared_contains_xy(
        &self,
        ctx: &E,
        p: &E::Prepared,
        x: f64,
        y: f64,
    ) -> Result<bool, MarshalError> {
        (self.prepared_contains_xy)(ctx, p, x, y).or_engine("prepared_contains_xy")
    }

    pub fn prepared_intersects_xy(
        &self,
        ctx: &E,
        p: &E::Prepared,
        x: f64,
        y: f64,
    ) -> Result<bool, MarshalError> {
        (self.prepared_intersects_xy)(ctx, p, x, y).or_engine("prepared_intersects_xy")
    }
}
