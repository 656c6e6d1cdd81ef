//! Bounding-box accumulation in one traversal.

use super::BoundingBox;
use crate::engine::{Engine, TypeTag};
use crate::error::{MarshalError, OrEngine};

/// Widen `bbox` to cover `g`.
///
/// Empty geometries and raw type ids outside [`TypeTag`] leave `bbox`
/// untouched. The first engine failure aborts the traversal; `bbox` may then
/// already cover part of `g`.
pub fn extend<E: Engine>(ctx: &E, g: &E::Geom, bbox: &mut BoundingBox) -> Result<(), MarshalError> {
    if ctx.is_empty(g).or_engine("is_empty")? {
        return Ok(());
    }
    let raw = ctx.type_id(g).or_engine("type_id")?;
    let Some(tag) = TypeTag::from_raw(raw) else {
        tracing::trace!(raw, "skipping geometry of unknown type");
        return Ok(());
    };
    match tag {
        TypeTag::Point => {
            let x = ctx.point_x(g).or_engine("point_x")?;
            let y = ctx.point_y(g).or_engine("point_y")?;
            bbox.widen(x, y);
        }
        TypeTag::LineString | TypeTag::LinearRing => {
            let seq = ctx.coord_seq(g).or_engine("coord_seq")?;
            let size = ctx.seq_size(seq).or_engine("seq_size")?;
            for idx in 0..size {
                let x = ctx.seq_x(seq, idx).or_engine("seq_x")?;
                let y = ctx.seq_y(seq, idx).or_engine("seq_y")?;
                bbox.widen(x, y);
            }
        }
        TypeTag::Polygon => {
            let shell = ctx.exterior_ring(g).or_engine("exterior_ring")?;
            extend(ctx, shell, bbox)?;
            let holes = ctx.num_interior_rings(g).or_engine("num_interior_rings")?;
            for n in 0..holes {
                let hole = ctx.interior_ring_n(g, n).or_engine("interior_ring_n")?;
                extend(ctx, hole, bbox)?;
            }
        }
        TypeTag::MultiPoint
        | TypeTag::MultiLineString
        | TypeTag::MultiPolygon
        | TypeTag::GeometryCollection => {
            let parts = ctx.num_geometries(g).or_engine("num_geometries")?;
            for n in 0..parts {
                let part = ctx.geometry_n(g, n).or_engine("geometry_n")?;
                extend(ctx, part, bbox)?;
            }
        }
    }
    Ok(())
}

/// Bounding box of `g`, starting from [`BoundingBox::empty`].
pub fn bounds<E: Engine>(ctx: &E, g: &E::Geom) -> Result<BoundingBox, MarshalError> {
    let mut bbox = BoundingBox::empty();
    extend(ctx, g, &mut bbox)?;
    Ok(bbox)
}
