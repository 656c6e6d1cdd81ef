//! Geometry from a bounding box.
//!
//! Three shapes, picked by the box alone:
//! - empty box: empty Point;
//! - degenerate box: Point at `(min_x, min_y)`;
//! - otherwise: Polygon with one closed five-tuple shell and no holes.
//!
//! Every intermediate (sequence, ring) is released on the failure path in
//! reverse order of construction; the caller owns only the final geometry.

use super::BoundingBox;
use crate::codec::CopyStrategy;
use crate::engine::{Engine, TypeTag};
use crate::error::{MarshalError, OrEngine};

/// Build the geometry covering `bbox`, with its type tag.
pub fn build<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    bbox: &BoundingBox,
) -> Result<(TypeTag, E::Geom), MarshalError> {
    if bbox.is_empty() {
        let g = ctx.create_empty_point().or_engine("create_empty_point")?;
        return Ok((TypeTag::Point, g));
    }
    if bbox.is_point() {
        return point(ctx, bbox.min_x, bbox.min_y).map(|g| (TypeTag::Point, g));
    }
    let BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    } = *bbox;
    let ring = [
        min_x, min_y, max_x, min_y, max_x, max_y, min_x, max_y, min_x, min_y,
    ];
    let seq = xy_sequence(ctx, copy, &ring)?;
    let shell = match ctx.create_linear_ring(seq) {
        Ok(shell) => shell,
        Err(seq) => {
            tracing::debug!(%bbox, "releasing shell sequence after failed ring construction");
            ctx.seq_destroy(seq);
            return Err(MarshalError::Engine {
                op: "create_linear_ring",
            });
        }
    };
    match ctx.create_polygon(shell, Vec::new()) {
        Ok(g) => Ok((TypeTag::Polygon, g)),
        Err((shell, holes)) => {
            tracing::debug!(%bbox, "releasing shell ring after failed polygon construction");
            for hole in holes {
                ctx.geom_destroy(hole);
            }
            ctx.geom_destroy(shell);
            Err(MarshalError::Engine {
                op: "create_polygon",
            })
        }
    }
}

fn point<E: Engine>(ctx: &E, x: f64, y: f64) -> Result<E::Geom, MarshalError> {
    let seq = xy_sequence(ctx, CopyStrategy::PerOrdinate, &[x, y])?;
    ctx.create_point(seq).map_err(|seq| {
        tracing::debug!(x, y, "releasing point sequence after failed point construction");
        ctx.seq_destroy(seq);
        MarshalError::Engine { op: "create_point" }
    })
}

/// 2D sequence holding `xy` (pairs), by bulk copy or per-tuple X/Y sets.
fn xy_sequence<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    xy: &[f64],
) -> Result<E::CoordSeq, MarshalError> {
    let size = xy.len() / 2;
    if copy == CopyStrategy::Bulk {
        return ctx
            .seq_copy_from_buffer(xy, size, false, false)
            .or_engine("seq_copy_from_buffer");
    }
    let mut seq = ctx.seq_create(size, 2).or_engine("seq_create")?;
    for (idx, pair) in xy.chunks_exact(2).enumerate() {
        let set = ctx
            .seq_set_x(&mut seq, idx, pair[0])
            .or_engine("seq_set_x")
            .and_then(|()| ctx.seq_set_y(&mut seq, idx, pair[1]).or_engine("seq_set_y"));
        if let Err(err) = set {
            tracing::debug!(idx, %err, "releasing partially filled sequence");
            ctx.seq_destroy(seq);
            return Err(err);
        }
    }
    Ok(seq)
}
