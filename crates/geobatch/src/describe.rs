//! Type and cardinality metadata in one call.

use serde::Serialize;

use crate::engine::{Engine, TypeTag};
use crate::error::{MarshalError, OrEngine};

/// Geometry metadata. Counts that do not apply to the type are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GeomInfo {
    /// Raw engine type id (may lie outside [`TypeTag`]).
    pub type_id: i32,
    pub num_geometries: usize,
    /// LineString and LinearRing only.
    pub num_points: Option<usize>,
    /// Polygon only.
    pub num_interior_rings: Option<usize>,
}

impl GeomInfo {
    #[inline]
    pub fn tag(&self) -> Option<TypeTag> {
        TypeTag::from_raw(self.type_id)
    }
}

pub fn describe<E: Engine>(ctx: &E, g: &E::Geom) -> Result<GeomInfo, MarshalError> {
    let type_id = ctx.type_id(g).or_engine("type_id")?;
    let num_geometries = ctx.num_geometries(g).or_engine("num_geometries")?;
    let mut info = GeomInfo {
        type_id,
        num_geometries,
        num_points: None,
        num_interior_rings: None,
    };
    match TypeTag::from_raw(type_id) {
        Some(TypeTag::LineString | TypeTag::LinearRing) => {
            info.num_points = Some(ctx.num_points(g).or_engine("num_points")?);
        }
        Some(TypeTag::Polygon) => {
            info.num_interior_rings =
                Some(ctx.num_interior_rings(g).or_engine("num_interior_rings")?);
        }
        _ => {}
    }
    Ok(info)
}
