//! Opaque per-geometry tag, stored and returned verbatim.

use crate::engine::Engine;

/// Host-defined word attached to a geometry. The engine never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UserDataTag(pub usize);

#[inline]
pub fn user_data<E: Engine>(ctx: &E, g: &E::Geom) -> UserDataTag {
    UserDataTag(ctx.user_data(g))
}

#[inline]
pub fn set_user_data<E: Engine>(ctx: &E, g: &mut E::Geom, tag: UserDataTag) {
    ctx.set_user_data(g, tag.0);
}
