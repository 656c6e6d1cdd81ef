//! Curated surface for host bindings (UNSTABLE).
//!
//! Important
//! - Binding layers should import from here rather than reaching into module
//!   paths, so internal moves stay cheap.
//! - Breaking changes are allowed while the engine contract settles.

// Boundary types
pub use crate::engine::{Engine, EngineVersion, Extensions, MessageSink, TypeTag};
pub use crate::error::MarshalError;
// Coordinates
pub use crate::codec::{decode, decode_all, decode_into, encode, CopyStrategy, Dims};
// Bounds
pub use crate::bounds::{bounds, build as geom_from_bounds, extend as extend_bounds, BoundingBox};
// Introspection and tagging
pub use crate::describe::{describe, GeomInfo};
pub use crate::userdata::{set_user_data, user_data, UserDataTag};
// Callbacks
pub use crate::relay::{
    clear_error_relay, register_error_relay, DistanceRelay, ErrorRelay, QueryRelay,
};
// Version gating
pub use crate::compat::{Capabilities, EntryPoints, MakeValidMethod};
// Reference engine
pub use crate::engine::memory::{Live, MemoryCfg, MemoryEngine, MemoryIndex, Shape};
