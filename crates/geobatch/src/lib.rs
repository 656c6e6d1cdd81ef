//! Batched marshalling between a host and a handle-based geometry engine.
//!
//! Every call across the engine boundary has a fixed cost, so the functions in
//! this crate fuse what would otherwise be many per-coordinate or per-node
//! calls into one aggregated operation per geometry.
//!
//! Layout
//! - `engine`: the handle contract (`Engine`, `Extensions`) and `MemoryEngine`,
//!   an in-process engine used by tests, benches and the CLI.
//! - `codec`: flat interleaved buffers ⇄ coordinate sequences.
//! - `bounds`: bounding-box accumulation and geometry-from-box construction.
//! - `describe`: type and cardinality metadata in one call.
//! - `relay`: error and spatial-index callbacks forwarded to host handlers.
//! - `compat`: capability table resolved once from the engine version.
//! - `userdata`: opaque per-geometry tag.
//!
//! API Policy
//! - Engine-level methods keep the engine's sentinel convention (`None` on an
//!   engine exception). Everything exported from this crate maps that to
//!   `Result<_, MarshalError>`.

pub mod api;
pub mod bounds;
pub mod cfg;
pub mod codec;
pub mod compat;
pub mod describe;
pub mod engine;
pub mod error;
pub mod relay;
pub mod userdata;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::MarshalError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bounds::{bounds, build, extend, BoundingBox};
    pub use crate::codec::{decode, decode_all, decode_into, encode, CopyStrategy, Dims};
    pub use crate::compat::{Capabilities, EntryPoints};
    pub use crate::describe::{describe, GeomInfo};
    pub use crate::engine::{Engine, EngineVersion, Extensions, TypeTag};
    pub use crate::error::MarshalError;
    pub use crate::relay::{register_error_relay, DistanceRelay, ErrorRelay, QueryRelay};
    pub use crate::userdata::{set_user_data, user_data, UserDataTag};
}
