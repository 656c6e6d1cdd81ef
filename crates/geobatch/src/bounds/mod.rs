//! Bounding boxes across the engine boundary.
//!
//! Purpose
//! - `extend`/`bounds`: one call walks a whole geometry tree and widens a box,
//!   instead of one host call per node and per coordinate.
//! - `build`: one call turns a box back into an engine geometry (empty point,
//!   point, or rectangle polygon).
//!
//! References
//! - Code cross-refs: `BoundingBox`, `crate::codec::CopyStrategy`,
//!   `crate::engine::TypeTag`

mod build;
mod extend;
mod types;

pub use build::build;
pub use extend::{bounds, extend};
pub use types::BoundingBox;
