//! Flat interleaved buffers ⇄ engine coordinate sequences.
//!
//! A flat buffer holds `size * dims` values, tuple-major and dimension-minor:
//! `x0 y0 [z0] [m0] x1 y1 ...`. One call moves a whole sequence instead of one
//! crossing per ordinate.
//!
//! Caller responsibility
//! - `dims` is not checked against the sequence's own arity before copying.
//!   Asking for more ordinates than the sequence has is reported by the engine
//!   (as an exception), not by this module.
//!
//! References
//! - Code cross-refs: `CopyStrategy` is resolved by `crate::compat::Capabilities`.

use crate::cfg::BULK_COPY_SINCE;
use crate::engine::{Engine, EngineVersion};
use crate::error::{MarshalError, OrEngine};

/// Coordinate arity: X, Y and optional Z, then M.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dims {
    Xy,
    Xyz,
    Xyzm,
}

impl Dims {
    pub fn new(dims: usize) -> Result<Self, MarshalError> {
        match dims {
            2 => Ok(Dims::Xy),
            3 => Ok(Dims::Xyz),
            4 => Ok(Dims::Xyzm),
            _ => Err(MarshalError::InvalidDims { dims }),
        }
    }

    #[inline]
    pub fn count(self) -> usize {
        match self {
            Dims::Xy => 2,
            Dims::Xyz => 3,
            Dims::Xyzm => 4,
        }
    }

    /// `dims > 2`.
    #[inline]
    pub fn has_z(self) -> bool {
        self.count() > 2
    }

    /// `dims > 3`.
    #[inline]
    pub fn has_m(self) -> bool {
        self.count() > 3
    }
}

/// How ordinates cross the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyStrategy {
    /// One bulk buffer copy per sequence.
    Bulk,
    /// One engine call per (tuple, dimension) pair.
    PerOrdinate,
}

impl CopyStrategy {
    pub fn for_version(version: EngineVersion) -> Self {
        if version.at_least(BULK_COPY_SINCE) {
            CopyStrategy::Bulk
        } else {
            CopyStrategy::PerOrdinate
        }
    }
}

/// `size * dims`, or `BufferLength` (expected saturated) when it overflows.
fn flat_len(size: usize, dims: Dims, actual: usize) -> Result<usize, MarshalError> {
    size.checked_mul(dims.count()).ok_or(MarshalError::BufferLength {
        expected: usize::MAX,
        actual,
    })
}

fn check_len(size: usize, dims: Dims, actual: usize) -> Result<(), MarshalError> {
    let expected = flat_len(size, dims, actual)?;
    if expected != actual {
        return Err(MarshalError::BufferLength { expected, actual });
    }
    Ok(())
}

/// Copy `size` tuples of `dims` ordinates from `seq` into `out`.
///
/// `out.len()` must equal `size * dims`. With `PerOrdinate` the copy stops at
/// the first failing read and the rest of `out` is left as it was.
pub fn decode_into<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    seq: &E::CoordSeq,
    size: usize,
    dims: Dims,
    out: &mut [f64],
) -> Result<(), MarshalError> {
    check_len(size, dims, out.len())?;
    match copy {
        CopyStrategy::Bulk => ctx
            .seq_copy_to_buffer(seq, out, dims.has_z(), dims.has_m())
            .or_engine("seq_copy_to_buffer"),
        CopyStrategy::PerOrdinate => {
            for (idx, tuple) in out.chunks_exact_mut(dims.count()).enumerate() {
                for (dim, slot) in tuple.iter_mut().enumerate() {
                    *slot = ctx.seq_ordinate(seq, idx, dim).or_engine("seq_ordinate")?;
                }
            }
            Ok(())
        }
    }
}

/// Like [`decode_into`], allocating the buffer.
pub fn decode<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    seq: &E::CoordSeq,
    size: usize,
    dims: Dims,
) -> Result<Vec<f64>, MarshalError> {
    let len = flat_len(size, dims, 0)?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| MarshalError::BufferLength { expected: len, actual: 0 })?;
    out.resize(len, 0.0);
    decode_into(ctx, copy, seq, size, dims, &mut out)?;
    Ok(out)
}

/// Decode a whole sequence at its own size and arity.
pub fn decode_all<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    seq: &E::CoordSeq,
) -> Result<(Dims, Vec<f64>), MarshalError> {
    let size = ctx.seq_size(seq).or_engine("seq_size")?;
    let dims = Dims::new(ctx.seq_dims(seq).or_engine("seq_dims")?)?;
    Ok((dims, decode(ctx, copy, seq, size, dims)?))
}

/// New sequence of `size` tuples filled from `buf` (`size * dims` values).
///
/// The sequence belongs to the caller on success. If an element-wise write
/// fails, the partially filled sequence is destroyed before returning.
pub fn encode<E: Engine>(
    ctx: &E,
    copy: CopyStrategy,
    size: usize,
    dims: Dims,
    buf: &[f64],
) -> Result<E::CoordSeq, MarshalError> {
    check_len(size, dims, buf.len())?;
    match copy {
        CopyStrategy::Bulk => ctx
            .seq_copy_from_buffer(buf, size, dims.has_z(), dims.has_m())
            .or_engine("seq_copy_from_buffer"),
        CopyStrategy::PerOrdinate => {
            let mut seq = ctx.seq_create(size, dims.count()).or_engine("seq_create")?;
            if let Err(err) = fill(ctx, &mut seq, dims, buf) {
                tracing::debug!(size, dims = dims.count(), %err, "releasing partially filled sequence");
                ctx.seq_destroy(seq);
                return Err(err);
            }
            Ok(seq)
        }
    }
}

fn fill<E: Engine>(
    ctx: &E,
    seq: &mut E::CoordSeq,
    dims: Dims,
    buf: &[f64],
) -> Result<(), MarshalError> {
    for (idx, tuple) in buf.chunks_exact(dims.count()).enumerate() {
        for (dim, &v) in tuple.iter().enumerate() {
            ctx.seq_set_ordinate(seq, idx, dim, v)
                .or_engine("seq_set_ordinate")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::memory::MemoryEngine;
    use proptest::prelude::*;

    const BOTH: [CopyStrategy; 2] = [CopyStrategy::Bulk, CopyStrategy::PerOrdinate];

    #[test]
    fn dims_flags_follow_count() {
        assert!(!Dims::Xy.has_z() && !Dims::Xy.has_m());
        assert!(Dims::Xyz.has_z() && !Dims::Xyz.has_m());
        assert!(Dims::Xyzm.has_z() && Dims::Xyzm.has_m());
        assert_eq!(Dims::new(1), Err(MarshalError::InvalidDims { dims: 1 }));
        assert_eq!(Dims::new(5), Err(MarshalError::InvalidDims { dims: 5 }));
    }

    #[test]
    fn strategy_switches_at_bulk_copy_version() {
        assert_eq!(
            CopyStrategy::for_version(EngineVersion::new(3, 9, 4)),
            CopyStrategy::PerOrdinate
        );
        assert_eq!(
            CopyStrategy::for_version(EngineVersion::new(3, 10, 0)),
            CopyStrategy::Bulk
        );
    }

    #[test]
    fn per_ordinate_encode_makes_one_call_per_value() {
        let e = MemoryEngine::default();
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let seq = encode(&e, CopyStrategy::PerOrdinate, 2, Dims::Xyz, &buf).unwrap();
        assert_eq!(e.calls("seq_set_ordinate"), 6);
        assert_eq!(e.calls("seq_copy_from_buffer"), 0);
        assert_eq!(seq.coords(), &buf);
        e.seq_destroy(seq);
        assert_eq!(e.live().total(), 0);
    }

    #[test]
    fn bulk_encode_is_a_single_crossing() {
        let e = MemoryEngine::default();
        let buf = [1.0, 2.0, 3.0, 4.0];
        let seq = encode(&e, CopyStrategy::Bulk, 1, Dims::Xyzm, &buf).unwrap();
        assert_eq!(e.total_calls(), 1);
        assert_eq!(seq.dims(), 4);
        e.seq_destroy(seq);
    }

    #[test]
    fn encode_failure_releases_partial_sequence() {
        let e = MemoryEngine::default();
        e.fail_nth("seq_set_ordinate", 5);
        let buf = [0.0; 8];
        let err = encode(&e, CopyStrategy::PerOrdinate, 4, Dims::Xy, &buf).unwrap_err();
        assert_eq!(err, MarshalError::Engine { op: "seq_set_ordinate" });
        assert_eq!(e.calls("seq_set_ordinate"), 5);
        assert_eq!(e.calls("seq_destroy"), 1);
        assert_eq!(e.live().total(), 0);
    }

    #[test]
    fn decode_rejects_dims_above_sequence_arity() {
        let e = MemoryEngine::default();
        let seq = encode(&e, CopyStrategy::Bulk, 2, Dims::Xy, &[0.0, 1.0, 2.0, 3.0]).unwrap();
        for copy in BOTH {
            let err = decode(&e, copy, &seq, 2, Dims::Xyz).unwrap_err();
            assert!(err.is_engine(), "{copy:?}: {err}");
        }
        e.seq_destroy(seq);
    }

    #[test]
    fn per_ordinate_decode_stops_at_first_failure() {
        let e = MemoryEngine::default();
        let seq = encode(&e, CopyStrategy::Bulk, 3, Dims::Xy, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        e.fail_nth("seq_ordinate", 3);
        let mut out = [-1.0; 6];
        let err = decode_into(&e, CopyStrategy::PerOrdinate, &seq, 3, Dims::Xy, &mut out);
        assert_eq!(err, Err(MarshalError::Engine { op: "seq_ordinate" }));
        assert_eq!(e.calls("seq_ordinate"), 3);
        assert_eq!(&out[..2], &[1.0, 2.0]);
        e.seq_destroy(seq);
    }

    #[test]
    fn buffer_length_mismatch_is_reported_before_any_call() {
        let e = MemoryEngine::default();
        let err = encode(&e, CopyStrategy::PerOrdinate, 3, Dims::Xy, &[0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            MarshalError::BufferLength {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(e.total_calls(), 0);
    }

    #[test]
    fn oversized_request_is_a_length_error() {
        let e = MemoryEngine::default();
        let seq = encode(&e, CopyStrategy::Bulk, 1, Dims::Xy, &[0.0, 1.0]).unwrap();
        e.reset_calls();
        for copy in BOTH {
            let err = decode(&e, copy, &seq, usize::MAX / 2, Dims::Xyz).unwrap_err();
            assert_eq!(
                err,
                MarshalError::BufferLength {
                    expected: usize::MAX,
                    actual: 0
                }
            );
            let err = decode(&e, copy, &seq, usize::MAX / 4, Dims::Xy).unwrap_err();
            assert!(matches!(err, MarshalError::BufferLength { actual: 0, .. }), "{err}");
        }
        let err = encode(&e, CopyStrategy::Bulk, usize::MAX, Dims::Xyzm, &[]).unwrap_err();
        assert!(matches!(err, MarshalError::BufferLength { .. }));
        assert_eq!(e.total_calls(), 0);
        e.seq_destroy(seq);
    }

    #[test]
    fn decode_all_uses_the_sequence_shape() {
        let e = MemoryEngine::default();
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let seq = encode(&e, CopyStrategy::Bulk, 2, Dims::Xyz, &buf).unwrap();
        for copy in BOTH {
            assert_eq!(decode_all(&e, copy, &seq).unwrap(), (Dims::Xyz, buf.to_vec()));
        }
        e.fail_nth("seq_dims", 1);
        e.reset_calls();
        let err = decode_all(&e, CopyStrategy::Bulk, &seq).unwrap_err();
        assert_eq!(err, MarshalError::Engine { op: "seq_dims" });
        e.seq_destroy(seq);
    }

    #[test]
    fn empty_sequence_round_trips() {
        let e = MemoryEngine::default();
        for copy in BOTH {
            let seq = encode(&e, copy, 0, Dims::Xyz, &[]).unwrap();
            assert!(decode(&e, copy, &seq, 0, Dims::Xyz).unwrap().is_empty());
            e.seq_destroy(seq);
        }
        assert_eq!(e.live().total(), 0);
    }

    fn flat_input() -> impl Strategy<Value = (usize, Dims, Vec<f64>)> {
        (0usize..24, prop_oneof![Just(Dims::Xy), Just(Dims::Xyz), Just(Dims::Xyzm)]).prop_flat_map(
            |(size, dims)| {
                proptest::collection::vec(-1e9f64..1e9, size * dims.count())
                    .prop_map(move |buf| (size, dims, buf))
            },
        )
    }

    proptest! {
        #[test]
        fn round_trip_preserves_every_ordinate((size, dims, buf) in flat_input(), bulk in any::<bool>()) {
            let e = MemoryEngine::default();
            let copy = if bulk { CopyStrategy::Bulk } else { CopyStrategy::PerOrdinate };
            let seq = encode(&e, copy, size, dims, &buf).unwrap();
            let back = decode(&e, copy, &seq, size, dims).unwrap();
            prop_assert_eq!(back, buf);
            e.seq_destroy(seq);
            prop_assert_eq!(e.live().total(), 0);
        }
    }
}
