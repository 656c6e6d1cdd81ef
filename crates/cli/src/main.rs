use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geobatch::api::{
    bounds, decode_all, describe, encode, geom_from_bounds, register_error_relay, BoundingBox,
    Capabilities, Dims, Engine, EngineVersion, ErrorRelay, GeomInfo, MemoryEngine, Shape, TypeTag,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;

#[derive(Parser)]
#[command(name = "geobatch")]
#[command(about = "Batched geometry marshalling against the in-process engine")]
struct Cmd {
    /// Engine version the handle reports (drives copy strategy and shims)
    #[arg(long, default_value = "3.12.0")]
    engine_version: String,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Bounding box of a shape, and the geometry rebuilt from it
    Bounds {
        #[arg(long)]
        input: PathBuf,
    },
    /// Type and cardinality metadata of a shape and its parts
    Describe {
        #[arg(long)]
        input: PathBuf,
    },
    /// Encode every coordinate sequence and decode it back
    Roundtrip {
        #[arg(long)]
        input: PathBuf,
    },
    /// Capabilities resolved for the engine version
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let version = EngineVersion::parse(&cmd.engine_version)
        .with_context(|| format!("--engine-version {:?}", cmd.engine_version))?;
    let mut ctx = MemoryEngine::with_version(version);
    register_error_relay(&mut ctx, ErrorRelay::new(log_engine_message, version));
    let out = cmd.out.as_deref();
    match cmd.action {
        Action::Bounds { input } => io::emit(&run_bounds(&ctx, &io::read_shape(&input)?)?, out),
        Action::Describe { input } => {
            io::emit(&run_describe(&ctx, &io::read_shape(&input)?)?, out)
        }
        Action::Roundtrip { input } => {
            io::emit(&run_roundtrip(&ctx, &io::read_shape(&input)?)?, out)
        }
        Action::Report => io::emit(&report(&ctx), out),
    }
}

fn log_engine_message(message: &str, version: &EngineVersion) {
    tracing::warn!(engine = %version, message, "engine message");
}

fn load(ctx: &MemoryEngine, shape: &Shape) -> Result<<MemoryEngine as Engine>::Geom> {
    match ctx.load(shape) {
        Some(g) => Ok(g),
        None => bail!("engine rejected the input shape"),
    }
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    bounds: BoundingBox,
    empty: bool,
    display: String,
    rebuilt_type: &'static str,
    rebuilt: Option<Shape>,
}

fn run_bounds(ctx: &MemoryEngine, shape: &Shape) -> Result<BoundsReport> {
    let caps = Capabilities::detect(ctx);
    let g = load(ctx, shape)?;
    let bbox = bounds(ctx, &g);
    ctx.geom_destroy(g);
    let bbox = bbox?;
    tracing::info!(bounds = %bbox, "bounds");
    let (tag, rebuilt) = geom_from_bounds(ctx, caps.copy, &bbox)?;
    let rebuilt_shape = ctx.to_shape(&rebuilt);
    ctx.geom_destroy(rebuilt);
    Ok(BoundsReport {
        bounds: bbox,
        empty: bbox.is_empty(),
        display: bbox.to_string(),
        rebuilt_type: tag.name(),
        rebuilt: rebuilt_shape,
    })
}

#[derive(Debug, Serialize)]
struct DescribeReport {
    info: GeomInfo,
    type_name: Option<&'static str>,
    parts: Vec<GeomInfo>,
}

fn run_describe(ctx: &MemoryEngine, shape: &Shape) -> Result<DescribeReport> {
    let g = load(ctx, shape)?;
    let report = describe_tree(ctx, &g);
    ctx.geom_destroy(g);
    report
}

fn describe_tree(ctx: &MemoryEngine, g: &<MemoryEngine as Engine>::Geom) -> Result<DescribeReport> {
    let info = describe(ctx, g)?;
    let mut parts = Vec::new();
    let is_collection = matches!(
        info.tag(),
        Some(
            TypeTag::MultiPoint
                | TypeTag::MultiLineString
                | TypeTag::MultiPolygon
                | TypeTag::GeometryCollection
        )
    );
    if is_collection {
        for n in 0..info.num_geometries {
            let part = ctx
                .geometry_n(g, n)
                .with_context(|| format!("geometry_n({n})"))?;
            parts.push(describe(ctx, part)?);
        }
    }
    tracing::info!(type_id = info.type_id, parts = parts.len(), "describe");
    Ok(DescribeReport {
        info,
        type_name: info.tag().map(|t| t.name()),
        parts,
    })
}

#[derive(Debug, Serialize)]
struct RoundtripReport {
    copy: String,
    sequences: usize,
    ordinates: usize,
    mismatches: usize,
}

fn run_roundtrip(ctx: &MemoryEngine, shape: &Shape) -> Result<RoundtripReport> {
    let caps = Capabilities::detect(ctx);
    let mut report = RoundtripReport {
        copy: format!("{:?}", caps.copy),
        sequences: 0,
        ordinates: 0,
        mismatches: 0,
    };
    for (arity, buf) in io::leaf_sequences(shape) {
        let dims = Dims::new(arity)?;
        let size = buf.len() / dims.count();
        let seq = encode(ctx, caps.copy, size, dims, &buf)?;
        let back = decode_all(ctx, caps.copy, &seq);
        ctx.seq_destroy(seq);
        let (back_dims, back) = back?;
        if back_dims != dims {
            bail!("sequence came back as {back_dims:?}, sent {dims:?}");
        }
        report.sequences += 1;
        report.ordinates += buf.len();
        report.mismatches += buf
            .iter()
            .zip(&back)
            .filter(|(a, b)| a.to_bits() != b.to_bits())
            .count();
    }
    tracing::info!(
        sequences = report.sequences,
        mismatches = report.mismatches,
        "roundtrip"
    );
    Ok(report)
}

#[derive(Debug, Serialize)]
struct CapabilityReport {
    crate_version: &'static str,
    engine_version: String,
    supported: bool,
    copy: String,
    shimmed: Vec<&'static str>,
}

fn report(ctx: &MemoryEngine) -> CapabilityReport {
    let caps = Capabilities::detect(ctx);
    CapabilityReport {
        crate_version: geobatch::VERSION,
        engine_version: caps.version.to_string(),
        supported: caps.is_supported(),
        copy: format!("{:?}", caps.copy),
        shimmed: caps.shimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        Shape::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![4.0, 0.0],
            vec![4.0, 2.0],
            vec![0.0, 2.0],
            vec![0.0, 0.0],
        ]])
    }

    #[test]
    fn bounds_report_rebuilds_rectangle() {
        let ctx = MemoryEngine::default();
        let r = run_bounds(&ctx, &square()).unwrap();
        assert_eq!(r.bounds, BoundingBox::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(r.rebuilt_type, "Polygon");
        assert_eq!(r.rebuilt, Some(square()));
        assert_eq!(ctx.live().total(), 0);
    }

    #[test]
    fn describe_lists_collection_parts() {
        let ctx = MemoryEngine::default();
        let r = run_describe(
            &ctx,
            &Shape::GeometryCollection(vec![square(), Shape::Point(vec![1.0, 1.0])]),
        )
        .unwrap();
        assert_eq!(r.type_name, Some("GeometryCollection"));
        assert_eq!(r.parts.len(), 2);
        assert_eq!(r.parts[0].num_interior_rings, Some(0));
        assert_eq!(ctx.live().total(), 0);
    }

    #[test]
    fn roundtrip_is_exact_on_old_and_new_engines() {
        let shape = Shape::MultiLineString(vec![
            vec![vec![0.1, 0.2, 0.3], vec![1e-300, -0.0, f64::MAX]],
            vec![vec![5.0, 6.0]],
        ]);
        for version in [EngineVersion::new(3, 9, 1), EngineVersion::new(3, 12, 0)] {
            let ctx = MemoryEngine::with_version(version);
            let r = run_roundtrip(&ctx, &shape).unwrap();
            assert_eq!((r.sequences, r.ordinates, r.mismatches), (2, 8, 0));
            assert_eq!(ctx.live().total(), 0);
        }
    }

    #[test]
    fn report_lists_shims_for_old_engine() {
        let ctx = MemoryEngine::with_version(EngineVersion::new(3, 11, 0));
        let r = report(&ctx);
        assert_eq!(r.copy, "Bulk");
        assert_eq!(r.shimmed.len(), 3);
    }
}
