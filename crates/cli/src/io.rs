use anyhow::{Context, Result};
use geobatch::api::Shape;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a JSON shape (`{"type": ..., "coordinates": ...}`) from `path`.
pub fn read_shape<P: AsRef<Path>>(path: P) -> Result<Shape> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing shape in {}", path.display()))
}

/// Pretty JSON to `out` (parents created as needed), or to stdout.
pub fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Flat coordinate buffers of every leaf sequence of `shape`, with their arity.
pub fn leaf_sequences(shape: &Shape) -> Vec<(usize, Vec<f64>)> {
    fn flat(tuples: &[Vec<f64>]) -> (usize, Vec<f64>) {
        (tuples.first().map_or(2, Vec::len), tuples.concat())
    }
    match shape {
        Shape::Point(c) if c.is_empty() => Vec::new(),
        Shape::Point(c) => vec![(c.len(), c.clone())],
        Shape::LineString(ts) | Shape::LinearRing(ts) => vec![flat(ts)],
        Shape::MultiPoint(pts) => pts.iter().map(|c| (c.len(), c.clone())).collect(),
        Shape::Polygon(rings) | Shape::MultiLineString(rings) => {
            rings.iter().map(|r| flat(r)).collect()
        }
        Shape::MultiPolygon(polys) => polys.iter().flatten().map(|r| flat(r)).collect(),
        Shape::GeometryCollection(items) => items.iter().flat_map(leaf_sequences).collect(),
    }
}
