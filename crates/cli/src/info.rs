use anyhow::Context;
use stlcodec::{decode_with, detect_format, DecodeConfig, FileFormat, PREAMBLE_SIZE};
use stlcodec_mesh::{IndexedMesh, Vector3};

use crate::args;

pub fn info_command(args: args::InfoArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.stl_path)
        .with_context(|| format!("failed to read {}", args.stl_path.display()))?;
    let format: FileFormat = match args.format {
        Some(f) => f.into(),
        None => detect_format(&bytes[..bytes.len().min(PREAMBLE_SIZE)]),
    };
    let mesh = decode_with(&bytes[..], &DecodeConfig { format: Some(format) })
        .with_context(|| format!("failed to decode {}", args.stl_path.display()))?;

    println!("format:  {format}");
    println!("facets:  {}", mesh.facet_count());
    println!("points:  {}", mesh.point_count());
    if let Some((min, max)) = bounds(&mesh) {
        println!("min:     {} {} {}", min.x, min.y, min.z);
        println!("max:     {} {} {}", max.x, max.y, max.z);
    }
    Ok(())
}

/// Axis aligned bounds of all points, or `None` for an empty mesh.
fn bounds(mesh: &IndexedMesh) -> Option<(Vector3, Vector3)> {
    let first = *mesh.points.first()?;
    Some(mesh.points.iter().fold((first, first), |(lo, hi), p| {
        (
            Vector3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Vector3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    }))
}
