use std::{fs::File, io::BufReader};

use anyhow::Context;
use log::{info, warn};
use stlcodec::{decode_with, encode_with, is_stl_path, DecodeConfig, EncodeConfig};

use crate::args;

pub fn convert_command(args: args::ConvertArgs) -> anyhow::Result<()> {
    if !is_stl_path(&args.output) {
        warn!("{} does not have an .stl extension", args.output.display());
    }

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let config = DecodeConfig {
        format: args.input_format.map(Into::into),
    };
    let mesh = decode_with(BufReader::new(input), &config)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    let config = EncodeConfig {
        format: args.format.into(),
        header: args.header,
    };
    let output = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    encode_with(&mesh, &config, output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        "wrote {} facets to {} as {}",
        mesh.facet_count(),
        args.output.display(),
        config.format
    );
    Ok(())
}
