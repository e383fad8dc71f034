// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Venn layout demo for `vizir_venn`.
//!
//! Reads set records from a JSON file (or uses a built-in example), runs the layout and writes
//! an SVG preview plus, optionally, the layout records as JSON.

mod svg;

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use kurbo::Rect;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vizir_venn::{FieldMapping, SetDatum, SolverParams, VennSpec};

/// Lay out an area-proportional Venn diagram and write it as SVG.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of set records. Defaults to a three-set example.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Record field holding the set list.
    #[arg(long, default_value = "sets")]
    sets_field: String,
    /// Record field holding the size.
    #[arg(long, default_value = "size")]
    size_field: String,
    /// Record field holding the display label.
    #[arg(long, default_value = "label")]
    label_field: String,
    /// Output width in pixels.
    #[arg(long, default_value_t = 600.0)]
    width: f64,
    /// Output height in pixels.
    #[arg(long, default_value_t = 350.0)]
    height: f64,
    /// Padding in pixels.
    #[arg(long, default_value_t = 15.0)]
    padding: f64,
    /// Normalisation orientation in radians.
    #[arg(long, default_value_t = PI)]
    orientation: f64,
    /// Normalise the layout before scaling.
    #[arg(long)]
    normalize: bool,
    /// With `--normalize`, orient clusters separately and pack them together.
    #[arg(long)]
    pack_clusters: bool,
    /// Seed for the randomised initial layout.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Where to write the SVG preview.
    #[arg(long, default_value = "vizir_venn_demo.svg")]
    svg: PathBuf,
    /// Where to write the layout records as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    let data = match &args.input {
        Some(path) => {
            let mapping = FieldMapping::new()
                .with_sets(&args.sets_field)
                .with_size(&args.size_field)
                .with_label(&args.label_field);
            load_records(path, &mapping)?
        }
        None => sample_data(),
    };

    let spec = VennSpec::new()
        .with_size(args.width, args.height)
        .with_padding(args.padding)
        .with_orientation(args.orientation)
        .with_normalize(args.normalize)
        .with_pack_clusters(args.pack_clusters)
        .with_solver(SolverParams::new().with_seed(args.seed));
    let layout = spec.layout(&data).context("invalid layout options")?;
    if layout.circles.is_empty() {
        warn!("no drawable sets among {} records", data.len());
    }

    let view = Rect::new(0.0, 0.0, args.width, args.height);
    let svg = svg::render_svg(&layout, view, &svg::SvgStyle::default());
    fs::write(&args.svg, svg).with_context(|| format!("write {}", args.svg.display()))?;
    info!(
        circles = layout.circles.len(),
        intersections = layout.intersections.len(),
        "wrote {}",
        args.svg.display()
    );

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn load_records(path: &Path, mapping: &FieldMapping) -> Result<Vec<SetDatum>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rows: Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let Some(count) = rows.as_array().map(Vec::len) else {
        bail!("{}: expected a JSON array of records", path.display());
    };
    let data = mapping.data_from_json(&rows);
    if data.len() < count {
        warn!("skipped {} malformed records", count - data.len());
    }
    Ok(data)
}

fn sample_data() -> Vec<SetDatum> {
    vec![
        SetDatum::new(["A"], 12.0),
        SetDatum::new(["B"], 12.0),
        SetDatum::new(["C"], 12.0),
        SetDatum::new(["A", "B"], 2.0),
        SetDatum::new(["A", "C"], 2.0),
        SetDatum::new(["B", "C"], 2.0),
        SetDatum::new(["A", "B", "C"], 1.0),
    ]
}
