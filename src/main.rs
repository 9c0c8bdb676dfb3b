//! afe-import - CLI tool to import ForceEffect diagrams and export them as DXF.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use afe_core::config::{
    DEFAULT_COMPONENT_WIDTH, DEFAULT_EXTRUDE_DISTANCE, DEFAULT_JOINT_HOLE_DIAMETER,
};
use afe_core::{
    emit_drawing, generate_dxf, parse_afe_file, validate_model, Dimensions, RecordingEngine,
};

/// Import Autodesk ForceEffect (.afe) diagrams as sketches and extruded parts.
#[derive(Parser, Debug)]
#[command(name = "afe-import")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input AFE file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output DXF file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scale applied to the whole diagram
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Width of each member part (cm)
    #[arg(long, default_value_t = DEFAULT_COMPONENT_WIDTH)]
    component_width: f64,

    /// Thickness of each extruded part (cm)
    #[arg(long, default_value_t = DEFAULT_EXTRUDE_DISTANCE)]
    extrude_distance: f64,

    /// Diameter of the joint holes (cm)
    #[arg(long, default_value_t = DEFAULT_JOINT_HOLE_DIAMETER)]
    joint_hole_diameter: f64,

    /// Only draw the reference lines, no parts
    #[arg(long)]
    no_extrude: bool,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Print the parsed model as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let dimensions = Dimensions {
        scale: args.scale,
        component_width: args.component_width,
        extrude_distance: args.extrude_distance,
        joint_hole_diameter: args.joint_hole_diameter,
    };

    info!("Processing: {}", args.input.display());

    let model = parse_afe_file(&args.input, Dimensions::default())
        .with_context(|| format!("Failed to parse {}", args.input.display()))?
        .configure(dimensions)?;

    info!(
        "Parsed {}: {} joints, {} components, {} supports ({})",
        model.display_title(),
        model.joints.len(),
        model.components.len(),
        model.supports.len(),
        model.length_unit
    );

    if let (Some(width), Some(height)) = (model.bounds.width(), model.bounds.height()) {
        info!("Diagram extents: {:.3} x {:.3} cm", width, height);
    }
    if !model.line_lengths.is_empty() {
        info!(
            "Member lengths: {:.3} to {:.3} cm",
            model.line_lengths.min, model.line_lengths.max
        );
    }

    let validation = validate_model(&model);
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&model)?;
        println!("{}", json);
        return Ok(());
    }

    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    let mut engine = RecordingEngine::new();
    let summary = emit_drawing(&model, !args.no_extrude, &mut engine)
        .context("Failed to generate geometry")?;

    info!(
        "Drew {} member lines, {} parts ({} extrudes, {} cuts)",
        summary.reference_lines, summary.parts, summary.extrudes, summary.cuts
    );

    let dxf = generate_dxf(&engine, &model.display_title())?;

    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("dxf");
        path
    });

    std::fs::write(&output_path, &dxf)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {}", output_path.display());

    Ok(())
}
