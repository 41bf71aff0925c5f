//! mesh-analyze color command - compute a derived color field.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use mesh_analysis::{
    average_geodesic_distance, gaussian_curvature, triangle_quality, AgdParams, GeodesicSolver,
    ScalarField, SolveMethod, VertexAdjacency,
};
use serde::Serialize;

use crate::{output, Cli, OutputFormat, ShapeArgs};

/// Field selector.
#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    /// Average geodesic distance
    Agd,
    /// Gaussian curvature (angle-deficit approximation)
    Curvature,
    /// Triangle quality (circumradius / min edge)
    Quality,
}

impl FieldArg {
    fn name(&self) -> &'static str {
        match self {
            FieldArg::Agd => "average-geodesic-distance",
            FieldArg::Curvature => "gaussian-curvature",
            FieldArg::Quality => "triangle-quality",
        }
    }
}

#[derive(Serialize)]
struct FieldSummary {
    mesh: String,
    field: &'static str,
    values: usize,
    min: f64,
    max: f64,
    mean: f64,
    histogram: Vec<usize>,
}

pub fn run(
    shape: &ShapeArgs,
    field_arg: FieldArg,
    samples: usize,
    seed: Option<u64>,
    cli: &Cli,
) -> Result<()> {
    let mesh = shape.build();

    let field: ScalarField = match field_arg {
        FieldArg::Agd => {
            let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
            let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
            average_geodesic_distance(&mesh, &adjacency, &mut solver, &AgdParams { samples, seed })?
        }
        FieldArg::Curvature => gaussian_curvature(&mesh),
        FieldArg::Quality => triangle_quality(&mesh),
    };

    let min = field.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = field.values.iter().copied().fold(0.0, f64::max);
    let mean = if field.is_empty() {
        0.0
    } else {
        field.values.iter().sum::<f64>() / field.len() as f64
    };

    // Ten-bucket histogram over [0, 1].
    let mut histogram = vec![0usize; 10];
    for &v in &field.values {
        let bucket = ((v * 10.0) as usize).min(9);
        histogram[bucket] += 1;
    }

    let summary = FieldSummary {
        mesh: mesh.name.clone(),
        field: field_arg.name(),
        values: field.len(),
        min: if min.is_finite() { min } else { 0.0 },
        max,
        mean,
        histogram,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Color Field".bold().underline());
                println!("  {}: {}", "Mesh".cyan(), summary.mesh);
                println!("  {}: {}", "Field".cyan(), summary.field);
                println!("  {}: {}", "Values".cyan(), summary.values);
                println!(
                    "  {}: min {:.4}  max {:.4}  mean {:.4}",
                    "Range".cyan(),
                    summary.min,
                    summary.max,
                    summary.mean
                );
                println!("  {}:", "Histogram".cyan());
                let peak = summary.histogram.iter().copied().max().unwrap_or(1).max(1);
                for (i, count) in summary.histogram.iter().enumerate() {
                    let bar = "#".repeat(count * 40 / peak);
                    println!("    {:.1}-{:.1} | {:5} {}", i as f64 / 10.0, (i + 1) as f64 / 10.0, count, bar);
                }
            }
        }
    }

    Ok(())
}
