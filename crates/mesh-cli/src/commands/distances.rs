//! mesh-analyze distances command - single-source geodesic distances.

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_analysis::{GeodesicSolver, SolveMethod, VertexAdjacency};
use serde::Serialize;

use crate::{output, Cli, OutputFormat, ShapeArgs};

#[derive(Serialize)]
struct DistanceSummary {
    mesh: String,
    source: u32,
    method: &'static str,
    reachable: usize,
    unreachable: usize,
    max_distance: f64,
    mean_distance: f64,
    elapsed_ms: f64,
}

pub fn run(shape: &ShapeArgs, source: u32, method: SolveMethod, cli: &Cli) -> Result<()> {
    let mesh = shape.build();
    let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
    let mut solver = GeodesicSolver::new(mesh.vertex_count(), method);

    solver
        .solve(&mesh, &adjacency, source)
        .with_context(|| format!("Failed to solve from vertex {}", source))?;

    let distances = solver.distance_row();
    let reachable: Vec<f64> = distances.iter().copied().filter(|d| d.is_finite()).collect();
    let max_distance = reachable.iter().copied().fold(0.0, f64::max);
    let mean_distance = if reachable.is_empty() {
        0.0
    } else {
        reachable.iter().sum::<f64>() / reachable.len() as f64
    };

    let summary = DistanceSummary {
        mesh: mesh.name.clone(),
        source,
        method: method.name(),
        reachable: reachable.len(),
        unreachable: distances.len() - reachable.len(),
        max_distance,
        mean_distance,
        elapsed_ms: solver.last_solve_ms(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Geodesic Distances".bold().underline());
                println!("  {}: {}", "Mesh".cyan(), summary.mesh);
                println!("  {}: {}", "Source".cyan(), summary.source);
                println!("  {}: {}", "Method".cyan(), summary.method);
                println!("  {}: {}", "Reachable".cyan(), summary.reachable);
                println!("  {}: {}", "Unreachable".cyan(), summary.unreachable);
                println!("  {}: {:.6}", "Max distance".cyan(), summary.max_distance);
                println!("  {}: {:.6}", "Mean distance".cyan(), summary.mean_distance);
                println!("  {}: {:.3} ms", "Elapsed".cyan(), summary.elapsed_ms);
            }
        }
    }

    Ok(())
}
