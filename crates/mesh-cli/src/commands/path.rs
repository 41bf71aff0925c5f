//! mesh-analyze path command - geodesic path between two vertices.

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_analysis::{GeodesicSolver, SolveMethod, VertexAdjacency};
use serde::Serialize;

use crate::{output, Cli, OutputFormat, ShapeArgs};

#[derive(Serialize)]
struct PathResult {
    mesh: String,
    start: u32,
    end: u32,
    method: &'static str,
    reachable: bool,
    distance: Option<f64>,
    path: Vec<u32>,
    elapsed_ms: f64,
}

pub fn run(shape: &ShapeArgs, start: u32, end: u32, method: SolveMethod, cli: &Cli) -> Result<()> {
    let mesh = shape.build();
    let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
    let mut solver = GeodesicSolver::new(mesh.vertex_count(), method);

    solver
        .solve(&mesh, &adjacency, start)
        .with_context(|| format!("Failed to solve from vertex {}", start))?;

    let path = solver.shortest_path(start, end);
    let reachable = !path.is_empty();
    let distance = reachable.then(|| solver.distance(end));

    let result = PathResult {
        mesh: mesh.name.clone(),
        start,
        end,
        method: method.name(),
        reachable,
        distance,
        path: path.clone(),
        elapsed_ms: solver.last_solve_ms(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Geodesic Path".bold().underline());
                println!("  {}: {} -> {}", "Endpoints".cyan(), start, end);
                println!("  {}: {}", "Method".cyan(), result.method);
                if let Some(d) = result.distance {
                    println!("  {}: {:.6}", "Distance".cyan(), d);
                    let chain: Vec<String> = path.iter().map(|v| v.to_string()).collect();
                    println!("  {}: {}", "Path".cyan(), chain.join(" -> "));
                } else {
                    println!("  {}: {}", "Path".cyan(), "unreachable (empty)".yellow());
                }
                println!("  {}: {:.3} ms", "Elapsed".cyan(), result.elapsed_ms);
            }
        }
    }

    Ok(())
}
