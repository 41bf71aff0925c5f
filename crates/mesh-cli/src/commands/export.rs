//! mesh-analyze export-matrix command - background N×N matrix export.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_analysis::{export_in_background, SolveMethod};
use serde::Serialize;

use crate::{output, Cli, OutputFormat, ShapeArgs};

#[derive(Serialize)]
struct ExportResult {
    mesh: String,
    vertices: usize,
    method: &'static str,
    path: String,
}

pub fn run(shape: &ShapeArgs, output_dir: &Path, method: SolveMethod, cli: &Cli) -> Result<()> {
    let mesh = shape.build();
    let name = mesh.name.clone();
    let vertices = mesh.vertex_count();

    let handle = export_in_background(mesh, method, output_dir.to_path_buf());

    // Poll the worker; the interactive editor keeps rendering here, the CLI
    // just shows progress.
    if matches!(cli.format, OutputFormat::Text) && !cli.quiet {
        while !handle.is_finished() {
            eprint!("\r  exporting... {:3.0}%", handle.progress() * 100.0);
            std::thread::sleep(Duration::from_millis(50));
        }
        eprintln!("\r  exporting... 100%");
    }

    let written = handle
        .join()
        .with_context(|| format!("Matrix export for '{}' failed", name))?;

    let result = ExportResult {
        mesh: name,
        vertices,
        method: method.name(),
        path: written.display().to_string(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Matrix Export".bold().underline());
                println!("  {}: {}", "Mesh".cyan(), result.mesh);
                println!("  {}: {}x{}", "Matrix".cyan(), result.vertices, result.vertices);
                println!("  {}: {}", "Method".cyan(), result.method);
                println!("  {}: {}", "Written to".cyan(), result.path);
            }
        }
    }

    Ok(())
}
