//! mesh-analyze info command - display mesh statistics.

use anyhow::Result;
use colored::Colorize;
use mesh_analysis::VertexAdjacency;
use serde::Serialize;

use crate::{output, Cli, OutputFormat, ShapeArgs};

#[derive(Serialize)]
struct MeshInfo {
    name: String,
    vertices: usize,
    faces: usize,
    edges: usize,
    surface_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(shape: &ShapeArgs, cli: &Cli) -> Result<()> {
    let mesh = shape.build();
    let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);

    let bounds = mesh.bounds().map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    let info = MeshInfo {
        name: mesh.name.clone(),
        vertices: mesh.vertex_count(),
        faces: mesh.face_count(),
        edges: adjacency.edge_count(),
        surface_area: mesh.surface_area(),
        bounds,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "Shape".cyan(), info.name);
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!("  {}: {}", "Faces".cyan(), info.faces);
                println!("  {}: {}", "Edges".cyan(), info.edges);
                println!("  {}: {:.4}", "Surface area".cyan(), info.surface_area);

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: {:.2} x {:.2} x {:.2}",
                        "Dimensions".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                }
            }
        }
    }

    Ok(())
}
