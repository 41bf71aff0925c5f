//! mesh-analyze: command-line front end for the mesh analysis engine.
//!
//! Runs geodesic-distance, curvature and triangle-quality analysis over
//! procedurally generated meshes, exports N×N geodesic distance matrices,
//! and steps the cloth simulation. File import is intentionally out of
//! scope; the `--shape` selector provides the geometry.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_analysis=info` - Basic operation logging
//! - `RUST_LOG=mesh_analysis=debug` - Detailed progress logging
//! - `RUST_LOG=mesh_analysis::timing=debug` - Performance timing
//!
//! # Example
//!
//! ```bash
//! # Geodesic distances on a sphere, linear-scan strategy
//! mesh-analyze distances --shape sphere --sectors 24 --stacks 16 --source 0 --method linear-scan
//!
//! # Export the full distance matrix of a grid plane
//! mesh-analyze export-matrix --shape plane --divisor 16 --output-dir ./out
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mesh_analysis::{shapes, Mesh, SolveMethod};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{cloth, color, distances, export, info, path};

/// mesh-analyze - geodesic distances, curvature and cloth simulation.
///
/// Analyze triangle meshes and visualize derived quantities as color
/// fields, from the command line.
#[derive(Parser)]
#[command(name = "mesh-analyze")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Procedural shape selection shared by the analysis commands.
#[derive(Args, Clone)]
pub struct ShapeArgs {
    /// Shape to generate
    #[arg(long, default_value = "plane")]
    shape: ShapeKind,

    /// Edge length for plane shapes
    #[arg(long, default_value = "2.0")]
    size: f64,

    /// Cells per side for plane shapes
    #[arg(long, default_value = "8")]
    divisor: u32,

    /// Radius for sphere shapes
    #[arg(long, default_value = "1.0")]
    radius: f64,

    /// Longitudinal resolution for sphere shapes
    #[arg(long, default_value = "16")]
    sectors: u32,

    /// Latitudinal resolution for sphere shapes
    #[arg(long, default_value = "12")]
    stacks: u32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShapeKind {
    /// Square grid plane
    Plane,
    /// UV sphere
    Sphere,
    /// Unit cube
    Cube,
}

impl ShapeArgs {
    /// Generate the selected mesh.
    pub fn build(&self) -> Mesh {
        match self.shape {
            ShapeKind::Plane => shapes::grid_plane(self.size, self.divisor),
            ShapeKind::Sphere => shapes::uv_sphere(self.radius, self.sectors, self.stacks),
            ShapeKind::Cube => shapes::unit_cube(),
        }
    }
}

/// Shortest-path strategy selector.
#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Binary min-heap priority queue
    MinHeap,
    /// Linear scan of the candidate list
    LinearScan,
}

impl From<MethodArg> for SolveMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::MinHeap => SolveMethod::MinHeap,
            MethodArg::LinearScan => SolveMethod::LinearScan,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics
    Info {
        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Compute single-source geodesic distances
    Distances {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Source vertex index
        #[arg(long, default_value = "0")]
        source: u32,

        /// Shortest-path strategy
        #[arg(long, default_value = "min-heap")]
        method: MethodArg,
    },

    /// Reconstruct the geodesic path between two vertices
    Path {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Start vertex index
        #[arg(long)]
        start: u32,

        /// End vertex index
        #[arg(long)]
        end: u32,

        /// Shortest-path strategy
        #[arg(long, default_value = "min-heap")]
        method: MethodArg,
    },

    /// Compute a color field (AGD, curvature or quality)
    Color {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Which field to compute
        #[arg(long, default_value = "curvature")]
        field: color::FieldArg,

        /// Sample count for average geodesic distance
        #[arg(long, default_value = "10")]
        samples: usize,

        /// Seed for the farthest-point sampling start vertex
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export the N×N geodesic distance matrix to M_for_<name>.out
    ExportMatrix {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Directory for the output file
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,

        /// Shortest-path strategy
        #[arg(long, default_value = "min-heap")]
        method: MethodArg,
    },

    /// Run the cloth simulation for a number of steps
    Cloth {
        /// Cloth edge length
        #[arg(long, default_value = "4.0")]
        size: f64,

        /// Cells per side
        #[arg(long, default_value = "8")]
        divisor: u32,

        /// Number of simulation steps
        #[arg(long, default_value = "120")]
        steps: u32,

        /// Wind direction as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        wind: Option<[f64; 3]>,

        /// Sphere collider as x,y,z,radius
        #[arg(long, value_parser = parse_vec4)]
        sphere: Option<[f64; 4]>,

        /// Pin the top row of the cloth
        #[arg(long)]
        pin_top: bool,
    },
}

fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {} components", parts.len()));
    }
    Ok([parts[0], parts[1], parts[2]])
}

fn parse_vec4(s: &str) -> Result<[f64; 4], String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    if parts.len() != 4 {
        return Err(format!(
            "expected x,y,z,radius but got {} components",
            parts.len()
        ));
    }
    Ok([parts[0], parts[1], parts[2], parts[3]])
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG takes precedence over -v flags.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "mesh_analysis=info,mesh_cloth=info",
            2 => "mesh_analysis=debug,mesh_cloth=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Info { shape } => info::run(shape, &cli),
        Commands::Distances {
            shape,
            source,
            method,
        } => distances::run(shape, *source, (*method).into(), &cli),
        Commands::Path {
            shape,
            start,
            end,
            method,
        } => path::run(shape, *start, *end, (*method).into(), &cli),
        Commands::Color {
            shape,
            field,
            samples,
            seed,
        } => color::run(shape, *field, *samples, *seed, &cli),
        Commands::ExportMatrix {
            shape,
            output_dir,
            method,
        } => export::run(shape, output_dir, (*method).into(), &cli),
        Commands::Cloth {
            size,
            divisor,
            steps,
            wind,
            sphere,
            pin_top,
        } => cloth::run(*size, *divisor, *steps, *wind, *sphere, *pin_top, &cli),
    }
}
