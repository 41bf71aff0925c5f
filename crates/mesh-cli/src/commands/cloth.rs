//! mesh-analyze cloth command - run the cloth simulation headless.

use anyhow::Result;
use colored::Colorize;
use mesh_cloth::{Cloth, DEFAULT_GRAVITY};
use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::{output, Cli, OutputFormat};

#[derive(Serialize)]
struct ClothResult {
    particles: usize,
    constraints: usize,
    steps: u32,
    pinned: usize,
    min_y: f64,
    max_y: f64,
    mean_displacement: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    size: f64,
    divisor: u32,
    steps: u32,
    wind: Option<[f64; 3]>,
    sphere: Option<[f64; 4]>,
    pin_top: bool,
    cli: &Cli,
) -> Result<()> {
    let mut cloth = Cloth::new(size, divisor);
    if pin_top {
        cloth.pin_top_row();
    }

    let initial: Vec<Point3<f64>> = cloth.particles().iter().map(|p| p.position).collect();

    for _ in 0..steps {
        cloth.add_gravity(DEFAULT_GRAVITY);
        if let Some([x, y, z]) = wind {
            cloth.add_wind(Vector3::new(x, y, z));
        }
        cloth.step();
        if let Some([x, y, z, radius]) = sphere {
            cloth.sphere_collision(Point3::new(x, y, z), radius);
        }
    }

    let min_y = cloth
        .particles()
        .iter()
        .map(|p| p.position.y)
        .fold(f64::INFINITY, f64::min);
    let max_y = cloth
        .particles()
        .iter()
        .map(|p| p.position.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let mean_displacement = cloth
        .particles()
        .iter()
        .zip(&initial)
        .map(|(p, i)| (p.position - i).norm())
        .sum::<f64>()
        / cloth.particles().len() as f64;

    let result = ClothResult {
        particles: cloth.particles().len(),
        constraints: cloth.constraints().len(),
        steps,
        pinned: cloth.particles().iter().filter(|p| !p.movable).count(),
        min_y,
        max_y,
        mean_displacement,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Cloth Simulation".bold().underline());
                println!("  {}: {}", "Particles".cyan(), result.particles);
                println!("  {}: {}", "Constraints".cyan(), result.constraints);
                println!("  {}: {}", "Pinned".cyan(), result.pinned);
                println!("  {}: {}", "Steps".cyan(), result.steps);
                println!("  {}: {:.4} .. {:.4}", "Y range".cyan(), result.min_y, result.max_y);
                println!(
                    "  {}: {:.4}",
                    "Mean displacement".cyan(),
                    result.mean_displacement
                );
            }
        }
    }

    Ok(())
}
