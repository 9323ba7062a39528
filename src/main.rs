//! `springforge`: write a spring mesh and its rig description to disk.
//!
//! ```bash
//! # Default tension spring into the current directory
//! springforge
//!
//! # Compression spring from a parameter file, ASCII STL
//! springforge --config springs/compression.toml --ascii
//!
//! # Override single parameters
//! springforge --wire-diameter 1.5 --height 60 --hook-type closed
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use springforge::config::{CONFIG_ENV, load_config};
use springforge::scene::MeshScene;
use springforge::{HookAngle, HookType, Material, generate, io};

#[derive(Parser, Debug, Clone)]
#[command(name = "springforge", version, about = "Generate rigged spring meshes")]
struct Cli {
    /// TOML parameter file
    #[arg(long, short = 'c', env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Output directory, overrides the config
    #[arg(long, short = 'o')]
    out_dir: Option<PathBuf>,

    /// Write ASCII STL
    #[arg(long)]
    ascii: bool,

    /// Skip the JSON scene description
    #[arg(long)]
    no_json: bool,

    /// Coil diameter D in millimetres
    #[arg(long)]
    coil_diameter: Option<f64>,

    /// Wire diameter d in millimetres
    #[arg(long)]
    wire_diameter: Option<f64>,

    /// Hook inside diameter D2 in millimetres
    #[arg(long)]
    hook_diameter: Option<f64>,

    /// Coil height H in millimetres
    #[arg(long)]
    height: Option<f64>,

    /// Hook neck height h in millimetres
    #[arg(long)]
    neck: Option<f64>,

    /// open, closed or none
    #[arg(long, value_parser = parse_hook_type)]
    hook_type: Option<HookType>,

    /// Angle between the hooks: 180 or 90
    #[arg(long, value_parser = parse_hook_angle)]
    hook_angle: Option<HookAngle>,

    /// chromium, black_oxide, stainless_steel or zinc
    #[arg(long, value_parser = parse_material)]
    material: Option<Material>,

    /// Label written on two bones of the rig
    #[arg(long)]
    signature: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_hook_type(s: &str) -> Result<HookType, String> {
    match s {
        "open" | "1" => Ok(HookType::Open),
        "closed" | "2" => Ok(HookType::Closed),
        "none" | "3" => Ok(HookType::None),
        _ => Err(format!("unknown hook type '{s}'")),
    }
}

fn parse_hook_angle(s: &str) -> Result<HookAngle, String> {
    match s {
        "180" => Ok(HookAngle::Deg180),
        "90" => Ok(HookAngle::Deg90),
        _ => Err(format!("hook angle must be 180 or 90, got '{s}'")),
    }
}

fn parse_material(s: &str) -> Result<Material, String> {
    match s {
        "chromium" => Ok(Material::Chromium),
        "black_oxide" => Ok(Material::BlackOxide),
        "stainless_steel" => Ok(Material::StainlessSteel),
        "zinc" => Ok(Material::Zinc),
        _ => Err(format!("unknown material '{s}'")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let spring = &mut config.spring;
    if let Some(v) = cli.coil_diameter {
        spring.coil_diameter = v;
    }
    if let Some(v) = cli.wire_diameter {
        spring.wire_diameter = v;
    }
    if let Some(v) = cli.hook_diameter {
        spring.hook_diameter = v;
    }
    if let Some(v) = cli.height {
        spring.height = v;
    }
    if let Some(v) = cli.neck {
        spring.neck = v;
    }
    if let Some(v) = cli.hook_type {
        spring.hook_type = v;
    }
    if let Some(v) = cli.hook_angle {
        spring.hook_angle = v;
    }
    if let Some(v) = cli.material {
        spring.material = v;
    }
    if cli.signature.is_some() {
        config.rig.signature = cli.signature;
    }
    if let Some(dir) = cli.out_dir {
        config.output.directory = dir;
    }
    config.output.ascii |= cli.ascii;
    config.output.scene_json &= !cli.no_json;

    let model = generate(&config.spring, &config.rig).context("generating spring")?;
    for adjustment in &model.adjustments {
        log::info!("adjusted {adjustment}");
    }
    let scene = MeshScene::from_model(&model).context("building mesh")?;
    let welded = scene.welded.context("mesh was not welded")?;

    let dir = &config.output.directory;
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stem = model.name.replace(' ', "");

    let stl_path = dir.join(format!("{stem}.stl"));
    let bytes = if config.output.ascii {
        welded.to_stl_ascii(&model.name).into_bytes()
    } else {
        welded.to_stl_binary()?
    };
    std::fs::write(&stl_path, bytes).with_context(|| format!("writing {}", stl_path.display()))?;
    log::info!(
        "wrote {} ({} triangles, {} vertices)",
        stl_path.display(),
        welded.triangle_count(),
        welded.vertex_count()
    );

    if config.output.scene_json {
        let json_path = dir.join(format!("{stem}.json"));
        std::fs::write(&json_path, io::scene_json(&model)?)
            .with_context(|| format!("writing {}", json_path.display()))?;
        log::info!("wrote {}", json_path.display());
    }
    Ok(())
}
