use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use particle_field::{
    Animation, DriftConfig, DriftField, FieldConfig, ManualScheduler, ParticleField, PixelSurface,
    Scene, Simulation, StopReason, Viewer,
};

#[derive(Parser)]
#[clap(name = "particle-field", version, about = "Drifting particles joined by proximity lines")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Animate a field or floating motes in a window
    View {
        #[clap(flatten)]
        source: ConfigSource,
        #[clap(long, default_value_t = 1280)]
        width: u32,
        #[clap(long, default_value_t = 720)]
        height: u32,
    },
    /// Run a fixed number of frames off-screen and save the last one as PNG
    Render {
        #[clap(flatten)]
        source: ConfigSource,
        #[clap(long, default_value_t = 800)]
        width: u32,
        #[clap(long, default_value_t = 600)]
        height: u32,
        #[clap(long, default_value_t = 120)]
        frames: u64,
        /// Seed for reproducible output
        #[clap(long)]
        seed: Option<u64>,
        #[clap(short, long, default_value = "particle-field.png")]
        output: PathBuf,
    },
    /// Print a preset as JSON
    Preset {
        #[clap(value_enum)]
        preset: Preset,
        /// Surface width the particle count is chosen for (field presets only)
        #[clap(long, default_value_t = 1280)]
        width: u32,
    },
}

#[derive(clap::Args)]
struct ConfigSource {
    #[clap(long, value_enum, default_value = "hero")]
    preset: Preset,
    /// JSON config file, overrides --preset. Read as a drift config when
    /// --preset is floating.
    #[clap(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Hero,
    Hologram,
    Floating,
}

impl Preset {
    fn scene(self, width: u32) -> Scene {
        match self {
            Preset::Hero => FieldConfig::hero(width).into(),
            Preset::Hologram => FieldConfig::hologram(width).into(),
            Preset::Floating => DriftConfig::default().into(),
        }
    }

    fn load(self, path: &Path) -> Result<Scene, Box<dyn Error>> {
        match self {
            Preset::Hero | Preset::Hologram => Ok(FieldConfig::load(path)?.into()),
            Preset::Floating => Ok(DriftConfig::load(path)?.into()),
        }
    }
}

impl ConfigSource {
    fn resolve(&self, width: u32) -> Result<Scene, Box<dyn Error>> {
        match &self.config {
            Some(path) => {
                info!("loading config from {}", path.display());
                self.preset.load(path)
            }
            None => Ok(self.preset.scene(width)),
        }
    }
}

/// Draw `frames` frames and save the last one.
fn render<A>(animation: A, frames: u64, output: &Path) -> Result<(), Box<dyn Error>>
where
    A: Animation<Surface = PixelSurface>,
{
    let mut sim = Simulation::new(animation, ManualScheduler::new(frames));
    let summary = sim.run();
    if let StopReason::Failed(e) = summary.reason {
        return Err(e.into());
    }

    let (animation, _) = sim.into_parts();
    animation.surface().save_png(output)?;
    info!("wrote {} after {} frames", output.display(), summary.frames);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::View {
            source,
            width,
            height,
        } => {
            let scene = source.resolve(width)?;
            Viewer::new(scene).with_size(width, height).run()?;
        }
        Command::Render {
            source,
            width,
            height,
            frames,
            seed,
            output,
        } => {
            let surface = PixelSurface::new(width, height);
            match (source.resolve(width)?, seed) {
                (Scene::Field(config), Some(seed)) => {
                    render(ParticleField::with_seed(surface, config, seed)?, frames, &output)?
                }
                (Scene::Field(config), None) => {
                    render(ParticleField::new(surface, config)?, frames, &output)?
                }
                (Scene::Drift(config), Some(seed)) => {
                    render(DriftField::with_seed(surface, config, seed)?, frames, &output)?
                }
                (Scene::Drift(config), None) => {
                    render(DriftField::new(surface, config)?, frames, &output)?
                }
            }
        }
        Command::Preset { preset, width } => {
            let json = match preset.scene(width) {
                Scene::Field(config) => config.to_json()?,
                Scene::Drift(config) => config.to_json()?,
            };
            println!("{}", json);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
