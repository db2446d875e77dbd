// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sonimage::config::{EngineConfig, Scene};
use sonimage::engine::{Engine, FrameReport, OverlayPixel, PointerOrigin, ScanDirection};
use sonimage::image::SonifiedImage;
use sonimage::session::{Event, Session};
use sonimage::{haptic, voice};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Explores an image by sound and touch."
)]
struct Cli {
    /// The engine config. Defaults are used if absent.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the layers of a scene as the engine sees them.
    Layers {
        /// The path to the scene file.
        scene: PathBuf,
    },
    /// Moves the pointer along a path and reports every frame.
    Explore {
        /// The path to the scene file.
        scene: PathBuf,
        /// The pointer path. Should be in the form <X>,<Y>;<X>,<Y>;...
        /// For example, 10,10;12,10;14,11
        path: String,
        /// The report format.
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Sweeps the whole image and reports every frame.
    Scan {
        /// The path to the scene file.
        scene: PathBuf,
        /// The sweep direction.
        #[arg(value_enum)]
        direction: ScanDirection,
        /// The report format.
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Draws the cursor overlay at a point.
    Overlay {
        /// The path to the scene file.
        scene: PathBuf,
        x: i32,
        y: i32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::deserialize(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Layers { scene } => {
            let image = open(&scene)?;
            println!("Description: {}", image.description());
            println!("Base layer: {}", image.base().name());
            println!("Sounding layers (count: {}):", image.layer_names().len());
            for layer in image.sounding_layers() {
                match layer.dimensions() {
                    Some((width, height)) => println!("- {} ({}x{})", layer.name(), width, height),
                    None => println!("- {} (failed to build)", layer.name()),
                }
            }
        }
        Commands::Explore {
            scene,
            path,
            format,
        } => {
            let points = parse_path(&path)?;
            let engine = engine(&scene, &config)?;
            let (reports_tx, mut reports_rx) = mpsc::unbounded_channel();
            let session = Session::spawn(engine, config.scan_interval()?, Some(reports_tx));

            for (x, y) in points {
                session.send(Event::PointerMoved { x, y }).await?;
            }
            session.close().await?;

            let mut reports: Vec<FrameReport> = Vec::new();
            while let Some(report) = reports_rx.recv().await {
                reports.push(report);
            }
            print(&reports, format)?;
        }
        Commands::Scan {
            scene,
            direction,
            format,
        } => {
            let mut engine = engine(&scene, &config)?;
            let mut reports: Vec<FrameReport> = engine.start_scan(direction).into_iter().collect();
            while let Some(report) = engine.scan_step() {
                reports.push(report);
            }
            print(&reports, format)?;
        }
        Commands::Overlay { scene, x, y } => {
            let mut engine = engine(&scene, &config)?;
            engine.pointer_moved(x, y, PointerOrigin::Manual);
            engine.silence();
            print!("{}", render_overlay(&engine.overlay()));
        }
    }

    Ok(())
}

fn open(scene: &Path) -> Result<SonifiedImage, Box<dyn Error>> {
    let scene = Scene::deserialize(scene)?;
    Ok(SonifiedImage::open(&scene.to_descriptor()))
}

/// Creates an engine over the scene with its surface attached at the scene
/// size.
fn engine(scene: &Path, config: &EngineConfig) -> Result<Engine, Box<dyn Error>> {
    let scene = Scene::deserialize(scene)?;
    let image = SonifiedImage::open(&scene.to_descriptor());
    let voices = voice::get_device(config.voice_device(), config.note_policy())?;
    let haptics = haptic::get_device(config.haptic_device())?;

    let mut engine = Engine::new(image, config, voices, haptics.as_ref())?;
    engine.attach_surface(scene.width(), scene.height());
    Ok(engine)
}

fn parse_path(path: &str) -> Result<Vec<(i32, i32)>, Box<dyn Error>> {
    path.split(';')
        .map(str::trim)
        .filter(|point| !point.is_empty())
        .map(|point| -> Result<(i32, i32), Box<dyn Error>> {
            let (x, y) = point
                .split_once(',')
                .ok_or_else(|| format!("point '{}' should be in the form <X>,<Y>", point))?;
            Ok((x.trim().parse()?, y.trim().parse()?))
        })
        .collect()
}

fn print<T: Serialize>(value: &T, format: Format) -> Result<(), Box<dyn Error>> {
    match format {
        Format::Yaml => print!("{}", serde_yml::to_string(value)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Draws the overlay as text: `#` for object pixels, `.` for the rest.
fn render_overlay(pixels: &[OverlayPixel]) -> String {
    let (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) = (
        pixels.iter().map(|p| p.x).min(),
        pixels.iter().map(|p| p.x).max(),
        pixels.iter().map(|p| p.y).min(),
        pixels.iter().map(|p| p.y).max(),
    ) else {
        return String::new();
    };

    let width = (max_x - min_x + 1) as usize;
    let height = (max_y - min_y + 1) as usize;
    let mut grid = vec![vec![' '; width]; height];
    for pixel in pixels {
        grid[(pixel.y - min_y) as usize][(pixel.x - min_x) as usize] =
            if pixel.is_object { '#' } else { '.' };
    }
    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string() + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("1,2; 3 , 4;").expect("path"),
            vec![(1, 2), (3, 4)]
        );
        assert!(parse_path("1;2").is_err());
        assert!(parse_path("a,2").is_err());
    }

    #[test]
    fn test_render_overlay() {
        let pixel = |x, y, is_object| OverlayPixel { x, y, is_object };
        let pixels = vec![pixel(4, 4, true), pixel(5, 4, false), pixel(5, 5, true)];
        assert_eq!(render_overlay(&pixels), "#.\n #\n");
        assert_eq!(render_overlay(&[]), "");
    }
}
