use std::path::PathBuf;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use dither_ink::app::App;
use dither_ink::{InkError, Rgb, Settings, SurfacePositioning};

/// Transparent overlay window painting a dithered ink trail behind the pointer
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON settings file (camelCase keys, all optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ink colour as #rrggbb
    #[arg(long, value_parser = parse_color)]
    color: Option<Rgb>,

    /// Overlay opacity in [0, 1]
    #[arg(long)]
    opacity: Option<f32>,

    /// Dither cell size in logical pixels
    #[arg(long)]
    dither_size: Option<f32>,

    /// Overlay positioning
    #[arg(long, value_enum)]
    position: Option<SurfacePositioning>,
}

fn parse_color(text: &str) -> Result<Rgb, String> {
    Rgb::from_hex(text).map_err(|e| e.to_string())
}

impl Cli {
    fn settings(&self) -> Result<Settings, InkError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(color) = self.color {
            settings.color = color;
        }
        if let Some(opacity) = self.opacity {
            settings.opacity = opacity;
        }
        if let Some(dither_size) = self.dither_size {
            settings.dither_size = dither_size;
        }
        if let Some(position) = self.position {
            settings.surface_positioning = position;
        }
        Ok(settings)
    }
}

fn main() -> Result<(), InkError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    log::debug!("Settings: {:?}", settings);

    let event_loop = EventLoop::new()?;
    // Ticks are driven by redraw requests, one per display refresh
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    Ok(())
}
