//! Desktop backdrop: faint dust particles under a ring of floating shapes,
//! both pushed aside by the cursor, with a dot and lagging ring drawn on top.
//!
//! Environment:
//! - `DRIFT_PARTICLES`: dust particle count
//! - `DRIFT_FPS`: simulation frame cap for both fields
//! - `DRIFT_REDUCED_MOTION`, `DRIFT_TOUCH`: render a still frame instead
//! - `RUST_LOG`: log filter

use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result};
use drift_engine::coords::Viewport;
use drift_engine::device::GpuInit;
use drift_engine::logging::{init_logging, LoggingConfig};
use drift_engine::prefs::MotionPreferences;
use drift_engine::scene::{Sprite, SpriteSurface};
use drift_engine::time::StatsSample;
use drift_engine::window::{App, AppControl, Runtime, RuntimeConfig, WindowHost};
use drift_engine::{CursorConfig, CursorFollower, FieldConfig, ParticleField};
use winit::dpi::LogicalSize;

struct Layer {
    name: &'static str,
    field: ParticleField<SpriteSurface>,
    last_stats: Option<StatsSample>,
}

struct Studio {
    configs: Vec<(&'static str, FieldConfig)>,
    layers: Vec<Layer>,
    cursor: Option<CursorFollower<SpriteSurface>>,
}

impl App for Studio {
    fn start(&mut self, host: &Rc<WindowHost>) -> Result<()> {
        for (name, config) in self.configs.drain(..) {
            let mut field = ParticleField::new(config, host.host(), SpriteSurface::new())
                .with_context(|| format!("invalid {name} config"))?;
            field.mount().with_context(|| format!("failed to mount {name}"))?;
            log::info!("{name}: {} elements", field.element_count());
            self.layers.push(Layer { name, field, last_stats: None });
        }

        let mut cursor = CursorFollower::new(CursorConfig::default(), host.host(), SpriteSurface::new())
            .context("invalid cursor config")?;
        cursor.mount().context("failed to mount cursor")?;
        self.cursor = Some(cursor);
        Ok(())
    }

    fn resized(&mut self, viewport: Viewport) {
        for layer in &mut self.layers {
            if let Err(e) = layer.field.resize(viewport) {
                log::warn!("{}: {e}", layer.name);
            }
        }
    }

    fn frame(&mut self, _now_ms: f64) -> AppControl {
        for layer in &mut self.layers {
            let stats = layer.field.stats();
            if stats != layer.last_stats {
                if let Some(s) = stats {
                    log::debug!("{}: {} fps ({:.1} ms)", layer.name, s.fps, s.frame_time_ms);
                }
                layer.last_stats = stats;
            }
        }
        AppControl::Continue
    }

    fn sprites(&self, out: &mut Vec<Sprite>) {
        for layer in &self.layers {
            out.extend(layer.field.surface().sprites());
        }
        if let Some(cursor) = &self.cursor {
            out.extend(cursor.surface().sprites());
        }
    }
}

/// Parses `name` if set. A set but malformed value is an error.
fn env_override<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name}={raw:?} is not valid")),
        Err(_) => Ok(None),
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut dust = FieldConfig::particles();
    let mut shapes = FieldConfig::shapes();

    if let Some(count) = env_override::<usize>("DRIFT_PARTICLES")? {
        dust.element_count = count;
    }
    if let Some(fps) = env_override::<f64>("DRIFT_FPS")? {
        dust.target_fps = fps;
        shapes.target_fps = fps;
    }
    dust.validate().context("dust config rejected")?;
    shapes.validate().context("shapes config rejected")?;

    let config = RuntimeConfig {
        title: "drift".to_string(),
        initial_size: LogicalSize::new(1280.0, 800.0),
        prefs: MotionPreferences::from_env(),
    };
    let gpu = GpuInit {
        present_mode: wgpu::PresentMode::AutoVsync,
        ..GpuInit::default()
    };

    let studio = Studio {
        configs: vec![("dust", dust), ("shapes", shapes)],
        layers: Vec::new(),
        cursor: None,
    };

    Runtime::run(config, gpu, studio)
}
