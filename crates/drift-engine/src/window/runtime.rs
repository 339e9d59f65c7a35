use std::rc::Rc;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::prefs::MotionPreferences;
use crate::render::{RenderCtx, RenderTarget, SpriteRenderer};
use crate::scene::Sprite;

use super::{App, AppControl, WindowHost};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub prefs: MotionPreferences,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "drift".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            prefs: MotionPreferences::default(),
        }
    }
}

/// Runs one window until it is closed or the app asks to exit.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            gpu_init,
            app,
            entry: None,
            sprites: Vec::new(),
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    host: Rc<WindowHost>,
    renderer: SpriteRenderer,
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    entry: Option<WindowEntry>,
    /// Reused every redraw.
    sprites: Vec<Sprite>,
    failure: Option<anyhow::Error>,
}

fn logical_viewport(window: &Window) -> Viewport {
    let size = window.inner_size().to_logical::<f32>(window.scale_factor());
    Viewport::new(size.width, size.height)
}

impl<A: App> RuntimeState<A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let host = WindowHost::new(logical_viewport(&window), window.scale_factor(), self.config.prefs);
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            host: Rc::clone(&host),
            renderer: SpriteRenderer::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.app.start(&host).context("app failed to start")?;
        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };

        entry.with_gpu_mut(|gpu| gpu.resize(size));
        let (viewport, scale) = entry.with_window(|w| (logical_viewport(w), w.scale_factor()));
        entry.borrow_host().set_viewport(viewport, scale);

        if viewport.is_valid() {
            self.app.resized(viewport);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else { return };

        let host = Rc::clone(entry.borrow_host());
        host.fire_due_timers();
        host.run_ticks();

        if self.app.frame(host.now_ms()) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        self.sprites.clear();
        self.app.sprites(&mut self.sprites);

        let sprites = &self.sprites;
        let viewport = host.viewport();
        let mut fatal = false;

        entry.with_mut(|fields| {
            let mut frame = match fields.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    match fields.gpu.recover(e) {
                        SurfaceErrorAction::Fatal => fatal = true,
                        action => log::debug!("frame skipped: {action:?}"),
                    }
                    return;
                }
            };

            let ctx = RenderCtx {
                device: fields.gpu.device(),
                queue: fields.gpu.queue(),
                surface_format: fields.gpu.surface_format(),
                viewport,
            };
            let mut target = RenderTarget {
                encoder: &mut frame.encoder,
                color_view: &frame.view,
                clear: Some(fields.gpu.clear_color()),
            };
            fields.renderer.render(&ctx, &mut target, sprites);
            fields.gpu.submit(frame);
        });

        if fatal {
            self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
        }
    }
}

impl<A: App> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_ref() else { return };

        let host = entry.borrow_host();
        host.fire_due_timers();

        // Continuous redraw; timers also wake the loop between redraws.
        entry.with_window(|w| w.request_redraw());
        match host.next_wake() {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(entry) = self.entry.as_ref() {
            entry.borrow_host().handle_window_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.entry = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    self.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
