//! Parallax demo: three generated backdrop layers scrolling at different
//! speeds over a single window.

mod art;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use strata_engine::coords::{Rect, Viewport};
use strata_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use strata_engine::layer::{
    ImageLayer, LayerSource, LayerType, ScrollBehavior, SourceResolver,
};
use strata_engine::logging::{LoggingConfig, init_logging};
use strata_engine::render::{ImageLayerNode, ImageLayerRenderer, RenderCtx, RenderTarget};
use strata_engine::time::FrameClock;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// One backdrop layer plus its scroll behavior and render node.
struct LayerSlot {
    layer: ImageLayer,
    behavior: ScrollBehavior,
    node: Option<ImageLayerNode>,
}

impl LayerSlot {
    fn new(uri: &str, layer_type: LayerType, behavior: ScrollBehavior) -> Self {
        Self {
            layer: ImageLayer::new(LayerSource::from_uri(uri), layer_type),
            behavior,
            node: None,
        }
    }
}

struct ParallaxApp {
    gpu: Option<Gpu>,
    renderer: Option<ImageLayerRenderer>,
    resolver: SourceResolver,
    clock: FrameClock,
    // Back-to-front paint order.
    slots: Vec<LayerSlot>,
}

impl ParallaxApp {
    fn new(resolver: SourceResolver) -> Self {
        let slots = vec![
            LayerSlot::new(
                "pack://sky.png",
                LayerType::Normal,
                ScrollBehavior::new(-1.0, 0.0),
            ),
            LayerSlot::new(
                "pack://hills_far.png",
                LayerType::Mirrored,
                ScrollBehavior::new(-2.0, 0.0),
            ),
            LayerSlot::new(
                "pack://hills_near.png",
                LayerType::Mirrored,
                ScrollBehavior::new(-5.0, 0.0),
            ),
        ];

        Self {
            gpu: None,
            renderer: None,
            resolver,
            clock: FrameClock::new(),
            slots,
        }
    }

    fn apply_bounds(&mut self) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        let (w, h) = logical_size(gpu);
        for slot in &mut self.slots {
            slot.layer.set_bounds(Rect::new(0.0, 0.0, w, h));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else { return Ok(()) };
        let Some(renderer) = self.renderer.as_mut() else { return Ok(()) };

        // Minimized windows report a zero-size surface; skip the frame.
        let (w, h) = logical_size(gpu);
        let viewport = Viewport::new(w, h);
        if !viewport.is_valid() {
            return Ok(());
        }

        // Tick first: external tick -> offset update -> repaint sync.
        let ft = self.clock.tick();
        for slot in &mut self.slots {
            slot.behavior.advance(&mut slot.layer, ft.dt);
        }

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(()),
                    SurfaceErrorAction::Fatal => {
                        event_loop.exit();
                        Err(anyhow::anyhow!("fatal surface error"))
                    }
                };
            }
        };

        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), viewport);

        for slot in &mut self.slots {
            slot.node = slot
                .layer
                .update_paint_node(&ctx, renderer, &self.resolver, slot.node.take())
                .context("layer repaint failed")?;
        }

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            let mut nodes: Vec<&mut ImageLayerNode> = self
                .slots
                .iter_mut()
                .filter_map(|slot| slot.node.as_mut())
                .collect();
            renderer.render(&ctx, &mut target, Some(CLEAR), &mut nodes);
        }

        gpu.submit(frame);
        gpu.window().request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for ParallaxApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("strata parallax")
            .with_inner_size(LogicalSize::new(960.0, 540.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match pollster::block_on(Gpu::new(window, GpuInit::default())) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("GPU init failed: {err:#}");
                event_loop.exit();
                return;
            }
        };

        self.renderer = Some(ImageLayerRenderer::new(gpu.device()));
        self.gpu = Some(gpu);
        self.clock.reset();
        self.apply_bounds();

        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                }
                self.apply_bounds();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(event_loop) {
                    log::error!("frame failed: {err:#}");
                }
            }
            _ => {}
        }
    }
}

fn logical_size(gpu: &Gpu) -> (f32, f32) {
    let phys = gpu.window().inner_size();
    let scale = gpu.window().scale_factor();
    let logical: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
    (logical.width as f32, logical.height as f32)
}

/// Generates the demo art into a scratch pack directory.
fn write_demo_pack() -> Result<PathBuf> {
    let dir = std::env::temp_dir().join("strata-demo-pack");
    std::fs::create_dir_all(&dir).context("failed to create demo pack directory")?;

    art::sky(256, 512)
        .save(dir.join("sky.png"))
        .context("failed to write sky.png")?;
    art::hills(512, 512, 0.55, 0.12, [30, 60, 45, 255])
        .save(dir.join("hills_far.png"))
        .context("failed to write hills_far.png")?;
    art::hills(512, 512, 0.72, 0.10, [16, 36, 24, 255])
        .save(dir.join("hills_near.png"))
        .context("failed to write hills_near.png")?;

    Ok(dir)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let pack_root = write_demo_pack()?;
    log::info!("demo pack at {}", pack_root.display());

    let resolver = SourceResolver::with_pack_root(pack_root);
    let mut app = ParallaxApp::new(resolver);

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    Ok(())
}
