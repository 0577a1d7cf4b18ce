//! Flow control and application event loop.
//!
//! A "flow" is the game state driving the engine: it loads models during
//! init, reacts to input, and enqueues draws each frame. The engine owns the
//! window, the GPU context and the two draw queues, and calls back into the
//! flow at the right points of the frame.
//!
//! # Lifecycle
//!
//! 1. `on_init()` is called once with the context and both draw queues
//! 2. `on_window_events()` / `on_device_events()` are called per input event
//! 3. `on_update()` is called every frame with the elapsed time
//! 4. `on_render()` is called every frame to fill the draw queues
//! 5. the engine flushes both queues into one render pass and presents

use std::{iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::Context,
    data_structures::texture::Texture,
    render::{DrawQueues, MeshBatch, ScenePass, UnitBatch},
};

/// Trait for implementing the game state the engine runs.
///
/// The flow registers its models with the draw queues in `on_init` and
/// enqueues draws in `on_render`. Everything between frames (input, movement,
/// simulation) happens in the event hooks and `on_update`.
pub trait GameFlow {
    /// Initialize the flow.
    ///
    /// Load models here and register them with the draw queues. This is also
    /// the place to configure the context (clear colour, camera start
    /// position) and to install a text overlay for the FPS readout.
    fn on_init(
        &mut self,
        ctx: &mut Context,
        units: &mut DrawQueues<UnitBatch>,
        terrain: &mut DrawQueues<MeshBatch>,
    ) -> anyhow::Result<()>;

    /// Handle window events (keyboard, resize, etc.).
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent);

    /// Handle raw device events (mouse hardware input).
    fn on_device_events(&mut self, ctx: &Context, event: &DeviceEvent);

    /// Update state every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &mut Context, dt: Duration);

    /// Enqueue this frame's draws.
    ///
    /// Called once per frame after `on_update`. Both queues are empty again
    /// after the frame is flushed.
    fn on_render(
        &mut self,
        ctx: &Context,
        units: &mut DrawQueues<UnitBatch>,
        terrain: &mut DrawQueues<MeshBatch>,
    );
}

/// Application state bundle: GPU context, draw queues, and surface status.
pub struct AppState {
    pub(crate) ctx: Context,
    units: DrawQueues<UnitBatch>,
    terrain: DrawQueues<MeshBatch>,
    is_surface_configured: bool,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self, fps: u32) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            render_pass.set_pipeline(&self.ctx.scene_pipeline);
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.light.bind_group, &[]);

            {
                let mut pass = ScenePass::new(&self.ctx.queue, &mut render_pass);
                self.units.flush(&mut pass);
                self.terrain.flush(&mut pass);
            }

            if let Some(text) = &mut self.ctx.text {
                let screen = [self.ctx.config.width as f32, self.ctx.config.height as f32];
                text.draw(
                    &self.ctx.queue,
                    &mut render_pass,
                    &format!("FPS: {}", fps),
                    0.0,
                    0.0,
                    screen,
                    [1.0, 1.0, 0.0],
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<F: GameFlow> {
    flow: F,
    state: Option<AppState>,
    last_time: Instant,
    frame_count: u32,
    fps: u32,
    fps_timer: Duration,
}

impl<F: GameFlow> App<F> {
    fn new(flow: F) -> Self {
        Self {
            flow,
            state: None,
            last_time: Instant::now(),
            frame_count: 0,
            fps: 0,
            fps_timer: Duration::from_millis(0),
        }
    }
}

impl<F: GameFlow> ApplicationHandler<()> for App<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes();
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let ctx = match futures::executor::block_on(Context::new(window)) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("App initialization failed. Cannot create the main context: {}", e);
                event_loop.exit();
                return;
            }
        };

        let mut state = AppState {
            ctx,
            units: DrawQueues::new(),
            terrain: DrawQueues::new(),
            is_surface_configured: false,
        };
        if let Err(e) = self
            .flow
            .on_init(&mut state.ctx, &mut state.units, &mut state.terrain)
        {
            log::error!("Flow initialization failed: {}", e);
            event_loop.exit();
            return;
        }

        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(state);
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
        self.flow.on_device_events(&state.ctx, &event);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);
        self.flow.on_window_events(&state.ctx, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                self.frame_count += 1;
                self.fps_timer += dt;
                if self.fps_timer >= Duration::from_secs(1) {
                    self.fps = self.frame_count;
                    log::info!("{} fps", self.fps);
                    self.frame_count = 0;
                    self.fps_timer = Duration::from_millis(0);
                }

                // Update the camera
                state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt);
                state
                    .ctx
                    .camera
                    .uniform
                    .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &state.ctx.camera.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                );
                state.ctx.queue.write_buffer(
                    &state.ctx.light.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.light.uniform]),
                );

                self.flow.on_update(&mut state.ctx, dt);
                self.flow
                    .on_render(&state.ctx, &mut state.units, &mut state.terrain);

                match state.render(self.fps) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run<F: GameFlow>(flow: F) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop: EventLoop<()> = EventLoop::new()?;
    let mut app = App::new(flow);
    event_loop.run_app(&mut app)?;

    Ok(())
}
