//! Native wheel window.
//!
//! A winit event loop rendering the wheel with vello. Space or a click on the
//! center button spins, R reloads the wheel from the store, Esc quits. Every
//! frame advances the [`Spinner`] so the result is revealed when the
//! animation lands.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{error, info, warn};
use vello::kurbo::Point;
use vello::peniko::FontData;
use vello::peniko::color::palette;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window};

use vello::wgpu;

use crate::config::Config;
use crate::render::scene::{self, WheelView};
use crate::spinner::Spinner;
use crate::store::Store;
use crate::wheel::WheelItem;

#[derive(Debug)]
enum RenderState {
    Active {
        surface: Box<RenderSurface<'static>>,
        valid_surface: bool,
        window: Arc<Window>,
    },
    Suspended(Option<Arc<Window>>),
}

struct App {
    context: RenderContext,
    renderers: Vec<Option<Renderer>>,
    state: RenderState,
    scene: Scene,
    fullscreen: bool,
    font_data: Option<FontData>,

    store: Store,
    user_id: String,
    items: Vec<WheelItem>,
    spinner: Spinner,
    cursor: Point,
}

impl App {
    fn reload(&mut self) {
        if let Err(e) = self.store.reload() {
            warn!(target: "viewer", "Reload failed, keeping current wheel: {e}");
            return;
        }
        self.items = self.store.wheel_items(&self.user_id);
        info!(target: "viewer", count = self.items.len(), "Wheel loaded");
    }

    fn spin(&mut self) {
        match self.spinner.spin(&self.items, Instant::now()) {
            Ok(outcome) => info!(
                target: "viewer",
                index = outcome.index,
                target_rotation = outcome.target_rotation,
                "Spin started"
            ),
            Err(e) => warn!(target: "viewer", "Spin ignored: {e}"),
        }
    }

    fn surface_size(&self) -> Option<vello::kurbo::Size> {
        match &self.state {
            RenderState::Active { surface, .. } => Some(vello::kurbo::Size::new(
                surface.config.width as f64,
                surface.config.height as f64,
            )),
            RenderState::Suspended(_) => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let RenderState::Suspended(cached_window) = &mut self.state else {
            return;
        };

        let window = match cached_window.take() {
            Some(window) => window,
            None => match create_window(event_loop, self.fullscreen) {
                Ok(window) => window,
                Err(e) => {
                    error!(target: "viewer", "Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            },
        };

        let size = window.inner_size();
        let surface_future = self.context.create_surface(
            window.clone(),
            size.width,
            size.height,
            wgpu::PresentMode::AutoVsync,
        );
        let surface = match pollster::block_on(surface_future) {
            Ok(surface) => surface,
            Err(e) => {
                error!(target: "viewer", "Error creating surface: {e}");
                event_loop.exit();
                return;
            }
        };

        self.renderers
            .resize_with(self.context.devices.len(), || None);
        if self.renderers[surface.dev_id].is_none() {
            match create_renderer(&self.context, &surface) {
                Ok(renderer) => self.renderers[surface.dev_id] = Some(renderer),
                Err(e) => {
                    error!(target: "viewer", "Couldn't create renderer: {e}");
                    event_loop.exit();
                    return;
                }
            }
        }

        self.state = RenderState::Active {
            surface: Box::new(surface),
            valid_surface: true,
            window,
        };
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let RenderState::Active { window, .. } = &self.state {
            self.state = RenderState::Suspended(Some(window.clone()));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let window = match &self.state {
            RenderState::Active { window, .. } if window.id() == window_id => window.clone(),
            _ => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Space),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.spin(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Character(ref c),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if c.as_str() == "r" || c.as_str() == "R" => self.reload(),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(size) = self.surface_size() {
                    let frame = scene::layout(size.width, size.height);
                    if scene::hits_button(&frame, self.cursor) {
                        self.spin();
                    }
                }
            }

            WindowEvent::Resized(size) => {
                if let RenderState::Active {
                    surface,
                    valid_surface,
                    ..
                } = &mut self.state
                {
                    if size.width != 0 && size.height != 0 {
                        self.context
                            .resize_surface(surface, size.width, size.height);
                        *valid_surface = true;
                    } else {
                        *valid_surface = false;
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(item) = self.spinner.tick(now) {
                    info!(target: "viewer", recipe = %item.recipe_name, "Selected recipe");
                }

                let RenderState::Active {
                    surface,
                    valid_surface: true,
                    ..
                } = &self.state
                else {
                    return;
                };

                self.scene.reset();
                let width = surface.config.width as f64;
                let height = surface.config.height as f64;
                let view = WheelView {
                    items: &self.items,
                    rotation: self.spinner.rotation_at(now),
                    spinning: self.spinner.is_spinning(),
                    result: self.spinner.result(),
                };
                scene::render_wheel(&mut self.scene, width, height, &view, self.font_data.as_ref());

                if let Err(e) = present(&self.context, &mut self.renderers, surface, &self.scene) {
                    error!(target: "viewer", "Frame dropped: {e}");
                }

                // Continuous redraw keeps the animation moving.
                window.request_redraw();
            }

            _ => {}
        }
    }
}

fn present(
    context: &RenderContext,
    renderers: &mut [Option<Renderer>],
    surface: &RenderSurface<'_>,
    scene: &Scene,
) -> Result<()> {
    let device_handle = &context.devices[surface.dev_id];
    let renderer = renderers[surface.dev_id]
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("no renderer for device {}", surface.dev_id))?;

    renderer.render_to_texture(
        &device_handle.device,
        &device_handle.queue,
        scene,
        &surface.target_view,
        &vello::RenderParams {
            base_color: palette::css::WHITE,
            width: surface.config.width,
            height: surface.config.height,
            antialiasing_method: AaConfig::Msaa16,
        },
    )?;

    let surface_texture = surface.surface.get_current_texture()?;

    let mut encoder = device_handle
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Surface Blit"),
        });
    surface.blitter.copy(
        &device_handle.device,
        &mut encoder,
        &surface.target_view,
        &surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default()),
    );
    device_handle.queue.submit([encoder.finish()]);
    surface_texture.present();
    device_handle.device.poll(wgpu::PollType::Poll)?;
    Ok(())
}

/// Open the wheel window for `user_id` and block until it is closed.
pub fn run(store: Store, user_id: String, config: &Config, fullscreen: bool) -> Result<()> {
    let font_data = scene::load_label_font();
    if font_data.is_none() {
        warn!(target: "viewer", "No system font found (Helvetica/Arial/DejaVu Sans); labels will be hidden");
    }

    let mut app = App {
        context: RenderContext::new(),
        renderers: vec![],
        state: RenderState::Suspended(None),
        scene: Scene::new(),
        fullscreen,
        font_data,
        items: store.wheel_items(&user_id),
        store,
        user_id,
        spinner: Spinner::with_duration(config.spin_duration()),
        cursor: Point::ZERO,
    };
    info!(target: "viewer", count = app.items.len(), "Opening wheel window");

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn create_window(event_loop: &ActiveEventLoop, fullscreen: bool) -> Result<Arc<Window>> {
    let mut attr = Window::default_attributes().with_title("meal-wheel");

    if fullscreen {
        attr = attr.with_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        attr = attr.with_inner_size(winit::dpi::LogicalSize::new(720, 640));
    }

    Ok(Arc::new(event_loop.create_window(attr)?))
}

fn create_renderer(render_cx: &RenderContext, surface: &RenderSurface<'_>) -> Result<Renderer> {
    Ok(Renderer::new(
        &render_cx.devices[surface.dev_id].device,
        RendererOptions::default(),
    )?)
}
