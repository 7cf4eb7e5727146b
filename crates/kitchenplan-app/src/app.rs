//! Windowed shell: winit event loop, Vello plan rendering and the egui overlay.
//!
//! Each frame runs the UI, routes its action through the [`Editor`], hands
//! the canvas size to the camera and presents the plan under the UI.

use crate::editor::Editor;
use crate::session::SessionError;
use crate::ui::{render_ui, UiAction, UiState};
use kitchenplan_render::{PlanRenderer, RendererError};
use kurbo::{Point, Size};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Canvas placement reported by the UI, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    pub origin: Point,
    pub size: Size,
}

impl CanvasFrame {
    /// Canvas of the last UI pass, if the canvas was laid out.
    pub fn from_ui(ui_state: &UiState) -> Option<Self> {
        let rect = ui_state.canvas_rect?;
        Some(Self {
            origin: Point::new(rect.min.x as f64, rect.min.y as f64),
            size: Size::new(rect.width() as f64, rect.height() as f64),
        })
    }
}

/// Route one UI pass into the editor.
///
/// The camera gets the canvas size before the action so pointer positions
/// map through the same view the user clicked on.
pub fn step_frame(editor: &mut Editor, ui_state: &mut UiState, action: Option<UiAction>) -> bool {
    if let Some(canvas) = CanvasFrame::from_ui(ui_state) {
        editor.set_viewport(canvas.size);
    }
    let changed = action.is_some_and(|action| editor.apply(action));
    editor.sync_ui(ui_state);
    changed
}

struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    plan_renderer: PlanRenderer,
    /// Copies Vello's Rgba8 output onto the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,
}

/// The editor window.
pub struct App {
    editor: Editor,
    state: Option<AppState>,
    render_cx: vello::util::RenderContext,
    /// First error that stopped the event loop.
    error: Option<RendererError>,
}

impl App {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            state: None,
            render_cx: vello::util::RenderContext::new(),
            error: None,
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(mut self) -> Result<(), SessionError> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        match self.error.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<AppState, RendererError> {
        let config = self.editor.config();
        let window_attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| RendererError::InitFailed(e.to_string()))?,
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (config.width, config.height)
        } else {
            (size.width, size.height)
        };

        let surface: RenderSurface<'static> = pollster::block_on(self.render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| RendererError::Surface(e.to_string()))?;

        let device = &self.render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut ui_state = UiState {
            room_input: config.room,
            ..UiState::default()
        };
        self.editor.sync_ui(&mut ui_state);

        log::info!("KitchenPlan window {}x{}", width, height);

        Ok(AppState {
            window,
            surface,
            vello_renderer,
            plan_renderer: PlanRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
        })
    }
}

impl AppState {
    /// Run the UI, apply its action and present the frame.
    fn redraw(
        &mut self,
        render_cx: &vello::util::RenderContext,
        editor: &mut Editor,
    ) -> Result<(), RendererError> {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut self.ui_state);
        });
        if step_frame(editor, &mut self.ui_state, action) {
            self.window.request_redraw();
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let canvas_origin = CanvasFrame::from_ui(&self.ui_state)
            .map(|canvas| canvas.origin)
            .unwrap_or(Point::ZERO);
        let plan = editor.scene();
        let ctx = editor
            .render_context(&plan)
            .with_canvas_origin(canvas_origin)
            .with_scale_factor(self.window.scale_factor());
        let scene = match self.plan_renderer.render_frame(&ctx) {
            Ok(_) => self.plan_renderer.take_scene(),
            Err(e) => {
                log::debug!("Skipping plan: {}", e);
                Scene::new()
            }
        };

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let width = self.surface.config.width;
        let height = self.surface.config.height;
        let params = RenderParams {
            base_color: editor.config().background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello writes through storage bindings, which need Rgba8Unorm.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("plan texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_view = render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, &scene, &render_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        });
        self.texture_blitter
            .copy(device, &mut encoder, &render_view, &surface_view);

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &egui_primitives,
            &screen_descriptor,
        );
        {
            let render_pass = encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        // The plan is already on the surface.
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let response = state.egui_state.on_window_event(&state.window, &event);
        if response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                self.render_cx
                    .resize_surface(&mut state.surface, size.width, size.height);
                state.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.redraw(&self.render_cx, &mut self.editor) {
                    log::warn!("Frame dropped: {}", e);
                }
            }
            _ => {}
        }
    }
}
