use glam::{Mat4, Vec2};
use glium::{
    glutin::surface::WindowSurface, uniform, Display, DrawError, Frame, Surface, SwapBuffersError,
};
use log::{debug, error};
use thiserror::Error;
use winit::{
    event::{ElementState, Event, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

use crate::{
    graph::GraphView,
    layout::{GridLayout, DEFAULT_MARGIN, DEFAULT_NODE_RADIUS},
};

mod draw;
mod shapes;

pub type Color = [f32; 4];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile shader program: {0}")]
    Program(#[from] glium::ProgramCreationError),
    #[error("failed to create vertex buffer: {0}")]
    Buffer(#[from] glium::vertex::BufferCreationError),
    #[error("instanced drawing is not supported")]
    Instancing,
    #[error("draw call failed: {0}")]
    Draw(#[from] DrawError),
    #[error("failed to present frame: {0}")]
    Swap(#[from] SwapBuffersError),
}

/// Colors and sizes used to draw the graph.
#[derive(Clone, Debug)]
pub struct Style {
    pub background: Color,
    pub edge: Color,
    pub outline: Color,
    pub active: Color,
    pub inactive: Color,
    pub node_radius: f32,
    pub margin: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: [0.94, 0.94, 0.94, 1.0],
            edge: [0.5, 0.5, 0.5, 1.0],
            outline: [0.0, 0.0, 0.0, 1.0],
            active: [1.0, 0.0, 0.0, 1.0],
            inactive: [1.0, 1.0, 1.0, 1.0],
            node_radius: DEFAULT_NODE_RADIUS,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Draws a static picture of a [`GraphView`] in a window.
///
/// The view is only read. Advance the graph before handing it over.
pub struct Renderer<V>
where
    V: GraphView + 'static,
{
    view: V,
    title: String,
    width: u32,
    height: u32,
    style: Style,
}

impl<V> Renderer<V>
where
    V: GraphView + 'static,
{
    pub fn new(view: V) -> Self {
        RendererBuilder::default().build(view)
    }

    pub fn builder() -> RendererBuilder {
        RendererBuilder::default()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::new(
            self.view.node_count(),
            self.style.node_radius,
            self.style.margin,
        )
    }

    /// Opens the window and blocks until it is closed.
    pub fn create_window(self) -> Result<(), RenderError> {
        let event_loop = winit::event_loop::EventLoopBuilder::new().build();

        let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(self.width, self.height)
            .build(&event_loop);

        self.run_render_loop(event_loop, display, window)
    }

    fn run_render_loop(
        self,
        event_loop: EventLoop<()>,
        display: Display<WindowSurface>,
        window: Window,
    ) -> Result<(), RenderError> {
        let programs = draw::Programs::new(&display)?;
        let layout = self.layout();
        debug!(
            "drawing {} nodes on a {}x{} grid",
            self.view.node_count(),
            layout.columns(),
            layout.rows()
        );

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        *control_flow = ControlFlow::Exit;
                    }
                    WindowEvent::Resized(size) => {
                        display.resize(size.into());
                        window.request_redraw();
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed
                            && input.virtual_keycode == Some(VirtualKeyCode::Escape)
                        {
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                    _ => (),
                },
                Event::RedrawRequested(_) => {
                    if let Err(e) = self.draw_graph(&display, &programs, &layout) {
                        error!("failed to draw graph: {e}");
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => (),
            }
        })
    }

    fn draw_graph(
        &self,
        display: &Display<WindowSurface>,
        programs: &draw::Programs,
        layout: &GridLayout,
    ) -> Result<(), RenderError> {
        let mut target = display.draw();
        let [r, g, b, a] = self.style.background;
        target.clear_color(r, g, b, a);

        let viewport = viewport(&target);
        let uniforms = uniform! {
            projection: build_projection_matrix(viewport).to_cols_array_2d()
        };
        let params = glium::DrawParameters::default();

        let drawn = draw::draw_edges(
            &self.view,
            layout,
            viewport,
            &self.style,
            &mut target,
            display,
            programs,
            &uniforms,
            &params,
        )
        .and_then(|_| {
            draw::draw_nodes(
                &self.view,
                layout,
                viewport,
                &self.style,
                &mut target,
                display,
                programs,
                &uniforms,
                &params,
            )
        });

        // a frame must always be finished, even after a failed draw call
        let finished = target.finish();
        drawn?;
        finished?;
        Ok(())
    }
}

/// Builder for `Renderer`
pub struct RendererBuilder {
    title: String,
    width: u32,
    height: u32,
    style: Style,
}

impl RendererBuilder {
    /// Get a Instance of `RendererBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown in the title bar
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in pixels
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Radius of a node circle in pixels
    pub fn node_radius(mut self, node_radius: f32) -> Self {
        self.style.node_radius = node_radius;
        self
    }

    /// Free space between two neighboring circles in pixels
    pub fn margin(mut self, margin: f32) -> Self {
        self.style.margin = margin;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Constructs a instance of `Renderer`
    pub fn build<V>(self, view: V) -> Renderer<V>
    where
        V: GraphView + 'static,
    {
        Renderer {
            view,
            title: self.title,
            width: self.width,
            height: self.height,
            style: self.style,
        }
    }
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self {
            title: "Ready".to_string(),
            width: 800,
            height: 800,
            style: Style::default(),
        }
    }
}

fn viewport(target: &Frame) -> Vec2 {
    let (width, height) = target.get_dimensions();
    Vec2::new(width as f32, height as f32)
}

/// Maps pixel coordinates (origin top left) to clip space.
fn build_projection_matrix(viewport: Vec2) -> Mat4 {
    Mat4::orthographic_rh_gl(0.0, viewport.x, viewport.y, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_builder_settings_reach_layout() {
        let graph = Graph::from_edges(9, [(0, 8)]).unwrap();
        let renderer = Renderer::builder()
            .title("automaton")
            .size(300, 200)
            .node_radius(5.0)
            .margin(10.0)
            .build(graph);

        let layout = renderer.layout();
        assert_eq!(layout.columns(), 3);
        assert_eq!(layout.pitch(), 20.0);
        assert_eq!(renderer.title, "automaton");
        assert_eq!((renderer.width, renderer.height), (300, 200));
        assert_eq!(renderer.view().edge_count(), 1);
    }

    #[test]
    fn test_projection_maps_screen_corners() {
        let m = build_projection_matrix(Vec2::new(800.0, 600.0));
        let top_left = m.project_point3(glam::Vec3::new(0.0, 0.0, 0.0));
        let bottom_right = m.project_point3(glam::Vec3::new(800.0, 600.0, 0.0));
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }
}
