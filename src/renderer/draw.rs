use glam::Vec2;
use glium::{
    glutin::surface::WindowSurface,
    implement_vertex,
    uniforms::{AsUniformValue, Uniforms, UniformsStorage},
    Display, DrawParameters, Frame, Program, Surface,
};

use super::{shapes, RenderError, Style};
use crate::{graph::GraphView, layout::GridLayout};

/// Segments used to approximate a circle.
const CIRCLE_RESOLUTION: usize = 24;

/// Width of the dark ring around every node, in pixels.
const OUTLINE_WIDTH: f32 = 1.0;

static VERTEX_SHADER_SRC: &str = r#"
#version 150

in vec3 position;
in vec4 color;
out vec4 vertex_color;

uniform mat4 projection;

void main() {
    vertex_color = color;
    gl_Position = projection * vec4(position, 1.0);
}
"#;

static INSTANCE_SHADER_SRC: &str = r#"
#version 150

in vec3 position;
in vec4 color;
in vec4 color_attr;
in vec2 world_position;
in float scale;

out vec4 vertex_color;

uniform mat4 projection;

void main() {
    vertex_color = color_attr;
    gl_Position = projection * vec4(position.xy * scale + world_position, 0.0, 1.0);
}
"#;

static FRAGMENT_SHADER_SRC: &str = r#"
#version 140

in vec4 vertex_color;
out vec4 color;

void main() {
    color = vec4(vertex_color);
}
"#;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

implement_vertex!(Vertex, position, color);

/// Per-node data for the instanced circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attr {
    color_attr: [f32; 4],
    world_position: [f32; 2],
    scale: f32,
}
implement_vertex!(Attr, color_attr, world_position, scale);

/// Shader programs, compiled once per window.
pub struct Programs {
    lines: Program,
    circles: Program,
}

impl Programs {
    pub fn new(display: &Display<WindowSurface>) -> Result<Self, RenderError> {
        Ok(Self {
            lines: Program::from_source(display, VERTEX_SHADER_SRC, FRAGMENT_SHADER_SRC, None)?,
            circles: Program::from_source(
                display,
                INSTANCE_SHADER_SRC,
                FRAGMENT_SHADER_SRC,
                None,
            )?,
        })
    }
}

/// Two vertices per edge, placed on the centers of its nodes.
pub fn edge_vertices<V>(
    view: &V,
    layout: &GridLayout,
    viewport: Vec2,
    style: &Style,
) -> Vec<Vertex>
where
    V: GraphView,
{
    view.edges()
        .iter()
        .flat_map(|edge| {
            let (low, high): (usize, usize) = (*edge).into();
            shapes::line(
                layout.node_center(low, viewport),
                layout.node_center(high, viewport),
                style.edge,
            )
        })
        .collect()
}

/// An outline circle for every node followed by a fill circle for every node.
/// Fills are drawn after all outlines, so no outline covers a neighboring fill.
pub fn node_instances<V>(
    view: &V,
    layout: &GridLayout,
    viewport: Vec2,
    style: &Style,
) -> Vec<Attr>
where
    V: GraphView,
{
    let node_count = view.node_count();
    let centers: Vec<[f32; 2]> = (0..node_count)
        .map(|index| layout.node_center(index, viewport).to_array())
        .collect();

    let outlines = centers.iter().map(|center| Attr {
        color_attr: style.outline,
        world_position: *center,
        scale: layout.node_radius() + OUTLINE_WIDTH,
    });
    let fills = centers.iter().enumerate().map(|(index, center)| {
        let active = view.activity().get(index).copied().unwrap_or(false);
        Attr {
            color_attr: if active { style.active } else { style.inactive },
            world_position: *center,
            scale: layout.node_radius(),
        }
    });

    outlines.chain(fills).collect()
}

#[allow(clippy::too_many_arguments)]
pub fn draw_edges<V, H, R>(
    view: &V,
    layout: &GridLayout,
    viewport: Vec2,
    style: &Style,
    target: &mut Frame,
    display: &Display<WindowSurface>,
    programs: &Programs,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
) -> Result<(), RenderError>
where
    V: GraphView,
    H: AsUniformValue,
    R: Uniforms,
{
    let shape = edge_vertices(view, layout, viewport, style);
    if shape.is_empty() {
        return Ok(());
    }

    let vertex_buffer = glium::VertexBuffer::new(display, &shape)?;
    let indices = glium::index::NoIndices(glium::index::PrimitiveType::LinesList);

    target.draw(&vertex_buffer, indices, &programs.lines, uniform, params)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn draw_nodes<V, H, R>(
    view: &V,
    layout: &GridLayout,
    viewport: Vec2,
    style: &Style,
    target: &mut Frame,
    display: &Display<WindowSurface>,
    programs: &Programs,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
) -> Result<(), RenderError>
where
    V: GraphView,
    H: AsUniformValue,
    R: Uniforms,
{
    let shape = shapes::unit_circle(CIRCLE_RESOLUTION);
    let instances = node_instances(view, layout, viewport, style);

    let vertex_buffer = glium::VertexBuffer::new(display, &shape)?;
    let instance_buffer = glium::vertex::VertexBuffer::dynamic(display, &instances)?;
    let indices = glium::index::NoIndices(glium::index::PrimitiveType::TrianglesList);

    target.draw(
        (
            &vertex_buffer,
            instance_buffer
                .per_instance()
                .map_err(|_| RenderError::Instancing)?,
        ),
        indices,
        &programs.circles,
        uniform,
        params,
    )?;
    Ok(())
}
