use std::f32::consts::TAU;

use glam::Vec2;

use super::{draw::Vertex, Color};

/// Circle of radius 1 around the origin as a triangle list of `segments` slices.
/// Instances scale and move it into place, so the vertex color is unused.
pub fn unit_circle(segments: usize) -> Vec<Vertex> {
    let step = TAU / segments as f32;
    let rim = |k: usize| {
        let (sin, cos) = (step * k as f32).sin_cos();
        Vertex {
            position: [cos, sin, 0.0],
            color: [0.0; 4],
        }
    };
    let center = Vertex {
        position: [0.0; 3],
        color: [0.0; 4],
    };

    (0..segments)
        .flat_map(|k| [center, rim(k), rim(k + 1)])
        .collect()
}

/// Segment between two screen positions.
pub fn line(from: Vec2, to: Vec2, color: Color) -> [Vertex; 2] {
    [from, to].map(|p| Vertex {
        position: p.extend(0.0).to_array(),
        color,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unit_circle_rim_has_radius_one() {
        let shape = unit_circle(8);
        assert_eq!(shape.len(), 24);
        for triangle in shape.chunks(3) {
            assert_eq!(triangle[0].position, [0.0; 3]);
            for v in &triangle[1..] {
                let r = Vec2::new(v.position[0], v.position[1]).length();
                assert!((r - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_line_keeps_endpoints() {
        let [a, b] = line(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [0.5; 4]);
        assert_eq!(a.position, [1.0, 2.0, 0.0]);
        assert_eq!(b.position, [3.0, 4.0, 0.0]);
        assert_eq!(b.color, [0.5; 4]);
    }
}
