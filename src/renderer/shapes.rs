//! Shape generation for 2D primitives
//!
//! All shapes append triangles to an existing buffer in grid space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned rectangle from `min` to `max`
pub fn quad(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    out.extend_from_slice(&[
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]);
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        center + Vec2::new(theta.cos(), theta.sin()) * radius
    };
    for i in 0..segments {
        let (a, b) = (rim(i), rim(i + 1));
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Hollow circle (selection marker)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let at = |i: u32, r: f32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        center + Vec2::new(theta.cos(), theta.sin()) * r
    };
    for i in 0..segments {
        let (inner1, outer1) = (at(i, inner_radius), at(i, outer_radius));
        let (inner2, outer2) = (at(i + 1, inner_radius), at(i + 1, outer_radius));

        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Diamond (kneeling marker)
pub fn diamond(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4]) {
    let n = center - Vec2::Y * radius;
    let s = center + Vec2::Y * radius;
    let e = center + Vec2::X * radius;
    let w = center - Vec2::X * radius;
    out.extend_from_slice(&[
        Vertex::new(n.x, n.y, color),
        Vertex::new(e.x, e.y, color),
        Vertex::new(s.x, s.y, color),
        Vertex::new(s.x, s.y, color),
        Vertex::new(w.x, w.y, color),
        Vertex::new(n.x, n.y, color),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        quad(&mut out, Vec2::ZERO, Vec2::ONE, [1.0; 4]);
        assert_eq!(out.len(), 6);
        circle(&mut out, Vec2::ZERO, 1.0, [1.0; 4], 12);
        assert_eq!(out.len(), 6 + 36);
        ring(&mut out, Vec2::ZERO, 0.5, 1.0, [1.0; 4], 8);
        assert_eq!(out.len(), 42 + 48);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(2.0, 3.0), 0.4, [1.0; 4], 16);
        for v in out {
            let d = Vec2::from(v.position) - Vec2::new(2.0, 3.0);
            assert!(d.length() <= 0.4 + 1e-5);
        }
    }
}
