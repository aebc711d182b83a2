//! Wireframe geometry: the icosahedron and OBJ ring meshes.

use std::collections::HashSet;

use crate::math::Vec3;

const PHI: f32 = 1.618_034;

/// Edge list of a regular icosahedron with the given circumradius.
///
/// 12 vertices, 30 edges. Built from the three golden-ratio rectangles;
/// neighbouring vertices sit at squared distance 4 before normalization.
pub fn icosahedron_wireframe(radius: f32) -> Vec<[Vec3; 2]> {
    let raw = [
        Vec3::new(-1.0, PHI, 0.0),
        Vec3::new(1.0, PHI, 0.0),
        Vec3::new(-1.0, -PHI, 0.0),
        Vec3::new(1.0, -PHI, 0.0),
        Vec3::new(0.0, -1.0, PHI),
        Vec3::new(0.0, 1.0, PHI),
        Vec3::new(0.0, -1.0, -PHI),
        Vec3::new(0.0, 1.0, -PHI),
        Vec3::new(PHI, 0.0, -1.0),
        Vec3::new(PHI, 0.0, 1.0),
        Vec3::new(-PHI, 0.0, -1.0),
        Vec3::new(-PHI, 0.0, 1.0),
    ];

    let scale = radius / raw[0].length();
    let mut edges = Vec::with_capacity(30);
    for i in 0..raw.len() {
        for j in (i + 1)..raw.len() {
            let d = raw[i].sub(raw[j]);
            let dist2 = d.x * d.x + d.y * d.y + d.z * d.z;
            if dist2 < 4.1 {
                edges.push([raw[i].scale(scale), raw[j].scale(scale)]);
            }
        }
    }
    edges
}

/// Parse a Wavefront OBJ into a deduplicated wireframe edge list.
///
/// Only `v` and `f` records are used; everything else is ignored. Faces may
/// carry `v/vt/vn` index triples. Invalid or out-of-range indices skip the
/// face rather than failing the whole mesh.
pub fn parse_obj_wireframe(source: &str) -> Vec<[Vec3; 2]> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut edges: Vec<[Vec3; 2]> = Vec::new();

    for line in source.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords: Vec<f32> = parts
                    .take(3)
                    .filter_map(|p| p.parse::<f32>().ok())
                    .collect();
                if coords.len() == 3 {
                    vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
                }
            }
            Some("f") => {
                let indices: Vec<usize> = parts
                    .filter_map(|p| {
                        let first = p.split('/').next()?;
                        let idx: i64 = first.parse().ok()?;
                        // OBJ indices are 1-based; negatives count from the end
                        if idx > 0 {
                            Some((idx - 1) as usize)
                        } else if idx < 0 {
                            vertices.len().checked_sub(idx.unsigned_abs() as usize)
                        } else {
                            None
                        }
                    })
                    .collect();
                if indices.len() < 2 || indices.iter().any(|&i| i >= vertices.len()) {
                    continue;
                }
                for k in 0..indices.len() {
                    let a = indices[k];
                    let b = indices[(k + 1) % indices.len()];
                    if a == b {
                        continue;
                    }
                    let key = (a.min(b), a.max(b));
                    if seen.insert(key) {
                        edges.push([vertices[a], vertices[b]]);
                    }
                }
            }
            _ => {}
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosahedron_has_thirty_edges() {
        let edges = icosahedron_wireframe(3.1);
        assert_eq!(edges.len(), 30);
    }

    #[test]
    fn icosahedron_vertices_lie_on_sphere() {
        for [a, b] in icosahedron_wireframe(3.1) {
            assert!((a.length() - 3.1).abs() < 1e-4);
            assert!((b.length() - 3.1).abs() < 1e-4);
        }
    }

    #[test]
    fn obj_triangle_parses_to_three_edges() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let edges = parse_obj_wireframe(src);
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn obj_shared_edges_are_deduplicated() {
        // Two triangles sharing the 1-3 edge: 5 unique edges, not 6.
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 1 3 4\n";
        let edges = parse_obj_wireframe(src);
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn obj_slash_indices_and_garbage_lines() {
        let src = "# comment\nvn 0 0 1\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\nf 9 10 11\n";
        let edges = parse_obj_wireframe(src);
        // the out-of-range face is skipped
        assert_eq!(edges.len(), 3);
    }
}
