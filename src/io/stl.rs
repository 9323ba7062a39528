use crate::mesh::Mesh;
use crate::mesh::weld::IndexedMesh;
use crate::triangulated::Triangulated3D;
use core2::io::Cursor;

/// Export to ASCII STL
/// Convert a triangulated surface to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use springforge::mesh::Mesh;
/// # use nalgebra::Point3;
/// let cube = Mesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
/// let text = cube.to_stl_ascii("cube");
/// assert!(text.starts_with("solid cube"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The header is left blank, so the output is always
/// `84 + 50 * triangles` bytes.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        triangles.push(Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: tri.map(|v| Vertex::new([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32])),
        });
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}

impl IndexedMesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
