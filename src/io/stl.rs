//! Binary STL encoding.
//!
//! ## Layout (little-endian)
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 80 | Header (free text, must not start with `solid`) |
//! | 4 | Triangle count (`u32`) |
//! | 50 × n | Normal (3 × `f32`), 3 vertices (9 × `f32`), attribute (`u16`) |
//!
//! STL stores a triangle soup. [`read_stl`] welds corners with bit-identical
//! positions back into shared vertices, so a mesh whose vertices all have
//! distinct positions round-trips with the same vertex and face counts.

use crate::error::{Error, Result};
use crate::mesh::{Face, Mesh, Vertex};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

/// Header length in bytes
pub const HEADER_SIZE: usize = 80;

/// Bytes per triangle record
pub const TRIANGLE_SIZE: usize = 50;

const HEADER_TEXT: &[u8] = b"vastu-mesh binary STL";

/// Upper bound on triangles preallocated from an untrusted header count
const MAX_PREALLOC_TRIANGLES: usize = 1 << 20;

/// Encode `mesh` as binary STL.
pub fn write_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    let mut header = [0u8; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.face_count())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many triangles for STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for face in mesh.faces() {
        write_vertex(writer, &mesh.face_normal(face))?;
        for v in mesh.triangle(face) {
            write_vertex(writer, &v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

#[inline]
fn write_vertex<W: Write>(writer: &mut W, v: &Vertex) -> io::Result<()> {
    writer.write_all(&(v.x as f32).to_le_bytes())?;
    writer.write_all(&(v.y as f32).to_le_bytes())?;
    writer.write_all(&(v.z as f32).to_le_bytes())
}

/// Decode binary STL, welding identical corner positions.
pub fn read_stl<R: Read>(reader: &mut R) -> io::Result<Mesh> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    if header.starts_with(b"solid") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "ASCII STL is not supported",
        ));
    }

    let mut count_buf = [0u8; 4];
    reader.read_exact(&mut count_buf)?;
    let count = u32::from_le_bytes(count_buf) as usize;

    let reserve = count.min(MAX_PREALLOC_TRIANGLES);
    let mut mesh = Mesh::with_capacity(reserve, reserve);
    let mut welded: HashMap<[u32; 3], usize> = HashMap::new();
    let mut record = [0u8; TRIANGLE_SIZE];

    for _ in 0..count {
        reader.read_exact(&mut record)?;
        let mut face: Face = [0; 3];
        for (corner, index) in face.iter_mut().enumerate() {
            // Skip the 12-byte normal; it is recomputed from winding on write
            let offset = 12 + corner * 12;
            let bits = [
                read_u32(&record, offset),
                read_u32(&record, offset + 4),
                read_u32(&record, offset + 8),
            ];
            *index = *welded.entry(bits).or_insert_with(|| {
                mesh.push_vertex(Vertex::new(
                    f32::from_bits(bits[0]) as f64,
                    f32::from_bits(bits[1]) as f64,
                    f32::from_bits(bits[2]) as f64,
                ))
            });
        }
        mesh.faces.push(face);
    }

    Ok(mesh)
}

#[inline]
fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Write `mesh` to a binary STL file, replacing any existing file.
pub fn save_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Read a binary STL file.
///
/// Truncated or ASCII files, and files whose size disagrees with the
/// triangle count in the header, fail with [`Error::Validation`].
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let file_len = file.metadata().map_err(|e| Error::io(path, e))?.len();

    let mut prefix = [0u8; HEADER_SIZE + 4];
    match file.read_exact(&mut prefix) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(Error::Validation(format!(
                "malformed STL {}: {} bytes is shorter than the header",
                path.display(),
                file_len
            )));
        }
        Err(e) => return Err(Error::io(path, e)),
    }
    let count = u64::from(read_u32(&prefix, HEADER_SIZE));
    let expected = (HEADER_SIZE as u64 + 4) + TRIANGLE_SIZE as u64 * count;
    if !prefix.starts_with(b"solid") && file_len != expected {
        return Err(Error::Validation(format!(
            "malformed STL {}: header declares {} triangles ({} bytes) but file is {} bytes",
            path.display(),
            count,
            expected,
            file_len
        )));
    }

    let mut reader = BufReader::new(Cursor::new(prefix).chain(file));
    read_stl(&mut reader).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => {
            Error::Validation(format!("malformed STL {}: {}", path.display(), e))
        }
        _ => Error::io(path, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> Mesh {
        Mesh::from_parts(
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(0.1, 0.0, 0.0),
                Vertex::new(0.1, 0.1, 0.0),
                Vertex::new(0.0, 0.1, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_byte_layout() {
        let mut buf = Vec::new();
        write_stl(&quad(), &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 4 + 2 * TRIANGLE_SIZE);
        assert!(!buf.starts_with(b"solid"));
        assert_eq!(&buf[HEADER_SIZE..HEADER_SIZE + 4], &2u32.to_le_bytes());

        // First normal is +Z
        let nz = f32::from_le_bytes(buf[92..96].try_into().unwrap());
        assert_relative_eq!(nz, 1.0);
    }

    #[test]
    fn test_read_welds_shared_corners() {
        let mut buf = Vec::new();
        write_stl(&quad(), &mut buf).unwrap();
        let mesh = read_stl(&mut Cursor::new(buf)).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
        assert_relative_eq!(mesh.vertices()[2].x, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_mesh() {
        let mut buf = Vec::new();
        write_stl(&Mesh::new(), &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 4);
        assert!(read_stl(&mut Cursor::new(buf)).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_file_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("cut.stl");

        let mut buf = Vec::new();
        write_stl(&quad(), &mut buf).unwrap();
        buf.truncate(buf.len() - 10);
        std::fs::write(&path, &buf).unwrap();

        assert!(matches!(load_stl(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn test_oversized_triangle_count_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.stl");

        let mut buf = vec![0u8; HEADER_SIZE];
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        std::fs::write(&path, &buf).unwrap();

        assert!(matches!(load_stl(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("long.stl");

        let mut buf = Vec::new();
        write_stl(&quad(), &mut buf).unwrap();
        buf.extend_from_slice(&[0u8; 7]);
        std::fs::write(&path, &buf).unwrap();

        assert!(matches!(load_stl(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn test_header_only_file_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("stub.stl");
        std::fs::write(&path, [0u8; 40]).unwrap();

        assert!(matches!(load_stl(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn test_read_stl_huge_count_fails_without_allocating() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = read_stl(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_ascii_rejected() {
        let mut data = b"solid test".to_vec();
        data.resize(200, b' ');
        assert!(read_stl(&mut Cursor::new(data)).is_err());
    }
}
