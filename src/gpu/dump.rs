//! Binary dump of [`SceneBuffers`].
//!
//! Little-endian layout:
//! ```text
//! "TBXS" | version u16 | object_count u32 | root_index u32 | triangle_count u32
//! then for objects, nodes, triangles: row_count u32 | rows (4 x f32 each)
//! ```

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::buffer::{Row, RowBuffer};
use super::nodes::NODE_ROWS;
use super::objects::OBJECT_ROWS;
use super::scene_data::{Capacities, SceneBuffers};
use super::triangles::{triangle_count as stored_triangles, TRIANGLE_ROWS};
use crate::util::{Error, Result};

pub const DUMP_MAGIC: &[u8; 4] = b"TBXS";
pub const DUMP_VERSION: u16 = 1;

pub fn write_dump<W: Write>(buffers: &SceneBuffers, mut w: W) -> Result<()> {
    w.write_all(DUMP_MAGIC)?;
    w.write_u16::<LittleEndian>(DUMP_VERSION)?;
    w.write_u32::<LittleEndian>(buffers.object_count)?;
    w.write_u32::<LittleEndian>(buffers.root_index)?;
    w.write_u32::<LittleEndian>(buffers.triangle_count)?;
    for buf in [&buffers.objects, &buffers.nodes, &buffers.triangles] {
        w.write_u32::<LittleEndian>(buf.len() as u32)?;
        for row in buf.rows() {
            for &v in row {
                w.write_f32::<LittleEndian>(v)?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Read a dump back. Buffers are sized to `capacities`; a dump holding more
/// rows than allowed fails with [`Error::CapacityExceeded`].
pub fn read_dump<R: Read>(mut r: R, capacities: Capacities) -> Result<SceneBuffers> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(truncated)?;
    if &magic != DUMP_MAGIC {
        return Err(Error::InvalidDump(format!("bad magic {magic:?}")));
    }
    let version = r.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != DUMP_VERSION {
        return Err(Error::InvalidDump(format!("unsupported version {version}")));
    }

    let object_count = r.read_u32::<LittleEndian>().map_err(truncated)?;
    let root_index = r.read_u32::<LittleEndian>().map_err(truncated)?;
    let triangle_count = r.read_u32::<LittleEndian>().map_err(truncated)?;

    let objects = RowBuffer::from_rows("objects", read_rows(&mut r)?, capacities.objects)?;
    let nodes = RowBuffer::from_rows("nodes", read_rows(&mut r)?, capacities.nodes)?;
    let triangles = RowBuffer::from_rows("triangles", read_rows(&mut r)?, capacities.triangles)?;

    if nodes.len() != (root_index as usize + 1) * NODE_ROWS {
        return Err(Error::InvalidDump(format!(
            "root index {root_index} does not match {} node rows",
            nodes.len()
        )));
    }
    if objects.len() != object_count as usize * OBJECT_ROWS {
        return Err(Error::InvalidDump(format!(
            "object count {object_count} does not match {} object rows",
            objects.len()
        )));
    }
    if triangles.len() % TRIANGLE_ROWS != 0 || stored_triangles(&triangles) != triangle_count as usize {
        return Err(Error::InvalidDump(format!(
            "triangle count {triangle_count} does not match {} triangle rows",
            triangles.len()
        )));
    }

    Ok(SceneBuffers {
        objects,
        nodes,
        triangles,
        object_count,
        root_index,
        triangle_count,
    })
}

fn read_rows<R: Read>(r: &mut R) -> Result<Vec<Row>> {
    let count = r.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    // count comes from the file; cap the up-front allocation
    let mut rows = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        let mut row = [0.0f32; 4];
        r.read_f32_into::<LittleEndian>(&mut row).map_err(truncated)?;
        rows.push(row);
    }
    Ok(rows)
}

fn truncated(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::InvalidDump("unexpected end of dump".into())
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_magic() {
        let err = read_dump(&b"NOPE\x01\x00"[..], Capacities::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDump(_)));
    }

    #[test]
    fn test_rejects_truncated() {
        let err = read_dump(&b"TBXS\x01\x00\x04\x00"[..], Capacities::default()).unwrap_err();
        assert!(err.to_string().contains("unexpected end"));
    }

    fn scene1_dump() -> Vec<u8> {
        use rand::SeedableRng;
        let mut scene = crate::scene::scene1().unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let buffers = super::super::prepare_scene(&mut scene, None, &mut rng, Capacities::default()).unwrap();
        let mut bytes = Vec::new();
        write_dump(&buffers, &mut bytes).unwrap();
        bytes
    }

    // Header: magic (4) | version (2) | object_count | root_index | triangle_count
    const OBJECT_COUNT_AT: usize = 6;
    const TRIANGLE_COUNT_AT: usize = 14;

    #[test]
    fn test_accepts_consistent_counts() {
        let restored = read_dump(&scene1_dump()[..], Capacities::default()).unwrap();
        assert_eq!(restored.object_count, 4);
        assert_eq!(restored.triangle_count, 0);
    }

    #[test]
    fn test_rejects_object_count_mismatch() {
        let mut bytes = scene1_dump();
        bytes[OBJECT_COUNT_AT..OBJECT_COUNT_AT + 4].copy_from_slice(&5u32.to_le_bytes());
        let err = read_dump(&bytes[..], Capacities::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDump(_)));
        assert!(err.to_string().contains("object count 5"));
    }

    #[test]
    fn test_rejects_triangle_count_mismatch() {
        let mut bytes = scene1_dump();
        bytes[TRIANGLE_COUNT_AT..TRIANGLE_COUNT_AT + 4].copy_from_slice(&3u32.to_le_bytes());
        let err = read_dump(&bytes[..], Capacities::default()).unwrap_err();
        assert!(err.to_string().contains("triangle count 3"));
    }

    #[test]
    fn test_rejects_version() {
        let err = read_dump(&b"TBXS\x09\x00"[..], Capacities::default()).unwrap_err();
        assert!(err.to_string().contains("version 9"));
    }
}
