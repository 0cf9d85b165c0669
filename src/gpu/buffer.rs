//! Fixed-capacity buffers of 4-float rows.

use crate::util::{Error, Result};

/// One texel of an RGBA32F buffer texture.
pub type Row = [f32; 4];

/// Largest integer every f32 holds exactly. Indices and counts written into
/// rows must stay below it.
pub const MAX_EXACT_INDEX: usize = 1 << 24;

/// Row buffer with a hard capacity.
///
/// Writers check the total row count up front, so a buffer is either filled
/// completely or left untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct RowBuffer {
    name: &'static str,
    rows: Vec<Row>,
    capacity: usize,
}

impl RowBuffer {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            rows: Vec::new(),
            capacity,
        }
    }

    /// Wrap existing rows, e.g. when reading back a dump.
    pub fn from_rows(name: &'static str, rows: Vec<Row>, capacity: usize) -> Result<Self> {
        let mut buf = Self::new(name, capacity);
        buf.ensure_room(rows.len())?;
        buf.rows = rows;
        Ok(buf)
    }

    /// Fail unless `additional` more rows fit.
    pub fn ensure_room(&self, additional: usize) -> Result<()> {
        let required = self.rows.len() + additional;
        if required > self.capacity {
            return Err(Error::CapacityExceeded {
                buffer: self.name,
                required,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a block of rows.
    pub fn push(&mut self, block: &[Row]) -> Result<()> {
        self.ensure_room(block.len())?;
        self.rows.extend_from_slice(block);
        Ok(())
    }

    /// `index`-th block of `rows_per` consecutive rows.
    pub fn block(&self, index: usize, rows_per: usize) -> Option<&[Row]> {
        let start = index.checked_mul(rows_per)?;
        self.rows.get(start..start.checked_add(rows_per)?)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Written rows as bytes for buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rows)
    }
}
