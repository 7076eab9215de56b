use roaring::RoaringBitmap;

use crate::Vertex;

// Row-major, zero-indexed.  Callers keep `size <= LogicalMatrix::MAX_SIZE`, so
// every index fits in a u32.
#[inline]
pub(crate) fn index_from_row_column(row: Vertex, column: Vertex, size: usize) -> u32 {
    (row * size + column) as u32
}

#[inline]
pub(crate) fn row_column_from_index(index: u32, size: usize) -> (Vertex, Vertex) {
    let index = index as usize;
    (index / size, index % size)
}

/// A square matrix of booleans with one bit per *set* cell.  A matrix with no
/// ones uses a constant amount of memory irrespective of its size.
#[derive(Clone, Debug)]
pub struct LogicalMatrix {
    size: usize,
    matrix: RoaringBitmap,
}

impl Eq for LogicalMatrix {}

impl PartialEq for LogicalMatrix {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        self.matrix == other.matrix
    }
}

impl LogicalMatrix {
    /// Cells are addressed by a u32, hence at most `2^16 × 2^16` of them.
    pub const MAX_SIZE: usize = 1 << 16;

    /// Requires `size <= Self::MAX_SIZE`.  Panics otherwise.
    pub fn zeroed(size: usize) -> Self {
        assert!(size <= Self::MAX_SIZE, "matrix too large");
        Self {
            size,
            matrix: RoaringBitmap::new(),
        }
    }

    /// A cell is set iff its value is exactly `1`.
    ///
    /// Requires every row to have `rows.len()` cells and `rows.len() <=
    /// Self::MAX_SIZE`.  Panics otherwise.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let mut result = Self::zeroed(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(row.len(), rows.len(), "matrix is not square");
            for (j, cell) in row.iter().enumerate() {
                if *cell == 1 {
                    result.set(i, j);
                }
            }
        }
        result
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: Vertex, j: Vertex) -> bool {
        assert!(i < self.size);
        assert!(j < self.size);
        self.matrix.contains(index_from_row_column(i, j, self.size))
    }

    /// Returns the previous value.
    pub fn set(&mut self, i: Vertex, j: Vertex) -> bool {
        assert!(i < self.size);
        assert!(j < self.size);
        !self.matrix.insert(index_from_row_column(i, j, self.size))
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.matrix
            .iter()
            .map(|index| row_column_from_index(index, self.size))
    }

    pub fn iter_ones_at_row(&self, i: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        assert!(i < self.size);
        (0..self.size).filter(move |j| {
            self.matrix
                .contains(index_from_row_column(i, *j, self.size))
        })
    }

    /// Dense `0`/`1` rows, for whatever draws the matrix.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let mut rows = vec![vec![0u8; self.size]; self.size];
        for (i, j) in self.iter_ones() {
            rows[i][j] = 1;
        }
        rows
    }
}
