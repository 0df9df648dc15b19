/// A dense dynamic programming table. It is a serialized 2-d array in row-major order,
/// so `[(i, j)]` is the j-th cell of the i-th row.
/// The shape is fixed at construction; there is no resizing.
#[derive(Debug, Clone, PartialEq)]
pub struct DPTable<T> {
    // Total memory, `row * column` cells.
    mem: Vec<T>,
    row: usize,
    column: usize,
}

impl<T: Copy> DPTable<T> {
    /// Create a new (row x column) table filled by `default`.
    pub fn new(row: usize, column: usize, default: T) -> Self {
        Self {
            mem: vec![default; row * column],
            row,
            column,
        }
    }
    pub fn rows(&self) -> usize {
        self.row
    }
    pub fn columns(&self) -> usize {
        self.column
    }
    /// Return the [i,j] cell, or None if (i,j) is outside of the table.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        (i < self.row && j < self.column).then(|| self.mem[i * self.column + j])
    }
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.row && j < self.column {
            self.mem.get_mut(i * self.column + j)
        } else {
            None
        }
    }
    /// Set the [i,j] to target. Out-of-range coordinates are ignored.
    pub fn set(&mut self, i: usize, j: usize, target: T) {
        if let Some(slot) = self.get_mut(i, j) {
            *slot = target;
        }
    }
    /// Return the i-th row.
    pub fn row(&self, i: usize) -> &[T] {
        &self.mem[i * self.column..(i + 1) * self.column]
    }
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.mem[i * self.column..(i + 1) * self.column]
    }
    /// Return the j-th column, from the top row to the bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = T> + '_ {
        assert!(j < self.column, "{} >= {}", j, self.column);
        self.mem.iter().skip(j).step_by(self.column).copied()
    }
    /// Iterate over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.mem.chunks(self.column.max(1)).take(self.row)
    }
    /// Return the content as nested vectors, `[i][j]`.
    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
    /// Return the underlying row-major memory.
    pub fn as_slice(&self) -> &[T] {
        &self.mem
    }
}

impl<T> std::ops::Index<(usize, usize)> for DPTable<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.row && j < self.column, "({},{}) is out of range", i, j);
        &self.mem[i * self.column + j]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for DPTable<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(i < self.row && j < self.column, "({},{}) is out of range", i, j);
        &mut self.mem[i * self.column + j]
    }
}

// Tab-separated rows. The precision of the formatter, if any, applies to each cell.
impl<T: Copy + std::fmt::Display> std::fmt::Display for DPTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            let cells: Vec<_> = match f.precision() {
                Some(digit) => row.iter().map(|x| format!("{:.*}", digit, x)).collect(),
                None => row.iter().map(|x| format!("{}", x)).collect(),
            };
            write!(f, "{}", cells.join("\t"))?;
            if i + 1 < self.row {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn index_test() {
        let mut dp = DPTable::new(2, 3, 0f64);
        dp[(1, 2)] = 3f64;
        dp.set(0, 1, 1f64);
        dp.set(5, 5, 100f64);
        assert_eq!(dp.get(1, 2), Some(3f64));
        assert_eq!(dp.get(0, 1), Some(1f64));
        assert_eq!(dp.get(2, 0), None);
        assert_eq!(dp.get(0, 3), None);
        assert_eq!(dp.row(1), &[0f64, 0f64, 3f64]);
        assert_eq!(dp.column(2).collect::<Vec<_>>(), vec![0f64, 3f64]);
        assert_eq!(dp.as_slice().len(), 6);
        assert_eq!(dp.to_vecs(), vec![vec![0., 1., 0.], vec![0., 0., 3.]]);
    }
    #[test]
    fn row_mut_test() {
        let mut dp = DPTable::new(3, 2, 0usize);
        dp.row_mut(2).iter_mut().for_each(|x| *x = 7);
        assert_eq!(dp.iter_rows().count(), 3);
        assert_eq!(dp.column(0).collect::<Vec<_>>(), vec![0, 0, 7]);
        if let Some(x) = dp.get_mut(0, 0) {
            *x += 1;
        }
        assert_eq!(dp[(0, 0)], 1);
    }
    #[test]
    #[should_panic]
    fn out_of_range_test() {
        let dp = DPTable::new(2, 2, 0u8);
        let _ = dp[(2, 0)];
    }
    #[test]
    fn display_test() {
        let mut dp = DPTable::new(2, 2, 0.5f64);
        dp[(1, 1)] = 0.25;
        assert_eq!(format!("{:.2}", dp), "0.50\t0.50\n0.50\t0.25");
        let psi = DPTable::new(1, 3, 2usize);
        assert_eq!(format!("{}", psi), "2\t2\t2");
    }
}
