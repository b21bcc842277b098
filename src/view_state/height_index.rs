//! Row height index: O(log n) prefix sums and offset lookup via Fenwick tree.
//!
//! Heights are whole layout points. Fractional cell heights are rounded up
//! by the caller so rows never overlap.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `push`: O(log n) amortized (O(n) when the tree grows)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `row_at`: O(log² n)
//! - `height` / `len`: O(1)

/// Cumulative row heights for a growing list.
///
/// Keeps the raw heights next to the tree so single-row reads are O(1) and
/// the tree can be rebuilt exactly when its capacity grows.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Row heights in list order.
    heights: Vec<usize>,
    /// Fenwick tree over `heights`; `tree.len()` is the capacity.
    tree: Vec<isize>,
}

impl HeightIndex {
    /// Empty index with room for `capacity` rows before the tree grows.
    ///
    /// ```
    /// # use reviews_feed::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::with_capacity(64);
    /// assert!(index.is_empty());
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heights: Vec::with_capacity(capacity),
            tree: vec![0; capacity],
        }
    }

    /// Build an index from existing row heights.
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self {
            tree: Vec::new(),
            heights,
        };
        index.rebuild(index.heights.len());
        index
    }

    /// Recompute the tree from `heights` with the given capacity.
    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity.max(self.heights.len()), 0);
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, height as isize);
        }
    }

    /// Append a row.
    ///
    /// ```
    /// # use reviews_feed::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::default();
    /// index.push(120);
    /// index.push(80);
    /// assert_eq!(index.total(), 200);
    /// ```
    pub fn push(&mut self, height: usize) {
        self.heights.push(height);
        let row = self.heights.len() - 1;

        if row >= self.tree.len() {
            // Fenwick nodes past the old end must cover earlier rows too.
            self.rebuild((self.tree.len().max(1)) * 2);
        } else {
            fenwick::array::update(&mut self.tree, row, height as isize);
        }
    }

    /// Replace the height of `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= len()`.
    pub fn set(&mut self, row: usize, height: usize) {
        let current = self.heights[row];
        if current == height {
            return;
        }
        self.heights[row] = height;
        fenwick::array::update(&mut self.tree, row, height as isize - current as isize);
    }

    /// Height of `row`, if it exists.
    pub fn height(&self, row: usize) -> Option<usize> {
        self.heights.get(row).copied()
    }

    /// Sum of heights of rows `0..=row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= len()`.
    pub fn prefix_sum(&self, row: usize) -> usize {
        assert!(
            row < self.heights.len(),
            "row {} out of bounds (len: {})",
            row,
            self.heights.len()
        );
        fenwick::array::prefix_sum(&self.tree, row).max(0) as usize
    }

    /// Top edge of `row` in content coordinates.
    ///
    /// `offset_of(len())` is the total height.
    pub fn offset_of(&self, row: usize) -> usize {
        if row == 0 || self.is_empty() {
            0
        } else {
            self.prefix_sum((row - 1).min(self.heights.len() - 1))
        }
    }

    /// Row containing the vertical offset `y`.
    ///
    /// Row `i` covers `[offset_of(i), offset_of(i + 1))`. Returns `None` when
    /// `y` is at or past the end of the content.
    ///
    /// ```
    /// # use reviews_feed::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([100, 50, 75]);
    /// assert_eq!(index.row_at(0), Some(0));
    /// assert_eq!(index.row_at(100), Some(1));
    /// assert_eq!(index.row_at(224), Some(2));
    /// assert_eq!(index.row_at(225), None);
    /// ```
    pub fn row_at(&self, y: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.heights.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > y {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.heights.len()).then_some(left)
    }

    /// Total content height.
    pub fn total(&self) -> usize {
        self.offset_of(self.heights.len())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Remove all rows, keeping capacity.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.tree.iter_mut().for_each(|node| *node = 0);
    }
}
