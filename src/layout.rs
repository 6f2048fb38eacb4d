use glam::Vec2;

pub const DEFAULT_NODE_RADIUS: f32 = 4.0;
pub const DEFAULT_MARGIN: f32 = 30.0;

/// Places nodes on a grid, row by row.
///
/// The grid is `floor(sqrt(n))` columns wide, so a node's cell is
/// `(index / columns, index % columns)`. A perfect square node count gives a
/// square grid; anything else leaves the last row partially filled.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    columns: usize,
    rows: usize,
    node_radius: f32,
    margin: f32,
}

impl GridLayout {
    pub fn new(node_count: usize, node_radius: f32, margin: f32) -> Self {
        let columns = ((node_count as f64).sqrt().floor() as usize).max(1);
        let rows = node_count.div_ceil(columns);
        Self {
            columns,
            rows,
            node_radius,
            margin,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// `(row, column)` of a node
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    /// Distance between the centers of two adjacent nodes.
    pub fn pitch(&self) -> f32 {
        2.0 * self.node_radius + self.margin
    }

    /// Width and height taken up by the whole grid.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.columns as f32, self.rows as f32) * self.pitch()
    }

    /// Center of a node in screen coordinates (origin top left, y pointing down),
    /// with the grid centered in `viewport`.
    pub fn node_center(&self, index: usize, viewport: Vec2) -> Vec2 {
        let (row, column) = self.cell(index);
        let offset = (viewport - self.extent()) / 2.0;
        offset + Vec2::new(column as f32, row as f32) * self.pitch() + Vec2::splat(self.node_radius)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(
            crate::graph::DEFAULT_NODE_COUNT,
            DEFAULT_NODE_RADIUS,
            DEFAULT_MARGIN,
        )
    }
}
