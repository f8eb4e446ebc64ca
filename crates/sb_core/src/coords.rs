/// Continuous world-space position using f64 for precision.
///
/// `y` is the vertical axis; `x` and `z` span the horizontal plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same horizontal position at a different height.
    pub const fn with_y(self, y: f64) -> Self {
        Self { x: self.x, y, z: self.z }
    }

    /// Offset this position by the given deltas.
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}
