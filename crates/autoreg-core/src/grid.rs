use serde::{Deserialize, Serialize};

/// Extents of a 3-D array along (t, x, y). Serialized as `[t, x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 3]", into = "[usize; 3]")]
pub struct Size3 {
    pub t: usize,
    pub x: usize,
    pub y: usize,
}

impl Size3 {
    pub const fn new(t: usize, x: usize, y: usize) -> Self {
        Self { t, x, y }
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.t * self.x * self.y
    }

    /// Total number of cells, or None if the product overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.t.checked_mul(self.x)?.checked_mul(self.y)
    }

    /// True when any extent is zero, i.e. the size is not a valid shape.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t == 0 || self.x == 0 || self.y == 0
    }

    pub fn to_array(self) -> [usize; 3] {
        [self.t, self.x, self.y]
    }

    /// Scale every extent by `factor`, truncating towards zero.
    pub fn scaled(self, factor: f64) -> Self {
        let s = |n: usize| (n as f64 * factor) as usize;
        Self::new(s(self.t), s(self.x), s(self.y))
    }

    /// True when `self` is at least `other` along every axis.
    pub fn covers(&self, other: &Size3) -> bool {
        self.t >= other.t && self.x >= other.x && self.y >= other.y
    }
}

impl From<[usize; 3]> for Size3 {
    fn from(a: [usize; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Size3> for [usize; 3] {
    fn from(s: Size3) -> Self {
        s.to_array()
    }
}

impl std::fmt::Display for Size3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.t, self.x, self.y)
    }
}

/// Physical grid spacing along (t, x, y). Serialized as `[dt, dx, dy]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Delta3 {
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

impl Delta3 {
    pub const fn new(t: f64, x: f64, y: f64) -> Self {
        Self { t, x, y }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.t, self.x, self.y]
    }
}

impl Default for Delta3 {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl From<[f64; 3]> for Delta3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Delta3> for [f64; 3] {
    fn from(d: Delta3) -> Self {
        d.to_array()
    }
}

impl std::fmt::Display for Delta3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.t, self.x, self.y)
    }
}

/// A dense 3-D array of f64, row-major with `t` slowest and `y` fastest.
///
/// Used for the ACF, the AR coefficients and the field itself; the linear
/// order of `data` is the order the covariance matrix rows are built in.
/// Deserialization rejects buffers whose length does not match `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid3")]
pub struct Grid3 {
    pub size: Size3,
    /// Row-major values, `size.len()` entries.
    pub data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawGrid3 {
    size: Size3,
    data: Vec<f64>,
}

impl TryFrom<RawGrid3> for Grid3 {
    type Error = String;

    fn try_from(raw: RawGrid3) -> Result<Self, Self::Error> {
        let expected = raw.size.checked_len().ok_or_else(|| format!("grid size {} overflows", raw.size))?;
        let got = raw.data.len();
        Grid3::from_vec(raw.size, raw.data)
            .ok_or_else(|| format!("grid of size {} needs {expected} values, got {got}", raw.size))
    }
}

impl Grid3 {
    /// Create a new Grid3 filled with the given value.
    pub fn new(size: Size3, fill: f64) -> Self {
        Self { size, data: vec![fill; size.len()] }
    }

    pub fn zeros(size: Size3) -> Self {
        Self::new(size, 0.0)
    }

    /// Wrap an existing buffer. Returns None if its length does not match `size`.
    pub fn from_vec(size: Size3, data: Vec<f64>) -> Option<Self> {
        (Some(data.len()) == size.checked_len()).then_some(Self { size, data })
    }

    /// Build a grid by evaluating `f(t, x, y)` at every cell.
    pub fn from_fn(size: Size3, mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(size.len());
        for t in 0..size.t {
            for x in 0..size.x {
                for y in 0..size.y {
                    data.push(f(t, x, y));
                }
            }
        }
        Self { size, data }
    }

    #[inline]
    pub fn index(&self, t: usize, x: usize, y: usize) -> usize {
        (t * self.size.x + x) * self.size.y + y
    }

    #[inline]
    pub fn get(&self, t: usize, x: usize, y: usize) -> f64 {
        self.data[self.index(t, x, y)]
    }

    #[inline]
    pub fn set(&mut self, t: usize, x: usize, y: usize, val: f64) {
        let i = self.index(t, x, y);
        self.data[i] = val;
    }

    /// Inverse of [`Grid3::index`].
    #[inline]
    pub fn coords(&self, i: usize) -> (usize, usize, usize) {
        let y = i % self.size.y;
        let x = (i / self.size.y) % self.size.x;
        let t = i / (self.size.y * self.size.x);
        (t, x, y)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sum of the elementwise product with a grid of the same shape.
    pub fn dot(&self, other: &Grid3) -> f64 {
        debug_assert_eq!(self.size, other.size);
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }
}
