/// Range of accepted ray parameters.
///
/// Intersection routines take one of these rather than a `(t_min, t_max)`
/// pair. Closest-hit searches keep the near bound fixed and shrink the far
/// bound with [`Interval::with_max`] after every hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Matches nothing; `min` is above `max`.
    pub const EMPTY: Interval = Interval::new(f32::INFINITY, f32::NEG_INFINITY);

    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `[min, +inf)`, the range a fresh ray query starts with.
    #[inline]
    pub const fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Same near bound, new far bound.
    #[inline]
    pub const fn with_max(self, max: f32) -> Self {
        Self::new(self.min, max)
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    /// Inclusive membership.
    pub fn contains(&self, t: f32) -> bool {
        t >= self.min && t <= self.max
    }

    /// Exclusive membership. Hit tests use this so a hit exactly at the
    /// current closest distance does not replace it.
    #[inline]
    pub fn surrounds(&self, t: f32) -> bool {
        t > self.min && t < self.max
    }

    /// Grow by `delta` in total, half on each end.
    pub fn expand(&self, delta: f32) -> Self {
        let half = 0.5 * delta;
        Self::new(self.min - half, self.max + half)
    }
}
