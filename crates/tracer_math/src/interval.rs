/// A range of `f32` values, used both for box slabs and for the
/// `(min_t, max_t)` window a trace accepts hits in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if the interval contains nothing (min > max).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Returns the smallest interval containing both this interval and x.
    pub fn include(&self, x: f32) -> Interval {
        Interval::new(self.min.min(x), self.max.max(x))
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);

        let negative = Interval::new(-5.0, 5.0);
        assert_eq!(negative.size(), 10.0);
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 255.0);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(127.5), 127.5);
        assert_eq!(interval.clamp(300.0), 255.0);
    }

    #[test]
    fn test_interval_include_widens_empty() {
        let grown = Interval::EMPTY.include(3.0).include(-1.0);

        assert_eq!(grown, Interval::new(-1.0, 3.0));
        // Including a contained value never shrinks
        assert_eq!(grown.include(0.0), grown);
    }

    #[test]
    fn test_interval_expand() {
        let interval = Interval::new(1.0, 2.0).expand(0.5);
        assert_eq!(interval, Interval::new(0.75, 2.25));
        assert_eq!(interval.size(), 1.5);
    }

    #[test]
    fn test_interval_empty() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.surrounds(0.0));
        assert!(!Interval::new(0.0, 0.0).is_empty());
    }
}
