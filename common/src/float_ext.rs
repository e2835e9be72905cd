/// Tolerance comparisons for floating point values.
pub trait FloatExt: Copy {
    /// `|self - other| < EPSILON`.
    fn approximately_eq(self, other: Self) -> bool;

    /// `|self - other| <= tolerance`. NaN never compares equal.
    fn approx_eq(self, other: Self, tolerance: Self) -> bool;

    /// Relative comparison scaled by the larger magnitude, falling back to an
    /// absolute comparison near zero.
    fn relative_eq(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }

    fn approx_eq(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relative_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= tolerance * scale
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn approx_eq(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relative_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= tolerance * scale
    }
}
