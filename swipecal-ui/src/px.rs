//! Physical pixel units used for layout and touch positions.
//!
//! Layout hands components whole physical pixels ([`Px`]); animated state
//! such as a pager offset is kept as `f32` and reached through
//! [`Px::to_f32`].
//!
//! # Example
//!
//! ```
//! use swipecal_ui::px::{Px, PxPosition};
//!
//! let start = PxPosition::new(Px(10), Px(20));
//! let end = PxPosition::new(Px(-190), Px(25));
//! assert_eq!(end - start, PxPosition::new(Px(-200), Px(5)));
//! assert_eq!(Px(300).to_f32(), 300.0);
//! ```

use std::ops::Sub;

/// A physical pixel value. Negative values are valid and common for
/// translated content.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// Converts to `f32` for animation math.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }
}

impl Sub for Px {
    type Output = Px;

    /// Subtracts with saturation at the numeric bounds.
    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0.saturating_sub(rhs.0))
    }
}

/// A 2D position in physical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PxPosition {
    /// Horizontal coordinate, growing to the right.
    pub x: Px,
    /// Vertical coordinate, growing downward.
    pub y: Px,
}

impl PxPosition {
    /// Creates a position from two pixel values.
    pub const fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }
}

impl Sub for PxPosition {
    type Output = PxPosition;

    fn sub(self, rhs: Self) -> Self::Output {
        PxPosition {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_delta() {
        let start = PxPosition::new(Px(100), Px(40));
        let end = PxPosition::new(Px(-100), Px(135));
        assert_eq!(end - start, PxPosition::new(Px(-200), Px(95)));
        assert_eq!(start - start, PxPosition::default());
    }

    #[test]
    fn test_sub_saturates() {
        assert_eq!(Px(i32::MIN) - Px(1), Px(i32::MIN));
        assert_eq!(Px(i32::MAX) - Px(-1), Px(i32::MAX));
        assert_eq!(Px::ZERO.to_f32(), 0.0);
    }
}
