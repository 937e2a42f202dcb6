/// Width of the anti-aliased ring around every brush, in pixels.
pub(crate) const BLUR_WIDTH: f64 = 1.0;

/// Circular brush shared by the curve and dot rasterizers.
///
/// Inside `r_full` a pixel is fully covered; between `r_full` and
/// `r_full + BLUR_WIDTH` coverage falls off linearly; outside `r_blur` the
/// pixel is untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Brush {
    r_full: f64,
    r_full_sq: f64,
    r_blur_sq: f64,
    reach: i32,
}

impl Brush {
    pub(crate) fn for_thickness(thickness: f64) -> Self {
        let r_solid = thickness / 2.0;
        let r_blur = r_solid + BLUR_WIDTH;
        let r_full = (r_solid - 0.5).max(0.0);
        Self {
            r_full,
            r_full_sq: r_full * r_full,
            r_blur_sq: r_blur * r_blur,
            reach: r_blur.ceil() as i32,
        }
    }

    /// Half-size in pixels of the square a stamp can touch around its center.
    pub(crate) fn reach(self) -> i32 {
        self.reach
    }

    /// Whether a pixel at squared distance `distance_sq` is inside the solid core.
    ///
    /// `inclusive` decides whether the core boundary itself counts.
    #[inline]
    pub(crate) fn is_solid(self, distance_sq: f64, inclusive: bool) -> bool {
        if inclusive {
            distance_sq <= self.r_full_sq
        } else {
            distance_sq < self.r_full_sq
        }
    }

    /// Falloff factor in `0..=1` for a pixel in the blur ring, `None` outside the brush.
    #[inline]
    pub(crate) fn falloff(self, distance_sq: f64) -> Option<f64> {
        if !(distance_sq < self.r_blur_sq) {
            return None;
        }
        let factor = 1.0 - (distance_sq.sqrt() - self.r_full) / BLUR_WIDTH;
        Some(factor.max(0.0))
    }
}
