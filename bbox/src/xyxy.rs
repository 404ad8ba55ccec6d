use super::Point;
use crate::common::*;

/// Bounding box in corner format, `[xmin, ymin, xmax, ymax]`.
///
/// Corners are kept exactly as stored. No ordering between the min and max
/// corners is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XYXY<T> {
    pub(crate) xmin: T,
    pub(crate) ymin: T,
    pub(crate) xmax: T,
    pub(crate) ymax: T,
}

impl<T> XYXY<T> {
    pub fn from_xyxy(xyxy: [T; 4]) -> Self {
        let [xmin, ymin, xmax, ymax] = xyxy;
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

impl<T> XYXY<T>
where
    T: Copy,
{
    pub fn xyxy(&self) -> [T; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl<T> XYXY<T>
where
    T: Copy + ToPrimitive,
{
    /// The midpoint of the two corners.
    ///
    /// The division is carried out in `f64`, so odd sums keep their half.
    pub fn centroid(&self) -> Point {
        let to_f64 = |value: T| value.to_f64().unwrap_or(f64::NAN);
        let cx = (to_f64(self.xmin) + to_f64(self.xmax)) / 2.0;
        let cy = (to_f64(self.ymin) + to_f64(self.ymax)) / 2.0;
        Point::new(cx, cy)
    }
}
