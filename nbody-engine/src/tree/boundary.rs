// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Axis-aligned boundary rectangles
//!
//! A [`Boundary`] is the region covered by a quad-tree node. The root
//! boundary is the smallest box enclosing every body, padded when it would
//! otherwise have zero width or height.

use crate::body::{BasicBody, Position};
use crate::error::{PhysicsError, Result};

/// Padding relative to the coordinate magnitude, applied when the absolute
/// padding would be lost to rounding at large coordinates
const RELATIVE_PADDING: f64 = 1e-9;

/// Closed axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Boundary {
    /// Create a boundary from its corners
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Boundary { min_x, min_y, max_x, max_y }
    }

    /// Smallest box enclosing every body, padded to a nonzero area
    ///
    /// Returns `Ok(None)` for an empty slice and
    /// [`PhysicsError::NonFinitePosition`] if any position is NaN or infinite.
    /// An axis with zero extent (a single body, or bodies lined up or
    /// coincident) is widened on both sides by `padding`, or by half the other
    /// axis' extent when that is larger.
    pub fn enclosing(bodies: &[BasicBody], padding: f64) -> Result<Option<Boundary>> {
        let mut iter = bodies.iter();
        let first = match iter.next() {
            Some(b) => b,
            None => return Ok(None),
        };
        if !first.position.is_valid() {
            return Err(PhysicsError::NonFinitePosition { body: first.id });
        }

        let mut bounds = Boundary::new(
            first.position.x(),
            first.position.y(),
            first.position.x(),
            first.position.y(),
        );
        for body in iter {
            if !body.position.is_valid() {
                return Err(PhysicsError::NonFinitePosition { body: body.id });
            }
            bounds.expand_to(&body.position);
        }

        Ok(Some(bounds.padded(padding)))
    }

    fn expand_to(&mut self, pos: &Position) {
        self.min_x = self.min_x.min(pos.x());
        self.min_y = self.min_y.min(pos.y());
        self.max_x = self.max_x.max(pos.x());
        self.max_y = self.max_y.max(pos.y());
    }

    /// Widen zero-extent axes so the box has nonzero area
    pub fn padded(mut self, padding: f64) -> Boundary {
        if self.width() <= 0.0 {
            let half = padding.max(self.height() / 2.0);
            (self.min_x, self.max_x) = pad_axis(self.min_x, self.max_x, half);
        }
        if self.height() <= 0.0 {
            let half = padding.max(self.width() / 2.0);
            (self.min_y, self.max_y) = pad_axis(self.min_y, self.max_y, half);
        }
        self
    }

    /// Lower x bound
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    /// Lower y bound
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// Upper x bound
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// Upper y bound
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along y
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Larger of width and height, used by the opening-angle criterion
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Area of the rectangle
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point where the rectangle is split into quadrants
    pub fn midpoint(&self) -> Position {
        Position::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Whether `pos` lies inside the closed rectangle
    pub fn contains(&self, pos: &Position) -> bool {
        self.min_x <= pos.x() && pos.x() <= self.max_x && self.min_y <= pos.y() && pos.y() <= self.max_y
    }

    /// One of the four quadrants split at the midpoint
    ///
    /// Index order is lower-left, lower-right, upper-left, upper-right
    /// (`index = 2 * upper + right`).
    pub fn quadrant(&self, index: usize) -> Boundary {
        let mid = self.midpoint();
        let (min_x, max_x) = if index & 1 == 0 { (self.min_x, mid.x()) } else { (mid.x(), self.max_x) };
        let (min_y, max_y) = if index & 2 == 0 { (self.min_y, mid.y()) } else { (mid.y(), self.max_y) };
        Boundary::new(min_x, min_y, max_x, max_y)
    }

    /// Index of the quadrant a contained point belongs to
    ///
    /// Points on a shared edge go to the lower/left quadrant, matching the
    /// first quadrant in index order whose closed rectangle contains them.
    pub fn quadrant_index(&self, pos: &Position) -> usize {
        let mid = self.midpoint();
        let right = usize::from(pos.x() > mid.x());
        let upper = usize::from(pos.y() > mid.y());
        2 * upper + right
    }
}

fn pad_axis(min: f64, max: f64, half: f64) -> (f64, f64) {
    let scale = min.abs().max(max.abs());
    let half = half.max(scale * RELATIVE_PADDING);
    (min - half, max + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;

    fn at(id: u64, x: f64, y: f64) -> BasicBody {
        BasicBody::new(BodyId::new(id), 1.0, Position::new(x, y))
    }

    #[test]
    fn test_enclosing_box() {
        let bodies = [at(0, -1.0, 2.0), at(1, 3.0, -4.0), at(2, 0.5, 0.5)];
        let b = Boundary::enclosing(&bodies, 1.0).unwrap().unwrap();
        assert_eq!(b, Boundary::new(-1.0, -4.0, 3.0, 2.0));
        for body in &bodies {
            assert!(b.contains(&body.position));
        }
    }

    #[test]
    fn test_enclosing_empty() {
        assert_eq!(Boundary::enclosing(&[], 1.0), Ok(None));
    }

    #[test]
    fn test_single_body_is_padded() {
        let b = Boundary::enclosing(&[at(0, 5.0, 5.0)], 1.0).unwrap().unwrap();
        assert_eq!(b, Boundary::new(4.0, 4.0, 6.0, 6.0));
        assert!(b.area() > 0.0);
    }

    #[test]
    fn test_collinear_bodies_padded_on_flat_axis() {
        let b = Boundary::enclosing(&[at(0, 0.0, 0.0), at(1, 10.0, 0.0)], 1.0).unwrap().unwrap();
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 10.0);
    }

    #[test]
    fn test_padding_survives_large_coordinates() {
        let b = Boundary::enclosing(&[at(0, 1e20, -1e20)], 1.0).unwrap().unwrap();
        assert!(b.width() > 0.0);
        assert!(b.height() > 0.0);
        assert!(b.contains(&Position::new(1e20, -1e20)));
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let result = Boundary::enclosing(&[at(0, 0.0, 0.0), at(7, f64::NAN, 0.0)], 1.0);
        assert_eq!(result, Err(PhysicsError::NonFinitePosition { body: BodyId::new(7) }));
    }

    #[test]
    fn test_quadrants_partition_parent() {
        let b = Boundary::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(b.quadrant(0), Boundary::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(b.quadrant(1), Boundary::new(2.0, 0.0, 4.0, 1.0));
        assert_eq!(b.quadrant(2), Boundary::new(0.0, 1.0, 2.0, 2.0));
        assert_eq!(b.quadrant(3), Boundary::new(2.0, 1.0, 4.0, 2.0));
        assert_eq!(b.extent(), 4.0);
    }

    #[test]
    fn test_quadrant_index_matches_containment() {
        let b = Boundary::new(0.0, 0.0, 4.0, 4.0);
        let points = [
            Position::new(1.0, 1.0),
            Position::new(3.0, 1.0),
            Position::new(1.0, 3.0),
            Position::new(3.0, 3.0),
            Position::new(2.0, 2.0),
            Position::new(2.0, 3.0),
            Position::new(3.0, 2.0),
            Position::new(4.0, 4.0),
        ];
        for p in &points {
            let idx = b.quadrant_index(p);
            assert!(b.quadrant(idx).contains(p), "{:?} not in quadrant {}", p, idx);
            let first = (0..4).find(|&i| b.quadrant(i).contains(p)).unwrap();
            assert_eq!(idx, first);
        }
    }
}
