use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A non-empty rectangle in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// A pair of coordinates along one axis, written as `(a,b)` on the command line.
/// The two ends may come in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpan {
    pub start: u32,
    pub end: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Result<Self> {
        if w == 0 || h == 0 {
            return Err(Error::invalid_region(format!(
                "zero-area region {w}x{h} at ({x},{y}), select again"
            )));
        }
        x.checked_add(w)
            .zip(y.checked_add(h))
            .ok_or_else(|| Error::invalid_region("region extends past the coordinate range"))?;
        Ok(Self { x, y, w, h })
    }

    /// Build a region from two corner spans, normalizing each axis with min/max.
    pub fn from_spans(xs: AxisSpan, ys: AxisSpan) -> Result<Self> {
        let x0 = xs.start.min(xs.end);
        let x1 = xs.start.max(xs.end);
        let y0 = ys.start.min(ys.end);
        let y1 = ys.start.max(ys.end);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Fail unless the whole region lies inside a `frame_width` x `frame_height` image.
    pub fn ensure_within(&self, frame_width: u32, frame_height: u32) -> Result<()> {
        if self.right() > frame_width || self.bottom() > frame_height {
            return Err(Error::invalid_region(format!(
                "{self} exceeds frame bounds {frame_width}x{frame_height}"
            )));
        }
        Ok(())
    }

    /// Iterate every `(x, y)` pixel coordinate covered by the region.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region ({}, {}, {}x{})", self.x, self.y, self.w, self.h)
    }
}

impl FromStr for AxisSpan {
    type Err = Error;

    /// Accepts `(a,b)`, `a,b`, with optional whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let Some((a, b)) = inner.split_once(',') else {
            return Err(Error::invalid_input(format!(
                "malformed coordinate pair '{s}', expected '(a,b)'"
            )));
        };
        let parse = |v: &str| {
            v.trim().parse::<u32>().map_err(|_| {
                Error::invalid_input(format!(
                    "malformed coordinate '{}' in '{s}', expected a non-negative integer",
                    v.trim()
                ))
            })
        };
        Ok(Self {
            start: parse(a)?,
            end: parse(b)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_is_rejected() {
        assert!(matches!(Region::new(5, 5, 0, 3), Err(Error::InvalidRegion(_))));
        assert!(matches!(Region::new(5, 5, 3, 0), Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn spans_are_normalized() {
        let r = Region::from_spans(
            AxisSpan { start: 30, end: 10 },
            AxisSpan { start: 4, end: 9 },
        )
        .unwrap();
        assert_eq!((r.x(), r.y(), r.width(), r.height()), (10, 4, 20, 5));
    }

    #[test]
    fn degenerate_spans_are_invalid_region() {
        let err = Region::from_spans(
            AxisSpan { start: 7, end: 7 },
            AxisSpan { start: 0, end: 9 },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRegion(_)));
    }

    #[test]
    fn parse_axis_span() {
        assert_eq!("(3,8)".parse::<AxisSpan>().unwrap(), AxisSpan { start: 3, end: 8 });
        assert_eq!(" ( 8 , 3 ) ".parse::<AxisSpan>().unwrap(), AxisSpan { start: 8, end: 3 });
        assert_eq!("1,2".parse::<AxisSpan>().unwrap(), AxisSpan { start: 1, end: 2 });
    }

    #[test]
    fn malformed_axis_span_is_invalid_input() {
        for bad in ["(3)", "(a,b)", "(-1,4)", "", "(1;2)"] {
            let err = bad.parse::<AxisSpan>().unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn pixels_cover_region() {
        let r = Region::new(2, 3, 2, 2).unwrap();
        let px: Vec<_> = r.pixels().collect();
        assert_eq!(px, vec![(2, 3), (3, 3), (2, 4), (3, 4)]);
        assert_eq!(r.area(), 4);
    }

    #[test]
    fn bounds_check() {
        let r = Region::new(8, 8, 2, 2).unwrap();
        assert!(r.ensure_within(10, 10).is_ok());
        assert!(matches!(r.ensure_within(9, 10), Err(Error::InvalidRegion(_))));
    }
}
