use crate::error::{Error, Result};

/// Position of the frame currently shown while scrubbing, clamped to `[0, total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    current: u64,
    total: u64,
}

impl FrameCursor {
    pub fn new(total: u64) -> Result<Self> {
        if total == 0 {
            return Err(Error::invalid_input("cannot scrub a video with no frames"));
        }
        Ok(Self { current: 0, total })
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Move by `delta` frames, stopping at the first or last frame.
    pub fn jump(&mut self, delta: i64) -> u64 {
        let target = if delta.is_negative() {
            self.current.saturating_sub(delta.unsigned_abs())
        } else {
            self.current.saturating_add(delta as u64)
        };
        self.seek(target)
    }

    pub fn seek(&mut self, index: u64) -> u64 {
        self.current = index.min(self.total - 1);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_video_is_rejected() {
        assert!(matches!(FrameCursor::new(0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn jumps_clamp_at_both_ends() {
        let mut c = FrameCursor::new(10).unwrap();
        assert_eq!(c.jump(-5), 0);
        assert_eq!(c.jump(3), 3);
        assert_eq!(c.jump(5), 8);
        assert_eq!(c.jump(5), 9);
        assert_eq!(c.jump(-1), 8);
        assert_eq!(c.jump(i64::MIN), 0);
        assert_eq!(c.jump(i64::MAX), 9);
    }

    #[test]
    fn seek_clamps() {
        let mut c = FrameCursor::new(4).unwrap();
        assert_eq!(c.seek(2), 2);
        assert_eq!(c.seek(100), 3);
        assert_eq!(c.total(), 4);
    }
}
