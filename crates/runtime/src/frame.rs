use foundation::time::Time;

/// Per-frame timing handed to everything driven by the render loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// Fixed-step frame: `time = index * dt_s`.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time(0.0),
        }
    }

    /// Advances by a measured delta; negative or non-finite deltas count as zero.
    pub fn advance(self, dt_s: f64) -> Self {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.after(dt_s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn advance_accumulates_variable_deltas() {
        let f = Frame::first().advance(0.25).advance(0.5);
        assert_eq!(f.index, 2);
        assert_eq!(f.time, Time(0.75));
        assert_eq!(f.dt_s, 0.5);
    }

    #[test]
    fn advance_ignores_bad_deltas() {
        let f = Frame::first().advance(-1.0).advance(f64::NAN);
        assert_eq!(f.time, Time(0.0));
        assert_eq!(f.index, 2);
    }
}
