/// Motion driver state: the observer's position on the traversal axis.
///
/// The observer only ever moves forward (towards negative z) by a fixed
/// step per tick.
#[derive(Debug, Clone)]
pub struct MotionDriver {
    observer_z: f64,
    step: f64,
    ticks: u64,
}

impl MotionDriver {
    pub fn new(initial_z: f64, step: f64) -> Self {
        Self {
            observer_z: initial_z,
            step,
            ticks: 0,
        }
    }

    /// Move one step forward and return the new observer z.
    pub fn advance(&mut self) -> f64 {
        self.observer_z -= self.step;
        self.ticks += 1;
        self.observer_z
    }

    pub fn observer_z(&self) -> f64 {
        self.observer_z
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_forward() {
        let mut motion = MotionDriver::new(1.0, 0.25);
        assert_eq!(motion.advance(), 0.75);
        assert_eq!(motion.advance(), 0.5);
        assert_eq!(motion.ticks(), 2);
        assert_eq!(motion.observer_z(), 0.5);
    }

    #[test]
    fn test_step_is_constant_far_from_origin() {
        for start in [-32_768.0, -262_144.0, -1.0e9] {
            let mut motion = MotionDriver::new(start, 0.01);
            let first = start - motion.advance();
            assert!((first - 0.01).abs() < 1e-6, "start={} step={}", start, first);
            for _ in 1..1000 {
                motion.advance();
            }
            assert!((start - motion.observer_z() - 10.0).abs() < 1e-3);
        }
    }
}
