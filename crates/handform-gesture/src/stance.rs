//! Stances and stance debouncing

/// Interaction mode, derived from the extended fingertip count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Stance {
    None = 0,
    Select = 1,
    TranslateSet = 2,
    RotateSet = 3,
    Unused = 4,
    ScaleSet = 5,
}

impl Stance {
    /// Counts above five (a second hand, held tools) have no stance
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Stance::None,
            1 => Stance::Select,
            2 => Stance::TranslateSet,
            3 => Stance::RotateSet,
            5 => Stance::ScaleSet,
            _ => Stance::Unused,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stance::None => "none",
            Stance::Select => "select",
            Stance::TranslateSet => "translate",
            Stance::RotateSet => "rotate",
            Stance::Unused => "unused",
            Stance::ScaleSet => "scale",
        }
    }
}

/// Guards stance dispatch until the finger count has held steady
///
/// Tracking jitter often flickers a finger in and out for a frame or two;
/// the guard keeps those flickers from triggering the neighbouring stance.
#[derive(Debug, Clone)]
pub struct StanceDebounce {
    last_count: usize,
    timer: f32,
    delay: f32,
}

impl StanceDebounce {
    pub fn new(delay: f32) -> Self {
        StanceDebounce {
            last_count: 0,
            timer: 0.0,
            delay,
        }
    }

    /// Feed this tick's count. Returns true once the count has been stable
    /// for at least `delay` seconds, this tick included.
    pub fn observe(&mut self, count: usize, dt: f32) -> bool {
        if count != self.last_count {
            self.last_count = count;
            self.timer = 0.0;
        }
        self.timer += dt;
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.timer >= self.delay
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_from_count() {
        assert_eq!(Stance::from_count(0), Stance::None);
        assert_eq!(Stance::from_count(1), Stance::Select);
        assert_eq!(Stance::from_count(2), Stance::TranslateSet);
        assert_eq!(Stance::from_count(3), Stance::RotateSet);
        assert_eq!(Stance::from_count(4), Stance::Unused);
        assert_eq!(Stance::from_count(5), Stance::ScaleSet);
        assert_eq!(Stance::from_count(7), Stance::Unused);
        assert_eq!(Stance::ScaleSet as u8, 5);
    }

    #[test]
    fn test_debounce_guards_change() {
        let mut debounce = StanceDebounce::new(0.1);

        // Count 0 is the initial count, so it is not a change
        assert!(!debounce.observe(0, 0.06));
        assert!(debounce.observe(0, 0.06));

        // Change resets; dt 0.04 needs three ticks to reach 0.1
        assert!(!debounce.observe(2, 0.04));
        assert!(!debounce.observe(2, 0.04));
        assert!(debounce.observe(2, 0.04));

        // Flicker restarts the guard
        assert!(!debounce.observe(3, 0.04));
        assert!(!debounce.observe(2, 0.04));
        assert_eq!(debounce.last_count(), 2);
    }

    #[test]
    fn test_zero_delay_never_guards() {
        let mut debounce = StanceDebounce::new(0.0);
        assert!(debounce.observe(1, 0.0));
        assert!(debounce.observe(4, 0.016));
    }
}
