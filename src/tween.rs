//! Time-based scalar tweens advanced by the frame loop.

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    #[cfg(test)]
    Linear,
    /// Exponential ease-out: fast start, long settle
    ExpoOut,
    /// Exponential ease-in-out: slow at both ends
    ExpoInOut,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            #[cfg(test)]
            Ease::Linear => t,
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Ease::ExpoInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

/// A single scalar animating from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
            ease,
        }
    }

    /// Progress from 0.0 (just started) to 1.0 (finished)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.ease.apply(self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance the tween, returns true if still running
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        !self.is_finished()
    }
}

/// Point `slot` at `to`, starting from `current`.
///
/// A running tween already heading for `to` is left alone, so repeated calls
/// never stack. Returns true if a new tween was started.
pub fn retarget(
    slot: &mut Option<Tween>,
    current: f32,
    to: f32,
    duration: f32,
    ease: Ease,
) -> bool {
    match slot {
        Some(tween) if tween.to == to && !tween.is_finished() => false,
        None if current == to => false,
        _ => {
            *slot = Some(Tween::new(current, to, duration, ease));
            true
        }
    }
}
