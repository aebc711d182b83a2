//! The global brightness pulse.
//!
//! A one-shot three-phase animation on the icosahedron, triggered by a text
//! arrival: emissive intensity and bloom strength ramp up together, hold at
//! peak for a beat, then ramp back down. At most one pulse is alive at a
//! time; the end of the Hold phase is also the moment the controller runs
//! its eviction check, so new light and old text leave in the same breath.

use crate::math::lerp;

/// Ramp duration for Increase and Decrease (ms).
pub const RAMP_MS: f64 = 1200.0;
/// Plateau duration between the ramps (ms).
pub const HOLD_MS: f64 = 100.0;
/// Grace delay after a sprite starts moving before a pulse may begin (ms).
pub const TRIGGER_DELAY_MS: f64 = 500.0;

/// Peak emissive intensity of the icosahedron material.
pub const EMISSIVE_PEAK: f32 = 0.65;
/// Peak bloom strength.
pub const BLOOM_PEAK: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePhase {
    Increase,
    Hold,
    Decrease,
}

/// Output of one pulse step.
#[derive(Debug, Clone, Copy)]
pub struct PulseFrame {
    pub emissive: f32,
    pub bloom: f32,
    /// True exactly once, on the Hold -> Decrease transition.
    pub hold_ended: bool,
    /// True once the Decrease ramp completes; the slot must then be emptied.
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct BrightnessPulse {
    start_time: f64,
    phase: PulsePhase,
}

impl BrightnessPulse {
    /// `start_time` may be backdated by the trigger grace delay so the
    /// Increase ramp is in phase with the original trigger moment.
    pub fn new(start_time: f64) -> Self {
        Self {
            start_time,
            phase: PulsePhase::Increase,
        }
    }

    pub fn phase(&self) -> PulsePhase {
        self.phase
    }

    /// Advance to `now` (ms). Each phase transition resets the phase clock
    /// to the current frame time.
    pub fn advance(&mut self, now: f64) -> PulseFrame {
        let elapsed = now - self.start_time;
        let mut frame = PulseFrame {
            emissive: 0.0,
            bloom: 0.0,
            hold_ended: false,
            finished: false,
        };

        match self.phase {
            PulsePhase::Increase => {
                let t = (elapsed / RAMP_MS).clamp(0.0, 1.0) as f32;
                frame.emissive = lerp(0.0, EMISSIVE_PEAK, t);
                frame.bloom = lerp(0.0, BLOOM_PEAK, t);
                if t >= 1.0 {
                    self.phase = PulsePhase::Hold;
                    self.start_time = now;
                }
            }
            PulsePhase::Hold => {
                frame.emissive = EMISSIVE_PEAK;
                frame.bloom = BLOOM_PEAK;
                if elapsed >= HOLD_MS {
                    self.phase = PulsePhase::Decrease;
                    self.start_time = now;
                    frame.hold_ended = true;
                }
            }
            PulsePhase::Decrease => {
                let t = (elapsed / RAMP_MS).clamp(0.0, 1.0) as f32;
                frame.emissive = lerp(EMISSIVE_PEAK, 0.0, t);
                frame.bloom = lerp(BLOOM_PEAK, 0.0, t);
                if t >= 1.0 {
                    // force exact rest values, guarding against float drift
                    frame.emissive = 0.0;
                    frame.bloom = 0.0;
                    frame.finished = true;
                }
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_is_monotonic_and_peaks_exactly() {
        let mut pulse = BrightnessPulse::new(0.0);
        let mut last = -1.0_f32;
        for step in 0..=12 {
            let now = step as f64 * 100.0;
            let frame = pulse.advance(now);
            assert!(frame.emissive >= last);
            last = frame.emissive;
        }
        // step at t = 1200 landed exactly on peak and flipped to Hold
        assert_eq!(last, EMISSIVE_PEAK);
        assert_eq!(pulse.phase(), PulsePhase::Hold);
    }

    #[test]
    fn hold_ends_once_then_decreases_to_exact_zero() {
        let mut pulse = BrightnessPulse::new(0.0);
        pulse.advance(1200.0); // -> Hold at 1200
        let frame = pulse.advance(1250.0);
        assert!(!frame.hold_ended);
        assert_eq!(frame.emissive, EMISSIVE_PEAK);
        assert_eq!(frame.bloom, BLOOM_PEAK);

        let frame = pulse.advance(1300.0); // hold elapsed
        assert!(frame.hold_ended);
        assert_eq!(pulse.phase(), PulsePhase::Decrease);

        let mut last = f32::MAX;
        for step in 0..=12 {
            let now = 1300.0 + step as f64 * 100.0;
            let frame = pulse.advance(now);
            assert!(frame.emissive <= last);
            last = frame.emissive;
            if frame.finished {
                assert_eq!(frame.emissive, 0.0);
                assert_eq!(frame.bloom, 0.0);
            }
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn backdated_start_is_mid_ramp() {
        // trigger observed at t=500, start backdated to 0
        let mut pulse = BrightnessPulse::new(0.0);
        let frame = pulse.advance(600.0);
        let expected = EMISSIVE_PEAK * (600.0 / 1200.0) as f32;
        assert!((frame.emissive - expected).abs() < 1e-5);
    }
}
