//! The animation core: one controller owning every live text sprite, their
//! lifecycle records and the single brightness-pulse slot, advanced once
//! per frame by [`AnimationController::tick`].

pub mod pulse;
pub mod text_life;

use crate::scene::SceneGraph;
use pulse::{BrightnessPulse, TRIGGER_DELAY_MS};
use text_life::{
    TextAnimation, TextPhase, TextSprite, MAX_LIVE_TEXTS, SPAWN_HOLD_MS,
};

/// Icosahedron self-rotation rates (rad/s).
pub const ICOSA_SPIN_X: f32 = 0.15;
pub const ICOSA_SPIN_Y: f32 = 0.21;

/// Ring oscillation around each ring's initial position.
const RING_OSC_AMPLITUDE: f32 = 0.3;
const RING_OSC_FREQUENCY: f32 = 1.5;

/// A sprite waiting out its on-screen reading pause before it starts moving.
#[derive(Debug, Clone)]
struct PendingSpawn {
    sprite_id: u64,
    created_at: f64,
}

/// Explicit context object for everything the frame tick mutates: sprites
/// in arrival order, pending spawns, animation records, and the pulse slot.
/// Lives from process start to process end; the tick is its only caller.
#[derive(Debug, Default)]
pub struct AnimationController {
    sprites: Vec<TextSprite>,
    pending: Vec<PendingSpawn>,
    animations: Vec<TextAnimation>,
    pulse: Option<BrightnessPulse>,
    next_id: u64,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sprite at the entry position. The caller is responsible for
    /// gating on font readiness; this always succeeds.
    pub fn spawn_text(&mut self, text: &str, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.sprites.push(TextSprite::new(id, text));
        self.pending.push(PendingSpawn {
            sprite_id: id,
            created_at: now,
        });
        log::debug!("sprite {id} spawned ({} live)", self.sprites.len());
        id
    }

    /// Advance the whole scene to `now` (ms since app start) and write the
    /// animated uniforms back into it. Called once per display refresh.
    pub fn tick(&mut self, scene: &mut SceneGraph, now: f64) {
        let t_sec = (now * 0.001) as f32;

        // icosahedron self-rotation, deterministic in elapsed time
        scene.icosahedron.rotation.x = t_sec * ICOSA_SPIN_X;
        scene.icosahedron.rotation.y = t_sec * ICOSA_SPIN_Y;

        // ring oscillation around the fixed initial positions, with a
        // per-ring phase offset from the ring index
        for (i, ring) in scene.rings.iter_mut().enumerate() {
            let phase = i as f32;
            let init = ring.initial_position;
            ring.position.x = init.x + (t_sec * RING_OSC_FREQUENCY + phase).sin() * RING_OSC_AMPLITUDE;
            ring.position.y = init.y + (t_sec * RING_OSC_FREQUENCY + phase).cos() * RING_OSC_AMPLITUDE;
            ring.position.z =
                init.z + (t_sec * RING_OSC_FREQUENCY + phase * 1.1).sin() * RING_OSC_AMPLITUDE;
        }

        let center = scene.icosahedron.position;

        // promote spawns whose reading pause has elapsed
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if now - p.created_at >= SPAWN_HOLD_MS {
                due.push(p.sprite_id);
                false
            } else {
                true
            }
        });
        for sprite_id in due {
            if let Some(sprite) = self.sprites.iter().find(|s| s.id == sprite_id) {
                self.animations
                    .push(TextAnimation::new(sprite_id, sprite.position, center, now));
            }
        }

        // advance animations in arrival order; a moving sprite arms the
        // pulse once its grace delay has elapsed and the slot is free
        for anim in &mut self.animations {
            let was_moving = anim.phase == TextPhase::MovingToTarget;
            let elapsed = now - anim.start_time;
            if let Some(sprite) = self.sprites.iter_mut().find(|s| s.id == anim.sprite_id) {
                anim.advance(sprite, center, now);
            }
            if was_moving && self.pulse.is_none() && elapsed >= TRIGGER_DELAY_MS {
                // backdate so the ramp is in phase with the trigger moment
                self.pulse = Some(BrightnessPulse::new(now - TRIGGER_DELAY_MS));
            }
        }

        // advance the pulse; hold end is the eviction moment
        if let Some(p) = &mut self.pulse {
            let frame = p.advance(now);
            scene.icosahedron.material.emissive_intensity = frame.emissive;
            scene.bloom.strength = frame.bloom;
            if frame.hold_ended && self.sprites.len() > MAX_LIVE_TEXTS {
                self.evict_oldest();
            }
            if frame.finished {
                self.pulse = None;
                scene.icosahedron.material.emissive_intensity = 0.0;
                scene.bloom.strength = 0.0;
            }
        }
    }

    /// Remove the single oldest sprite (FIFO by arrival, regardless of
    /// phase) together with its animation and any pending spawn. The
    /// persisted store is untouched by design.
    fn evict_oldest(&mut self) {
        if self.sprites.is_empty() {
            return;
        }
        let oldest = self.sprites.remove(0);
        self.animations.retain(|a| a.sprite_id != oldest.id);
        self.pending.retain(|p| p.sprite_id != oldest.id);
        log::debug!("sprite {} evicted ({} live)", oldest.id, self.sprites.len());
    }

    /// Drop every sprite, animation and the pulse (reset path).
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.pending.clear();
        self.animations.clear();
        self.pulse = None;
    }

    pub fn sprites(&self) -> &[TextSprite] {
        &self.sprites
    }

    pub fn live_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn pulse_phase(&self) -> Option<pulse::PulsePhase> {
        self.pulse.as_ref().map(|p| p.phase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::pulse::{PulsePhase, BLOOM_PEAK, EMISSIVE_PEAK};
    use crate::anim::text_life::ENTRY_POSITION;

    #[test]
    fn spawn_hold_delays_the_flight() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        ctl.spawn_text("HELLO", 0.0);

        ctl.tick(&mut scene, 1999.0);
        assert_eq!(ctl.sprites()[0].position, ENTRY_POSITION);

        // hold elapsed: the animation starts, and by half the travel
        // duration the sprite is halfway in
        ctl.tick(&mut scene, 2000.0);
        ctl.tick(&mut scene, 2750.0);
        let z = ctl.sprites()[0].position.z;
        assert!((z - ENTRY_POSITION.z * 0.5).abs() < 1e-3);
    }

    #[test]
    fn pulse_triggers_backdated_after_grace_delay() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        ctl.spawn_text("HELLO", 0.0);

        ctl.tick(&mut scene, 2000.0); // move starts
        ctl.tick(&mut scene, 2400.0);
        assert!(ctl.pulse_phase().is_none());

        ctl.tick(&mut scene, 2500.0);
        assert_eq!(ctl.pulse_phase(), Some(PulsePhase::Increase));
        // backdating: at now=3200 the pulse is 1200ms in and peaks
        ctl.tick(&mut scene, 3200.0);
        assert_eq!(scene.icosahedron.material.emissive_intensity, EMISSIVE_PEAK);
        assert_eq!(scene.bloom.strength, BLOOM_PEAK);
        assert_eq!(ctl.pulse_phase(), Some(PulsePhase::Hold));
    }

    #[test]
    fn pulse_completes_and_slot_frees_at_exact_zero() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        ctl.spawn_text("HELLO", 0.0);

        ctl.tick(&mut scene, 2000.0);
        ctl.tick(&mut scene, 2500.0); // pulse armed, start=2000
        ctl.tick(&mut scene, 3200.0); // -> Hold
        ctl.tick(&mut scene, 3301.0); // -> Decrease
        ctl.tick(&mut scene, 4501.0); // ramp done
        assert!(ctl.pulse_phase().is_none());
        assert_eq!(scene.icosahedron.material.emissive_intensity, 0.0);
        assert_eq!(scene.bloom.strength, 0.0);
    }

    #[test]
    fn eleventh_arrival_evicts_the_first() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        for i in 0..11 {
            ctl.spawn_text(&format!("MSG{i}"), 0.0);
        }
        assert_eq!(ctl.live_count(), 11);
        let first_id = ctl.sprites()[0].id;

        ctl.tick(&mut scene, 2000.0); // all flights start
        ctl.tick(&mut scene, 2500.0); // pulse armed (start=2000)
        ctl.tick(&mut scene, 3200.0); // Increase done -> Hold
        assert_eq!(ctl.live_count(), 11);
        ctl.tick(&mut scene, 3301.0); // Hold ends -> exactly one eviction
        assert_eq!(ctl.live_count(), 10);
        assert!(ctl.sprites().iter().all(|s| s.id != first_id));

        // no further eviction during the same pulse
        ctl.tick(&mut scene, 4000.0);
        assert_eq!(ctl.live_count(), 10);
    }

    #[test]
    fn twelve_arrivals_settle_back_to_ten() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        for i in 0..11 {
            ctl.spawn_text(&format!("MSG{i}"), 0.0);
        }
        // first pulse cycle evicts sprite 0
        ctl.tick(&mut scene, 2000.0);
        ctl.tick(&mut scene, 2500.0);
        ctl.tick(&mut scene, 3200.0);
        ctl.tick(&mut scene, 3301.0);
        ctl.tick(&mut scene, 4501.0); // pulse slot empty again
        assert_eq!(ctl.live_count(), 10);

        // 12th arrival pushes the count to 11 and starts a fresh cycle
        ctl.spawn_text("MSG11", 5000.0);
        assert_eq!(ctl.live_count(), 11);
        let second_id = ctl.sprites()[0].id;
        ctl.tick(&mut scene, 7000.0); // its flight starts
        ctl.tick(&mut scene, 7500.0); // pulse armed (start=7000)
        ctl.tick(&mut scene, 8200.0); // -> Hold
        ctl.tick(&mut scene, 8301.0); // Hold ends, evicts the now-oldest
        assert_eq!(ctl.live_count(), 10);
        assert!(ctl.sprites().iter().all(|s| s.id != second_id));
    }

    #[test]
    fn pulse_does_not_retrigger_while_active() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        ctl.spawn_text("A", 0.0);
        ctl.spawn_text("B", 100.0);

        ctl.tick(&mut scene, 2000.0);
        ctl.tick(&mut scene, 2500.0); // pulse armed by A, start=2000
        ctl.tick(&mut scene, 2700.0); // B is also moving; slot is taken
        ctl.tick(&mut scene, 3200.0);
        assert_eq!(ctl.pulse_phase(), Some(PulsePhase::Hold));
        // a single pulse: peak reached exactly once at 3200
        assert_eq!(scene.icosahedron.material.emissive_intensity, EMISSIVE_PEAK);
    }

    #[test]
    fn clear_removes_everything() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        for i in 0..5 {
            ctl.spawn_text(&format!("MSG{i}"), 0.0);
        }
        ctl.tick(&mut scene, 2600.0);
        assert_eq!(ctl.live_count(), 5);
        ctl.clear();
        assert_eq!(ctl.live_count(), 0);
        assert!(ctl.pulse_phase().is_none());
    }

    #[test]
    fn rings_oscillate_about_initial_positions() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        for now in [0.0, 500.0, 1234.0, 9999.0] {
            ctl.tick(&mut scene, now);
            for ring in &scene.rings {
                let d = ring.position.sub(ring.initial_position);
                assert!(d.x.abs() <= RING_OSC_AMPLITUDE + 1e-5);
                assert!(d.y.abs() <= RING_OSC_AMPLITUDE + 1e-5);
                assert!(d.z.abs() <= RING_OSC_AMPLITUDE + 1e-5);
            }
        }
    }

    #[test]
    fn icosahedron_rotation_tracks_elapsed_time() {
        let mut scene = SceneGraph::new();
        let mut ctl = AnimationController::new();
        ctl.tick(&mut scene, 10_000.0);
        assert!((scene.icosahedron.rotation.x - 10.0 * ICOSA_SPIN_X).abs() < 1e-4);
        assert!((scene.icosahedron.rotation.y - 10.0 * ICOSA_SPIN_Y).abs() < 1e-4);
    }
}
