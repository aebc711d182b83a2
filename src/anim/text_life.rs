//! Per-sprite lifecycle: spawn hold, flight into the icosahedron, and the
//! open-ended float around it.

use crate::math::Vec3;

/// Pause after spawn so the viewer can read the text before it moves (ms).
pub const SPAWN_HOLD_MS: f64 = 2000.0;
/// Duration of the flight from the entry point to the icosahedron (ms).
pub const TRAVEL_MS: f64 = 1500.0;
/// Where new text appears, facing the camera.
pub const ENTRY_POSITION: Vec3 = Vec3::new(0.0, 0.0, 15.8);
/// Orbit radius of the float phase.
pub const FLOAT_RADIUS: f32 = 3.0;
/// Orbit angular speed (rad/s).
pub const FLOAT_SPEED: f32 = 0.4;
/// Upper bound on live sprites; the oldest is evicted beyond this.
pub const MAX_LIVE_TEXTS: usize = 10;

/// Render layer. Text lives on [`RenderLayer::Unreflected`] so it stays out
/// of the environment-map tinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    Scene,
    Unreflected,
}

/// One visual text object. Owned by the controller, 1:1 with its animation
/// record once the spawn hold has elapsed.
#[derive(Debug, Clone)]
pub struct TextSprite {
    pub id: u64,
    pub text: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub layer: RenderLayer,
}

impl TextSprite {
    pub fn new(id: u64, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            position: ENTRY_POSITION,
            rotation: Vec3::ZERO,
            layer: RenderLayer::Unreflected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPhase {
    MovingToTarget,
    Floating,
}

/// Animation state for one sprite.
#[derive(Debug, Clone)]
pub struct TextAnimation {
    pub sprite_id: u64,
    /// Start of the current phase (ms).
    pub start_time: f64,
    /// Planned duration of the moving phase (ms).
    pub duration: f64,
    pub start_position: Vec3,
    pub end_position: Vec3,
    pub phase: TextPhase,
}

impl TextAnimation {
    pub fn new(sprite_id: u64, start_position: Vec3, end_position: Vec3, start_time: f64) -> Self {
        Self {
            sprite_id,
            start_time,
            duration: TRAVEL_MS,
            start_position,
            end_position,
            phase: TextPhase::MovingToTarget,
        }
    }

    /// Advance one frame. `center` is the icosahedron's translational
    /// origin (its rotation is ignored on purpose). Returns true on the
    /// single frame where the sprite settles and flips to Floating.
    pub fn advance(&mut self, sprite: &mut TextSprite, center: Vec3, now: f64) -> bool {
        match self.phase {
            TextPhase::MovingToTarget => {
                let t = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
                if t < 1.0 {
                    sprite.position = Vec3::lerp(self.start_position, self.end_position, t as f32);
                    false
                } else {
                    // snap exactly, restart the phase clock
                    sprite.position = self.end_position;
                    self.phase = TextPhase::Floating;
                    self.start_time = now;
                    true
                }
            }
            TextPhase::Floating => {
                float_update(sprite, center, (now - self.start_time) * 0.001);
                false
            }
        }
    }
}

/// Closed orbit around `center`: independent sinusoids per axis (z runs at
/// 0.7x the frequency) plus a slow tumble on all three rotation axes.
fn float_update(sprite: &mut TextSprite, center: Vec3, t_sec: f64) {
    let t = t_sec as f32;
    sprite.position.x = center.x + FLOAT_RADIUS * (FLOAT_SPEED * t).sin();
    sprite.position.y = center.y + FLOAT_RADIUS * (FLOAT_SPEED * t).cos();
    sprite.position.z = center.z + FLOAT_RADIUS * (FLOAT_SPEED * t * 0.7).sin();

    sprite.rotation.x = (t * 0.5).sin() * 0.8;
    sprite.rotation.y = (t * 0.3).cos() * 0.8;
    sprite.rotation.z = (t * 0.7).sin() * 0.2;
}
