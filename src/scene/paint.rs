//! CPU scene painting: project world-space points and draw with the egui
//! painter. Wireframe strokes for the meshes, billboarded text for the
//! sprites; the pulse shows up as emissive brightening plus a wide soft
//! second stroke standing in for bloom.

use egui::{Color32, Pos2, Stroke};

use crate::anim::text_life::TextSprite;
use crate::math::{rotate_euler, Vec3};
use crate::scene::camera::Projected;
use crate::scene::SceneGraph;

/// World-space glyph height of a text line.
const TEXT_WORLD_SIZE: f32 = 0.9;
const LINE_SPACING: f32 = 1.15;

pub fn ndc_to_screen(rect: egui::Rect, ndc_x: f32, ndc_y: f32) -> Pos2 {
    // egui's y axis points down
    Pos2::new(
        rect.center().x + ndc_x * rect.width() * 0.5,
        rect.center().y - ndc_y * rect.height() * 0.5,
    )
}

/// Perspective-correct pixel size for a world-space height at `depth`.
pub fn world_size_to_px(world: f32, depth: f32, fov_y_deg: f32, rect_height: f32) -> f32 {
    let tan_half = (fov_y_deg.to_radians() * 0.5).tan();
    (world / (depth * tan_half)) * rect_height * 0.5
}

fn tint_color(tint: [f32; 3], brightness: f32, alpha: u8) -> Color32 {
    let b = brightness.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (tint[0] * b * 255.0) as u8,
        (tint[1] * b * 255.0) as u8,
        (tint[2] * b * 255.0) as u8,
        alpha,
    )
}

pub fn paint_scene(
    painter: &egui::Painter,
    rect: egui::Rect,
    scene: &SceneGraph,
    sprites: &[TextSprite],
) {
    let aspect = rect.width() / rect.height().max(1.0);
    painter.rect_filled(rect, 0.0, Color32::BLACK);

    let project = |p: Vec3| -> Option<Projected> { scene.camera.project(p, aspect) };

    // overall key-light level; static, but the painter honors the data
    let light_level = (scene
        .directional_lights
        .iter()
        .map(|l| l.intensity)
        .sum::<f32>()
        / 400.0)
        .clamp(0.0, 1.0);

    paint_rings(painter, rect, scene, light_level, &project);
    paint_icosahedron(painter, rect, scene, &project);
    paint_sprites(painter, rect, scene, sprites, &project);
}

fn paint_icosahedron(
    painter: &egui::Painter,
    rect: egui::Rect,
    scene: &SceneGraph,
    project: &dyn Fn(Vec3) -> Option<Projected>,
) {
    let ico = &scene.icosahedron;
    let emissive = ico.material.emissive_intensity;

    // faint env-map iridescence on the glass, never applied to text
    let env = scene.env_tint.unwrap_or([1.0, 1.0, 1.0]);
    let env_mix = ico.material.env_map_intensity.clamp(0.0, 1.0);
    let base = [
        ico.material.color[0] * (1.0 - env_mix) + env[0] * env_mix,
        ico.material.color[1] * (1.0 - env_mix) + env[1] * env_mix,
        ico.material.color[2] * (1.0 - env_mix) + env[2] * env_mix,
    ];

    // translucent at rest, brightening with the pulse
    let brightness = 0.45 + emissive * 0.55 / 0.65;
    let alpha = (120.0 + emissive * 200.0).min(255.0) as u8;
    let stroke = Stroke::new(1.2, tint_color(base, brightness, alpha));

    let bloom = scene.bloom.strength;
    let glow = if bloom > 0.0 {
        let glow_alpha = ((bloom / 0.15) * 70.0).min(255.0) as u8;
        Some(Stroke::new(
            1.2 + scene.bloom.radius * 8.0,
            tint_color(base, 1.0, glow_alpha),
        ))
    } else {
        None
    };

    for &[a, b] in &ico.wire {
        let wa = rotate_euler(a, ico.rotation).scale(ico.scale).add(ico.position);
        let wb = rotate_euler(b, ico.rotation).scale(ico.scale).add(ico.position);
        if let (Some(pa), Some(pb)) = (project(wa), project(wb)) {
            let sa = ndc_to_screen(rect, pa.ndc_x, pa.ndc_y);
            let sb = ndc_to_screen(rect, pb.ndc_x, pb.ndc_y);
            if let Some(glow) = glow {
                painter.line_segment([sa, sb], glow);
            }
            painter.line_segment([sa, sb], stroke);
        }
    }
}

fn paint_rings(
    painter: &egui::Painter,
    rect: egui::Rect,
    scene: &SceneGraph,
    light_level: f32,
    project: &dyn Fn(Vec3) -> Option<Projected>,
) {
    for ring in &scene.rings {
        // a ring with no loaded model never appears
        let Some(edges) = &ring.edges else { continue };

        let surface = scene.ring_tint.unwrap_or([0.78, 0.80, 0.85]);
        let env = scene.env_tint.unwrap_or([1.0, 1.0, 1.0]);
        let env_mix = ring.material.env_map_intensity.clamp(0.0, 1.0);
        let base = [
            surface[0] * (1.0 - env_mix) + env[0] * env_mix,
            surface[1] * (1.0 - env_mix) + env[1] * env_mix,
            surface[2] * (1.0 - env_mix) + env[2] * env_mix,
        ];
        let stroke = Stroke::new(1.0, tint_color(base, 0.35 + 0.65 * light_level, 200));

        for &[a, b] in edges.iter() {
            let wa = rotate_euler(a.scale(ring.scale), ring.rotation).add(ring.position);
            let wb = rotate_euler(b.scale(ring.scale), ring.rotation).add(ring.position);
            if let (Some(pa), Some(pb)) = (project(wa), project(wb)) {
                painter.line_segment(
                    [
                        ndc_to_screen(rect, pa.ndc_x, pa.ndc_y),
                        ndc_to_screen(rect, pb.ndc_x, pb.ndc_y),
                    ],
                    stroke,
                );
            }
        }
    }
}

fn paint_sprites(
    painter: &egui::Painter,
    rect: egui::Rect,
    scene: &SceneGraph,
    sprites: &[TextSprite],
    project: &dyn Fn(Vec3) -> Option<Projected>,
) {
    for sprite in sprites {
        let Some(p) = project(sprite.position) else { continue };
        let center = ndc_to_screen(rect, p.ndc_x, p.ndc_y);
        let font_px = world_size_to_px(
            TEXT_WORLD_SIZE,
            p.depth,
            scene.camera.fov_y_deg,
            rect.height(),
        )
        .clamp(8.0, 120.0);

        let lines: Vec<&str> = sprite.text.split('\n').collect();
        let line_height = font_px * LINE_SPACING;
        let block_height = line_height * lines.len() as f32;
        // the z tumble shows as a per-line shear; egui text is axis-aligned
        let shear = sprite.rotation.z * font_px * 0.6;

        for (i, line) in lines.iter().enumerate() {
            let offset = i as f32 - (lines.len() as f32 - 1.0) * 0.5;
            let pos = Pos2::new(
                center.x + shear * offset,
                center.y - block_height * 0.5 + line_height * (i as f32 + 0.5),
            );
            painter.text(
                pos,
                egui::Align2::CENTER_CENTER,
                *line,
                egui::FontId::proportional(font_px),
                Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_maps_to_screen_quadrants() {
        let rect = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let center = ndc_to_screen(rect, 0.0, 0.0);
        assert_eq!(center, Pos2::new(400.0, 300.0));
        // +y in NDC is up, which is a smaller screen y
        let up = ndc_to_screen(rect, 0.0, 1.0);
        assert!(up.y < center.y);
        let right = ndc_to_screen(rect, 1.0, 0.0);
        assert!(right.x > center.x);
    }

    #[test]
    fn nearer_text_is_larger() {
        let near = world_size_to_px(0.9, 4.2, 75.0, 800.0);
        let far = world_size_to_px(0.9, 20.0, 75.0, 800.0);
        assert!(near > far);
        assert!(far > 0.0);
    }
}
