//! Background asset loading.
//!
//! Each asset (font, environment map, ring texture, ring models) is read
//! and decoded on its own thread, fire-and-forget, and the results are
//! drained into the registry once per frame. A failed load is logged and
//! leaves that feature degraded: a missing ring model means that ring never
//! appears, a missing font means incoming text never becomes a sprite.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::math::Vec3;
use crate::scene::geometry::parse_obj_wireframe;
use crate::scene::RING_COUNT;

/// Where the fixed external resources live.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub font: PathBuf,
    pub env_map: PathBuf,
    pub ring_texture: PathBuf,
    pub ring_models: Vec<PathBuf>,
}

enum Loaded {
    Font(Vec<u8>),
    EnvTint([f32; 3]),
    RingTint([f32; 3]),
    RingModel(usize, Vec<[Vec3; 2]>),
    Failed { what: String, error: String },
}

/// Readiness registry the frame tick queries. Completion mutates this
/// explicitly via [`ResourceRegistry::poll`] rather than via callbacks.
pub struct ResourceRegistry {
    rx: mpsc::Receiver<Loaded>,
    font_bytes: Option<Vec<u8>>,
    font_ready: bool,
    env_tint: Option<[f32; 3]>,
    ring_tint: Option<[f32; 3]>,
    ring_models: Vec<Option<Vec<[Vec3; 2]>>>,
}

impl ResourceRegistry {
    /// Kick off every load. Returns immediately; call
    /// [`ResourceRegistry::poll`] each frame to observe completions.
    pub fn load(paths: &AssetPaths) -> Self {
        let (tx, rx) = mpsc::channel();

        spawn_load(tx.clone(), paths.font.clone(), "font", |bytes| {
            Ok(Loaded::Font(bytes))
        });
        spawn_load(tx.clone(), paths.env_map.clone(), "environment map", |bytes| {
            decode_average_tint(&bytes).map(Loaded::EnvTint)
        });
        spawn_load(tx.clone(), paths.ring_texture.clone(), "ring texture", |bytes| {
            decode_average_tint(&bytes).map(Loaded::RingTint)
        });
        for (index, path) in paths.ring_models.iter().take(RING_COUNT).enumerate() {
            spawn_load(tx.clone(), path.clone(), "ring model", move |bytes| {
                let source = String::from_utf8_lossy(&bytes);
                let edges = parse_obj_wireframe(&source);
                if edges.is_empty() {
                    Err("no edges in OBJ".to_string())
                } else {
                    Ok(Loaded::RingModel(index, edges))
                }
            });
        }

        Self {
            rx,
            font_bytes: None,
            font_ready: false,
            env_tint: None,
            ring_tint: None,
            ring_models: (0..RING_COUNT).map(|_| None).collect(),
        }
    }

    /// Drain completed loads. Call once per frame.
    pub fn poll(&mut self) {
        while let Ok(loaded) = self.rx.try_recv() {
            match loaded {
                Loaded::Font(bytes) => {
                    log::info!("font loaded ({} bytes)", bytes.len());
                    self.font_bytes = Some(bytes);
                    self.font_ready = true;
                }
                Loaded::EnvTint(tint) => {
                    log::info!("environment map loaded");
                    self.env_tint = Some(tint);
                }
                Loaded::RingTint(tint) => {
                    log::info!("ring texture loaded");
                    self.ring_tint = Some(tint);
                }
                Loaded::RingModel(index, edges) => {
                    log::info!("ring model {index} loaded ({} edges)", edges.len());
                    if let Some(slot) = self.ring_models.get_mut(index) {
                        *slot = Some(edges);
                    }
                }
                Loaded::Failed { what, error } => {
                    log::error!("failed to load {what}: {error}");
                }
            }
        }
    }

    /// Gate for text-sprite creation: arrivals before this turns true are
    /// dropped from the scene (still persisted).
    pub fn font_ready(&self) -> bool {
        self.font_ready
    }

    /// The raw font bytes, handed over once for installation into egui.
    /// `font_ready` stays true afterwards.
    pub fn take_font_bytes(&mut self) -> Option<Vec<u8>> {
        self.font_bytes.take()
    }

    pub fn env_tint(&self) -> Option<[f32; 3]> {
        self.env_tint
    }

    pub fn ring_tint(&self) -> Option<[f32; 3]> {
        self.ring_tint
    }

    pub fn take_ring_model(&mut self, index: usize) -> Option<Vec<[Vec3; 2]>> {
        self.ring_models.get_mut(index).and_then(Option::take)
    }
}

fn spawn_load<F>(tx: mpsc::Sender<Loaded>, path: PathBuf, what: &'static str, decode: F)
where
    F: FnOnce(Vec<u8>) -> Result<Loaded, String> + Send + 'static,
{
    std::thread::spawn(move || {
        let result = std::fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(decode)
            .unwrap_or_else(|error| Loaded::Failed {
                what: format!("{what} ({})", path.display()),
                error,
            });
        // the app may have shut down; a closed channel is fine
        let _ = tx.send(result);
    });
}

/// Decode an image and average it down to a single RGB tint in [0, 1].
/// The painter uses this as the environment-reflection color.
fn decode_average_tint(bytes: &[u8]) -> Result<[f32; 3], String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err("empty image".to_string());
    }
    let mut sum = [0.0f64; 3];
    for pixel in rgba.pixels() {
        sum[0] += pixel.0[0] as f64;
        sum[1] += pixel.0[1] as f64;
        sum[2] += pixel.0[2] as f64;
    }
    let count = (w as f64) * (h as f64) * 255.0;
    Ok([
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_and_poll(registry: &mut ResourceRegistry) {
        // loads are tiny; give the threads a moment
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            registry.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn missing_paths() -> AssetPaths {
        let base = std::env::temp_dir().join("murmur-assets-missing");
        AssetPaths {
            font: base.join("font.ttf"),
            env_map: base.join("env.jpg"),
            ring_texture: base.join("ring.jpg"),
            ring_models: vec![
                base.join("ring.1.obj"),
                base.join("ring.2.obj"),
                base.join("ring.3.obj"),
            ],
        }
    }

    #[test]
    fn missing_assets_degrade_without_readiness() {
        let mut registry = ResourceRegistry::load(&missing_paths());
        wait_and_poll(&mut registry);
        assert!(!registry.font_ready());
        assert!(registry.env_tint().is_none());
        assert!(registry.take_ring_model(0).is_none());
    }

    #[test]
    fn ring_model_file_loads_and_is_taken_once() {
        let dir = std::env::temp_dir().join(format!("murmur-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let obj = dir.join("ring.1.obj");
        std::fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut paths = missing_paths();
        paths.ring_models = vec![obj.clone()];
        let mut registry = ResourceRegistry::load(&paths);
        wait_and_poll(&mut registry);

        let edges = registry.take_ring_model(0);
        assert!(edges.is_some());
        assert_eq!(edges.unwrap().len(), 3);
        assert!(registry.take_ring_model(0).is_none());

        std::fs::remove_file(&obj).ok();
    }

    #[test]
    fn font_bytes_taken_once_but_readiness_persists() {
        let dir = std::env::temp_dir().join(format!("murmur-font-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let font = dir.join("font.ttf");
        std::fs::write(&font, b"not a real font, bytes suffice").unwrap();

        let mut paths = missing_paths();
        paths.font = font.clone();
        let mut registry = ResourceRegistry::load(&paths);
        wait_and_poll(&mut registry);

        assert!(registry.font_ready());
        assert!(registry.take_font_bytes().is_some());
        assert!(registry.take_font_bytes().is_none());
        assert!(registry.font_ready());

        std::fs::remove_file(&font).ok();
    }
}
