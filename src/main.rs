//! Desktop entry point: the eframe shell around the murmur scene.

use std::path::Path;
use std::time::Instant;

use eframe::egui;

use murmur::anim::AnimationController;
use murmur::assets::ResourceRegistry;
use murmur::config::Config;
use murmur::inbox::MessageInbox;
use murmur::scene::paint::paint_scene;
use murmur::scene::{SceneGraph, RING_COUNT};
use murmur::store::TextStore;

fn main() {
    env_logger::init();

    let config = Config::load(Path::new("murmur.json"));
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("murmur"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "murmur",
        options,
        Box::new(|_cc| Ok(Box::new(MurmurApp::new(config)))),
    ) {
        log::error!("failed to start: {e}");
    }
}

struct MurmurApp {
    config: Config,
    scene: SceneGraph,
    controller: AnimationController,
    store: TextStore,
    assets: ResourceRegistry,
    inbox: MessageInbox,
    input: String,
    show_stats: bool,
    start: Instant,
    font_installed: bool,
}

impl MurmurApp {
    fn new(config: Config) -> Self {
        let store = TextStore::open(&config.storage_path);
        log::info!("store opened with {} entries", store.len());
        let assets = ResourceRegistry::load(&config.asset_paths());
        let inbox = MessageInbox::new();
        inbox.spawn_stdin_reader();

        Self {
            config,
            scene: SceneGraph::new(),
            controller: AnimationController::new(),
            store,
            assets,
            inbox,
            input: String::new(),
            show_stats: false,
            start: Instant::now(),
            font_installed: false,
        }
    }

    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Install the display font into egui once its bytes have arrived.
    fn install_font_if_ready(&mut self, ctx: &egui::Context) {
        if self.font_installed {
            return;
        }
        if let Some(bytes) = self.assets.take_font_bytes() {
            let mut fonts = egui::FontDefinitions::default();
            fonts
                .font_data
                .insert("display".to_owned(), egui::FontData::from_owned(bytes));
            if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                family.insert(0, "display".to_owned());
            }
            ctx.set_fonts(fonts);
            self.font_installed = true;
        }
    }

    /// Move freshly completed asset loads into the scene.
    fn adopt_loaded_assets(&mut self) {
        for index in 0..RING_COUNT {
            if let Some(edges) = self.assets.take_ring_model(index) {
                self.scene.rings[index].edges = Some(edges);
            }
        }
        if self.scene.env_tint.is_none() {
            self.scene.env_tint = self.assets.env_tint();
        }
        if self.scene.ring_tint.is_none() {
            self.scene.ring_tint = self.assets.ring_tint();
        }
    }

    /// Persist every arrival; only font-ready arrivals enter the scene.
    fn ingest_messages(&mut self, now: f64) {
        for raw in self.inbox.drain() {
            let entry = self.store.append(&raw);
            if self.assets.font_ready() {
                self.controller.spawn_text(&entry.text, now);
            } else {
                log::debug!("font not ready, message persisted but not shown");
            }
        }
    }

    fn send_current_input(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        // goes through the same channel as every other producer
        if self.inbox.sender().send(text).is_ok() {
            self.input.clear();
        }
    }

    fn download_export(&self) {
        match std::fs::write(&self.config.export_path, self.store.export_plain()) {
            Ok(()) => log::info!(
                "exported {} entries to {}",
                self.store.len(),
                self.config.export_path.display()
            ),
            Err(e) => log::error!(
                "export to {} failed: {e}",
                self.config.export_path.display()
            ),
        }
    }

    /// Full reset: store wiped, controller cleared, scene re-initialized.
    /// Already-loaded assets are kept; the originals never need reloading.
    fn reset_all(&mut self) {
        self.store.reset();
        self.controller.clear();
        let mut fresh = SceneGraph::new();
        for (fresh_ring, old_ring) in fresh.rings.iter_mut().zip(&self.scene.rings) {
            fresh_ring.edges = old_ring.edges.clone();
        }
        fresh.env_tint = self.scene.env_tint;
        fresh.ring_tint = self.scene.ring_tint;
        self.scene = fresh;
        log::info!("reset complete");
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .desired_width(260.0)
                    .hint_text("leave a message"),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Send").clicked() || submitted {
                self.send_current_input();
                response.request_focus();
            }
            ui.separator();
            if ui.button("Download").clicked() {
                self.download_export();
            }
            if ui.button("Reset").clicked() {
                self.reset_all();
            }
            ui.separator();
            ui.checkbox(&mut self.show_stats, "Stats");
        });
    }

    fn stats_panel(&self, ui: &mut egui::Ui) {
        ui.heading("murmur");
        ui.separator();
        ui.label(format!("live texts: {}", self.controller.live_count()));
        ui.label(format!("stored entries: {}", self.store.len()));
        ui.label(match self.controller.pulse_phase() {
            Some(phase) => format!("pulse: {phase:?}"),
            None => "pulse: idle".to_string(),
        });
        ui.separator();
        ui.label(format!(
            "font: {}",
            if self.assets.font_ready() { "ready" } else { "loading" }
        ));
        ui.label(format!(
            "rings: {}/{}",
            self.scene.rings.iter().filter(|r| r.edges.is_some()).count(),
            RING_COUNT
        ));
    }
}

impl eframe::App for MurmurApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now_ms();

        self.assets.poll();
        self.install_font_if_ready(ctx);
        self.adopt_loaded_assets();
        self.ingest_messages(now);
        self.controller.tick(&mut self.scene, now);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        if self.show_stats {
            egui::SidePanel::right("stats")
                .resizable(false)
                .show(ctx, |ui| self.stats_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                paint_scene(&painter, response.rect, &self.scene, self.controller.sprites());
            });

        // continuous animation
        ctx.request_repaint();
    }
}
