use std::collections::HashSet;

use eframe::egui::{self, Align, Context, Layout, Ui};
use fuzzy_matcher::FuzzyMatcher;

use super::GraphView;
use super::graph::interaction::{MAX_ZOOM, MIN_ZOOM};

impl GraphView {
    pub(super) fn show(&mut self, ctx: &Context) {
        if self.graph_dirty {
            self.rebuild_session(ctx);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("notegraph");
                    ui.separator();
                    ui.label(format!("focus: {}", self.focus));
                    ui.label(format!("nodes: {}", self.graph.nodes.len()));
                    ui.label(format!("links: {}", self.graph.links.len()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.text_edit_singleline(&mut self.search);
                        ui.label("search:");
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));

        // Exactly one navigation per resolved click.
        if let Some(id) = self.pending_navigation.take() {
            self.navigate_to(id);
        }
    }

    /// Fuzzy matches of the search box against node labels.
    pub(super) fn search_matches(&self) -> HashSet<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return HashSet::new();
        }

        self.graph
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                self.matcher
                    .fuzzy_match(&node.label, query)
                    .map(|_score| index)
            })
            .collect()
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.heading("Focus");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.focus_input);
            if ui.button("Go").clicked() {
                // Unknown ids are a no-op rather than an error.
                if self.index.contains(&self.focus_input) {
                    self.pending_navigation = Some(self.focus_input.clone());
                }
            }
        });

        ui.separator();
        ui.heading("Graph");
        ui.add(egui::Slider::new(&mut self.staged.depth, -1..=5).text("depth"));
        ui.label("depth -1 shows the whole graph");
        ui.checkbox(&mut self.staged.show_tags, "Show tag nodes");
        ui.checkbox(&mut self.staged.enable_radial, "Radial layout");
        ui.checkbox(&mut self.staged.focus_on_hover, "Dim on hover");
        ui.checkbox(&mut self.staged.drag, "Drag nodes");
        ui.checkbox(&mut self.staged.zoom, "Zoom and pan");

        ui.separator();
        ui.heading("Forces");
        ui.add(egui::Slider::new(&mut self.staged.repel_force, 0.0..=2.0).text("repel force"));
        ui.add(egui::Slider::new(&mut self.staged.center_force, 0.0..=1.0).text("center force"));
        ui.add(
            egui::Slider::new(&mut self.staged.link_distance, 10.0..=120.0).text("link distance"),
        );

        ui.separator();
        ui.heading("Labels");
        ui.add(egui::Slider::new(&mut self.staged.font_size, 0.3..=1.5).text("font size"));
        ui.add(egui::Slider::new(&mut self.staged.opacity_scale, 0.5..=3.0).text("opacity scale"));
        ui.add(egui::Slider::new(&mut self.staged.scale, MIN_ZOOM..=MAX_ZOOM).text("initial zoom"));

        ui.add_space(6.0);
        let changed = self.staged != self.config;
        ui.horizontal(|ui| {
            if ui.add_enabled(changed, egui::Button::new("Apply")).clicked() {
                self.config = self.staged.clone();
                self.graph_dirty = true;
            }
            if ui
                .add_enabled(changed, egui::Button::new("Revert"))
                .clicked()
            {
                self.staged = self.config.clone();
            }
        });

        ui.separator();
        ui.label(format!("visited notes: {}", self.visited.len()));
    }
}
