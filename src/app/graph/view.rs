use eframe::egui::{self, Align2, FontId, Sense, Ui, vec2};

use super::super::GraphView;
use super::super::physics::ForceParams;

/// Whole-graph views settle onto a ring at this fraction of the half-extent.
const RADIAL_RING_FACTOR: f32 = 0.8;

impl GraphView {
    /// One frame: input handlers, then simulation step, then position sync,
    /// then edge rebuild, then draw. The order is fixed: edges read the
    /// same positions the nodes and labels are drawn from.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.destroyed {
            return;
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.theme.background);

        self.handle_zoom(ui, rect, &response);
        self.handle_pan(ui, &response);

        let params = ForceParams {
            repel_force: self.config.repel_force,
            center_force: self.config.center_force,
            link_distance: self.config.link_distance,
            radial_radius: self
                .config
                .enable_radial
                .then(|| RADIAL_RING_FACTOR * rect.width().min(rect.height()) / 2.0),
        };
        let moved = self.sim.step(
            params,
            &mut self.graph.nodes,
            &self.graph.links,
            &self.graph.degrees,
            &self.graph.radii,
        );

        self.scene.sync(rect, &self.transform, &self.graph.nodes);

        self.update_hover(ui);
        self.handle_drag(ui);
        self.handle_click(&response);

        if self.hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let dim_inactive = self.config.focus_on_hover && self.hovered.is_some();
        let search_matches = self.search_matches();
        self.scene
            .rebuild_edges(&self.theme, self.transform.scale, dim_inactive);
        self.scene
            .paint(&painter, &self.theme, dim_inactive, &search_matches);

        if let Some(index) = self.hovered
            && let Some(node) = self.graph.nodes.get(index)
        {
            let degree = self.graph.degrees.get(index).copied().unwrap_or(0);
            let mut overlay = format!("{}  |  links {degree}", node.label);
            if !node.tags.is_empty() {
                overlay.push_str(&format!("  |  #{}", node.tags.join(" #")));
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                overlay,
                FontId::proportional(13.0),
                self.theme.dark,
            );
        }

        // Re-arm the next frame while anything is still in motion.
        if moved || self.sim.is_running() || self.drag.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}
