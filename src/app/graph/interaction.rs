use std::collections::HashSet;

use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::physics::REHEAT_ALPHA;
use super::super::scene::{LinkHandle, NodeHandle};
use super::super::{GraphView, SimNode};

pub(in crate::app) const MIN_ZOOM: f32 = 0.25;
pub(in crate::app) const MAX_ZOOM: f32 = 4.0;

/// A press released within this window counts as a click, not a drag.
pub(in crate::app) const CLICK_MAX_SECS: f64 = 0.5;

/// Small nodes stay clickable even when their circle is a few pixels wide.
const MIN_HIT_RADIUS: f32 = 8.0;

/// Scale plus translation applied to the whole scene.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ViewTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl ViewTransform {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.clamp(MIN_ZOOM, MAX_ZOOM),
            translate: Vec2::ZERO,
        }
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.translate + world * self.scale
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.translate) / self.scale
    }
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct DragState {
    pub node: usize,
    pub pressed_at: f64,
}

pub(in crate::app) fn resolves_as_click(pressed_at: f64, released_at: f64) -> bool {
    released_at - pressed_at < CLICK_MAX_SECS
}

/// Unpins the drag subject unconditionally; returns the navigation target
/// only when the gesture was short enough to count as a click.
pub(in crate::app) fn finish_drag(
    nodes: &mut [SimNode],
    drag: DragState,
    released_at: f64,
) -> Option<String> {
    let node = nodes.get_mut(drag.node)?;
    node.pinned = None;
    resolves_as_click(drag.pressed_at, released_at).then(|| node.id.clone())
}

/// Inactive labels fade in with zoom; fully visible well before max zoom.
pub(in crate::app) fn zoom_label_alpha(scale: f32, opacity_scale: f32) -> f32 {
    ((scale * opacity_scale - 1.0) / 3.75).clamp(0.0, 1.0)
}

/// Both endpoints of every link touching `node`; includes the node itself
/// whenever it has at least one link.
pub(in crate::app) fn neighbor_set(links: &[(usize, usize)], node: usize) -> HashSet<usize> {
    let mut set = HashSet::new();
    for &(source, target) in links {
        if source == node || target == node {
            set.insert(source);
            set.insert(target);
        }
    }
    set
}

/// Applies the hover highlight set to the render handles. Active labels go
/// fully opaque; everything else falls back to the zoom-derived alpha.
pub(in crate::app) fn apply_active_flags(
    node_handles: &mut [NodeHandle],
    link_handles: &mut [LinkHandle],
    links: &[(usize, usize)],
    hovered: Option<usize>,
    zoom_alpha: f32,
) {
    let active = match hovered {
        Some(node) => neighbor_set(links, node),
        None => HashSet::new(),
    };

    for (index, handle) in node_handles.iter_mut().enumerate() {
        handle.active = active.contains(&index);
        handle.label_alpha = if handle.active { 1.0 } else { zoom_alpha };
    }
    for link in link_handles {
        link.active = hovered.is_some_and(|node| link.source == node || link.target == node);
    }
}

impl GraphView {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !self.config.zoom || !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = self.transform.screen_to_world(rect, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform.zoom_by(zoom_factor);
        self.transform.translate = pointer - rect.center() - (world_before * self.transform.scale);

        self.apply_zoom_label_alpha();
    }

    pub(in crate::app) fn apply_zoom_label_alpha(&mut self) {
        let alpha = zoom_label_alpha(self.transform.scale, self.config.opacity_scale);
        for handle in &mut self.scene.node_handles {
            if !handle.active {
                handle.label_alpha = alpha;
            }
        }
    }

    pub(in crate::app) fn handle_pan(&mut self, ui: &Ui, response: &egui::Response) {
        if !self.config.zoom {
            return;
        }

        // A primary drag pans only when it began on empty space.
        if response.drag_started_by(egui::PointerButton::Primary)
            && self.drag.is_none()
            && self.hovered.is_none()
        {
            self.panning = true;
        }
        if ui.input(|input| input.pointer.primary_released()) {
            self.panning = false;
        }

        let primary_pan = self.panning
            && self.drag.is_none()
            && response.dragged_by(egui::PointerButton::Primary);
        if primary_pan
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.transform.translate += response.drag_delta();
        }
    }

    pub(in crate::app) fn update_hover(&mut self, ui: &Ui) {
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| self.hit_test(pointer));
        if hovered == self.hovered {
            return;
        }

        self.hovered = hovered;
        self.apply_hover_highlight();
        if self.drag.is_none() {
            ui.ctx().request_repaint();
        }
    }

    fn hit_test(&self, pointer: Pos2) -> Option<usize> {
        let positions = self.scene.screen_positions();
        let radii = self.scene.screen_radii();

        (0..positions.len())
            .filter_map(|index| {
                let distance = positions[index].distance(pointer);
                let hit_radius = radii.get(index).copied().unwrap_or(0.0).max(MIN_HIT_RADIUS);
                (distance <= hit_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn apply_hover_highlight(&mut self) {
        let zoom_alpha = zoom_label_alpha(self.transform.scale, self.config.opacity_scale);
        apply_active_flags(
            &mut self.scene.node_handles,
            &mut self.scene.link_handles,
            &self.graph.links,
            self.hovered,
            zoom_alpha,
        );
    }

    pub(in crate::app) fn handle_drag(&mut self, ui: &Ui) {
        if !self.config.drag {
            return;
        }

        let (pressed, down, released, delta, now) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_down(),
                input.pointer.primary_released(),
                input.pointer.delta(),
                input.time,
            )
        });

        if self.drag.is_none()
            && pressed
            && let Some(node_index) = self.hovered
            && let Some(node) = self.graph.nodes.get_mut(node_index)
        {
            node.pinned = Some(node.pos);
            self.drag = Some(DragState {
                node: node_index,
                pressed_at: now,
            });
            self.sim.restart(1.0);
        }

        let Some(drag) = self.drag else {
            return;
        };

        if down && delta != Vec2::ZERO {
            if let Some(node) = self.graph.nodes.get_mut(drag.node) {
                // Screen-space delta into simulation space, so drag speed is
                // consistent at every zoom level.
                let pin = node.pinned.unwrap_or(node.pos) + delta / self.transform.scale;
                node.pinned = Some(pin);
                node.pos = pin;
                self.sim.restart(REHEAT_ALPHA);
            }
        }

        if released {
            self.drag = None;
            if let Some(id) = finish_drag(&mut self.graph.nodes, drag, now) {
                self.pending_navigation = Some(id);
            }
        }
    }

    pub(in crate::app) fn handle_click(&mut self, response: &egui::Response) {
        if self.config.drag || !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }

        if let Some(node) = self.hovered.and_then(|index| self.graph.nodes.get(index)) {
            self.pending_navigation = Some(node.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Color32, vec2};

    use super::*;

    fn sim_node(id: &str) -> SimNode {
        SimNode {
            id: id.to_string(),
            label: id.to_string(),
            tags: Vec::new(),
            is_tag: false,
            pos: vec2(1.0, 2.0),
            vel: Vec2::ZERO,
            pinned: None,
        }
    }

    fn node_handle() -> NodeHandle {
        NodeHandle {
            color: Color32::GRAY,
            is_tag: false,
            radius: 2.0,
            active: false,
            label_alpha: 0.0,
        }
    }

    #[test]
    fn zoom_scale_stays_clamped() {
        let mut transform = ViewTransform::new(1.0);
        for _ in 0..100 {
            transform.zoom_by(1.15);
        }
        assert_eq!(transform.scale, MAX_ZOOM);

        for _ in 0..100 {
            transform.zoom_by(0.85);
        }
        assert_eq!(transform.scale, MIN_ZOOM);
    }

    #[test]
    fn initial_scale_is_clamped_too() {
        assert_eq!(ViewTransform::new(10.0).scale, MAX_ZOOM);
        assert_eq!(ViewTransform::new(0.0).scale, MIN_ZOOM);
    }

    #[test]
    fn screen_world_round_trip() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let mut transform = ViewTransform::new(1.0);
        transform.zoom_by(1.1);
        transform.translate = vec2(25.0, -40.0);

        let world = vec2(17.0, -3.0);
        let screen = transform.world_to_screen(rect, world);
        let back = transform.screen_to_world(rect, screen);
        assert!((back - world).length() < 0.001);
    }

    #[test]
    fn short_release_is_a_click_long_release_is_not() {
        assert!(resolves_as_click(10.0, 10.3));
        assert!(!resolves_as_click(10.0, 10.8));
        assert!(!resolves_as_click(10.0, 10.5));
    }

    #[test]
    fn finish_drag_always_unpins() {
        let mut nodes = vec![sim_node("notes/a")];
        nodes[0].pinned = Some(vec2(5.0, 5.0));

        // Released at 300 ms: navigates, unpinned.
        let target = finish_drag(&mut nodes, DragState { node: 0, pressed_at: 1.0 }, 1.3);
        assert_eq!(target, Some("notes/a".to_string()));
        assert!(nodes[0].pinned.is_none());

        // Released at 800 ms: no navigation, still unpinned.
        nodes[0].pinned = Some(vec2(5.0, 5.0));
        let target = finish_drag(&mut nodes, DragState { node: 0, pressed_at: 1.0 }, 1.8);
        assert_eq!(target, None);
        assert!(nodes[0].pinned.is_none());
    }

    #[test]
    fn finish_drag_ignores_vanished_nodes() {
        let mut nodes = vec![sim_node("notes/a")];
        let target = finish_drag(&mut nodes, DragState { node: 7, pressed_at: 1.0 }, 1.1);
        assert_eq!(target, None);
    }

    #[test]
    fn label_alpha_follows_the_zoom_curve() {
        assert_eq!(zoom_label_alpha(1.0, 1.0), 0.0);
        assert_eq!(zoom_label_alpha(0.5, 1.0), 0.0);
        assert!((zoom_label_alpha(4.0, 1.0) - 0.8).abs() < 0.0001);
        assert_eq!(zoom_label_alpha(4.0, 2.0), 1.0);
    }

    #[test]
    fn hovering_a_chain_marks_the_node_and_its_neighbors() {
        // A - B - C materialized as (0,1), (1,2).
        let links = vec![(0, 1), (1, 2)];
        assert_eq!(
            neighbor_set(&links, 1),
            HashSet::from([0, 1, 2])
        );
        assert_eq!(neighbor_set(&links, 0), HashSet::from([0, 1]));
        // A node with no links is not even its own neighbor.
        assert_eq!(neighbor_set(&links, 9), HashSet::new());
    }

    #[test]
    fn active_flags_set_and_clear() {
        let links = vec![(0, 1), (1, 2)];
        let mut node_handles = vec![node_handle(), node_handle(), node_handle()];
        let mut link_handles = vec![
            LinkHandle { source: 0, target: 1, active: false },
            LinkHandle { source: 1, target: 2, active: false },
        ];

        apply_active_flags(&mut node_handles, &mut link_handles, &links, Some(1), 0.1);
        assert!(node_handles.iter().all(|handle| handle.active));
        assert!(link_handles.iter().all(|handle| handle.active));
        assert!(node_handles.iter().all(|handle| handle.label_alpha == 1.0));

        apply_active_flags(&mut node_handles, &mut link_handles, &links, None, 0.1);
        assert!(node_handles.iter().all(|handle| !handle.active));
        assert!(link_handles.iter().all(|handle| !handle.active));
        assert!(node_handles.iter().all(|handle| handle.label_alpha == 0.1));
    }

    #[test]
    fn hover_does_not_leak_to_unrelated_nodes() {
        let links = vec![(0, 1)];
        let mut node_handles = vec![node_handle(), node_handle(), node_handle()];
        let mut link_handles = vec![LinkHandle { source: 0, target: 1, active: false }];

        apply_active_flags(&mut node_handles, &mut link_handles, &links, Some(0), 0.0);
        assert!(node_handles[0].active);
        assert!(node_handles[1].active);
        assert!(!node_handles[2].active);
    }
}
