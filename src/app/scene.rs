use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Color32, Context, FontId, Galley, Painter, Pos2, Rect, Shape, Stroke, vec2};

use crate::config::GraphConfig;

use super::graph::interaction::ViewTransform;
use super::theme::Theme;
use super::visited::VisitedStore;
use super::{GraphData, SimNode};

const LABEL_BASE_FONT_PX: f32 = 20.0;
const LABEL_GAP: f32 = 4.0;
const TAG_STROKE_WIDTH: f32 = 1.2;
const SEARCH_STROKE_WIDTH: f32 = 1.4;
const DIM_FACTOR: f32 = 0.25;

/// Per-node render state. Built once per session; the interaction layer only
/// toggles `active` and `label_alpha`.
pub(in crate::app) struct NodeHandle {
    pub color: Color32,
    pub is_tag: bool,
    pub radius: f32,
    pub active: bool,
    pub label_alpha: f32,
}

pub(in crate::app) struct LinkHandle {
    pub source: usize,
    pub target: usize,
    pub active: bool,
}

/// Three ordered layers: edges at the bottom, nodes above them, labels on
/// top. Node and label drawables persist for the whole session and are only
/// repositioned per frame; edge shapes have no stable geometry and are
/// rebuilt from the current endpoint positions every frame.
pub(in crate::app) struct Scene {
    pub node_handles: Vec<NodeHandle>,
    pub link_handles: Vec<LinkHandle>,
    label_galleys: Vec<Arc<Galley>>,
    edge_shapes: Vec<Shape>,
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            node_handles: Vec::new(),
            link_handles: Vec::new(),
            label_galleys: Vec::new(),
            edge_shapes: Vec::new(),
            screen_positions: Vec::new(),
            screen_radii: Vec::new(),
        }
    }

    pub fn build(
        ctx: &Context,
        graph: &GraphData,
        theme: &Theme,
        visited: &VisitedStore,
        focus: &str,
        config: &GraphConfig,
    ) -> Self {
        let font = FontId::proportional(
            (LABEL_BASE_FONT_PX * config.font_size * theme.font_scale).max(6.0),
        );

        let mut node_handles = Vec::with_capacity(graph.nodes.len());
        let mut label_galleys = Vec::with_capacity(graph.nodes.len());
        for (index, node) in graph.nodes.iter().enumerate() {
            let color = if node.id == focus {
                theme.accent
            } else if node.is_tag || visited.contains(&node.id) {
                theme.secondary
            } else {
                theme.gray
            };

            // Laying the label out is the expensive part; do it exactly once.
            let galley = ctx.fonts_mut(|fonts| {
                fonts.layout_no_wrap(node.label.clone(), font.clone(), Color32::PLACEHOLDER)
            });

            node_handles.push(NodeHandle {
                color,
                is_tag: node.is_tag,
                radius: graph.radii.get(index).copied().unwrap_or(2.0),
                active: false,
                label_alpha: 0.0,
            });
            label_galleys.push(galley);
        }

        let link_handles = graph
            .links
            .iter()
            .map(|&(source, target)| LinkHandle {
                source,
                target,
                active: false,
            })
            .collect();

        Self {
            node_handles,
            link_handles,
            label_galleys,
            edge_shapes: Vec::new(),
            screen_positions: Vec::new(),
            screen_radii: Vec::new(),
        }
    }

    /// Repositions the persistent drawables from the current simulation
    /// positions. Must run before the edges are rebuilt.
    pub fn sync(&mut self, rect: Rect, transform: &ViewTransform, nodes: &[SimNode]) {
        self.screen_positions.clear();
        self.screen_radii.clear();
        self.screen_positions.reserve(nodes.len());
        self.screen_radii.reserve(nodes.len());

        for (handle, node) in self.node_handles.iter().zip(nodes) {
            self.screen_positions
                .push(transform.world_to_screen(rect, node.pos));
            self.screen_radii.push(handle.radius * transform.scale);
        }
    }

    pub fn screen_positions(&self) -> &[Pos2] {
        &self.screen_positions
    }

    pub fn screen_radii(&self) -> &[f32] {
        &self.screen_radii
    }

    /// Edges are cleared and rebuilt from the synced endpoint positions.
    pub fn rebuild_edges(&mut self, theme: &Theme, scale: f32, dim_inactive: bool) {
        self.edge_shapes.clear();

        let width = scale.sqrt().clamp(0.5, 2.5);
        for link in &self.link_handles {
            let (Some(&start), Some(&end)) = (
                self.screen_positions.get(link.source),
                self.screen_positions.get(link.target),
            ) else {
                continue;
            };

            let (stroke_width, color) = if link.active {
                (width * 1.6, theme.secondary)
            } else if dim_inactive {
                (width, theme.gray.gamma_multiply(0.15))
            } else {
                (width, theme.gray.gamma_multiply(0.55))
            };
            self.edge_shapes
                .push(Shape::line_segment([start, end], Stroke::new(stroke_width, color)));
        }
    }

    pub fn paint(
        &mut self,
        painter: &Painter,
        theme: &Theme,
        dim_inactive: bool,
        search_matches: &HashSet<usize>,
    ) {
        painter.extend(self.edge_shapes.drain(..));

        for (index, handle) in self.node_handles.iter().enumerate() {
            let (Some(&position), Some(&radius)) = (
                self.screen_positions.get(index),
                self.screen_radii.get(index),
            ) else {
                continue;
            };

            let dimmed = dim_inactive && !handle.active;
            let fill = if handle.is_tag { theme.light } else { handle.color };
            let fill = if dimmed { fill.gamma_multiply(DIM_FACTOR) } else { fill };
            painter.circle_filled(position, radius, fill);

            if handle.is_tag {
                let stroke_color = if dimmed {
                    theme.secondary.gamma_multiply(DIM_FACTOR)
                } else {
                    theme.secondary
                };
                painter.circle_stroke(position, radius, Stroke::new(TAG_STROKE_WIDTH, stroke_color));
            }

            if search_matches.contains(&index) {
                painter.circle_stroke(
                    position,
                    radius + 2.0,
                    Stroke::new(SEARCH_STROKE_WIDTH, theme.accent),
                );
            }
        }

        for (index, handle) in self.node_handles.iter().enumerate() {
            if handle.label_alpha <= 0.01 {
                continue;
            }
            let (Some(&position), Some(&radius), Some(galley)) = (
                self.screen_positions.get(index),
                self.screen_radii.get(index),
                self.label_galleys.get(index),
            ) else {
                continue;
            };

            let top_left = position + vec2(-galley.size().x * 0.5, radius + LABEL_GAP);
            painter.galley(
                top_left,
                galley.clone(),
                theme.dark.gamma_multiply(handle.label_alpha),
            );
        }
    }

    /// Releases all render resources; part of teardown.
    pub fn destroy(&mut self) {
        self.node_handles.clear();
        self.link_handles.clear();
        self.label_galleys.clear();
        self.edge_shapes.clear();
        self.screen_positions.clear();
        self.screen_radii.clear();
    }
}
