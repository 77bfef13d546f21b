use std::collections::{HashMap, HashSet, VecDeque};

use eframe::egui::{Context, Vec2, vec2};

use crate::index::ContentIndex;
use crate::util::{stable_pair, tag_name, tag_node_id};

use super::super::physics::{Simulation, node_radius};
use super::super::scene::Scene;
use super::super::{GraphData, GraphView, SimNode};
use super::interaction::ViewTransform;

/// A link by id, before node objects are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct SimpleLink {
    pub source: String,
    pub target: String,
}

/// Emits one link per outgoing-link target that exists in the index; targets
/// absent from the index are dropped. With `show_tags`, each item is also
/// linked to a synthesized `tags/<name>` node for every tag not listed in
/// `remove_tags`; each distinct tag id is collected once.
pub(in crate::app) fn build_links(
    index: &ContentIndex,
    show_tags: bool,
    remove_tags: &[String],
) -> (Vec<SimpleLink>, Vec<String>) {
    let mut links = Vec::new();
    let mut tag_ids = Vec::new();
    let mut seen_tags = HashSet::new();

    for (_, item) in index.iter() {
        for target in &item.outgoing_links {
            if index.contains(target) {
                links.push(SimpleLink {
                    source: item.id.clone(),
                    target: target.clone(),
                });
            }
        }

        if show_tags {
            for tag in &item.tags {
                if remove_tags.iter().any(|removed| removed == tag) {
                    continue;
                }
                let tag_id = tag_node_id(tag);
                if seen_tags.insert(tag_id.clone()) {
                    tag_ids.push(tag_id.clone());
                }
                links.push(SimpleLink {
                    source: item.id.clone(),
                    target: tag_id,
                });
            }
        }
    }

    (links, tag_ids)
}

/// Level-bounded breadth-first neighborhood around `start`, treating every
/// link as bidirectional. Negative depth means the whole vertex set.
pub(in crate::app) fn compute_neighborhood(
    start: &str,
    depth: i32,
    links: &[SimpleLink],
    show_tags: bool,
    index: &ContentIndex,
    tag_ids: &[String],
) -> HashSet<String> {
    if depth < 0 {
        let mut all: HashSet<String> = index.ids().cloned().collect();
        if show_tags {
            all.extend(tag_ids.iter().cloned());
        }
        return all;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in links {
        adjacency
            .entry(link.source.as_str())
            .or_default()
            .push(link.target.as_str());
        adjacency
            .entry(link.target.as_str())
            .or_default()
            .push(link.source.as_str());
    }

    let mut result = HashSet::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0i32)]);

    while let Some((id, level)) = queue.pop_front() {
        result.insert(id.to_string());
        if level >= depth {
            continue;
        }

        let neighbors = adjacency.get(id).map(|list| list.as_slice()).unwrap_or(&[]);
        for &next in neighbors {
            if visited.insert(next) {
                queue.push_back((next, level + 1));
            }
        }
    }

    result
}

/// Materializes the neighborhood into the node slab and resolves the links
/// whose both endpoints are members. Everything downstream indexes into the
/// returned `nodes`, so positions are never duplicated.
pub(in crate::app) fn build_graph_data(
    neighborhood: &HashSet<String>,
    index: &ContentIndex,
    links: &[SimpleLink],
) -> GraphData {
    let mut ids: Vec<&String> = neighborhood.iter().collect();
    ids.sort();

    let mut index_by_id = HashMap::with_capacity(ids.len());
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(position, id)| {
            index_by_id.insert((*id).clone(), position);
            make_sim_node(position, id, index)
        })
        .collect::<Vec<_>>();

    let mut resolved = links
        .iter()
        .filter_map(|link| {
            let source = index_by_id.get(&link.source)?;
            let target = index_by_id.get(&link.target)?;
            Some((*source, *target))
        })
        .collect::<Vec<_>>();
    resolved.sort_unstable();
    resolved.dedup();

    let mut degrees = vec![0usize; nodes.len()];
    for &(source, target) in &resolved {
        degrees[source] += 1;
        if source != target {
            degrees[target] += 1;
        }
    }
    let radii = degrees.iter().map(|&degree| node_radius(degree)).collect();

    GraphData {
        nodes,
        links: resolved,
        index_by_id,
        degrees,
        radii,
    }
}

fn make_sim_node(position: usize, id: &str, index: &ContentIndex) -> SimNode {
    let item = index.get(id);
    let (label, is_tag) = match tag_name(id) {
        Some(name) => (format!("#{name}"), true),
        None => (
            item.map(|item| item.title.clone())
                .unwrap_or_else(|| id.to_string()),
            false,
        ),
    };
    let tags = item.map(|item| item.tags.clone()).unwrap_or_default();

    // Deterministic spread so rebuilds of the same graph look the same.
    let (jx, jy) = stable_pair(id);
    let mut direction = vec2(jx, jy);
    if direction.length_sq() <= 0.0001 {
        let angle = ((position as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
        direction = vec2(angle.cos(), angle.sin());
    } else {
        direction = direction.normalized();
    }
    let distance = 12.0 * ((position + 1) as f32).sqrt();

    SimNode {
        id: id.to_string(),
        label,
        tags,
        is_tag,
        pos: direction * distance,
        vel: Vec2::ZERO,
        pinned: None,
    }
}

impl GraphView {
    /// Tears the current session down and rebuilds graph data, simulation,
    /// and scene from the immutable config and the current focus.
    pub(in crate::app) fn rebuild_session(&mut self, ctx: &Context) {
        let (links, tag_ids) =
            build_links(&self.index, self.config.show_tags, &self.config.remove_tags);
        let neighborhood = compute_neighborhood(
            &self.focus,
            self.config.depth,
            &links,
            self.config.show_tags,
            &self.index,
            &tag_ids,
        );
        let mut graph = build_graph_data(&neighborhood, &self.index, &links);

        // Nodes surviving a rebuild keep their position and momentum.
        for node in &mut graph.nodes {
            if let Some(&previous) = self.graph.index_by_id.get(&node.id)
                && let Some(previous_node) = self.graph.nodes.get(previous)
            {
                node.pos = previous_node.pos;
                node.vel = previous_node.vel;
            }
        }

        self.graph = graph;
        self.scene = Scene::build(
            ctx,
            &self.graph,
            &self.theme,
            &self.visited,
            &self.focus,
            &self.config,
        );
        self.transform = ViewTransform::new(self.config.scale);
        self.sim = Simulation::new();
        self.drag = None;
        self.panning = false;
        self.hovered = None;
        self.graph_dirty = false;
        self.apply_zoom_label_alpha();
    }
}
