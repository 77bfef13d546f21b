use eframe::egui::{Vec2, vec2};

use super::super::SimNode;

const MIN_DISTANCE_SQ: f32 = 1.0;

/// Deterministic push direction for coincident points.
fn jiggle_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn apply_repulsion(nodes: &mut [SimNode], strength: f32, alpha: f32) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let mut delta = nodes[i].pos - nodes[j].pos;
            if delta.length_sq() <= 0.0001 {
                delta = jiggle_direction(i, j);
            }
            let push = delta * (strength * alpha / delta.length_sq().max(MIN_DISTANCE_SQ));
            nodes[i].vel += push;
            nodes[j].vel -= push;
        }
    }
}

pub(super) fn apply_centering(nodes: &mut [SimNode], strength: f32, alpha: f32) {
    for node in nodes {
        node.vel -= node.pos * (strength * alpha);
    }
}

pub(super) fn apply_springs(
    nodes: &mut [SimNode],
    links: &[(usize, usize)],
    degrees: &[usize],
    distance: f32,
    alpha: f32,
) {
    for &(from, to) in links {
        if from == to || from >= nodes.len() || to >= nodes.len() {
            continue;
        }

        let delta = (nodes[to].pos + nodes[to].vel) - (nodes[from].pos + nodes[from].vel);
        let current = delta.length().max(0.001);

        // Lighter endpoints respond more; hubs stay put.
        let min_degree = degrees
            .get(from)
            .copied()
            .unwrap_or(1)
            .min(degrees.get(to).copied().unwrap_or(1))
            .max(1);
        let strength = 1.0 / min_degree as f32;

        let correction = delta * ((current - distance) / current * strength * alpha * 0.5);
        nodes[to].vel -= correction;
        nodes[from].vel += correction;
    }
}

pub(super) fn apply_radial(nodes: &mut [SimNode], target_radius: f32, strength: f32, alpha: f32) {
    for node in nodes.iter_mut() {
        let radius = node.pos.length();
        if radius <= f32::EPSILON {
            continue;
        }
        node.vel += node.pos * ((target_radius - radius) * strength * alpha / radius);
    }
}

/// Iterative pairwise overlap resolution on positions. Pinned nodes push but
/// are never displaced themselves.
pub(super) fn apply_collisions(nodes: &mut [SimNode], radii: &[f32], passes: usize) {
    for _ in 0..passes {
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let min_distance =
                    radii.get(i).copied().unwrap_or(2.0) + radii.get(j).copied().unwrap_or(2.0);

                let delta = nodes[i].pos - nodes[j].pos;
                let distance_sq = delta.length_sq();
                if distance_sq >= min_distance * min_distance {
                    continue;
                }

                let distance = distance_sq.sqrt();
                let direction = if distance > 0.0001 {
                    delta / distance
                } else {
                    jiggle_direction(i, j)
                };
                let overlap = min_distance - distance;

                match (nodes[i].pinned.is_some(), nodes[j].pinned.is_some()) {
                    (false, false) => {
                        nodes[i].pos += direction * (overlap * 0.5);
                        nodes[j].pos -= direction * (overlap * 0.5);
                    }
                    (true, false) => nodes[j].pos -= direction * overlap,
                    (false, true) => nodes[i].pos += direction * overlap,
                    (true, true) => {}
                }
            }
        }
    }
}
