mod forces;

use eframe::egui::Vec2;

use forces::{apply_centering, apply_collisions, apply_radial, apply_repulsion, apply_springs};

use super::SimNode;

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.0228;
const VELOCITY_DECAY: f32 = 0.6;
const REPULSION_SCALE: f32 = 100.0;
const RADIAL_STRENGTH: f32 = 0.2;
const COLLISION_PASSES: usize = 3;

/// Alpha used to keep the layout warm while a node is being dragged.
pub(in crate::app) const REHEAT_ALPHA: f32 = 0.3;

/// Node circle radius grows with connectivity.
pub(in crate::app) fn node_radius(degree: usize) -> f32 {
    2.0 + (degree as f32).sqrt()
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ForceParams {
    pub repel_force: f32,
    pub center_force: f32,
    pub link_distance: f32,
    /// Target ring radius for whole-graph views; `None` disables the pull.
    pub radial_radius: Option<f32>,
}

/// Cooling force simulation. Positions live in the node slab; the simulation
/// only owns the alpha schedule and the run flag.
pub(in crate::app) struct Simulation {
    alpha: f32,
    running: bool,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            running: true,
        }
    }

    /// Reheat and resume stepping.
    pub fn restart(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(ALPHA_MIN, 1.0);
        self.running = true;
    }

    /// Halt stepping; used on teardown.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One simulation step. Returns true while positions were recomputed,
    /// which is the signal to re-arm the next frame.
    pub fn step(
        &mut self,
        params: ForceParams,
        nodes: &mut [SimNode],
        links: &[(usize, usize)],
        degrees: &[usize],
        radii: &[f32],
    ) -> bool {
        if !self.running || nodes.is_empty() {
            return false;
        }

        self.alpha += (0.0 - self.alpha) * ALPHA_DECAY;
        if self.alpha < ALPHA_MIN {
            self.running = false;
            return false;
        }
        let alpha = self.alpha;

        apply_repulsion(nodes, REPULSION_SCALE * params.repel_force, alpha);
        apply_springs(nodes, links, degrees, params.link_distance, alpha);
        apply_centering(nodes, params.center_force, alpha);
        if let Some(radius) = params.radial_radius {
            apply_radial(nodes, radius, RADIAL_STRENGTH, alpha);
        }

        for node in nodes.iter_mut() {
            if let Some(pin) = node.pinned {
                // Pinned nodes stay put but still exerted forces above.
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel *= VELOCITY_DECAY;
                node.pos += node.vel;
            }
        }

        apply_collisions(nodes, radii, COLLISION_PASSES);
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn node(id: &str, x: f32, y: f32) -> SimNode {
        SimNode {
            id: id.to_string(),
            label: id.to_string(),
            tags: Vec::new(),
            is_tag: false,
            pos: vec2(x, y),
            vel: Vec2::ZERO,
            pinned: None,
        }
    }

    fn params() -> ForceParams {
        ForceParams {
            repel_force: 0.5,
            center_force: 0.3,
            link_distance: 30.0,
            radial_radius: None,
        }
    }

    #[test]
    fn radius_grows_with_degree() {
        assert_eq!(node_radius(0), 2.0);
        assert_eq!(node_radius(4), 4.0);
        assert_eq!(node_radius(9), 5.0);
    }

    #[test]
    fn repulsion_separates_close_nodes() {
        let mut nodes = vec![node("a", -1.0, 0.0), node("b", 1.0, 0.0)];
        let mut sim = Simulation::new();

        let before = (nodes[0].pos - nodes[1].pos).length();
        for _ in 0..10 {
            assert!(sim.step(params(), &mut nodes, &[], &[0, 0], &[2.0, 2.0]));
        }
        let after = (nodes[0].pos - nodes[1].pos).length();
        assert!(after > before);
    }

    #[test]
    fn pinned_node_does_not_move_but_pushes_others() {
        let mut nodes = vec![node("a", 0.0, 0.0), node("b", 3.0, 0.0)];
        nodes[0].pinned = Some(vec2(0.0, 0.0));
        let mut sim = Simulation::new();

        let other_before = nodes[1].pos;
        for _ in 0..10 {
            sim.step(params(), &mut nodes, &[], &[0, 0], &[2.0, 2.0]);
        }
        assert_eq!(nodes[0].pos, vec2(0.0, 0.0));
        assert!((nodes[1].pos - other_before).length() > 0.0);
    }

    #[test]
    fn spring_pulls_linked_nodes_toward_link_distance() {
        let mut nodes = vec![node("a", -100.0, 0.0), node("b", 100.0, 0.0)];
        let links = vec![(0, 1)];
        let mut sim = Simulation::new();

        for _ in 0..50 {
            sim.step(params(), &mut nodes, &links, &[1, 1], &[3.0, 3.0]);
        }
        let distance = (nodes[0].pos - nodes[1].pos).length();
        assert!(distance < 200.0);
    }

    #[test]
    fn collision_resolves_overlap() {
        let mut nodes = vec![node("a", 0.0, 0.0), node("b", 0.5, 0.0)];
        let mut sim = Simulation::new();

        sim.step(
            ForceParams {
                repel_force: 0.0,
                center_force: 0.0,
                link_distance: 30.0,
                radial_radius: None,
            },
            &mut nodes,
            &[],
            &[0, 0],
            &[2.0, 2.0],
        );
        let distance = (nodes[0].pos - nodes[1].pos).length();
        assert!(distance > 0.5);
    }

    #[test]
    fn radial_force_moves_nodes_toward_ring() {
        let mut nodes = vec![node("a", 1.0, 0.0)];
        let mut sim = Simulation::new();

        for _ in 0..50 {
            sim.step(
                ForceParams {
                    repel_force: 0.0,
                    center_force: 0.0,
                    link_distance: 30.0,
                    radial_radius: Some(100.0),
                },
                &mut nodes,
                &[],
                &[0],
                &[2.0],
            );
        }
        assert!(nodes[0].pos.length() > 1.0);
    }

    #[test]
    fn simulation_cools_down_and_stops() {
        let mut nodes = vec![node("a", 10.0, 0.0), node("b", -10.0, 0.0)];
        let mut sim = Simulation::new();

        let mut steps = 0;
        while sim.step(params(), &mut nodes, &[], &[0, 0], &[2.0, 2.0]) {
            steps += 1;
            assert!(steps < 10_000, "simulation never parked");
        }
        assert!(!sim.is_running());

        sim.restart(1.0);
        assert!(sim.is_running());
        assert!(sim.step(params(), &mut nodes, &[], &[0, 0], &[2.0, 2.0]));
    }

    #[test]
    fn stop_halts_stepping() {
        let mut nodes = vec![node("a", 10.0, 0.0)];
        let mut sim = Simulation::new();
        sim.stop();
        assert!(!sim.step(params(), &mut nodes, &[], &[0], &[2.0]));
    }
}
