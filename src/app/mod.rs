use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::{error, info, warn};

use crate::config::GraphConfig;
use crate::index::{ContentIndex, load_content_index};

mod graph;
mod physics;
mod scene;
mod theme;
mod ui;
mod visited;

use graph::interaction::{DragState, ViewTransform};
use physics::Simulation;
use scene::Scene;
use theme::Theme;
use visited::VisitedStore;

/// One laid-out graph node. The slab in `GraphData` is the single source of
/// truth for positions; the simulation, scene, and interaction layer all
/// index into it rather than copying coordinates.
pub(crate) struct SimNode {
    pub id: String,
    pub label: String,
    pub tags: Vec<String>,
    pub is_tag: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Set while the node is dragged: excluded from integration but still a
    /// participant in forces on others.
    pub pinned: Option<Vec2>,
}

pub(crate) struct GraphData {
    pub nodes: Vec<SimNode>,
    pub links: Vec<(usize, usize)>,
    pub index_by_id: HashMap<String, usize>,
    pub degrees: Vec<usize>,
    pub radii: Vec<f32>,
}

impl GraphData {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            index_by_id: HashMap::new(),
            degrees: Vec::new(),
            radii: Vec::new(),
        }
    }
}

pub(crate) struct AppArgs {
    pub index_path: PathBuf,
    pub focus: Option<String>,
    pub config: GraphConfig,
    pub theme_path: Option<PathBuf>,
}

pub(crate) struct GraphApp {
    config: GraphConfig,
    theme: Theme,
    requested_focus: Option<String>,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ContentIndex, String>>,
    },
    Ready(Box<GraphView>),
    /// Terminal: the index failed to load and there is no retry.
    Failed(String),
}

impl GraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, args: AppArgs) -> Self {
        let theme = theme::load_theme(args.theme_path.as_deref());
        Self {
            config: args.config,
            theme,
            requested_focus: args.focus,
            state: AppState::Loading {
                rx: spawn_load(args.index_path),
            },
        }
    }
}

fn spawn_load(path: PathBuf) -> Receiver<Result<ContentIndex, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = load_content_index(&path).map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

impl eframe::App for GraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(index) => {
                            info!(items = index.len(), "content index loaded");
                            AppState::Ready(Box::new(GraphView::new(
                                ctx,
                                index,
                                self.config.clone(),
                                self.theme.clone(),
                                self.requested_focus.take(),
                            )))
                        }
                        Err(error) => {
                            error!(error = error.as_str(), "failed to load content index");
                            AppState::Failed(error)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading content index...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Failed(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load content index");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            AppState::Ready(view) => view.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let AppState::Ready(view) = &mut self.state {
            view.destroy();
        }
    }
}

/// One graph session: immutable config, resolved collaborators, graph data,
/// simulation, scene, and interaction state.
pub(crate) struct GraphView {
    config: GraphConfig,
    /// Edited by the controls panel; applying it rebuilds the session.
    staged: GraphConfig,
    index: ContentIndex,
    theme: Theme,
    visited: VisitedStore,
    focus: String,
    focus_input: String,
    search: String,
    matcher: SkimMatcherV2,
    graph: GraphData,
    sim: Simulation,
    scene: Scene,
    transform: ViewTransform,
    drag: Option<DragState>,
    panning: bool,
    hovered: Option<usize>,
    pending_navigation: Option<String>,
    graph_dirty: bool,
    destroyed: bool,
}

impl GraphView {
    fn new(
        ctx: &Context,
        index: ContentIndex,
        config: GraphConfig,
        theme: Theme,
        requested_focus: Option<String>,
    ) -> Self {
        let focus = match requested_focus {
            Some(id) if index.contains(&id) => id,
            Some(id) => {
                warn!(focus = id.as_str(), "focus id not in index, falling back");
                first_id(&index)
            }
            None => first_id(&index),
        };

        let mut view = Self {
            staged: config.clone(),
            config,
            index,
            theme,
            visited: VisitedStore::open_default(),
            focus: focus.clone(),
            focus_input: focus,
            search: String::new(),
            matcher: SkimMatcherV2::default(),
            graph: GraphData::empty(),
            sim: Simulation::new(),
            scene: Scene::empty(),
            transform: ViewTransform::new(1.0),
            drag: None,
            panning: false,
            hovered: None,
            pending_navigation: None,
            graph_dirty: true,
            destroyed: false,
        };
        view.rebuild_session(ctx);
        view
    }

    fn navigate_to(&mut self, id: String) {
        self.visited.add(&id);
        if self.focus != id {
            self.focus = id.clone();
            self.focus_input = id;
            self.graph_dirty = true;
        }
    }

    /// Idempotent teardown: stops the simulation and releases renderer
    /// resources; any frame scheduled afterwards is a no-op.
    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.sim.stop();
        self.scene.destroy();
    }
}

fn first_id(index: &ContentIndex) -> String {
    index.ids().next().cloned().unwrap_or_default()
}
