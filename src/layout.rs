//! A spring-embedder layout, advanced one step at a time by an external scheduler.
//!
//! Every pair of nodes repels, every edge pulls its endpoints together, and the distance a node
//! may travel per step is bounded by a temperature that cools until the layout settles.

use nalgebra::Vector2;

use crate::{
    error::{Error, Result},
    graph::GraphModel,
    viewport::{BoundingBox, CoordinateMapper, Viewport},
};

/// The temperature below which the simulation is considered converged.
const MIN_TEMPERATURE: f64 = 1.0;

/// Settings read by every simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// When unset, steps leave the layout untouched.
    pub physics_active: bool,
    /// Divide by the edge force instead of multiplying, so strong edges pull weakly.
    pub force_inverted: bool,
    pub initial_temperature: f64,
    pub cooling_factor: f64,
    /// Added to every edge force so zero-force edges still attract.
    pub force_floor: f64,
    /// Distance a dragged node has to travel to reheat the simulation by one degree.
    pub reheat_distance_scale: f64,
    /// Steps run right after a node was moved.
    pub reheat_steps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            physics_active: true,
            force_inverted: false,
            initial_temperature: 100.0,
            cooling_factor: 0.93,
            force_floor: 0.01,
            reheat_distance_scale: 10.0,
            reheat_steps: 1,
        }
    }
}

impl LayoutConfig {
    /// Switches the physics on or off.
    pub fn with_physics_active(mut self, physics_active: bool) -> Self {
        self.physics_active = physics_active;
        self
    }

    /// Toggles the inverted edge force semantics.
    pub fn with_force_inverted(mut self, force_inverted: bool) -> Self {
        self.force_inverted = force_inverted;
        self
    }

    pub fn with_initial_temperature(mut self, initial_temperature: f64) -> Self {
        self.initial_temperature = initial_temperature;
        self
    }

    pub fn with_cooling_factor(mut self, cooling_factor: f64) -> Self {
        self.cooling_factor = cooling_factor;
        self
    }

    /// Sets how strongly a dragged node reheats the layout and how many steps follow the drag.
    pub fn with_reheat(mut self, distance_scale: f64, steps: usize) -> Self {
        self.reheat_distance_scale = distance_scale;
        self.reheat_steps = steps;
        self
    }

    /// The multiplier applied to an edge's attraction.
    fn edge_factor(&self, force: f64) -> f64 {
        let force = force.max(0.0) + self.force_floor;

        if self.force_inverted {
            1.0 / force
        } else {
            force
        }
    }
}

/// Where the simulation stands after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    /// Still cooling, expects another step.
    Running,
    /// Physics are switched off, positions and temperature are kept as they are.
    Paused,
    /// The temperature dropped below its threshold.
    Converged,
}

/// The state of one spring-embedder simulation over a [`GraphModel`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEngine {
    viewport: Viewport,
    temperature: f64,
    ideal_distance: f64,
    bounds: BoundingBox,
}

impl LayoutEngine {
    /// Creates an engine for `graph` and places its nodes on the initial grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::edge::EdgeDescriptor;
    /// use graphsim::graph::GraphModel;
    /// use graphsim::layout::{LayoutConfig, LayoutEngine, LayoutState};
    /// use graphsim::node::NodeDescriptor;
    /// use graphsim::viewport::Viewport;
    ///
    /// let mut graph = GraphModel::new(
    ///     vec![NodeDescriptor::new("a"), NodeDescriptor::new("b")],
    ///     vec![EdgeDescriptor::new("a", "b")],
    /// )?;
    /// let config = LayoutConfig::default();
    /// let mut engine = LayoutEngine::new(&mut graph, Viewport::new(400.0, 300.0)?, &config)?;
    ///
    /// assert_eq!(engine.run_to_convergence(&mut graph, &config, 1_000), LayoutState::Converged);
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn new(graph: &mut GraphModel, viewport: Viewport, config: &LayoutConfig) -> Result<Self> {
        let mut engine = Self {
            viewport,
            temperature: config.initial_temperature,
            ideal_distance: 0.0,
            bounds: BoundingBox::empty(),
        };
        engine.place_on_grid(graph, config)?;

        Ok(engine)
    }

    /// Arranges the nodes row-major on a square grid spanning the viewport and restarts the
    /// cooling schedule.
    pub fn place_on_grid(&mut self, graph: &mut GraphModel, config: &LayoutConfig) -> Result<()> {
        graph.ensure_not_empty()?;

        let n = graph.node_count();
        let side = (n as f64).sqrt().ceil() as usize;
        let dx = self.viewport.width() / side as f64;
        let dy = self.viewport.height() / side as f64;

        for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
            let (row, col) = (i / side, i % side);
            node.position = Vector2::new(col as f64 * dx, row as f64 * dy);
            node.displacement = Vector2::zeros();
        }

        self.ideal_distance = (self.viewport.area() / n as f64).sqrt();
        self.temperature = config.initial_temperature;
        self.bounds = BoundingBox::around(graph.nodes().iter().map(|node| node.position));

        log::debug!("placed {} nodes on a {side}x{side} grid", n);
        graph.mark_modified();

        Ok(())
    }

    /// Returns the current bound on the distance a node may travel in one step.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// The target spacing between nodes, `sqrt(area / n)`.
    pub fn ideal_distance(&self) -> f64 {
        self.ideal_distance
    }

    /// The box around all node positions as of the last step.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Returns the viewport the layout is fitted into.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns a mapper fitting the current bounds into the viewport, `margin` being the largest
    /// rendered node radius.
    pub fn mapper(&self, margin: f64) -> CoordinateMapper {
        CoordinateMapper::new(self.viewport, self.bounds, margin)
    }

    /// Returns where the simulation stands under `config`, without stepping it.
    pub fn state(&self, config: &LayoutConfig) -> LayoutState {
        if !config.physics_active {
            LayoutState::Paused
        } else if self.temperature < MIN_TEMPERATURE {
            LayoutState::Converged
        } else {
            LayoutState::Running
        }
    }

    /// Advances the simulation by one step.
    ///
    /// Nothing changes while the physics are paused or after convergence, so a paused simulation
    /// resumes with the temperature it was left at.
    pub fn step(&mut self, graph: &mut GraphModel, config: &LayoutConfig) -> LayoutState {
        self.step_around(graph, config, None)
    }

    /// One simulation step in which the node at `pinned`, if any, keeps its position like a
    /// selected node.
    fn step_around(
        &mut self,
        graph: &mut GraphModel,
        config: &LayoutConfig,
        pinned: Option<usize>,
    ) -> LayoutState {
        match self.state(config) {
            LayoutState::Running if !graph.is_empty() => {}
            LayoutState::Running => return LayoutState::Converged,
            state => return state,
        }

        let k = self.ideal_distance;
        let k_sq = k * k;

        // Forces are expressed in viewport units, bring them back into simulation space.
        let scale_factor = match self.mapper(0.0).scale() {
            scale if scale.is_finite() && scale > 0.0 => 1.0 / scale,
            _ => 1.0,
        };

        let positions: Vec<Vector2<f64>> = graph.nodes().iter().map(|node| node.position).collect();
        let mut displacements: Vec<Vector2<f64>> = vec![Vector2::zeros(); positions.len()];

        // 1. Repulsion between every pair of nodes.
        for (v, displacement) in displacements.iter_mut().enumerate() {
            for (u, position) in positions.iter().enumerate() {
                if u == v {
                    continue;
                }

                let delta = positions[v] - position;
                let distance_sq = delta.norm_squared();
                // Coincident nodes have no direction to push each other in.
                if distance_sq == 0.0 {
                    continue;
                }

                *displacement += delta.unscale(distance_sq.sqrt()) * (k_sq / distance_sq * scale_factor);
            }
        }

        // 2. Attraction along every edge.
        for edge in graph.edges().iter().filter(|edge| !edge.is_loop()) {
            let (u, v) = (edge.source(), edge.target());

            let delta = positions[v] - positions[u];
            let distance = delta.norm();
            if distance == 0.0 {
                continue;
            }

            let pull = delta.unscale(distance)
                * (distance * distance / k * scale_factor * config.edge_factor(edge.force));
            displacements[u] += pull;
            displacements[v] -= pull;
        }

        // 3. Move every free node, bounded by the temperature, and track the new bounds.
        let temperature = self.temperature;
        let mut bounds = BoundingBox::empty();

        for (i, (node, displacement)) in graph
            .nodes_mut()
            .iter_mut()
            .zip(displacements)
            .enumerate()
        {
            node.displacement = displacement;

            let held = node.selected || pinned == Some(i);
            let length = displacement.norm();
            if !held && length > 0.0 {
                node.position += displacement.unscale(length) * length.min(temperature);
            }

            bounds.include(node.position);
        }

        self.bounds = bounds;

        // 4. Cool down.
        self.temperature = (self.temperature - 1.0) * config.cooling_factor;
        graph.mark_modified();

        let state = self.state(config);
        log::debug!("layout step done, temperature {:.3}", self.temperature);
        if state == LayoutState::Converged {
            log::info!("layout converged");
        }

        state
    }

    /// Steps until the simulation stops running or `max_steps` steps were taken.
    pub fn run_to_convergence(
        &mut self,
        graph: &mut GraphModel,
        config: &LayoutConfig,
        max_steps: usize,
    ) -> LayoutState {
        let mut state = self.state(config);

        for _ in 0..max_steps {
            state = self.step(graph, config);
            if state != LayoutState::Running {
                break;
            }
        }

        state
    }

    /// Moves a node to `position`, typically while it is dragged.
    ///
    /// The temperature is reset in proportion to the distance travelled, which lets the rest of
    /// the layout adapt around the new position, and the configured number of steps run right
    /// away. The moved node stays at `position` during those steps.
    pub fn move_node(
        &mut self,
        graph: &mut GraphModel,
        index: usize,
        position: Vector2<f64>,
        config: &LayoutConfig,
    ) -> Result<LayoutState> {
        let len = graph.node_count();
        let node = graph
            .nodes_mut()
            .get_mut(index)
            .ok_or(Error::NodeOutOfBounds { index, len })?;

        let distance = (position - node.position).norm();
        node.position = position;

        self.temperature = distance / config.reheat_distance_scale;
        self.bounds = BoundingBox::around(graph.nodes().iter().map(|node| node.position));
        graph.mark_modified();

        log::debug!(
            "node {index} moved by {distance:.3}, temperature reset to {:.3}",
            self.temperature
        );

        for _ in 0..config.reheat_steps {
            if self.step_around(graph, config, Some(index)) != LayoutState::Running {
                break;
            }
        }

        Ok(self.state(config))
    }
}
