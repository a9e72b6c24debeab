use std::{sync::Arc, time::Instant};

use glam::Vec3;
use parking_lot::Mutex;

use crate::{
    collision::{
        narrowphase::{NarrowPhase, PairStats, SphereSphereCallback, SphereTriangleCallback},
        octree::QueryBuffer,
        queries::{trace_shapes, RayHit, StaticScene, TraceScratch},
    },
    config::WorldConfig,
    core::{
        constraints::DistanceConstraint,
        mesh::Surface,
        rigidbody::Body,
        shape::{CollisionShape, ShapeKind},
        triangle::Triangle,
        types::Ray,
    },
    dynamics::{integrator::Integrator, solver::ConstraintSolver},
    error::{PhysicsError, Result},
    utils::{
        allocator::{BodyArena, BodyId},
        profiling::{StageTimer, StepProfile},
    },
};

/// Fixed-step simulation of sphere bodies against static polygon geometry.
///
/// Every [`step`](Self::step) runs the same stages in the same order:
/// one relaxation sweep over the distance constraints, gravity and
/// integration of every dynamic body, then an all-pairs narrow phase in body
/// insertion order. Only sphere/sphere and sphere/polygon pairs are resolved.
pub struct DynamicsWorld {
    config: WorldConfig,
    bodies: BodyArena<Body>,
    constraints: Vec<DistanceConstraint>,
    integrator: Integrator,
    sphere_sphere_callback: Option<SphereSphereCallback>,
    sphere_triangle_callback: Option<SphereTriangleCallback>,
    contact_buffer: QueryBuffer,
    trace_scratch: Mutex<TraceScratch>,
    time_accumulated: f32,
    profile: StepProfile,
}

impl Default for DynamicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsWorld {
    pub fn new() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: BodyArena::new(),
            constraints: Vec::new(),
            integrator: Integrator::new(config.gravity_step),
            sphere_sphere_callback: None,
            sphere_triangle_callback: None,
            contact_buffer: QueryBuffer::new(),
            trace_scratch: Mutex::new(TraceScratch::new()),
            time_accumulated: 0.0,
            profile: StepProfile::default(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Builds a polygon shape with this world's octree parameters.
    pub fn polygon_shape(&self, surfaces: &[Surface]) -> Result<Arc<CollisionShape>> {
        CollisionShape::polygon_from_surfaces_with(surfaces, &self.config.octree).map(Arc::new)
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    /// Removes a body together with every constraint that references it.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let body = self.bodies.remove(id)?;
        let before = self.constraints.len();
        self.constraints.retain(|constraint| !constraint.involves(id));
        let dropped = before - self.constraints.len();
        if dropped > 0 {
            log::debug!("removed {dropped} constraints attached to {id:?}");
        }
        Some(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Adds a constraint and returns its position in [`constraints`](Self::constraints).
    pub fn add_constraint(&mut self, constraint: DistanceConstraint) -> Result<usize> {
        constraint.validate()?;
        for id in [constraint.body_a, constraint.body_b] {
            if !self.bodies.contains(id) {
                return Err(PhysicsError::UnknownBody(id));
            }
        }
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Removes the constraint at `index`; later constraints shift down by one.
    pub fn remove_constraint(&mut self, index: usize) -> Option<DistanceConstraint> {
        (index < self.constraints.len()).then(|| self.constraints.remove(index))
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn set_sphere_sphere_callback<F>(&mut self, callback: F)
    where
        F: FnMut(BodyId, BodyId) + Send + Sync + 'static,
    {
        self.sphere_sphere_callback = Some(Box::new(callback));
    }

    pub fn set_sphere_triangle_callback<F>(&mut self, callback: F)
    where
        F: FnMut(BodyId, BodyId, &Triangle) + Send + Sync + 'static,
    {
        self.sphere_triangle_callback = Some(Box::new(callback));
    }

    pub fn clear_callbacks(&mut self) {
        self.sphere_sphere_callback = None;
        self.sphere_triangle_callback = None;
    }

    /// Runs one fixed simulation step.
    pub fn step(&mut self) {
        let mut profile = StepProfile {
            body_count: self.bodies.len(),
            constraint_count: self.constraints.len(),
            ..StepProfile::default()
        };
        let started = Instant::now();
        let totals;

        {
            let _stage = StageTimer::new("constraints", &mut profile.constraint_time);
            ConstraintSolver::solve(&self.constraints, &mut self.bodies);
        }
        {
            let _stage = StageTimer::new("integration", &mut profile.integration_time);
            self.integrator.step(self.bodies.iter_mut());
        }
        {
            let _stage = StageTimer::new("narrow_phase", &mut profile.narrow_phase_time);
            totals = self.narrow_phase();
        }
        profile.contacts_recorded = totals.contacts_recorded;
        profile.triangles_tested = totals.triangles_tested;

        profile.total_time = started.elapsed();
        profile.report();
        self.profile = profile;
    }

    /// Accumulates `dt` seconds and runs as many fixed steps as fit.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }
        self.time_accumulated += dt;

        let mut steps = 0;
        while self.time_accumulated >= self.config.time_step {
            self.time_accumulated -= self.config.time_step;
            self.step();
            self.profile.warn_if_over_budget(self.config.time_step);
            steps += 1;
        }
        steps
    }

    /// Counters of the most recent [`step`](Self::step).
    pub fn last_profile(&self) -> &StepProfile {
        &self.profile
    }

    fn narrow_phase(&mut self) -> PairStats {
        let mut totals = PairStats::default();
        let ids: Vec<(BodyId, ShapeKind)> = self
            .bodies
            .iter()
            .map(|(id, body)| (id, body.shape().kind()))
            .collect();

        for (i, &(id, kind)) in ids.iter().enumerate() {
            for (j, &(other_id, other_kind)) in ids.iter().enumerate() {
                if i == j {
                    continue;
                }
                match (kind, other_kind) {
                    // Unordered pairs: once resolved the spheres touch and the
                    // mirrored visit would record the pair a second time.
                    (ShapeKind::Sphere, ShapeKind::Sphere) if i < j => {
                        let Some((a, b)) = self.bodies.get2_mut(id, other_id) else {
                            continue;
                        };
                        if let Some(stats) = NarrowPhase::sphere_sphere(
                            id,
                            a,
                            other_id,
                            b,
                            self.sphere_sphere_callback.as_mut(),
                        ) {
                            totals.contacts_recorded += stats.contacts_recorded;
                        }
                    }
                    (ShapeKind::Sphere, ShapeKind::Polygon) => {
                        let Some((sphere, polygon)) = self.bodies.get2_mut(id, other_id) else {
                            continue;
                        };
                        let stats = NarrowPhase::sphere_polygon(
                            id,
                            sphere,
                            other_id,
                            polygon,
                            &mut self.contact_buffer,
                            self.sphere_triangle_callback.as_mut(),
                        );
                        totals.contacts_recorded += stats.contacts_recorded;
                        totals.triangles_tested += stats.triangles_tested;
                    }
                    (ShapeKind::Aabb, ShapeKind::Polygon) => {
                        if let Some(boxed) = self.bodies.get(id) {
                            NarrowPhase::box_polygon(boxed, other_id);
                        }
                    }
                    _ => {}
                }
            }
        }
        totals
    }

    /// Nearest triangle hit over all bodies, using the world's own scratch.
    ///
    /// Only polygon bodies can be hit. The scan of a body ends early at the
    /// first hit within squared distance
    /// [`NEAR_HIT_SQR_DISTANCE`](crate::config::NEAR_HIT_SQR_DISTANCE) of the
    /// ray origin, so such a hit wins even if a nearer one exists.
    pub fn trace_ray(&self, ray: &Ray) -> Option<RayHit> {
        let mut scratch = self.trace_scratch.lock();
        self.trace_ray_with(ray, &mut scratch)
    }

    /// [`trace_ray`](Self::trace_ray) with caller-owned scratch.
    pub fn trace_ray_with(&self, ray: &Ray, scratch: &mut TraceScratch) -> Option<RayHit> {
        trace_shapes(
            self.bodies.iter().map(|(id, body)| (id, body.shape())),
            ray,
            scratch,
        )
    }

    /// Traces against static bodies only.
    pub fn trace_static(&self, ray: &Ray) -> Option<RayHit> {
        let mut scratch = self.trace_scratch.lock();
        trace_shapes(
            self.bodies
                .iter()
                .filter(|(_, body)| body.is_static())
                .map(|(id, body)| (id, body.shape())),
            ray,
            &mut scratch,
        )
    }

    /// Snapshot of the static bodies for concurrent tracing.
    pub fn static_scene(&self) -> StaticScene {
        StaticScene::new(
            self.bodies
                .iter()
                .map(|(id, body)| (id, Arc::clone(body.shape_handle()))),
        )
    }

    /// Velocity change every dynamic body receives per step.
    pub fn gravity_step(&self) -> Vec3 {
        self.config.gravity_step
    }
}
