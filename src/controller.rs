//! Pointer-driven drilling: gesture recognition and orchestration of the
//! ray caster, cutter builder and CSG subtraction.
//!
//! The controller is parameterized by injected collaborators so it can be
//! unit-tested without a live rendering context. It owns the current solid
//! as an [`Arc`] handle and replaces it atomically: a new solid is fully
//! built off to the side, then the published handle is swapped in one step,
//! so a reader never observes a partially built solid.

use crate::cutter::{self, OrientationPolicy};
use crate::errors::CsgError;
use crate::float_types::Real;
use crate::raycast::{Ray, SurfaceHit};
use crate::solid::Solid;
use log::warn;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::sync::Arc;

/// Pointer travel (in NDC units) beyond which a press is treated as a
/// camera drag rather than a click.
pub const DEFAULT_DRAG_THRESHOLD: Real = 0.01;

/// Supplies the current camera state at click time.
pub trait CameraProvider {
    /// Current world-space camera position.
    fn position(&self) -> Point3<Real>;

    /// Unproject a normalized-device-coordinate pair in
    /// `[-1, 1] × [-1, 1]` into a world-space ray.
    fn screen_ray(&self, ndc: [Real; 2]) -> Ray;
}

/// Receives scene-membership changes. Performs no geometry logic itself.
pub trait SceneMutator<S: Clone> {
    fn remove_solid(&mut self, solid: &Arc<Solid<S>>);
    fn add_solid(&mut self, solid: &Arc<Solid<S>>);
}

/// Board dimensions and drilling parameters, read from the collaborator
/// whenever the controller rebuilds or cuts — the controller never owns
/// their storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    pub width: Real,
    pub length: Real,
    pub thickness: Real,
    pub hole_diameter: Real,
    pub orientation: OrientationPolicy,
}

/// Supplies the externally mutable [`BoardConfig`] (e.g. from UI controls).
pub trait ConfigSource {
    fn config(&self) -> BoardConfig;
}

/// Pointer gesture state. A press becomes a drag as soon as the pointer
/// travels beyond the threshold; only a press that stays put until release
/// counts as a click.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerState {
    Idle,
    Pressed { at: [Real; 2] },
    Dragging,
}

/// Orchestrates pointer events into drill cuts on the current solid.
pub struct DrillController<S: Clone, C, M, D> {
    camera: C,
    scene: M,
    config: D,
    /// Material attached to rebuilt boards; opaque to the controller.
    material: Option<S>,
    solid: Arc<Solid<S>>,
    state: PointerState,
    hover: Option<SurfaceHit>,
    drag_threshold: Real,
}

impl<S, C, M, D> DrillController<S, C, M, D>
where
    S: Clone + Send + Sync + Debug,
    C: CameraProvider,
    M: SceneMutator<S>,
    D: ConfigSource,
{
    /// Create a controller, build the initial board from the current
    /// config and add it to the scene.
    pub fn new(camera: C, mut scene: M, config: D, material: Option<S>) -> Self {
        let cfg = config.config();
        let solid = Arc::new(Solid::board(
            cfg.width,
            cfg.length,
            cfg.thickness,
            material.clone(),
        ));
        scene.add_solid(&solid);

        DrillController {
            camera,
            scene,
            config,
            material,
            solid,
            state: PointerState::Idle,
            hover: None,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }

    /// Handle of the currently displayed solid. Cloning the `Arc` is how
    /// render-side readers subscribe to atomic replacements.
    pub fn current_solid(&self) -> Arc<Solid<S>> {
        Arc::clone(&self.solid)
    }

    /// The most recent hover hit-test result, for cursor feedback.
    pub fn hover_hit(&self) -> Option<&SurfaceHit> {
        self.hover.as_ref()
    }

    /// Override the press-to-drag motion threshold (NDC units).
    pub fn set_drag_threshold(&mut self, threshold: Real) {
        self.drag_threshold = threshold;
    }

    /// Set the material attached to future rebuilds. Existing geometry is
    /// untouched.
    pub fn set_material(&mut self, material: Option<S>) {
        self.material = material;
    }

    /// Record a press. No side effect until release.
    pub fn pointer_down(&mut self, ndc: [Real; 2]) {
        if self.state == PointerState::Idle {
            self.state = PointerState::Pressed { at: ndc };
        }
    }

    /// Track pointer motion: refresh the hover hit-test in every state,
    /// and demote a press to a drag once it travels beyond the threshold.
    pub fn pointer_move(&mut self, ndc: [Real; 2]) {
        let ray = self.camera.screen_ray(ndc);
        self.hover = self.solid.cast_ray(&ray);

        if let PointerState::Pressed { at } = self.state {
            let (dx, dy) = (ndc[0] - at[0], ndc[1] - at[1]);
            if (dx * dx + dy * dy).sqrt() > self.drag_threshold {
                self.state = PointerState::Dragging;
            }
        }
    }

    /// Release the pointer. A release from a stationary press is a click
    /// and performs a cut if the click ray hits the solid; a release from
    /// a drag is suppressed — the camera gesture took priority.
    ///
    /// Returns whether a cut was applied. A miss is a no-op, not an error.
    ///
    /// # Errors
    /// [`CsgError::NonManifoldOperand`] if a cut was attempted on a
    /// malformed operand. The displayed solid is retained unchanged.
    pub fn pointer_up(&mut self, ndc: [Real; 2]) -> Result<bool, CsgError> {
        let was_click = matches!(self.state, PointerState::Pressed { .. });
        self.state = PointerState::Idle;
        if !was_click {
            return Ok(false);
        }

        let ray = self.camera.screen_ray(ndc);
        let Some(hit) = self.solid.cast_ray(&ray) else {
            return Ok(false);
        };

        match self.perform_cut(&hit) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!("cut aborted, keeping previous solid: {err}");
                Err(err)
            },
        }
    }

    /// Rebuild the board from the current config. This deliberately resets
    /// modification history: every prior cut is discarded.
    pub fn rebuild(&mut self) {
        let cfg = self.config.config();
        let fresh = Arc::new(Solid::board(
            cfg.width,
            cfg.length,
            cfg.thickness,
            self.material.clone(),
        ));
        self.publish(fresh);
    }

    fn perform_cut(&mut self, hit: &SurfaceHit) -> Result<(), CsgError> {
        let cfg = self.config.config();

        // The board's local drill axis is its thickness axis.
        let drill_axis = Vector3::z();
        let axis = cutter::cutter_axis(cfg.orientation, hit, &self.camera.position(), &drill_axis);

        let extent = self.solid.bounding_box().extents().max();
        let cutter = cutter::build_cutter(
            hit,
            &axis,
            cfg.hole_diameter,
            cutter::LENGTH_FACTOR * extent,
            self.solid.metadata.clone(),
        );

        let next = self.solid.subtract(&cutter)?;
        self.publish(Arc::new(next));
        Ok(())
    }

    fn publish(&mut self, next: Arc<Solid<S>>) {
        self.scene.remove_solid(&self.solid);
        self.scene.add_solid(&next);
        self.solid = next;
        self.hover = None;
    }
}
