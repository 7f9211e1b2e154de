use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use approx::assert_relative_eq;
use drillpress::float_types::Real;
use drillpress::raycast::Ray;
use drillpress::solid::Solid;
use drillpress::{
    BoardConfig, CameraProvider, ConfigSource, DrillController, OrientationPolicy, SceneMutator,
};
use nalgebra::{Point3, Vector3};

/// Orthographic stand-in camera: NDC maps linearly onto the z = +`height`
/// plane, rays point straight down the -Z axis.
struct OrthoCamera {
    position: Point3<Real>,
    half_extents: [Real; 2],
}

impl OrthoCamera {
    fn overhead() -> Self {
        OrthoCamera {
            position: Point3::new(0.0, 0.0, 15.0),
            // NDC ±1 maps to x ∈ ±2, y ∈ ±6: the board (2×10) plus margin.
            half_extents: [2.0, 6.0],
        }
    }
}

impl CameraProvider for OrthoCamera {
    fn position(&self) -> Point3<Real> {
        self.position
    }

    fn screen_ray(&self, ndc: [Real; 2]) -> Ray {
        Ray::new(
            Point3::new(
                ndc[0] * self.half_extents[0],
                ndc[1] * self.half_extents[1],
                self.position.z,
            ),
            Vector3::new(0.0, 0.0, -1.0),
        )
    }
}

/// Records scene membership changes.
#[derive(Default)]
struct RecordingScene {
    added: Rc<RefCell<Vec<Arc<Solid<()>>>>>,
    removed: Rc<RefCell<usize>>,
}

impl SceneMutator<()> for RecordingScene {
    fn remove_solid(&mut self, _solid: &Arc<Solid<()>>) {
        *self.removed.borrow_mut() += 1;
    }

    fn add_solid(&mut self, solid: &Arc<Solid<()>>) {
        self.added.borrow_mut().push(Arc::clone(solid));
    }
}

#[derive(Clone)]
struct SharedConfig(Rc<RefCell<BoardConfig>>);

impl SharedConfig {
    fn standard() -> Self {
        SharedConfig(Rc::new(RefCell::new(BoardConfig {
            width: 2.0,
            length: 10.0,
            thickness: 0.5,
            hole_diameter: 0.2,
            orientation: OrientationPolicy::Directed,
        })))
    }
}

impl ConfigSource for SharedConfig {
    fn config(&self) -> BoardConfig {
        *self.0.borrow()
    }
}

type Controller = DrillController<(), OrthoCamera, RecordingScene, SharedConfig>;

fn controller(config: SharedConfig) -> (Controller, Rc<RefCell<Vec<Arc<Solid<()>>>>>) {
    let scene = RecordingScene::default();
    let added = Rc::clone(&scene.added);
    let ctl = DrillController::new(OrthoCamera::overhead(), scene, config, None);
    (ctl, added)
}

#[test]
fn click_performs_cut() {
    let (mut ctl, _) = controller(SharedConfig::standard());
    let original = ctl.current_solid();

    ctl.pointer_down([0.0, 0.0]);
    let cut = ctl.pointer_up([0.0, 0.0]).expect("cut applies cleanly");
    assert!(cut);

    let drilled = ctl.current_solid();
    assert!(!Arc::ptr_eq(&original, &drilled));
    assert!(drilled.face_count() > original.face_count());
    assert!(drilled.is_manifold());

    // Removed volume ≈ pi * r^2 * thickness, within the tolerance of the
    // cylinder's 32-gon approximation.
    let removed = original.volume() - drilled.volume();
    let analytic = core::f64::consts::PI * 0.1 * 0.1 * 0.5;
    assert_relative_eq!(removed, analytic, max_relative = 0.02);
}

#[test]
fn directed_cut_goes_all_the_way_through() {
    let (mut ctl, _) = controller(SharedConfig::standard());

    ctl.pointer_down([0.1, 0.2]);
    assert!(ctl.pointer_up([0.1, 0.2]).expect("cut applies cleanly"));

    // A ray down the hole axis passes through entry and exit openings
    // without touching a face: no blind pocket.
    let drilled = ctl.current_solid();
    let hole_center = OrthoCamera::overhead().screen_ray([0.1, 0.2]);
    assert!(drilled.cast_ray(&hole_center).is_none());
}

#[test]
fn drag_suppresses_cut() {
    let (mut ctl, _) = controller(SharedConfig::standard());
    let original = ctl.current_solid();

    ctl.pointer_down([0.0, 0.0]);
    ctl.pointer_move([0.3, 0.2]); // orbit gesture
    ctl.pointer_move([0.0, 0.0]); // even back to the press point
    let cut = ctl.pointer_up([0.0, 0.0]).expect("no cut, no error");

    assert!(!cut);
    assert!(Arc::ptr_eq(&original, &ctl.current_solid()));
}

#[test]
fn motion_below_threshold_still_clicks() {
    let (mut ctl, _) = controller(SharedConfig::standard());

    ctl.pointer_down([0.0, 0.0]);
    ctl.pointer_move([0.001, 0.0]); // jitter, not a drag
    assert!(ctl.pointer_up([0.001, 0.0]).expect("cut applies cleanly"));
}

#[test]
fn missed_click_changes_nothing() {
    let (mut ctl, added) = controller(SharedConfig::standard());
    let original = ctl.current_solid();
    let adds_before = added.borrow().len();

    ctl.pointer_down([0.9, 0.9]); // outside the board
    let cut = ctl.pointer_up([0.9, 0.9]).expect("miss is not an error");

    assert!(!cut);
    assert!(Arc::ptr_eq(&original, &ctl.current_solid()));
    assert_eq!(added.borrow().len(), adds_before);
}

#[test]
fn hover_is_tracked_independently_of_gesture() {
    let (mut ctl, _) = controller(SharedConfig::standard());
    assert!(ctl.hover_hit().is_none());

    ctl.pointer_move([0.0, 0.0]);
    let hover = ctl.hover_hit().expect("pointer is over the board");
    assert!((hover.point.z - 0.25).abs() < 1e-9);

    ctl.pointer_move([0.9, 0.9]);
    assert!(ctl.hover_hit().is_none());
}

#[test]
fn camera_facing_cut_orients_toward_camera() {
    let config = SharedConfig::standard();
    config.0.borrow_mut().orientation = OrientationPolicy::CameraFacing;
    let (mut ctl, _) = controller(config);
    let original = ctl.current_solid();

    ctl.pointer_down([0.0, 0.0]);
    assert!(ctl.pointer_up([0.0, 0.0]).expect("cut applies cleanly"));

    let drilled = ctl.current_solid();
    assert!(drilled.is_manifold());
    assert!(drilled.volume() < original.volume());
}

#[test]
fn scene_is_notified_of_every_swap() {
    let (mut ctl, added) = controller(SharedConfig::standard());
    assert_eq!(added.borrow().len(), 1); // initial board

    ctl.pointer_down([0.0, 0.0]);
    ctl.pointer_up([0.0, 0.0]).expect("cut applies cleanly");
    assert_eq!(added.borrow().len(), 2);

    // The published handle is what the scene saw.
    assert!(Arc::ptr_eq(
        added.borrow().last().expect("one add per swap"),
        &ctl.current_solid()
    ));
}

#[test]
fn rebuild_resets_modification_history() {
    let config = SharedConfig::standard();
    let (mut ctl, _) = controller(config.clone());

    ctl.pointer_down([0.0, 0.0]);
    ctl.pointer_up([0.0, 0.0]).expect("cut applies cleanly");
    assert!(ctl.current_solid().face_count() > 6);

    // Dimension slider moved: the board is rebuilt from scratch and every
    // prior cut is gone.
    config.0.borrow_mut().width = 3.0;
    ctl.rebuild();

    let fresh = ctl.current_solid();
    assert_eq!(fresh.face_count(), 6);
    assert_relative_eq!(fresh.volume(), 3.0 * 10.0 * 0.5, max_relative = 1e-9);
}

#[test]
fn successive_cuts_accumulate() {
    let (mut ctl, _) = controller(SharedConfig::standard());
    let mut last_volume = ctl.current_solid().volume();

    for ndc in [[-0.3, -0.4], [0.0, 0.0], [0.3, 0.4]] {
        ctl.pointer_down(ndc);
        assert!(ctl.pointer_up(ndc).expect("cut applies cleanly"));

        let solid = ctl.current_solid();
        assert!(solid.is_manifold());
        assert!(solid.volume() < last_volume);
        last_volume = solid.volume();
    }
}
