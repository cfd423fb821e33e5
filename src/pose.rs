//! Camera pose reconstruction from a recorded car state.
//!
//! The simulator stores intrinsic yxz rotations and uses a -z forward world
//! convention; both are folded into plain extrinsic matrix products here.
//! All angles from the state record are radians; the per-car pitch offset
//! is degrees.

use std::f32::consts::PI;

use cgmath::{Matrix3, Rad, Vector3};

use crate::cars::CarData;
use crate::records::GameState;

/// World-from-car rotation.
///
/// The captured heading is measured against the world's -z forward axis,
/// hence the extra pi about y.
pub fn car_rotation(state: &GameState) -> Matrix3<f32> {
    let r_y = Matrix3::from_angle_y(Rad(-state.heading + PI));
    let r_x = Matrix3::from_angle_x(Rad(state.pitch));
    let r_z = Matrix3::from_angle_z(Rad(state.roll));
    r_y * r_x * r_z
}

/// World-from-camera rotation: the car pose with the car's camera pitch
/// offset applied in the car frame.
pub fn camera_rotation(state: &GameState, car: &CarData) -> Matrix3<f32> {
    car_rotation(state) * Matrix3::from_angle_x(Rad(car.camera_pitch.to_radians()))
}

/// Camera position: the ego location plus the car's camera offset, taken
/// from car frame to world through the -z forward flip.
pub fn camera_location(state: &GameState, car: &CarData) -> Vector3<f32> {
    let z_flip = Matrix3::from_angle_y(Rad(PI));
    let offset = (car_rotation(state) * z_flip) * car.camera_offset_xyz();
    Vector3::new(
        state.ego_location_x + offset.x,
        state.ego_location_y + offset.y,
        state.ego_location_z + offset.z,
    )
}
