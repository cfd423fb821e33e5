//! Per-car camera placement.
//!
//! Each car defines where its capture camera sits in the car frame and the
//! extra pitch the game applies to that camera. Register new [`CarData`]
//! instances in [`car_data`] to make them available from configuration.

use cgmath::Vector3;

use crate::error::Error;
use crate::Result;

/// Camera placement for one car.
#[derive(Debug, Clone, Copy)]
pub struct CarData {
    pub camera_offset_x: f32,
    pub camera_offset_y: f32,
    pub camera_offset_z: f32,
    /// Pitch offset applied to the camera, degrees.
    pub camera_pitch: f32,
}

impl CarData {
    /// Camera offset in car coordinates.
    pub fn camera_offset_xyz(&self) -> Vector3<f32> {
        Vector3::new(
            self.camera_offset_x,
            self.camera_offset_y,
            self.camera_offset_z,
        )
    }
}

pub static AUDI_R8_LMS_2016_DATA: CarData = CarData {
    camera_offset_x: 0.0,
    camera_offset_y: 1.042,
    camera_offset_z: -0.397,
    camera_pitch: -9.5,
};

pub static ALFA_ROMEO_GTR_DATA: CarData = CarData {
    camera_offset_x: 0.0,
    camera_offset_y: 1.15,
    camera_offset_z: -0.64,
    camera_pitch: -12.0,
};

/// Captures taken with a free camera have no body offsets at all.
pub static INVISIBLE_CAR: CarData = CarData {
    camera_offset_x: 0.0,
    camera_offset_y: 0.0,
    camera_offset_z: 0.0,
    camera_pitch: 0.0,
};

/// Looks a registered car up by its configuration name.
pub fn car_data(name: &str) -> Result<&'static CarData> {
    match name {
        "audi_r8_lms_2016" => Ok(&AUDI_R8_LMS_2016_DATA),
        "alfa_romeo_gtr" => Ok(&ALFA_ROMEO_GTR_DATA),
        "invisible_car" => Ok(&INVISIBLE_CAR),
        _ => Err(Error::UnknownCar(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_cars_resolve() {
        assert!(car_data("audi_r8_lms_2016").is_ok());
        assert!(car_data("alfa_romeo_gtr").is_ok());
        assert!(car_data("invisible_car").is_ok());
        assert!(matches!(car_data("delorean"), Err(Error::UnknownCar(_))));
    }

    #[test]
    fn invisible_car_is_the_identity_placement() {
        let car = car_data("invisible_car").unwrap();
        assert_eq!(car.camera_offset_xyz(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(car.camera_pitch, 0.0);
    }
}
