use therapeutic_skeleton::{Joint, SensorFrame, Vec3};

/// Person standing two metres in front of the sensor, arms hanging down
pub fn standing_frame(frame_index: u64) -> SensorFrame {
    SensorFrame::new(frame_index, 30.0)
        .with_joint(Joint::Head, Vec3::new(0.0, 500.0, 2000.0))
        .with_joint(Joint::Neck, Vec3::new(0.0, 350.0, 2000.0))
        .with_joint(Joint::Torso, Vec3::new(0.0, 0.0, 2000.0))
        .with_joint(Joint::LeftShoulder, Vec3::new(-150.0, 300.0, 2000.0))
        .with_joint(Joint::RightShoulder, Vec3::new(150.0, 300.0, 2000.0))
        .with_joint(Joint::LeftElbow, Vec3::new(-150.0, 50.0, 2000.0))
        .with_joint(Joint::RightElbow, Vec3::new(150.0, 50.0, 2000.0))
        .with_joint(Joint::LeftHand, Vec3::new(-150.0, -180.0, 2000.0))
        .with_joint(Joint::RightHand, Vec3::new(150.0, -180.0, 2000.0))
        .with_joint(Joint::LeftHip, Vec3::new(-100.0, -200.0, 2000.0))
        .with_joint(Joint::RightHip, Vec3::new(100.0, -200.0, 2000.0))
}

/// Standing frame with both arms placed relative to their shoulders.
/// The right arm is the left one reflected in x.
pub fn arms_frame(frame_index: u64, elbow_offset: Vec3, hand_offset: Vec3) -> SensorFrame {
    let flip = |v: Vec3| Vec3::new(-v.x, v.y, v.z);
    let left_shoulder = Vec3::new(-150.0, 300.0, 2000.0);
    let right_shoulder = Vec3::new(150.0, 300.0, 2000.0);

    standing_frame(frame_index)
        .with_joint(Joint::LeftElbow, left_shoulder + elbow_offset)
        .with_joint(Joint::LeftHand, left_shoulder + hand_offset)
        .with_joint(Joint::RightElbow, right_shoulder + flip(elbow_offset))
        .with_joint(Joint::RightHand, right_shoulder + flip(hand_offset))
}

/// Hands just in front of the shoulders, ready to push
pub fn push_start_frame(frame_index: u64) -> SensorFrame {
    arms_frame(frame_index, Vec3::new(0.0, -200.0, -50.0), Vec3::new(0.0, 0.0, -150.0))
}

/// Arms stretched straight towards the sensor
pub fn push_end_frame(frame_index: u64) -> SensorFrame {
    arms_frame(frame_index, Vec3::new(0.0, 0.0, -250.0), Vec3::new(0.0, 0.0, -480.0))
}

pub fn assert_vec_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).norm() < 1e-3,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
