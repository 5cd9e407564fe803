//! Built-in gesture tables.
//!
//! Each function returns a [`GestureDefinition`] — pure data, interpreted
//! by the [`Choreographer`][crate::choreographer::Choreographer]. Poses are
//! joint angles in degrees; arm poses follow the seven-joint order
//! shoulder_pitch, shoulder_roll, elbow_yaw, elbow_pitch, wrist_roll,
//! wrist_pitch, wrist_yaw. Head poses are [roll, pitch, yaw]. Antenna poses
//! are a single angle.
//!
//! Non-blocking steps on different channels overlap deliberately (both arms
//! and the head shrug at once); `hold` delays pace the performance.

use choreo_types::{GestureDefinition, RotationAxis, Step};

const NEUTRAL_HEAD: [f32; 3] = [0.0, 0.0, 0.0];

/// Every built-in gesture, for help screens and lookup by name.
pub fn all() -> Vec<GestureDefinition> {
    vec![
        slump(),
        attention(),
        boring_meeting(),
        pointing(),
        nod(),
        shrug(),
        holding(),
        curious(),
        defeated(),
        excited(),
        listening(),
        goodbye_wave(),
        home(),
    ]
}

/// Look up a built-in gesture by name.
pub fn by_name(name: &str) -> Option<GestureDefinition> {
    all().into_iter().find(|g| g.name == name)
}

/// Head droops into a defeated slouch.
pub fn slump() -> GestureDefinition {
    GestureDefinition::named("slump")
        .step(Step::joints("head", [0.0, -25.0, 0.0], 1.5).blocking())
}

/// Snap to attention: arms ready, gaze at the presenter, antennas perked.
pub fn attention() -> GestureDefinition {
    GestureDefinition::named("attention")
        .step(Step::posture("elbow_90", 1.2))
        .step(Step::look_at("head", 0.5, 0.2, 0.1))
        .step(Step::joints("l_antenna", [15.0], 0.5))
        .step(Step::joints("r_antenna", [-15.0], 0.5).hold(1.5))
}

/// Dozing off in a meeting, startling awake, looking around confused.
pub fn boring_meeting() -> GestureDefinition {
    GestureDefinition::named("boring_meeting")
        .step(Step::joints("head", [0.0, -20.0, 5.0], 1.5).blocking().hold(0.3))
        .step(Step::joints("head", [0.0, 10.0, 0.0], 0.4).hold(0.3))
        .step(Step::joints("l_antenna", [25.0], 0.3))
        .step(Step::joints("r_antenna", [-10.0], 0.3))
        .step(Step::joints("head", [10.0, 5.0, 15.0], 0.6).hold(0.5))
        .step(Step::joints("head", [-10.0, 5.0, -15.0], 0.6).hold(0.5))
        .step(Step::joints("head", NEUTRAL_HEAD, 0.5).blocking())
}

/// Point at the screen, emphasize the data point, return to neutral.
pub fn pointing() -> GestureDefinition {
    let point = [20.0, 10.0, -30.0, -40.0, 0.0, -20.0, 0.0];
    let emphasis = [25.0, 10.0, -30.0, -40.0, 0.0, -20.0, 0.0];
    GestureDefinition::named("pointing")
        .step(Step::joints("r_arm", point, 1.2))
        .step(Step::joints("head", [0.0, 5.0, 30.0], 1.0).hold(2.0))
        .step(Step::joints("r_arm", emphasis, 0.3).hold(0.3))
        .step(Step::joints("r_arm", point, 0.3).hold(1.0))
        .step(Step::posture("elbow_90", 1.0))
        .step(Step::joints("head", NEUTRAL_HEAD, 0.8).blocking())
}

/// Four nods, each awaited, then settle back to neutral.
///
/// Exactly nine head dispatches, all barriers, in literal pose order.
pub fn nod() -> GestureDefinition {
    let mut gesture = GestureDefinition::named("nod");
    for _ in 0..4 {
        gesture = gesture
            .step(Step::joints("head", [0.0, 10.0, 0.0], 0.3).blocking())
            .step(Step::joints("head", [0.0, -5.0, 0.0], 0.25).blocking());
    }
    gesture.step(Step::joints("head", [0.0, 0.0, 0.0], 0.4).blocking())
}

/// Both arms up, head tilted, antennas raised: "I don't know".
pub fn shrug() -> GestureDefinition {
    GestureDefinition::named("shrug")
        .step(Step::joints("r_arm", [30.0, 20.0, -20.0, -50.0, 0.0, 0.0, 0.0], 0.6))
        .step(Step::joints("l_arm", [30.0, -20.0, 20.0, -50.0, 0.0, 0.0, 0.0], 0.6))
        .step(Step::joints("head", [15.0, 5.0, 0.0], 0.5))
        .step(Step::joints("l_antenna", [20.0], 0.4))
        .step(Step::joints("r_antenna", [20.0], 0.4).hold(2.5))
        .step(Step::posture("elbow_90", 1.0))
        .step(Step::joints("head", NEUTRAL_HEAD, 0.8).blocking())
}

/// Arms extended forward, palms up, gaze on the hands.
pub fn holding() -> GestureDefinition {
    GestureDefinition::named("holding")
        .step(Step::joints("r_arm", [10.0, -10.0, 0.0, -90.0, 0.0, 0.0, 0.0], 1.0))
        .step(Step::joints("l_arm", [10.0, 10.0, 0.0, -90.0, 0.0, 0.0, 0.0], 1.0))
        .step(Step::joints("head", [0.0, -10.0, 0.0], 0.8).hold(2.5))
        .step(Step::posture("elbow_90", 1.0))
        .step(Step::joints("head", NEUTRAL_HEAD, 0.8).blocking())
}

/// Head tilts in, antennas perk asymmetrically.
pub fn curious() -> GestureDefinition {
    GestureDefinition::named("curious")
        .step(Step::joints("head", [20.0, 15.0, 15.0], 1.0))
        .step(Step::joints("l_antenna", [30.0], 0.6))
        .step(Step::joints("r_antenna", [-5.0], 0.6).hold(2.0))
}

/// Everything droops: head, antennas, both arms.
pub fn defeated() -> GestureDefinition {
    GestureDefinition::named("defeated")
        .step(Step::joints("head", [0.0, -30.0, 0.0], 1.5))
        .step(Step::joints("l_antenna", [-20.0], 1.0))
        .step(Step::joints("r_antenna", [-20.0], 1.0))
        .step(Step::joints("r_arm", [5.0, 5.0, 0.0, -100.0, 0.0, 0.0, 0.0], 1.5))
        .step(Step::joints("l_arm", [5.0, -5.0, 0.0, -100.0, 0.0, 0.0, 0.0], 1.5).hold(2.0))
}

/// Arms fly up and the antennas wiggle three times.
pub fn excited() -> GestureDefinition {
    let mut gesture = GestureDefinition::named("excited")
        .step(Step::joints("r_arm", [40.0, 30.0, -20.0, -60.0, 0.0, 0.0, 0.0], 0.6))
        .step(Step::joints("l_arm", [40.0, -30.0, 20.0, -60.0, 0.0, 0.0, 0.0], 0.6))
        .step(Step::joints("head", [0.0, 15.0, 0.0], 0.5));
    for _ in 0..3 {
        gesture = gesture
            .step(Step::joints("l_antenna", [40.0], 0.15))
            .step(Step::joints("r_antenna", [-40.0], 0.15).hold(0.2))
            .step(Step::joints("l_antenna", [-20.0], 0.15))
            .step(Step::joints("r_antenna", [20.0], 0.15).hold(0.2));
    }
    gesture.step(Step::joints("head", [0.0, 15.0, 0.0], 0.3).hold(1.0))
}

/// Track the speaker with subtle pitch nods and an engaged head tilt.
pub fn listening() -> GestureDefinition {
    let mut gesture = GestureDefinition::named("listening")
        .step(Step::look_at("head", 0.5, 0.3, 0.1).hold(0.5));
    for _ in 0..3 {
        gesture = gesture
            .step(Step::rotate_by("head", RotationAxis::Pitch, 5.0, 0.4).hold(0.5))
            .step(Step::rotate_by("head", RotationAxis::Pitch, -5.0, 0.3).hold(0.4));
    }
    gesture.step(Step::rotate_by("head", RotationAxis::Roll, 8.0, 0.5).hold(1.0))
}

/// Raise the right arm, wave three times, nod goodbye, rest.
pub fn goodbye_wave() -> GestureDefinition {
    let mut gesture = GestureDefinition::named("goodbye_wave")
        .step(Step::joints("r_arm", [60.0, 30.0, -10.0, -30.0, 0.0, 0.0, 0.0], 1.0).blocking().hold(0.5));
    for _ in 0..3 {
        gesture = gesture
            .step(Step::joints("r_arm", [60.0, 40.0, -10.0, -30.0, 0.0, 20.0, 0.0], 0.3).hold(0.35))
            .step(Step::joints("r_arm", [60.0, 20.0, -10.0, -30.0, 0.0, -20.0, 0.0], 0.3).hold(0.35));
    }
    gesture
        .step(Step::joints("head", [0.0, 10.0, 0.0], 0.5).hold(0.3))
        .step(Step::joints("head", NEUTRAL_HEAD, 0.3).hold(1.0))
        .step(Step::posture("default", 1.5).blocking())
}

/// Return to the default posture with a level head.
pub fn home() -> GestureDefinition {
    GestureDefinition::named("home")
        .step(Step::posture("default", 2.0).blocking())
        .step(Step::joints("head", NEUTRAL_HEAD, 1.0).blocking())
}
