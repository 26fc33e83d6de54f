//! Host control-surface mapping.
//!
//! [`CabControls`] is the per-tick normalized snapshot the session hands to
//! the host; [`map_locomotive_controls`] turns it into the values a
//! locomotive control helper consumes. Everything here is pure so the
//! mapping is testable without a console attached.

use opencab_hid_raildriver_protocol::{Button, ButtonMask};

/// Bail-off rocker travel beyond which the bail-off action is applied.
pub const BAIL_OFF_APPLY_THRESHOLD: f32 = 0.7;

/// Camera pitch/yaw step per tick while a D-Pad direction is held.
pub const CAMERA_NUDGE_STEP: f32 = 0.5;

/// Normalized snapshot of every lever plus the button field, computed from
/// one raw snapshot and one calibration read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CabControls {
    /// Reverser, [-1.0, 1.0], 0.0 at neutral.
    pub reverser: f32,
    /// Combined dynamic-brake/throttle, [-1.0, 1.0].
    pub throttle: f32,
    /// Automatic brake working range, [0.0, 1.0] (negative in the emergency band).
    pub auto_brake: f32,
    /// Independent brake, [0.0, 1.0].
    pub ind_brake: f32,
    /// Bail-off rocker, [0.0, 1.0].
    pub bail_off: f32,
    /// Wiper switch, [0.0, 1.0].
    pub wiper: f32,
    /// Headlight switch, [0.0, 1.0] with the detent at 0.5.
    pub lights: f32,
    /// Automatic brake thrown past the emergency threshold.
    pub emergency_brake: bool,
    /// All held buttons.
    pub buttons: ButtonMask,
}

/// Values for the host's locomotive control helper, one tick's worth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotiveControls {
    /// Reverser command. Sign is flipped relative to the lever: pushing the
    /// lever forward drives the locomotive forward.
    pub reverser: f32,
    /// Throttle / dynamic brake command, [-1.0, 1.0].
    pub throttle: f32,
    /// Train brake setting, `1.0 - ind_brake`: 0.0 with the lever at
    /// release, 1.0 at full application.
    pub train_brake: f32,
    /// Locomotive brake setting, `1.0 - auto_brake`: 0.0 with the lever at
    /// release; past 1.0 inside the emergency band.
    pub locomotive_brake: f32,
    /// Fire the bail-off action this tick.
    pub apply_bail_off: bool,
    /// Discrete headlight level: 0 = off, 1 = dim, 2 = full.
    pub headlight: u8,
    /// Toggle the bell this tick (edge-triggered).
    pub toggle_bell: bool,
    /// Horn/whistle intensity; additive and unclamped.
    pub horn: f32,
}

/// Map one tick's cab snapshot onto locomotive commands.
///
/// `newly_pressed` must come from the tick-owned
/// [`ButtonEdgeDetector`](opencab_hid_raildriver_protocol::ButtonEdgeDetector)
/// so edge-triggered actions fire exactly once per press.
pub fn map_locomotive_controls(
    cab: &CabControls,
    newly_pressed: ButtonMask,
) -> LocomotiveControls {
    LocomotiveControls {
        reverser: -cab.reverser,
        throttle: cab.throttle,
        train_brake: 1.0 - cab.ind_brake,
        locomotive_brake: 1.0 - cab.auto_brake,
        apply_bail_off: cab.bail_off > BAIL_OFF_APPLY_THRESHOLD,
        headlight: headlight_level(cab.lights),
        toggle_bell: newly_pressed.contains(Button::Bell),
        horn: horn_intensity(cab.buttons),
    }
}

/// Discrete headlight level from the normalized switch position:
/// `round(lights * 2)`, held to {0, 1, 2} even when the axis drifts.
pub fn headlight_level(lights: f32) -> u8 {
    (lights * 2.0).round().clamp(0.0, 2.0) as u8
}

/// Continuous horn intensity from the held whistle buttons: WhistleUp
/// contributes 1.0, WhistleDown 0.5. Both held reads 1.5 by design.
pub fn horn_intensity(buttons: ButtonMask) -> f32 {
    let mut intensity = 0.0;
    if buttons.contains(Button::WhistleUp) {
        intensity += 1.0;
    }
    if buttons.contains(Button::WhistleDown) {
        intensity += 0.5;
    }
    intensity
}

/// Camera pitch/yaw deltas for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraNudge {
    pub pitch: f32,
    pub yaw: f32,
}

/// Camera nudge from the held D-Pad directions, [`CAMERA_NUDGE_STEP`] per
/// direction per tick. Hosts add the deltas to their look input; this is the
/// explicit injection hook replacing in-engine input patching.
pub fn camera_nudge(held: ButtonMask) -> CameraNudge {
    let mut nudge = CameraNudge::default();
    if held.contains(Button::DPadUp) {
        nudge.pitch += CAMERA_NUDGE_STEP;
    }
    if held.contains(Button::DPadDown) {
        nudge.pitch -= CAMERA_NUDGE_STEP;
    }
    if held.contains(Button::DPadRight) {
        nudge.yaw += CAMERA_NUDGE_STEP;
    }
    if held.contains(Button::DPadLeft) {
        nudge.yaw -= CAMERA_NUDGE_STEP;
    }
    nudge
}
