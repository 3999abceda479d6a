//! VR support.
//!
//! The headset-facing surface is split in two: pure state and math
//! (session state machine, swapchain layout, stereo projection, frame
//! timing) that always compiles and is unit-tested, and the OpenXR runtime
//! glue behind the `vr` cargo feature. Without the feature a no-op stub
//! stands in so the rest of the client is oblivious.

pub mod frame;
pub mod frame_timing;
pub mod projection;
pub mod swapchain;

#[cfg(feature = "vr")]
mod session;
#[cfg(feature = "vr")]
pub use session::VrSession;

#[cfg(not(feature = "vr"))]
mod stub;
#[cfg(not(feature = "vr"))]
pub use stub::VrSession;

/// How the player asked to run: flat desktop, VR, VR with a submitted
/// depth layer, or VR with one double-wide swapchain instead of one per
/// eye.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VrOptions {
    pub enabled: bool,

    /// Submit the paired depth textures to the compositor.
    pub submit_depth: bool,

    /// Render both eyes into a single double-width swapchain.
    pub doublewide: bool,
}

impl VrOptions {
    pub fn desktop() -> Self {
        Self::default()
    }
}

/// Session state, mirroring the OpenXR session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrSessionState {
    Idle,
    Ready,
    Synchronized,
    Visible,
    Focused,
    Stopping,
    LossPending,
    Exiting,
}

impl VrSessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Synchronized => "synchronized",
            Self::Visible => "visible",
            Self::Focused => "focused",
            Self::Stopping => "stopping",
            Self::LossPending => "loss-pending",
            Self::Exiting => "exiting",
        }
    }

    /// Frames may be submitted in these states.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Synchronized | Self::Visible | Self::Focused
        )
    }
}

/// Headset info discovered from the runtime.
#[derive(Debug, Clone)]
pub struct HmdInfo {
    pub system_name: String,
    pub vendor_id: u32,
    pub max_layers: u32,
    pub orientation_tracking: bool,
    pub position_tracking: bool,
    pub recommended_width: u32,
    pub recommended_height: u32,
}

impl Default for HmdInfo {
    fn default() -> Self {
        Self {
            system_name: "unknown".to_string(),
            vendor_id: 0,
            max_layers: 0,
            orientation_tracking: false,
            position_tracking: false,
            recommended_width: 1920,
            recommended_height: 1080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_states() {
        assert!(!VrSessionState::Idle.is_running());
        assert!(!VrSessionState::Ready.is_running());
        assert!(VrSessionState::Synchronized.is_running());
        assert!(VrSessionState::Visible.is_running());
        assert!(VrSessionState::Focused.is_running());
        assert!(!VrSessionState::Stopping.is_running());
    }

    #[test]
    fn options_default_to_desktop() {
        let opts = VrOptions::desktop();
        assert!(!opts.enabled && !opts.submit_depth && !opts.doublewide);
    }
}
