//! VR stub - used when the `vr` feature is not enabled.
//!
//! Mirrors the real session's surface so the client compiles without
//! OpenXR; everything is a no-op that reports "not available".

use super::frame_timing::FrameTiming;
use super::swapchain::SwapchainLayout;
use super::{HmdInfo, VrOptions, VrSessionState};

/// No-op VR session for builds without OpenXR.
pub struct VrSession {
    options: VrOptions,
    hmd_info: HmdInfo,
    frame_timing: FrameTiming,
}

impl VrSession {
    /// Whether this build can talk to a VR runtime.
    pub const fn available() -> bool {
        false
    }

    pub fn new(options: VrOptions) -> Self {
        if options.enabled {
            tracing::warn!("VR requested but this build has no 'vr' feature");
        }
        Self {
            options,
            hmd_info: HmdInfo::default(),
            frame_timing: FrameTiming::default(),
        }
    }

    pub fn options(&self) -> VrOptions {
        self.options
    }

    pub fn state(&self) -> VrSessionState {
        VrSessionState::Idle
    }

    pub fn hmd_info(&self) -> &HmdInfo {
        &self.hmd_info
    }

    pub fn layout(&self) -> Option<SwapchainLayout> {
        None
    }

    pub fn frame_timing(&self) -> &FrameTiming {
        &self.frame_timing
    }

    /// Initialize the runtime. No-op without the feature.
    pub fn init_runtime(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Poll runtime events. No-op without the feature.
    pub fn poll_events(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
