//! OpenXR runtime glue (behind the `vr` feature).
//!
//! Owns the entry/instance/system handles and the session state machine.
//! Runtime discovery fills in the HMD info and the swapchain layout for
//! the requested options; the GL-context-owning render path creates the
//! actual session and swapchains from that layout, then reports frame
//! phases back into `FrameTiming` and depth pairs into `DepthPairings`.

use openxr as xr;

use super::frame_timing::FrameTiming;
use super::swapchain::{DepthPairings, SwapchainLayout};
use super::{HmdInfo, VrOptions, VrSessionState};

/// Live connection to the OpenXR runtime.
pub struct VrSession {
    options: VrOptions,
    state: VrSessionState,
    hmd_info: HmdInfo,
    frame_timing: FrameTiming,
    layout: Option<SwapchainLayout>,
    depth_pairings: DepthPairings,

    entry: Option<xr::Entry>,
    instance: Option<xr::Instance>,
    system: Option<xr::SystemId>,
    event_buffer: xr::EventDataBuffer,
}

impl VrSession {
    /// Whether this build can talk to a VR runtime.
    pub const fn available() -> bool {
        true
    }

    pub fn new(options: VrOptions) -> Self {
        Self {
            options,
            state: VrSessionState::Idle,
            hmd_info: HmdInfo::default(),
            frame_timing: FrameTiming::default(),
            layout: None,
            depth_pairings: DepthPairings::new(),
            entry: None,
            instance: None,
            system: None,
            event_buffer: xr::EventDataBuffer::new(),
        }
    }

    pub fn options(&self) -> VrOptions {
        self.options
    }

    pub fn state(&self) -> VrSessionState {
        self.state
    }

    pub fn hmd_info(&self) -> &HmdInfo {
        &self.hmd_info
    }

    pub fn layout(&self) -> Option<SwapchainLayout> {
        self.layout
    }

    pub fn frame_timing(&self) -> &FrameTiming {
        &self.frame_timing
    }

    pub fn frame_timing_mut(&mut self) -> &mut FrameTiming {
        &mut self.frame_timing
    }

    pub fn depth_pairings_mut(&mut self) -> &mut DepthPairings {
        &mut self.depth_pairings
    }

    /// Create the instance, find the HMD, and derive the swapchain layout.
    pub fn init_runtime(&mut self) -> anyhow::Result<()> {
        if !self.options.enabled {
            return Ok(());
        }

        let entry = xr::Entry::linked();

        let available = entry.enumerate_extensions()?;
        if !available.khr_opengl_enable {
            anyhow::bail!("OpenXR runtime lacks the OpenGL graphics extension");
        }
        let mut enabled = xr::ExtensionSet::default();
        enabled.khr_opengl_enable = true;
        if self.options.submit_depth {
            enabled.khr_composition_layer_depth = available.khr_composition_layer_depth;
        }

        let instance = entry.create_instance(
            &xr::ApplicationInfo {
                application_name: "Bean Game",
                application_version: 1,
                engine_name: "bean-game",
                engine_version: 1,
                ..Default::default()
            },
            &enabled,
            &[],
        )?;

        let props = instance.properties()?;
        tracing::info!(
            "OpenXR runtime: {} {:?}",
            props.runtime_name,
            props.runtime_version
        );

        let system = instance.system(xr::FormFactor::HEAD_MOUNTED_DISPLAY)?;
        let system_props = instance.system_properties(system)?;
        let views = instance
            .enumerate_view_configuration_views(system, xr::ViewConfigurationType::PRIMARY_STEREO)?;

        let (eye_width, eye_height) = views
            .first()
            .map(|v| (v.recommended_image_rect_width, v.recommended_image_rect_height))
            .unwrap_or((1920, 1080));

        self.hmd_info = HmdInfo {
            system_name: system_props.system_name.clone(),
            vendor_id: system_props.vendor_id,
            max_layers: system_props.graphics_properties.max_layer_count,
            orientation_tracking: system_props.tracking_properties.orientation_tracking,
            position_tracking: system_props.tracking_properties.position_tracking,
            recommended_width: eye_width,
            recommended_height: eye_height,
        };
        self.layout = Some(SwapchainLayout::new(
            eye_width,
            eye_height,
            self.options.doublewide,
        ));

        tracing::info!(
            "HMD: {} ({}x{} per eye, doublewide={})",
            self.hmd_info.system_name,
            eye_width,
            eye_height,
            self.options.doublewide
        );

        self.entry = Some(entry);
        self.instance = Some(instance);
        self.system = Some(system);
        Ok(())
    }

    /// Drain runtime events and advance the session state machine.
    pub fn poll_events(&mut self) -> anyhow::Result<()> {
        let Some(instance) = self.instance.as_ref() else {
            return Ok(());
        };

        while let Some(event) = instance.poll_event(&mut self.event_buffer)? {
            match event {
                xr::Event::SessionStateChanged(changed) => {
                    let next = map_session_state(changed.state());
                    if next != self.state {
                        tracing::debug!(
                            "session state {} -> {}",
                            self.state.as_str(),
                            next.as_str()
                        );
                        self.state = next;
                    }
                }
                xr::Event::InstanceLossPending(_) => {
                    tracing::warn!("OpenXR instance loss pending");
                    self.state = VrSessionState::LossPending;
                }
                xr::Event::EventsLost(lost) => {
                    tracing::warn!("lost {} OpenXR events", lost.lost_event_count());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn map_session_state(state: xr::SessionState) -> VrSessionState {
    if state == xr::SessionState::READY {
        VrSessionState::Ready
    } else if state == xr::SessionState::SYNCHRONIZED {
        VrSessionState::Synchronized
    } else if state == xr::SessionState::VISIBLE {
        VrSessionState::Visible
    } else if state == xr::SessionState::FOCUSED {
        VrSessionState::Focused
    } else if state == xr::SessionState::STOPPING {
        VrSessionState::Stopping
    } else if state == xr::SessionState::LOSS_PENDING {
        VrSessionState::LossPending
    } else if state == xr::SessionState::EXITING {
        VrSessionState::Exiting
    } else {
        VrSessionState::Idle
    }
}
