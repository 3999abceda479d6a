//! VR frame lifecycle sequencing.
//!
//! The compositor contract is strict: wait, begin, then for each view
//! acquire -> render -> release, then end with every view released. The
//! sequencer enforces that order so the render path can't submit a frame
//! with a view still acquired or release something it never took.

use thiserror::Error;

use super::swapchain::{EyeRect, SwapchainLayout, VIEW_COUNT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("begin_frame called while a frame is already in flight")]
    AlreadyBegun,

    #[error("operation requires a begun frame")]
    NotBegun,

    #[error("view {0} is not a valid view index")]
    BadView(u32),

    #[error("view {0} is already acquired")]
    AlreadyAcquired(u32),

    #[error("view {0} was not acquired")]
    NotAcquired(u32),

    #[error("end_frame with {0} view(s) still acquired")]
    ViewsStillAcquired(u32),
}

/// Enforces the wait/begin/acquire/release/end call order for one frame at
/// a time.
#[derive(Debug)]
pub struct FrameSequencer {
    layout: SwapchainLayout,
    in_frame: bool,
    acquired: [bool; VIEW_COUNT as usize],
    released: [bool; VIEW_COUNT as usize],
    frames_submitted: u64,
}

impl FrameSequencer {
    pub fn new(layout: SwapchainLayout) -> Self {
        Self {
            layout,
            in_frame: false,
            acquired: [false; VIEW_COUNT as usize],
            released: [false; VIEW_COUNT as usize],
            frames_submitted: 0,
        }
    }

    pub fn layout(&self) -> SwapchainLayout {
        self.layout
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Start a frame (the wait/begin pair).
    pub fn begin_frame(&mut self) -> Result<(), FrameError> {
        if self.in_frame {
            return Err(FrameError::AlreadyBegun);
        }
        self.in_frame = true;
        self.acquired = [false; VIEW_COUNT as usize];
        self.released = [false; VIEW_COUNT as usize];
        Ok(())
    }

    /// Acquire a view for rendering; yields the image rectangle to render
    /// into (the whole image per-eye, or half of the double-wide one).
    pub fn acquire_view(&mut self, view: u32) -> Result<EyeRect, FrameError> {
        if !self.in_frame {
            return Err(FrameError::NotBegun);
        }
        let slot = self.view_slot(view)?;
        if self.acquired[slot] {
            return Err(FrameError::AlreadyAcquired(view));
        }
        self.acquired[slot] = true;
        Ok(self.layout.eye_rect(view))
    }

    /// Release a previously acquired view.
    pub fn release_view(&mut self, view: u32) -> Result<(), FrameError> {
        if !self.in_frame {
            return Err(FrameError::NotBegun);
        }
        let slot = self.view_slot(view)?;
        if !self.acquired[slot] || self.released[slot] {
            return Err(FrameError::NotAcquired(view));
        }
        self.released[slot] = true;
        Ok(())
    }

    /// Submit the frame. Every acquired view must have been released.
    pub fn end_frame(&mut self) -> Result<(), FrameError> {
        if !self.in_frame {
            return Err(FrameError::NotBegun);
        }
        let outstanding = self
            .acquired
            .iter()
            .zip(&self.released)
            .filter(|(a, r)| **a && !**r)
            .count() as u32;
        if outstanding > 0 {
            return Err(FrameError::ViewsStillAcquired(outstanding));
        }
        self.in_frame = false;
        self.frames_submitted += 1;
        Ok(())
    }

    fn view_slot(&self, view: u32) -> Result<usize, FrameError> {
        if view >= VIEW_COUNT {
            return Err(FrameError::BadView(view));
        }
        Ok(view as usize)
    }
}
