use glam::Vec4;
use smallvec::SmallVec;

use super::types::{Action, MAX_COLOR_ATTACHMENTS};
use crate::errors::{GfxError, Result};
use crate::handle::ImageHandle;

// ============================================================================
// Pass Descriptor
// ============================================================================

/// One render target of an offscreen pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentDesc {
    pub image: ImageHandle,
    pub mip_level: u32,
    /// Cube face, array layer or 3D slice
    pub slice: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PassDesc<'a> {
    pub color_attachments: SmallVec<[AttachmentDesc; MAX_COLOR_ATTACHMENTS]>,
    pub depth_stencil_attachment: Option<AttachmentDesc>,
    pub label: Option<&'a str>,
}

impl PassDesc<'_> {
    pub fn validate(&self) -> Result<()> {
        if self.color_attachments.is_empty() {
            return Err(GfxError::InvalidDescriptor("pass needs at least one color attachment".into()));
        }
        if self.color_attachments.len() > MAX_COLOR_ATTACHMENTS {
            return Err(GfxError::InvalidDescriptor(format!(
                "pass has {} color attachments (max {MAX_COLOR_ATTACHMENTS})",
                self.color_attachments.len()
            )));
        }
        Ok(())
    }

    /// Every attachment, color first and depth-stencil last.
    pub fn attachments(&self) -> impl Iterator<Item = &AttachmentDesc> {
        self.color_attachments.iter().chain(self.depth_stencil_attachment.iter())
    }
}

/// The part of a pass description kept after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassInfo {
    pub color_attachments: SmallVec<[AttachmentDesc; MAX_COLOR_ATTACHMENTS]>,
    pub depth_stencil_attachment: Option<AttachmentDesc>,
}

impl From<&PassDesc<'_>> for PassInfo {
    fn from(desc: &PassDesc<'_>) -> Self {
        Self {
            color_attachments: desc.color_attachments.clone(),
            depth_stencil_attachment: desc.depth_stencil_attachment,
        }
    }
}

// ============================================================================
// Pass Action
// ============================================================================

pub const DEFAULT_CLEAR_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
pub const DEFAULT_CLEAR_DEPTH: f32 = 1.0;
pub const DEFAULT_CLEAR_STENCIL: u8 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorAction {
    pub action: Action,
    pub value: Vec4,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DepthAction {
    pub action: Action,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StencilAction {
    pub action: Action,
    pub value: u8,
}

/// What to do with each attachment when a pass begins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassAction {
    pub colors: [ColorAction; MAX_COLOR_ATTACHMENTS],
    pub depth: DepthAction,
    pub stencil: StencilAction,
}

impl PassAction {
    /// Clears every color attachment to `color`.
    #[must_use]
    pub fn clear(color: Vec4) -> Self {
        let mut action = Self::default();
        for c in &mut action.colors {
            *c = ColorAction {
                action: Action::Clear,
                value: color,
            };
        }
        action
    }

    /// Replaces unset actions with clears to the default values.
    #[must_use]
    pub fn resolved(&self) -> Self {
        let mut action = *self;
        for c in &mut action.colors {
            if c.action == Action::Default {
                c.action = Action::Clear;
                c.value = DEFAULT_CLEAR_COLOR;
            }
        }
        if action.depth.action == Action::Default {
            action.depth.action = Action::Clear;
            action.depth.value = DEFAULT_CLEAR_DEPTH;
        }
        if action.stencil.action == Action::Default {
            action.stencil.action = Action::Clear;
            action.stencil.value = DEFAULT_CLEAR_STENCIL;
        }
        action
    }
}
