use liminal_common::ViewerPose;
use liminal_input::{FirstPersonViewer, InputState};

/// What the manipulator needs to know about the current frame.
pub trait FrameSource {
    /// True only on the frame the grab control goes from released to pressed.
    fn acquisition_edge(&self) -> bool;

    fn viewer_pose(&self) -> ViewerPose;
}

/// A frame described directly, for hosts that track input themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub acquisition_edge: bool,
    pub viewer: ViewerPose,
}

impl FrameInput {
    pub fn look(viewer: ViewerPose) -> Self {
        Self {
            acquisition_edge: false,
            viewer,
        }
    }

    pub fn grab(viewer: ViewerPose) -> Self {
        Self {
            acquisition_edge: true,
            viewer,
        }
    }
}

impl FrameSource for FrameInput {
    fn acquisition_edge(&self) -> bool {
        self.acquisition_edge
    }

    fn viewer_pose(&self) -> ViewerPose {
        self.viewer
    }
}

/// A frame read from the input provider and the first-person viewer.
///
/// The fire control doubles as the grab toggle.
#[derive(Debug, Clone, Copy)]
pub struct PlayerFrame<'a> {
    pub input: &'a InputState,
    pub viewer: &'a FirstPersonViewer,
}

impl FrameSource for PlayerFrame<'_> {
    fn acquisition_edge(&self) -> bool {
        self.input.fire_down()
    }

    fn viewer_pose(&self) -> ViewerPose {
        self.viewer.pose()
    }
}
