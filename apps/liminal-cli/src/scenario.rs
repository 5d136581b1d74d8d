//! Scripted scenarios: a scene, a starting viewer and a list of input frames.

use anyhow::Context;
use glam::Vec3;
use liminal_common::{EntityId, Layer, Transform, ViewerPose};
use liminal_ecs::{Collider, RigidBody};
use liminal_input::{Button, FirstPersonViewer, InputConfig, InputState, RawInput};
use liminal_kernel::{ObjectBuilder, SceneError, World};
use liminal_manipulate::{
    DepthRescaleManipulator, FrameReport, InputOutcome, ManipulatorConfig, PlayerFrame,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_scale() -> f32 {
    1.0
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub manipulator: ManipulatorConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub viewer: ViewerPose,
    /// Seconds per frame.
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub objects: Vec<ObjectSpec>,
    pub frames: Vec<FrameSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub collider: Collider,
    #[serde(default)]
    pub layer: Layer,
    /// Shorthand for `layer: 1`.
    #[serde(default)]
    pub targetable: bool,
    #[serde(default)]
    pub rigid_body: Option<RigidBody>,
}

/// One scripted frame of raw input, optionally repeated.
///
/// Input keys sit inline, so unknown keys are collected in `unknown` and
/// rejected by [`Scenario::parse`].
#[derive(Debug, Clone, Deserialize)]
pub struct FrameSpec {
    #[serde(flatten)]
    pub raw: RawInput,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
    /// Teleport the viewer before input is applied.
    #[serde(default)]
    pub viewer: Option<ViewerPose>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            raw: RawInput::default(),
            unknown: BTreeMap::new(),
            viewer: None,
            repeat: default_repeat(),
        }
    }
}

/// What happened on one simulated frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameLine {
    pub frame: u64,
    pub report: FrameReport,
    pub viewer: ViewerPose,
    /// The object the manipulator is holding, or just let go of.
    pub object: Option<ObjectState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectState {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
}

impl std::fmt::Display for FrameLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame {:>4}: ", self.frame)?;
        match self.report.input {
            InputOutcome::None => {}
            InputOutcome::Acquired(id) => write!(f, "grab {id} ")?,
            InputOutcome::Released(id) => write!(f, "drop {id} ")?,
            InputOutcome::NoTarget => write!(f, "grab missed ")?,
            InputOutcome::TooClose(id) => write!(f, "grab refused {id} ")?,
        }
        match &self.object {
            Some(o) => write!(
                f,
                "{} pos=({:.3}, {:.3}, {:.3}) scale={:.3}",
                o.name, o.position.x, o.position.y, o.position.z, o.scale.x
            ),
            None => write!(f, "idle"),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_yaml::from_str(text)?;
        scenario.manipulator.validate()?;
        anyhow::ensure!(scenario.dt > 0.0, "dt must be positive");
        for (i, frame) in scenario.frames.iter().enumerate() {
            if let Some(key) = frame.unknown.keys().next() {
                anyhow::bail!("frame {i}: unknown field `{key}`");
            }
        }
        Ok(scenario)
    }

    /// A prop five units ahead and a wall at `far`, grabbed on the first frame.
    pub fn demo(far: f32) -> Self {
        Self {
            manipulator: ManipulatorConfig::default(),
            input: InputConfig::default(),
            viewer: ViewerPose::new(Vec3::ZERO, Vec3::Z),
            dt: default_dt(),
            objects: vec![
                ObjectSpec {
                    name: "cube".into(),
                    position: Vec3::new(0.0, 0.0, 5.0),
                    scale: 1.0,
                    collider: Collider::default(),
                    layer: Layer::DEFAULT,
                    targetable: true,
                    rigid_body: Some(RigidBody::default()),
                },
                ObjectSpec {
                    name: "wall".into(),
                    position: Vec3::new(0.0, 0.0, far + 0.5),
                    scale: 1.0,
                    collider: Collider::Box {
                        half_extents: Vec3::new(10.0, 10.0, 0.5),
                    },
                    layer: Layer::DEFAULT,
                    targetable: false,
                    rigid_body: None,
                },
            ],
            frames: vec![
                FrameSpec {
                    raw: RawInput::default().with_button(Button::Fire),
                    ..FrameSpec::default()
                },
                FrameSpec {
                    repeat: 2,
                    ..FrameSpec::default()
                },
            ],
        }
    }

    pub fn build_world(&self) -> Result<World, SceneError> {
        let mut world = World::new();
        for spec in &self.objects {
            let transform = Transform::from_position(spec.position).with_uniform_scale(spec.scale);
            let mut builder = ObjectBuilder::new(transform)
                .name(spec.name.clone())
                .collider(spec.collider)
                .layer(spec.layer);
            if spec.targetable {
                builder = builder.targetable();
            }
            if let Some(body) = spec.rigid_body {
                builder = builder.rigid_body(body);
            }
            builder
                .spawn_checked(&mut world, self.manipulator.targetable_mask)
                .inspect_err(|_| {
                    tracing::error!(object = %spec.name, "object rejected");
                })?;
        }
        Ok(world)
    }

    /// Simulate every frame in order, the way a host loop would.
    pub fn run(&self) -> anyhow::Result<Vec<FrameLine>> {
        let mut world = self.build_world().context("building scene")?;
        let mut input = InputState::new(self.input.clone());
        let mut viewer = FirstPersonViewer::from_pose(self.viewer);
        let mut manipulator = DepthRescaleManipulator::try_new(self.manipulator.clone())?;
        let mut lines = Vec::new();

        for spec in &self.frames {
            for _ in 0..spec.repeat {
                input.begin_frame(spec.raw.clone());
                if let Some(pose) = spec.viewer {
                    viewer.position = pose.position;
                    viewer.look_along(pose.forward);
                }
                viewer.apply(&input, self.dt);

                let frame = PlayerFrame {
                    input: &input,
                    viewer: &viewer,
                };
                let report = manipulator
                    .update(&frame, &mut world)
                    .with_context(|| format!("frame {}", world.tick()))?;
                input.end_frame();

                let tracked = match report.input {
                    InputOutcome::Released(id) => Some(id),
                    _ => manipulator.target(),
                };
                lines.push(FrameLine {
                    frame: world.tick(),
                    report,
                    viewer: viewer.pose(),
                    object: tracked.and_then(|id| object_state(&world, id)),
                });
                world.step();
            }
        }
        Ok(lines)
    }
}

fn object_state(world: &World, id: EntityId) -> Option<ObjectState> {
    let data = world.get(id)?;
    let name = world
        .components()
        .get_name(id)
        .map(|n| n.0.clone())
        .unwrap_or_else(|| id.to_string());
    Some(ObjectState {
        name,
        position: data.transform.position,
        scale: data.transform.scale,
    })
}
