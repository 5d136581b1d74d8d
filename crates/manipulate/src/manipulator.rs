use glam::Vec3;
use liminal_common::{EntityId, ViewerPose};
use liminal_kernel::{SceneError, SceneObjects};
use liminal_physics::{QueryFilter, Ray, RayCaster};
use serde::Serialize;

use crate::config::{ClipFallback, ManipulatorConfig};
use crate::frame::FrameSource;

/// Errors the manipulator escalates to the host.
///
/// Ray misses are not errors; they show up in [`FrameReport`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManipulateError {
    /// Every targetable object must carry a rigid body.
    #[error("entity {0} was targeted but has no rigid body")]
    MissingPhysicsBody(EntityId),
    #[error("invalid manipulator config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Scene(SceneError),
}

impl From<SceneError> for ManipulateError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::MissingPhysicsBody(id) => Self::MissingPhysicsBody(id),
            other => Self::Scene(other),
        }
    }
}

/// The object currently held, and the measurements taken when it was grabbed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManipulationSession {
    pub target: EntityId,
    /// Viewer-to-object distance at pickup. Always positive.
    pub original_distance: f32,
    /// The object's uniform scale at pickup.
    pub original_scale: f32,
    /// Scale ratio applied last frame; starts as the object's own scale.
    pub current_scale: Vec3,
    /// Rigid body mode before pickup, restored on release.
    pub was_kinematic: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ManipulatorState {
    #[default]
    Idle,
    Holding(ManipulationSession),
}

/// What the input half of a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum InputOutcome {
    /// No grab edge this frame.
    None,
    Acquired(EntityId),
    Released(EntityId),
    /// The grab ray hit nothing targetable.
    NoTarget,
    /// The grab ray hit an object sitting exactly at the viewer.
    TooClose(EntityId),
}

/// What the resize half of a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResizeOutcome {
    /// Nothing held.
    Idle,
    /// The sightline hit nothing; the object kept last frame's transform.
    RayMiss,
    Resized {
        position: Vec3,
        scale: Vec3,
        /// The clipping guard found geometry right in front of the object.
        clipped: bool,
    },
    /// The held object no longer exists; the session was dropped.
    TargetLost { entity: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub input: InputOutcome,
    pub resize: ResizeOutcome,
}

/// Holds at most one object and keeps its apparent size constant as the
/// viewer's sightline carries it nearer or farther.
#[derive(Debug, Clone, Default)]
pub struct DepthRescaleManipulator {
    config: ManipulatorConfig,
    state: ManipulatorState,
}

impl DepthRescaleManipulator {
    /// Build a manipulator from a config that is already known to be valid.
    pub fn new(config: ManipulatorConfig) -> Self {
        Self {
            config,
            state: ManipulatorState::Idle,
        }
    }

    /// Validate `config` before building the manipulator.
    pub fn try_new(config: ManipulatorConfig) -> Result<Self, ManipulateError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn state(&self) -> &ManipulatorState {
        &self.state
    }

    pub fn session(&self) -> Option<&ManipulationSession> {
        match &self.state {
            ManipulatorState::Holding(session) => Some(session),
            ManipulatorState::Idle => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.session().is_some()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.session().map(|s| s.target)
    }

    /// Run one frame: the grab toggle first, then the resize step.
    pub fn update<W>(
        &mut self,
        frame: &impl FrameSource,
        world: &mut W,
    ) -> Result<FrameReport, ManipulateError>
    where
        W: RayCaster + SceneObjects,
    {
        let _span = tracing::info_span!("manipulator_update").entered();
        let pose = frame.viewer_pose();
        let input = if frame.acquisition_edge() {
            self.toggle(pose, world)?
        } else {
            InputOutcome::None
        };
        let resize = self.resize(pose, world)?;
        Ok(FrameReport { input, resize })
    }

    /// Handle a grab edge: pick up when idle, drop when holding.
    pub fn toggle<W>(&mut self, pose: ViewerPose, world: &mut W) -> Result<InputOutcome, ManipulateError>
    where
        W: RayCaster + SceneObjects,
    {
        if self.is_holding() {
            self.release(world)
        } else {
            self.acquire(pose, world)
        }
    }

    fn acquire<W>(&mut self, pose: ViewerPose, world: &mut W) -> Result<InputOutcome, ManipulateError>
    where
        W: RayCaster + SceneObjects,
    {
        let ray = Ray::new(pose.position, pose.forward);
        let filter = QueryFilter::new(self.config.targetable_mask);
        let Some(hit) = world.raycast(&ray, f32::INFINITY, &filter) else {
            tracing::debug!("grab ray hit nothing targetable");
            return Ok(InputOutcome::NoTarget);
        };

        let target = hit.entity;
        if !world.has_physics_body(target) {
            tracing::error!(entity = %target, "targetable object has no rigid body");
            return Err(ManipulateError::MissingPhysicsBody(target));
        }

        let original_distance = pose.position.distance(world.position(target)?);
        if original_distance <= f32::EPSILON {
            tracing::warn!(entity = %target, "refusing to grab an object at the viewer's position");
            return Ok(InputOutcome::TooClose(target));
        }
        let scale = world.scale(target)?;
        let was_kinematic = world.set_kinematic(target, true)?;

        tracing::debug!(
            entity = %target,
            distance = original_distance,
            scale = scale.x,
            "picked up object"
        );
        self.state = ManipulatorState::Holding(ManipulationSession {
            target,
            original_distance,
            original_scale: scale.x,
            current_scale: scale,
            was_kinematic,
        });
        Ok(InputOutcome::Acquired(target))
    }

    /// Drop the held object, handing it back to the physics step.
    ///
    /// The session ends even when restoring the rigid body fails. A held
    /// object that no longer exists is simply let go.
    pub fn release<W>(&mut self, world: &mut W) -> Result<InputOutcome, ManipulateError>
    where
        W: SceneObjects,
    {
        let ManipulatorState::Holding(session) = std::mem::take(&mut self.state) else {
            return Ok(InputOutcome::None);
        };
        let target = session.target;
        match world.set_kinematic(target, session.was_kinematic) {
            Ok(_) => tracing::debug!(entity = %target, "released object"),
            Err(SceneError::EntityNotFound(_)) => {
                tracing::warn!(entity = %target, "held object vanished before release");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(InputOutcome::Released(target))
    }

    /// Move the held object onto the sightline and rescale it.
    pub fn resize<W>(&mut self, pose: ViewerPose, world: &mut W) -> Result<ResizeOutcome, ManipulateError>
    where
        W: RayCaster + SceneObjects,
    {
        let ManipulatorState::Holding(session) = &mut self.state else {
            return Ok(ResizeOutcome::Idle);
        };
        let target = session.target;

        let previous = match world.position(target) {
            Ok(p) => p,
            Err(SceneError::EntityNotFound(_)) => {
                tracing::warn!(entity = %target, "held object vanished; dropping it");
                self.state = ManipulatorState::Idle;
                return Ok(ResizeOutcome::TargetLost { entity: target });
            }
            Err(e) => return Err(e.into()),
        };

        let ray = Ray::new(pose.position, pose.forward);
        let filter = QueryFilter::new(self.config.occlusion_mask).excluding(target);
        let Some(hit) = world.raycast(&ray, f32::INFINITY, &filter) else {
            tracing::trace!(entity = %target, "sightline hit nothing; keeping transform");
            return Ok(ResizeOutcome::RayMiss);
        };

        let candidate =
            hit.point - ray.direction * self.config.offset_factor * session.current_scale.x;
        world.set_position(target, candidate)?;

        let guard = Ray::new(candidate, ray.direction);
        let clipped = world
            .raycast(&guard, self.config.collision_check_distance, &filter)
            .is_some();
        if clipped {
            let fallback = match self.config.clip_fallback {
                ClipFallback::Reapply => {
                    hit.point - ray.direction * self.config.offset_factor * session.current_scale.x
                }
                ClipFallback::RevertToPrevious => previous,
            };
            tracing::trace!(entity = %target, ?fallback, "clipping guard triggered");
            world.set_position(target, fallback)?;
        }

        let position = world.position(target)?;
        let ratio = pose.position.distance(position) / session.original_distance;
        session.current_scale = Vec3::splat(ratio);
        let scale = session.current_scale * session.original_scale;
        world.set_scale(target, scale)?;

        tracing::trace!(entity = %target, ratio, ?position, "resized held object");
        Ok(ResizeOutcome::Resized {
            position,
            scale,
            clipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameInput;
    use liminal_common::Transform;
    use liminal_ecs::{Collider, RigidBody};
    use liminal_kernel::{ObjectBuilder, World};

    fn cube(world: &mut World, z: f32) -> EntityId {
        ObjectBuilder::new(Transform::from_position(Vec3::new(0.0, 0.0, z)))
            .collider(Collider::default())
            .rigid_body(RigidBody::default())
            .targetable()
            .spawn(world)
            .unwrap()
    }

    fn facing_z() -> ViewerPose {
        ViewerPose::new(Vec3::ZERO, Vec3::Z)
    }

    #[test]
    fn starts_idle() {
        let m = DepthRescaleManipulator::default();
        assert_eq!(m.state(), &ManipulatorState::Idle);
        assert!(m.target().is_none());
    }

    #[test]
    fn toggle_acquires_then_releases() {
        let mut world = World::new();
        let id = cube(&mut world, 5.0);
        let mut m = DepthRescaleManipulator::default();

        assert_eq!(m.toggle(facing_z(), &mut world), Ok(InputOutcome::Acquired(id)));
        let session = m.session().unwrap();
        assert_eq!(session.original_distance, 5.0);
        assert_eq!(session.original_scale, 1.0);
        assert_eq!(session.current_scale, Vec3::ONE);
        assert_eq!(world.is_kinematic(id), Ok(true));

        assert_eq!(m.toggle(facing_z(), &mut world), Ok(InputOutcome::Released(id)));
        assert!(!m.is_holding());
        assert_eq!(world.is_kinematic(id), Ok(false));
    }

    #[test]
    fn resize_when_idle_is_noop() {
        let mut world = World::new();
        cube(&mut world, 5.0);
        world.drain_events();
        let mut m = DepthRescaleManipulator::default();
        assert_eq!(m.resize(facing_z(), &mut world), Ok(ResizeOutcome::Idle));
        assert!(world.events().is_empty());
    }

    #[test]
    fn release_when_idle_reports_nothing() {
        let mut world = World::new();
        let mut m = DepthRescaleManipulator::default();
        assert_eq!(m.release(&mut world), Ok(InputOutcome::None));
    }

    #[test]
    fn scene_missing_body_maps_to_manipulate_error() {
        let id = EntityId::new();
        assert_eq!(
            ManipulateError::from(SceneError::MissingPhysicsBody(id)),
            ManipulateError::MissingPhysicsBody(id)
        );
        assert_eq!(
            ManipulateError::from(SceneError::EntityNotFound(id)),
            ManipulateError::Scene(SceneError::EntityNotFound(id))
        );
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = ManipulatorConfig {
            collision_check_distance: f32::NAN,
            ..ManipulatorConfig::default()
        };
        assert!(matches!(
            DepthRescaleManipulator::try_new(config),
            Err(ManipulateError::InvalidConfig(_))
        ));
        assert!(DepthRescaleManipulator::try_new(ManipulatorConfig::default()).is_ok());
    }

    #[test]
    fn releasing_a_vanished_target_is_not_an_error() {
        let mut world = World::new();
        let id = cube(&mut world, 5.0);
        let mut m = DepthRescaleManipulator::default();
        m.toggle(facing_z(), &mut world).unwrap();

        world.despawn(id);
        let grab = FrameInput::grab(facing_z());
        assert_eq!(
            m.update(&grab, &mut world),
            Ok(FrameReport {
                input: InputOutcome::Released(id),
                resize: ResizeOutcome::Idle,
            })
        );
        assert!(!m.is_holding());
    }

    #[test]
    fn vanished_target_ends_session() {
        let mut world = World::new();
        let id = cube(&mut world, 5.0);
        let mut m = DepthRescaleManipulator::default();
        m.toggle(facing_z(), &mut world).unwrap();

        world.despawn(id);
        assert_eq!(
            m.resize(facing_z(), &mut world),
            Ok(ResizeOutcome::TargetLost { entity: id })
        );
        assert!(!m.is_holding());
    }
}
