//! Per-particle physical state
//!
//! A particle is plain data. Its root behavior is stored next to it in the
//! [`Field`](crate::Field), which lets a behavior mutate the particle that
//! owns it without aliasing.

use crate::config::PhysicsConfig;
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// A scalar property that Set/Add/Multiply behaviors can animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Speed,
    Opacity,
    Hue,
}

impl Scalar {
    /// Get the property name used in the DSL
    pub fn name(self) -> &'static str {
        match self {
            Scalar::Speed => "speed",
            Scalar::Opacity => "opacity",
            Scalar::Hue => "hue",
        }
    }
}

/// Simulated particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVec3,
    pub rotation: DQuat,
    pub velocity: DVec3,
    /// Drift along the local z axis per unit of time
    pub speed: f64,
    pub opacity: f64,
    pub hue: f64,
    pub gravity: f64,
    pub mass: f64,
    /// Simulation time this particle has lived
    pub life_time: f64,
    /// Set once the particle's show has finished
    pub closed: bool,
}

impl Particle {
    /// Create a resting particle at `position`
    pub fn at(position: DVec3, physics: &PhysicsConfig) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
            velocity: DVec3::ZERO,
            speed: 0.0,
            opacity: 1.0,
            hue: 0.0,
            gravity: physics.default_gravity,
            mass: physics.default_mass,
            life_time: 0.0,
            closed: false,
        }
    }

    /// Clone the core fields into a fresh child
    ///
    /// Velocity starts at rest, opacity at full and lifetime at zero.
    pub fn spawn_child(&self) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation,
            velocity: DVec3::ZERO,
            speed: self.speed,
            opacity: 1.0,
            hue: self.hue,
            gravity: self.gravity,
            mass: self.mass,
            life_time: 0.0,
            closed: false,
        }
    }

    /// Launch a child at `position` with its own ballistic state
    pub fn launch(&self, position: DVec3, velocity: DVec3, gravity: f64, mass: f64) -> Self {
        Self {
            position,
            velocity,
            gravity,
            mass,
            ..self.spawn_child()
        }
    }

    /// Read an animated scalar
    pub fn get(&self, scalar: Scalar) -> f64 {
        match scalar {
            Scalar::Speed => self.speed,
            Scalar::Opacity => self.opacity,
            Scalar::Hue => self.hue,
        }
    }

    /// Write an animated scalar
    pub fn set(&mut self, scalar: Scalar, value: f64) {
        match scalar {
            Scalar::Speed => self.speed = value,
            Scalar::Opacity => self.opacity = value,
            Scalar::Hue => self.hue = value,
        }
    }

    /// Move by `offset` expressed in the particle's local frame
    pub fn translate(&mut self, offset: DVec3) {
        self.position += self.rotation * offset;
    }

    /// Compose an incremental rotation, given in degrees per axis
    ///
    /// The increment is `Rz * Ry * Rx` and is applied after the current
    /// orientation.
    pub fn rotate(&mut self, degrees: DVec3) {
        let increment = DQuat::from_rotation_z(degrees.z.to_radians())
            * DQuat::from_rotation_y(degrees.y.to_radians())
            * DQuat::from_rotation_x(degrees.x.to_radians());
        self.rotation = (self.rotation * increment).normalize();
    }

    /// Advance the drag and gravity integrator by one fixed sub-step
    pub fn explode(&mut self, physics: &PhysicsConfig) {
        let force = DVec3::new(
            drag(physics.drag, self.velocity.x),
            drag(physics.drag, self.velocity.y),
            drag(physics.drag, self.velocity.z),
        );
        let mut acceleration = force / self.mass;
        acceleration.y += self.gravity;

        self.velocity += acceleration * physics.dt;
        self.position += self.velocity * (physics.dt * physics.scale);
    }

    /// Copy the renderer-facing state
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position,
            rotation: self.rotation,
            opacity: self.opacity,
            hue: self.hue,
            speed: self.speed,
        }
    }
}

/// Velocity-cubed drag on one axis
///
/// Zero velocity yields zero force instead of 0/0.
fn drag(k: f64, v: f64) -> f64 {
    if v == 0.0 {
        return 0.0;
    }
    let force = k * v * v * v / v.abs();
    if force.is_nan() {
        0.0
    } else {
        force
    }
}

/// Read-only copy of what a renderer needs from a particle
///
/// Field slots are recycled, so renderers keep these copies rather than
/// references into the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub position: DVec3,
    pub rotation: DQuat,
    pub opacity: f64,
    pub hue: f64,
    pub speed: f64,
}
