//! Particle storage and per-tick interpolation.
//!
//! Particles are stored as parallel position/target/color arrays so each one
//! can be handed to the renderer as a flat `f32` buffer of length `3 * count`
//! without repacking.

use crate::color::{gradient_color, FIST_RED};
use crate::shape::ShapeSpec;
use crate::state::InteractionState;
use glam::Vec3;
use rand::Rng;

/// A single particle, as read back from the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Vec3,
}

/// Which buffers changed since the renderer last looked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub targets: bool,
    pub colors: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.positions || self.targets || self.colors
    }
}

/// Fixed-size set of particles moving toward sampled targets.
pub struct ParticleField {
    positions: Vec<Vec3>,
    targets: Vec<Vec3>,
    colors: Vec<Vec3>,
    /// Back buffer that `retarget` fills before swapping it in.
    spare_targets: Vec<Vec3>,
    lerp_speed: f32,
    dirty: DirtyFlags,
}

impl ParticleField {
    /// Create `count` particles scattered uniformly in a cube of half-size
    /// `extent`, each initially targeting its own position, colored white.
    pub fn new<R: Rng + ?Sized>(count: usize, extent: f32, lerp_speed: f32, rng: &mut R) -> Self {
        let positions: Vec<Vec3> = (0..count)
            .map(|_| {
                if extent > 0.0 {
                    Vec3::new(
                        rng.gen_range(-extent..extent),
                        rng.gen_range(-extent..extent),
                        rng.gen_range(-extent..extent),
                    )
                } else {
                    Vec3::ZERO
                }
            })
            .collect();

        Self::from_positions(positions, lerp_speed)
    }

    /// Create a field from explicit starting positions.
    pub fn from_positions(positions: Vec<Vec3>, lerp_speed: f32) -> Self {
        let count = positions.len();
        Self {
            targets: positions.clone(),
            colors: vec![Vec3::ONE; count],
            spare_targets: Vec::with_capacity(count),
            positions,
            lerp_speed,
            dirty: DirtyFlags {
                positions: true,
                targets: true,
                colors: true,
            },
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn lerp_speed(&self) -> f32 {
        self.lerp_speed
    }

    /// Resample every particle's target from `spec`.
    ///
    /// The new targets are drawn into a back buffer and swapped in once
    /// complete, so a half-written target set is never visible.
    pub fn retarget<R: Rng + ?Sized>(&mut self, spec: ShapeSpec, rng: &mut R) {
        self.spare_targets.clear();
        self.spare_targets
            .extend((0..self.positions.len()).map(|_| spec.sample(rng)));
        std::mem::swap(&mut self.targets, &mut self.spare_targets);
        self.dirty.targets = true;
    }

    /// Move every particle one step toward its (pinch-scaled) target and
    /// recolor it.
    ///
    /// Colors come from each particle's position before this step's move.
    pub fn advance(&mut self, state: &InteractionState) {
        let scale = state.pinch_scale;
        let lerp = self.lerp_speed;

        for ((position, target), color) in self
            .positions
            .iter_mut()
            .zip(self.targets.iter())
            .zip(self.colors.iter_mut())
        {
            let current = *position;
            *position = current + (*target * scale - current) * lerp;
            *color = if state.is_fist {
                FIST_RED
            } else {
                gradient_color(current.x, state.hue_phase)
            };
        }

        self.dirty.positions = true;
        self.dirty.colors = true;
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            target: self.targets[index],
            color: self.colors[index],
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Targets as `[x0, y0, z0, x1, ...]`.
    pub fn target_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.targets)
    }

    /// Colors as `[r0, g0, b0, r1, ...]`.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Buffers changed since the last call to [`take_dirty`](Self::take_dirty).
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Report and clear the dirty flags.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn test_new_field_targets_own_positions() {
        let field = ParticleField::new(100, 25.0, 0.08, &mut rng());
        assert_eq!(field.len(), 100);
        assert_eq!(field.positions(), field.targets());
        assert!(field.colors().iter().all(|c| *c == Vec3::ONE));
        assert!(field
            .positions()
            .iter()
            .all(|p| p.abs().max_element() <= 25.0));
    }

    #[test]
    fn test_flat_buffers_are_three_per_particle() {
        let field = ParticleField::new(7, 1.0, 0.08, &mut rng());
        assert_eq!(field.position_buffer().len(), 21);
        assert_eq!(field.target_buffer().len(), 21);
        assert_eq!(field.color_buffer().len(), 21);
        assert_eq!(field.position_buffer()[3], field.positions()[1].x);
    }

    #[test]
    fn test_retarget_fills_every_target() {
        let mut field = ParticleField::new(500, 25.0, 0.08, &mut rng());
        field.take_dirty();
        field.retarget(ShapeSpec::Sphere(12.0), &mut rng());
        assert!(field.targets().iter().all(|t| (t.length() - 12.0).abs() < 1e-3));
        assert_eq!(
            field.take_dirty(),
            DirtyFlags {
                targets: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_advance_steps_by_lerp_speed() {
        let mut field = ParticleField::from_positions(vec![Vec3::new(10.0, 0.0, 0.0)], 0.08);
        let mut state = InteractionState::new(Config::default().sphere());
        state.pinch_scale = 1.0;
        field.retarget(ShapeSpec::Collapsed, &mut rng());
        field.advance(&state);
        assert!((field.positions()[0].x - 9.2).abs() < 1e-5);
    }

    #[test]
    fn test_advance_scales_target_by_pinch() {
        let mut field = ParticleField::from_positions(vec![Vec3::ZERO], 0.5);
        field.targets[0] = Vec3::new(2.0, 0.0, 0.0);
        let mut state = InteractionState::new(ShapeSpec::Saturn);
        state.pinch_scale = 2.0;
        for _ in 0..60 {
            field.advance(&state);
        }
        assert!((field.positions()[0] - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_fist_paints_everything_red() {
        let mut field = ParticleField::new(50, 25.0, 0.08, &mut rng());
        let mut state = InteractionState::new(ShapeSpec::Flower);
        state.is_fist = true;
        field.advance(&state);
        assert!(field.colors().iter().all(|c| *c == FIST_RED));
    }

    #[test]
    fn test_color_uses_position_before_move() {
        let start = Vec3::new(4.0, 1.0, -3.0);
        let mut field = ParticleField::from_positions(vec![start], 0.08);
        field.targets[0] = Vec3::new(-20.0, 0.0, 0.0);
        let mut state = InteractionState::new(ShapeSpec::Flower);
        state.hue_phase = 0.3;
        field.advance(&state);
        assert_eq!(field.colors()[0], gradient_color(start.x, 0.3));
        let p = field.particle(0).unwrap();
        assert_eq!(p.color, field.colors()[0]);
        assert!(field.particle(1).is_none());
    }
}
