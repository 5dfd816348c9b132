use nalgebra::Vector3;
use rand::Rng;
use rayon::prelude::*;

use gestures::GestureSnapshot;

use crate::forces::{HandWell, InteractionMap};
use crate::shapes::ShapeTemplate;
use crate::theme::{Color, SceneTheme};

/// Everything one tick reads besides the field's own state. Rebuilt by the
/// caller every frame; the field never holds onto any of it.
pub struct TickContext<'a> {
    pub theme: &'a SceneTheme,
    pub gestures: &'a GestureSnapshot,
    pub template: &'a ShapeTemplate,
    pub interaction: InteractionMap,
}

/// The live particle cloud. Owns the only position buffer in the system;
/// created once, mutated in place every tick, never resized.
pub struct ParticleField {
    positions: Vec<Vector3<f32>>,
    elapsed: f32,

    // presentation hints for the renderer
    point_size: f32,
    color: Color,
}

impl ParticleField {
    /// Seeds `count` particles uniformly in (-5, 5) on every axis.
    pub fn new<R: Rng + ?Sized>(count: usize, theme: &SceneTheme, rng: &mut R) -> ParticleField {
        let positions = (0..count)
            .map(|_| {
                Vector3::new(
                    (rng.gen::<f32>() - 0.5) * 10.,
                    (rng.gen::<f32>() - 0.5) * 10.,
                    (rng.gen::<f32>() - 0.5) * 10.,
                )
            })
            .collect();

        ParticleField {
            positions,
            elapsed: 0.0,
            point_size: theme.particle_size,
            color: theme.primary_color,
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
    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Effective point size for the renderer, after the pinch scale.
    #[inline]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Render color, eased toward the theme's primary a little every tick.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Advances every particle by one frame: shape blend with oscillatory
    /// noise first, then the per-hand force wells, then the global spin.
    /// Every displacement scales with `dt`, so a zero-length frame leaves
    /// the buffer untouched.
    pub fn tick(&mut self, dt: f32, ctx: &TickContext) {
        debug_assert_eq!(self.positions.len(), ctx.template.len());

        let left = &ctx.gestures.left;
        let right = &ctx.gestures.right;

        let tension = (left.openness + right.openness) * 0.5;
        let max_pinch = left.pinch.max(right.pinch);

        // open hands inflate the whole target shape
        let expansion = 1.0 + tension * 1.5;
        // pinching snaps particles onto the shape faster
        let blend = 2.0 * dt * (1.0 + max_pinch * 2.0);
        let noise_amplitude = 0.05 * (1.0 + tension * 3.0);

        let time = self.elapsed;
        let speed = ctx.theme.speed;

        let wells = [
            HandWell::from_state(left, &ctx.interaction),
            HandWell::from_state(right, &ctx.interaction),
        ];

        let spin = 0.1 * dt * (1.0 + tension);
        let (sin, cos) = spin.sin_cos();

        self.positions
            .par_iter_mut()
            .zip(ctx.template.targets().par_iter())
            .enumerate()
            .for_each(|(i, (position, target))| {
                // per-particle phase offset, not spatial noise
                let noise = (time * speed + i as f32).sin() * noise_amplitude;
                let goal = target * expansion + Vector3::repeat(noise);
                *position += (goal - *position) * blend;

                for well in wells.iter().flatten() {
                    let push = well.displacement(position, dt);
                    *position += push;
                }

                // slow spin about the vertical axis, applied last
                let (x, z) = (position.x, position.z);
                position.x = x * cos - z * sin;
                position.z = x * sin + z * cos;
            });

        self.elapsed += dt;

        self.point_size = ctx.theme.particle_size * (1.0 + max_pinch);
        self.color = self.color.lerp(&ctx.theme.primary_color, 0.1);
    }
}
