// Simple particle struct to keep track of position, velocity, size and opacity.
// Radius and opacity are fixed at creation, velocity only ever changes sign.

use crate::field::FieldConfig;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, opacity: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            opacity,
        }
    }

    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        config: &FieldConfig,
    ) -> Particle {
        let pos_x = sample(rng, 0.0, width);
        let pos_y = sample(rng, 0.0, height);
        let radius = sample(rng, config.min_radius, config.max_radius);
        let vel_x = sample(rng, -config.max_speed, config.max_speed);
        let vel_y = sample(rng, -config.max_speed, config.max_speed);
        let opacity = sample(rng, config.min_opacity, config.max_opacity);
        Particle::new([pos_x, pos_y], [vel_x, vel_y], radius, opacity)
    }

    // One frame of movement. An axis that ends up outside [0, extent] gets its
    // velocity reversed, the position itself is left where it landed.
    pub fn step(&mut self, width: f64, height: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        if self.pos[0] > width || self.pos[0] < 0.0 {
            self.vel[0] = -self.vel[0];
        }
        if self.pos[1] > height || self.pos[1] < 0.0 {
            self.vel[1] = -self.vel[1];
        }
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        glm::distance(
            &glm::vec2(self.pos[0], self.pos[1]),
            &glm::vec2(other.pos[0], other.pos[1]),
        )
    }
}

// Uniform over [low, high), collapsing to `low` for an empty range so a
// zero-sized canvas doesn't trip the sampler
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low, high)
    } else {
        low
    }
}
