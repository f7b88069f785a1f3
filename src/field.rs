//! The particle field: a fixed-size set of drifting particles and the per-frame
//! update/render pass that draws them plus the faint lines between neighbours.

use crate::color::Color;
use crate::particle::Particle;
use crate::surface::Surface;
use rand::Rng;

/// Tunables for a [`ParticleField`]. Only the defaults are used by the page.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Each velocity component is drawn from `[-max_speed, max_speed)`.
    pub max_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    /// Pairs closer than this get a connective line.
    pub link_distance: f64,
    /// Line alpha at zero distance, fading linearly to 0 at `link_distance`.
    pub link_alpha: f64,
    pub line_width: f64,
    pub color: Color,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: 80,
            max_speed: 0.5,
            min_radius: 1.0,
            max_radius: 4.0,
            min_opacity: 0.2,
            max_opacity: 0.7,
            link_distance: 120.0,
            link_alpha: 0.15,
            line_width: 1.0,
            color: Color::from_u32(0x7cf03dff),
        }
    }
}

/// Alpha of the line joining two particles `distance` apart, or `None` when
/// they are too far apart to be joined.
pub fn connection_alpha(distance: f64, config: &FieldConfig) -> Option<f64> {
    if distance < config.link_distance {
        Some(config.link_alpha * (1.0 - distance / config.link_distance))
    } else {
        None
    }
}

pub struct ParticleField {
    config: FieldConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(
        config: FieldConfig,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> ParticleField {
        let mut field = ParticleField {
            config,
            width,
            height,
            particles: Vec::new(),
        };
        field.init_particles(rng);
        field
    }

    /// Throws away the current particles and spawns a fresh set over the
    /// current surface extent.
    pub fn init_particles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = self.config;
        let (width, height) = (self.width, self.height);
        self.particles = (0..config.particle_count)
            .map(|_| Particle::random(rng, width, height, &config))
            .collect();
    }

    /// New surface extent. Existing particles are discarded rather than
    /// rescaled into the new bounds.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.width = width;
        self.height = height;
        self.init_particles(rng);
    }

    /// Clears the surface, then moves and draws each particle in turn along
    /// with its lines to every later particle. Later particles haven't moved
    /// yet when those lines are drawn. Particles bounce off the surface's
    /// extent as of this frame.
    ///
    /// The pair scan is O(n²) per frame, fine for the default count of 80.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.width = surface.width();
        self.height = surface.height();
        surface.clear();
        let config = self.config;
        for i in 0..self.particles.len() {
            self.particles[i].step(self.width, self.height);
            let p = self.particles[i];
            surface.fill_circle(p.pos[0], p.pos[1], p.radius, config.color, p.opacity);

            for other in &self.particles[i + 1..] {
                if let Some(alpha) = connection_alpha(p.distance_to(other), &config) {
                    surface.stroke_line(p.pos, other.pos, config.line_width, config.color, alpha);
                }
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Draw {
        Clear,
        Circle { at: [f64; 2], radius: f64, alpha: f64 },
        Line { from: [f64; 2], to: [f64; 2], alpha: f64 },
    }

    struct Recorder {
        width: f64,
        height: f64,
        calls: Vec<Draw>,
    }

    impl Recorder {
        fn new(width: f64, height: f64) -> Self {
            Recorder { width, height, calls: Vec::new() }
        }

        fn lines(&self) -> Vec<&Draw> {
            self.calls.iter().filter(|c| matches!(c, Draw::Line { .. })).collect()
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> f64 {
            self.width
        }

        fn height(&self) -> f64 {
            self.height
        }

        fn clear(&mut self) {
            self.calls.push(Draw::Clear);
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, _color: Color, alpha: f64) {
            self.calls.push(Draw::Circle { at: [x, y], radius, alpha });
        }

        fn stroke_line(
            &mut self,
            from: [f64; 2],
            to: [f64; 2],
            _line_width: f64,
            _color: Color,
            alpha: f64,
        ) {
            self.calls.push(Draw::Line { from, to, alpha });
        }
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 2.0, 0.5)
    }

    fn field_with(particles: Vec<Particle>) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(0);
        let mut field = ParticleField::new(FieldConfig::default(), 800.0, 600.0, &mut rng);
        field.set_particles(particles);
        field
    }

    #[test]
    fn alpha_at_zero_distance_is_base_alpha() {
        assert_eq!(connection_alpha(0.0, &FieldConfig::default()), Some(0.15));
    }

    #[test]
    fn alpha_just_inside_threshold_is_tiny() {
        let alpha = connection_alpha(119.999, &FieldConfig::default()).unwrap();
        assert!(alpha > 0.0);
        assert!(alpha < 0.0000013);
    }

    #[test]
    fn no_line_at_or_beyond_threshold() {
        let config = FieldConfig::default();
        assert_eq!(connection_alpha(120.0, &config), None);
        assert_eq!(connection_alpha(500.0, &config), None);
    }

    #[test]
    fn alpha_never_increases_with_distance() {
        let config = FieldConfig::default();
        let mut previous = connection_alpha(0.0, &config).unwrap();
        let mut d = 0.5;
        while d < 120.0 {
            let alpha = connection_alpha(d, &config).unwrap();
            assert!(alpha <= previous);
            previous = alpha;
            d += 0.5;
        }
    }

    #[test]
    fn init_spawns_configured_count_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::new(FieldConfig::default(), 800.0, 600.0, &mut rng);
        assert_eq!(field.len(), 80);
        for p in field.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 800.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 600.0);
        }
    }

    #[test]
    fn reinit_replaces_every_particle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::new(FieldConfig::default(), 800.0, 600.0, &mut rng);
        let before = field.particles().to_vec();
        field.init_particles(&mut rng);
        assert_eq!(field.len(), before.len());
        assert_ne!(field.particles(), &before[..]);
    }

    #[test]
    fn resize_reinitializes_within_new_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::new(FieldConfig::default(), 800.0, 600.0, &mut rng);
        field.resize(400.0, 300.0, &mut rng);
        assert_eq!((field.width(), field.height()), (400.0, 300.0));
        assert_eq!(field.len(), 80);
        for p in field.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 400.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 300.0);
        }
    }

    #[test]
    fn frame_clears_first_and_draws_every_particle() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ParticleField::new(FieldConfig::default(), 800.0, 600.0, &mut rng);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);

        assert_eq!(surface.calls[0], Draw::Clear);
        let clears = surface.calls.iter().filter(|c| **c == Draw::Clear).count();
        assert_eq!(clears, 1);
        let circles = surface
            .calls
            .iter()
            .filter(|c| matches!(c, Draw::Circle { .. }))
            .count();
        assert_eq!(circles, 80);
        assert_eq!(field.len(), 80);
    }

    #[test]
    fn circles_use_particle_radius_and_opacity() {
        let mut field = field_with(vec![Particle::new([5.0, 6.0], [0.5, 0.0], 3.0, 0.4)]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(
            surface.calls,
            vec![
                Draw::Clear,
                Draw::Circle { at: [5.5, 6.0], radius: 3.0, alpha: 0.4 },
            ]
        );
    }

    #[test]
    fn coincident_pair_gets_full_alpha_line() {
        let mut field = field_with(vec![still(100.0, 100.0), still(100.0, 100.0)]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(
            surface.lines(),
            vec![&Draw::Line { from: [100.0, 100.0], to: [100.0, 100.0], alpha: 0.15 }]
        );
    }

    #[test]
    fn distant_pair_gets_no_line() {
        let mut field = field_with(vec![still(0.0, 0.0), still(120.0, 0.0)]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert!(surface.lines().is_empty());
    }

    #[test]
    fn each_close_pair_is_joined_once() {
        // three mutually close particles and one far away: 3 pairs, not 6
        let mut field = field_with(vec![
            still(10.0, 10.0),
            still(20.0, 10.0),
            still(10.0, 20.0),
            still(700.0, 500.0),
        ]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(surface.lines().len(), 3);
    }

    #[test]
    fn full_cluster_draws_every_pair() {
        // worst case for the quadratic pair scan: n(n-1)/2 lines
        let particles = (0..80).map(|i| still(400.0 + (i % 10) as f64, 300.0)).collect();
        let mut field = field_with(particles);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(surface.lines().len(), 80 * 79 / 2);
    }

    #[test]
    fn lines_see_later_particles_before_they_move() {
        let mut field = field_with(vec![
            Particle::new([0.0, 50.0], [0.5, 0.0], 2.0, 0.5),
            Particle::new([10.0, 50.0], [0.5, 0.0], 2.0, 0.5),
        ]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        match surface.lines()[0] {
            Draw::Line { from, to, .. } => {
                assert_eq!(*from, [0.5, 50.0]);
                assert_eq!(*to, [10.0, 50.0]);
            }
            other => panic!("unexpected draw {:?}", other),
        }
        assert_eq!(field.particles()[1].pos, [10.5, 50.0]);
    }

    #[test]
    fn particle_past_edge_is_drawn_off_surface_then_returns() {
        let mut field = field_with(vec![Particle::new([799.75, 300.0], [0.5, 0.0], 2.0, 0.5)]);
        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(surface.calls[1], Draw::Circle { at: [800.25, 300.0], radius: 2.0, alpha: 0.5 });

        let mut surface = Recorder::new(800.0, 600.0);
        field.frame(&mut surface);
        assert_eq!(surface.calls[1], Draw::Circle { at: [799.75, 300.0], radius: 2.0, alpha: 0.5 });
    }

    #[test]
    fn bounces_off_the_surface_it_draws_on() {
        let mut field = field_with(vec![Particle::new([99.75, 50.0], [0.5, 0.0], 2.0, 0.5)]);
        let mut surface = Recorder::new(100.0, 100.0);
        field.frame(&mut surface);
        assert_eq!(field.particles()[0].pos, [100.25, 50.0]);
        assert_eq!(field.particles()[0].vel, [-0.5, 0.0]);
        assert_eq!((field.width(), field.height()), (100.0, 100.0));
    }

    #[test]
    fn many_frames_keep_count_and_speeds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut field = ParticleField::new(FieldConfig::default(), 200.0, 150.0, &mut rng);
        let speeds: Vec<_> = field
            .particles()
            .iter()
            .map(|p| (p.vel[0].abs(), p.vel[1].abs()))
            .collect();
        let mut surface = Recorder::new(200.0, 150.0);
        for _ in 0..500 {
            surface.calls.clear();
            field.frame(&mut surface);
        }
        assert_eq!(field.len(), 80);
        for (p, speed) in field.particles().iter().zip(speeds) {
            assert_eq!((p.vel[0].abs(), p.vel[1].abs()), speed);
            // at most one step outside the surface on either axis
            assert!(p.pos[0] > -0.5 && p.pos[0] < 200.5);
            assert!(p.pos[1] > -0.5 && p.pos[1] < 150.5);
        }
    }
}
