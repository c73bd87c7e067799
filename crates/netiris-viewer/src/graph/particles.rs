use rand::seq::SliceRandom;
use rand::Rng;

/// One traffic marker. No identity beyond its slot; reset and re-targeted
/// in place.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub speed: f32,
    /// 0..1 along the current journey; wraps to 0 on arrival.
    pub progress: f32,
    pub size: f32,
}

impl Particle {
    /// Linear interpolation toward the target.
    pub fn position(&self) -> (f32, f32) {
        (
            self.x + (self.target_x - self.x) * self.progress,
            self.y + (self.target_y - self.y) * self.progress,
        )
    }

    pub fn alpha(&self, factor: f32) -> f32 {
        (1.0 - self.progress) * factor
    }
}

/// Fixed pool of flow markers. Allocated once per canvas size; stepping
/// never allocates.
pub struct ParticleArena {
    slots: Vec<Particle>,
}

impl ParticleArena {
    pub fn new(count: usize, center: (f32, f32), speed_base: f32, rng: &mut impl Rng) -> Self {
        let slots = (0..count)
            .map(|_| Particle {
                x: center.0,
                y: center.1,
                target_x: 0.0,
                target_y: 0.0,
                speed: speed_base + rng.gen::<f32>() * 0.005,
                progress: rng.gen::<f32>(),
                size: 0.5 + rng.gen::<f32>() * 1.5,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    /// Advance one frame. Arrived slots restart from `center` aimed at a
    /// random entry of `targets`; with no targets on screen the slot keeps
    /// its old endpoints and just loops.
    pub fn step(&mut self, center: (f32, f32), targets: &[(f32, f32)], rng: &mut impl Rng) {
        for p in &mut self.slots {
            if p.progress >= 1.0 {
                p.progress = 0.0;
                if let Some(&(tx, ty)) = targets.choose(rng) {
                    p.x = center.0;
                    p.y = center.1;
                    p.target_x = tx;
                    p.target_y = ty;
                }
            }
            p.progress += p.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pool_size_is_fixed_and_seeded_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let arena = ParticleArena::new(150, (400.0, 300.0), 0.005, &mut rng);
        assert_eq!(arena.len(), 150);
        for p in arena.slots() {
            assert!((0.005..0.010).contains(&p.speed));
            assert!((0.0..1.0).contains(&p.progress));
            assert!((0.5..2.0).contains(&p.size));
            assert_eq!((p.x, p.y), (400.0, 300.0));
        }
    }

    #[test]
    fn arrival_restarts_from_center_toward_a_target() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut arena = ParticleArena::new(8, (100.0, 100.0), 0.005, &mut rng);
        for p in &mut arena.slots {
            p.progress = 1.0;
            p.x = 55.0;
            p.y = 66.0;
        }
        let targets = [(300.0, 0.0)];
        arena.step((100.0, 100.0), &targets, &mut rng);
        for p in arena.slots() {
            assert_eq!((p.x, p.y), (100.0, 100.0));
            assert_eq!((p.target_x, p.target_y), (300.0, 0.0));
            assert!(p.progress > 0.0 && p.progress < 0.02);
        }
    }

    #[test]
    fn empty_target_set_only_loops_progress() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut arena = ParticleArena::new(4, (0.0, 0.0), 0.005, &mut rng);
        for p in &mut arena.slots {
            p.progress = 1.0;
            p.target_x = 42.0;
        }
        arena.step((0.0, 0.0), &[], &mut rng);
        for p in arena.slots() {
            assert_eq!(p.target_x, 42.0);
            assert!(p.progress < 1.0);
        }
    }

    #[test]
    fn interpolation_and_fade() {
        let p = Particle {
            x: 0.0,
            y: 0.0,
            target_x: 100.0,
            target_y: 50.0,
            speed: 0.01,
            progress: 0.5,
            size: 1.0,
        };
        assert_eq!(p.position(), (50.0, 25.0));
        assert!((p.alpha(0.4) - 0.2).abs() < 1e-6);
    }
}
