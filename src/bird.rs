use crate::config::BirdRules;

/// A controlled bird. x never changes after spawn; y integrates a
/// quadratic-in-time displacement from the last jump.
#[derive(Debug, Clone)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    vel: f64,
    ticks_since_jump: u32,
    jump_ref_y: f64,
    tilt: f64,
    frame_count: u32,
    pose: usize,
}

impl Bird {
    pub fn spawn(rules: &BirdRules) -> Self {
        Self {
            x: rules.spawn_x,
            y: rules.spawn_y,
            vel: 0.0,
            ticks_since_jump: 0,
            jump_ref_y: rules.spawn_y,
            tilt: 0.0,
            frame_count: 0,
            pose: 0,
        }
    }

    /// One tick of kinematics: displacement d = v·t + 1.5·t² with the fall
    /// clamped and an extra boost while climbing, then the arc-and-rotate
    /// tilt update.
    pub fn advance(&mut self, rules: &BirdRules) {
        self.ticks_since_jump += 1;
        let t = f64::from(self.ticks_since_jump);
        let mut d = self.vel * t + 1.5 * t * t;
        if d >= rules.max_drop_per_tick {
            d = rules.max_drop_per_tick;
        }
        if d < 0.0 {
            d += rules.climb_boost;
        }
        self.y += d;

        if d < 0.0 || self.y < self.jump_ref_y + rules.climb_grace {
            if self.tilt < rules.max_tilt_up {
                self.tilt = rules.max_tilt_up;
            }
        } else if self.tilt > rules.max_tilt_down {
            self.tilt = (self.tilt - rules.tilt_rate).max(rules.max_tilt_down);
        }
    }

    /// Fixed upward impulse; the tick counter and reference height reset so
    /// control authority stacks independently of absolute position.
    pub fn jump(&mut self, rules: &BirdRules) {
        self.vel = rules.jump_impulse;
        self.ticks_since_jump = 0;
        self.jump_ref_y = self.y;
    }

    /// Cycle the wing poses 0,1,2,1 on the animation cadence. Near the dive
    /// extreme the wings-folded mid pose overrides the cycle.
    pub fn advance_animation(&mut self, rules: &BirdRules) {
        let period = rules.animation_period;
        self.frame_count += 1;
        self.pose = if self.frame_count < period {
            0
        } else if self.frame_count < period * 2 {
            1
        } else if self.frame_count < period * 3 {
            2
        } else if self.frame_count < period * 4 {
            1
        } else {
            self.frame_count = 0;
            0
        };

        if self.tilt <= rules.dive_pose_tilt {
            self.pose = 1;
            self.frame_count = period * 2;
        }
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn pose(&self) -> usize {
        self.pose
    }

    /// y rounded to the pixel grid, as used for mask offsets.
    pub fn pixel_y(&self) -> i64 {
        self.y.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> BirdRules {
        BirdRules::default()
    }

    #[test]
    fn falls_with_bounded_per_tick_drop() {
        let rules = rules();
        let mut bird = Bird::spawn(&rules);
        let mut last_y = bird.y;
        for _ in 0..50 {
            bird.advance(&rules);
            let d = bird.y - last_y;
            assert!(d > 0.0, "free-falling bird must descend");
            assert!(d <= rules.max_drop_per_tick + 1e-9);
            last_y = bird.y;
        }
    }

    #[test]
    fn tilt_stays_in_bounds_forever() {
        let rules = rules();
        let mut bird = Bird::spawn(&rules);
        for tick in 0..500 {
            if tick % 37 == 0 {
                bird.jump(&rules);
            }
            bird.advance(&rules);
            assert!(
                bird.tilt() >= rules.max_tilt_down && bird.tilt() <= rules.max_tilt_up,
                "tilt {} out of bounds at tick {tick}",
                bird.tilt()
            );
        }
    }

    #[test]
    fn jump_moves_bird_upward() {
        let rules = rules();
        let mut bird = Bird::spawn(&rules);
        bird.jump(&rules);
        let before = bird.y;
        bird.advance(&rules);
        assert!(bird.y < before);
        assert_eq!(bird.tilt(), rules.max_tilt_up);
    }

    #[test]
    fn dive_pose_overrides_cycle() {
        let rules = rules();
        let mut bird = Bird::spawn(&rules);
        // Fall long enough for the tilt to hit the dive extreme.
        for _ in 0..20 {
            bird.advance(&rules);
        }
        assert!(bird.tilt() <= rules.dive_pose_tilt);
        bird.advance_animation(&rules);
        assert_eq!(bird.pose(), 1);
        bird.advance_animation(&rules);
        assert_eq!(bird.pose(), 1, "dive pose must stay pinned");
    }

    #[test]
    fn animation_cycles_through_poses() {
        let rules = rules();
        let mut bird = Bird::spawn(&rules);
        let mut seen = [false; 3];
        for _ in 0..(rules.animation_period * 4) {
            bird.advance_animation(&rules);
            seen[bird.pose()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
