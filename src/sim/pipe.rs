//! Pipes and the scrolling pipe field
//!
//! A pipe is a top and bottom collision rectangle separated by a vertical gap.
//! The field spawns them off the right edge on a tick counter, scrolls them
//! left, scores them as the bird passes and evicts them once off-screen.

use rand::Rng;

use super::rect::Rect;
use crate::consts::MIN_GAP_CENTER_SPAN;
use crate::settings::PhysicsTuning;

/// Range the gap centre is drawn from
///
/// Nominally `[gap, height - gap]`. When the viewport is too short for that,
/// the margin shrinks so the range stays non-empty. A non-finite height is
/// treated as an empty viewport.
pub fn gap_center_range(gap: f32, screen_height: f32) -> (f32, f32) {
    let height = if screen_height.is_finite() {
        screen_height.max(0.0)
    } else {
        0.0
    };
    let max_margin = ((height - MIN_GAP_CENTER_SPAN) / 2.0).max(0.0);
    let margin = gap.max(0.0).min(max_margin);
    let lo = margin;
    let hi = (height - margin).max(lo);
    (lo, hi)
}

/// A single pipe pair
#[derive(Debug, Clone)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_center_y: f32,
    pub gap: f32,
    pub width: f32,
    pub screen_height: f32,
    /// Set once the bird has passed
    pub scored: bool,
}

impl Pipe {
    /// Create a pipe at `x` with a random gap position
    pub fn spawn<R: Rng>(rng: &mut R, x: f32, screen_height: f32, tuning: &PhysicsTuning) -> Self {
        let (lo, hi) = gap_center_range(tuning.pipe_gap, screen_height);
        let gap_center_y = if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        };
        Self {
            x,
            gap_center_y,
            gap: tuning.pipe_gap,
            width: tuning.pipe_width,
            screen_height,
            scored: false,
        }
    }

    /// Scroll left by `distance`
    pub fn advance(&mut self, distance: f32) {
        self.x -= distance;
    }

    pub fn is_offscreen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn top_rect(&self) -> Rect {
        let bottom = (self.gap_center_y - self.gap / 2.0).max(0.0);
        Rect::new(self.x, 0.0, self.trailing_edge(), bottom)
    }

    pub fn bottom_rect(&self) -> Rect {
        let top = (self.gap_center_y + self.gap / 2.0).min(self.screen_height);
        Rect::new(self.x, top, self.trailing_edge(), self.screen_height)
    }

    /// (top, bottom) rectangles
    pub fn bounds(&self) -> (Rect, Rect) {
        (self.top_rect(), self.bottom_rect())
    }

    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.top_rect().intersects(rect) || self.bottom_rect().intersects(rect)
    }

    /// True exactly once: the first call after the trailing edge passes `actor_x`
    pub fn check_scored(&mut self, actor_x: f32) -> bool {
        if self.scored || actor_x <= self.trailing_edge() {
            return false;
        }
        self.scored = true;
        true
    }
}

/// Ordered collection of live pipes (spawn order = left to right)
#[derive(Debug, Clone)]
pub struct PipeField {
    pipes: Vec<Pipe>,
    spawn_timer: u32,
    tuning: PhysicsTuning,
}

impl PipeField {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        Self {
            pipes: Vec::new(),
            spawn_timer: 0,
            tuning: *tuning,
        }
    }

    fn spawn_interval(&self) -> u32 {
        self.tuning.spawn_interval.max(1)
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
        self.spawn_timer = 0;
    }

    /// Make the next `advance` spawn a pipe immediately
    pub fn preload_spawn(&mut self) {
        self.spawn_timer = self.spawn_interval() - 1;
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    /// One tick: spawn, scroll, score, evict
    ///
    /// Returns how many pipes were scored this tick.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        actor_x: f32,
        view_width: f32,
        view_height: f32,
        rng: &mut R,
    ) -> u32 {
        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval() {
            let x = view_width + self.tuning.spawn_margin;
            let pipe = Pipe::spawn(rng, x, view_height, &self.tuning);
            log::debug!("Spawned pipe at x={:.0}, gap centre {:.0}", pipe.x, pipe.gap_center_y);
            self.pipes.push(pipe);
            self.spawn_timer = 0;
        }

        let distance = self.tuning.pipe_speed
            * self.tuning.scroll.factor(dt.max(0.0), self.tuning.time_scale);
        for pipe in &mut self.pipes {
            pipe.advance(distance);
        }

        let mut scored = 0;
        for pipe in &mut self.pipes {
            if pipe.check_scored(actor_x) {
                scored += 1;
            }
        }

        self.pipes.retain(|p| !p.is_offscreen());
        scored
    }

    /// First colliding pipe wins; order only affects cost
    pub fn any_collision(&self, rect: &Rect) -> bool {
        self.pipes.iter().any(|p| p.collides_with(rect))
    }

    /// Read-only rectangle pairs for rendering
    pub fn bounds(&self) -> Vec<(Rect, Rect)> {
        self.pipes.iter().map(Pipe::bounds).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Insert a pipe directly (scripted layouts)
    #[cfg(test)]
    pub(crate) fn push(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::ScrollPolicy;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn pipe_at(x: f32, gap_center_y: f32) -> Pipe {
        Pipe {
            x,
            gap_center_y,
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
            screen_height: 800.0,
            scored: false,
        }
    }

    fn per_tick() -> PhysicsTuning {
        PhysicsTuning {
            scroll: ScrollPolicy::PerTick,
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_center_range_nominal() {
        assert_eq!(gap_center_range(400.0, 1000.0), (400.0, 600.0));
    }

    #[test]
    fn test_gap_center_range_clamped() {
        // gap > height / 2 would invert the nominal range
        let (lo, hi) = gap_center_range(400.0, 600.0);
        assert!(lo <= hi);
        assert!(hi - lo >= MIN_GAP_CENTER_SPAN - 1e-4);

        let (lo, hi) = gap_center_range(400.0, 0.5);
        assert_eq!((lo, hi), (0.0, 0.5));

        let (lo, hi) = gap_center_range(400.0, 0.0);
        assert_eq!((lo, hi), (0.0, 0.0));
    }

    #[test]
    fn test_gap_center_range_non_finite_height() {
        assert_eq!(gap_center_range(400.0, f32::INFINITY), (0.0, 0.0));
        assert_eq!(gap_center_range(400.0, f32::NEG_INFINITY), (0.0, 0.0));
        assert_eq!(gap_center_range(400.0, f32::NAN), (0.0, 0.0));

        let mut rng = Pcg32::seed_from_u64(3);
        let pipe = Pipe::spawn(&mut rng, 500.0, f32::INFINITY, &PhysicsTuning::default());
        assert_eq!(pipe.gap_center_y, 0.0);
    }

    #[test]
    fn test_spawn_within_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = PhysicsTuning::default();
        for _ in 0..200 {
            let pipe = Pipe::spawn(&mut rng, 500.0, 1000.0, &tuning);
            assert!((400.0..=600.0).contains(&pipe.gap_center_y));
            assert_eq!(pipe.x, 500.0);
            assert!(!pipe.scored);
        }
        // Degenerate viewport never panics
        let pipe = Pipe::spawn(&mut rng, 500.0, 0.0, &tuning);
        assert_eq!(pipe.gap_center_y, 0.0);
    }

    #[test]
    fn test_rects() {
        let pipe = pipe_at(100.0, 400.0);
        assert_eq!(pipe.top_rect(), Rect::new(100.0, 0.0, 152.0, 200.0));
        assert_eq!(pipe.bottom_rect(), Rect::new(100.0, 600.0, 152.0, 800.0));
    }

    #[test]
    fn test_collision_in_gap_and_on_edges() {
        let pipe = pipe_at(100.0, 400.0);
        // Inside the gap
        assert!(!pipe.collides_with(&Rect::new(110.0, 300.0, 144.0, 324.0)));
        // Overlapping the top pipe
        assert!(pipe.collides_with(&Rect::new(110.0, 190.0, 144.0, 214.0)));
        // Overlapping the bottom pipe
        assert!(pipe.collides_with(&Rect::new(110.0, 590.0, 144.0, 614.0)));
        // Touching the top pipe's lower edge
        assert!(!pipe.collides_with(&Rect::new(110.0, 200.0, 144.0, 224.0)));
        // Touching the pipe's left edge
        assert!(!pipe.collides_with(&Rect::new(66.0, 100.0, 100.0, 124.0)));
    }

    #[test]
    fn test_check_scored_exactly_once() {
        let mut pipe = pipe_at(100.0, 400.0);
        assert!(!pipe.check_scored(152.0));
        assert!(pipe.check_scored(152.5));
        assert!(!pipe.check_scored(152.5));
        assert!(!pipe.check_scored(500.0));
        assert!(pipe.scored);
    }

    #[test]
    fn test_offscreen() {
        assert!(!pipe_at(-52.0, 400.0).is_offscreen());
        assert!(pipe_at(-52.5, 400.0).is_offscreen());
    }

    #[test]
    fn test_spawn_cadence_exact() {
        let tuning = per_tick();
        let mut field = PipeField::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..(SPAWN_INTERVAL - 1) {
            field.advance(DT, 0.0, 400.0, 800.0, &mut rng);
        }
        assert!(field.is_empty());
        field.advance(DT, 0.0, 400.0, 800.0, &mut rng);
        assert_eq!(field.len(), 1);
        assert_eq!(field.spawn_timer(), 0);
        assert_eq!(field.iter().next().unwrap().x, 400.0 + SPAWN_MARGIN - PIPE_SPEED);
    }

    #[test]
    fn test_preload_spawns_on_first_tick() {
        let mut field = PipeField::new(&per_tick());
        let mut rng = Pcg32::seed_from_u64(1);
        field.preload_spawn();
        field.advance(DT, 0.0, 400.0, 800.0, &mut rng);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_scores_then_evicts_same_tick() {
        let mut field = PipeField::new(&per_tick());
        let mut rng = Pcg32::seed_from_u64(1);
        // Trailing edge at 5: one tick of 12 takes it past the bird and off-screen
        field.push(pipe_at(-47.0, 400.0));
        let scored = field.advance(DT, 0.0, 400.0, 800.0, &mut rng);
        assert_eq!(scored, 1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_time_scaled_scroll() {
        let mut field = PipeField::new(&PhysicsTuning::default());
        let mut rng = Pcg32::seed_from_u64(1);
        field.push(pipe_at(300.0, 400.0));
        field.advance(0.5 / TIME_SCALE, 0.0, 400.0, 800.0, &mut rng);
        let x = field.iter().next().unwrap().x;
        assert!((x - (300.0 - PIPE_SPEED * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_any_collision() {
        let mut field = PipeField::new(&per_tick());
        field.push(pipe_at(500.0, 400.0));
        field.push(pipe_at(100.0, 400.0));
        assert!(field.any_collision(&Rect::new(110.0, 10.0, 144.0, 34.0)));
        assert!(!field.any_collision(&Rect::new(110.0, 390.0, 144.0, 414.0)));
        assert_eq!(field.bounds().len(), 2);
    }

    proptest! {
        #[test]
        fn gap_range_non_empty_and_rects_valid(
            gap in 0.0f32..1000.0,
            height in -100.0f32..3000.0,
            seed in any::<u64>(),
        ) {
            let (lo, hi) = gap_center_range(gap, height);
            prop_assert!(lo <= hi);
            prop_assert!(lo >= 0.0);

            let tuning = PhysicsTuning {
                pipe_gap: gap,
                ..Default::default()
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            let pipe = Pipe::spawn(&mut rng, 200.0, height, &tuning);
            prop_assert!(pipe.gap_center_y >= lo && pipe.gap_center_y <= hi);
            prop_assert!(pipe.top_rect().height() >= 0.0);
            prop_assert!(pipe.bottom_rect().height() >= 0.0);
        }
    }
}
