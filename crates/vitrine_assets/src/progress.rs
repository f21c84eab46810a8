use bevy_ecs::resource::Resource;

/// Load progress over the resource manifest. Counts only ever go up,
/// so the derived percentage is non-decreasing; it reaches 100 iff
/// every registered resource completed successfully.
#[derive(Resource, Default, Debug)]
pub struct LoadProgress {
    total: u32,
    completed: u32,
    failed: u32,
}

impl LoadProgress {
    /// Called once per manifest entry when its fetch is spawned.
    pub fn register(&mut self) {
        self.total += 1;
    }

    pub fn complete(&mut self) {
        debug_assert!(self.completed + self.failed < self.total);
        self.completed += 1;
    }

    pub fn fail(&mut self) {
        debug_assert!(self.completed + self.failed < self.total);
        self.failed += 1;
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// All resources resolved successfully (vacuously true for an
    /// empty manifest). A single failure keeps the gate closed forever;
    /// the scene still renders with placeholders.
    pub fn ready(&self) -> bool {
        self.completed == self.total
    }

    /// True once every fetch has resolved one way or the other; the
    /// loading overlay hides at this point even if something failed.
    pub fn settled(&self) -> bool {
        self.completed + self.failed == self.total
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f32 / self.total as f32
    }

    /// Percentage in [0, 100] for the loading readout.
    pub fn percentage(&self) -> f32 {
        self.fraction() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_monotonic_over_completions() {
        let mut p = LoadProgress::default();
        for _ in 0..4 {
            p.register();
        }

        let mut last = p.percentage();
        for _ in 0..4 {
            p.complete();
            assert!(p.percentage() >= last);
            last = p.percentage();
        }
        assert_eq!(last, 100.0);
        assert!(p.ready());
    }

    #[test]
    fn one_failure_pins_percentage_below_100() {
        let mut p = LoadProgress::default();
        for _ in 0..3 {
            p.register();
        }
        p.complete();
        p.fail();
        p.complete();

        assert!(p.settled());
        assert!(!p.ready());
        assert!(p.percentage() < 100.0);
    }

    #[test]
    fn empty_manifest_is_vacuously_ready() {
        let p = LoadProgress::default();
        assert!(p.ready());
        assert!(p.settled());
        assert_eq!(p.percentage(), 100.0);
    }
}
