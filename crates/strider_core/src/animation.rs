//! Named animation clips and a weight-based mixer with cross-fading.
//!
//! The mixer never samples poses itself; it tracks, per registered clip, the
//! local playback time and the blend weight that a skinning backend would use.
//! Weights always sum to 1: a cross-fade linearly interpolates every clip from
//! its weight at fade start toward a one-hot target, so restarting a fade
//! mid-flight begins from the current blend with no discontinuity.

use std::collections::HashMap;

/// Index of a clip inside a [`ClipRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(usize);

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length of one cycle in seconds.
    pub duration: f32,
    pub looping: bool,
}

/// Immutable-after-construction mapping from clip name to clip.
#[derive(Debug, Clone, Default)]
pub struct ClipRegistry {
    clips: Vec<AnimationClip>,
    by_name: HashMap<String, ClipId>,
}

impl ClipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip. Fails on duplicate names, empty names, or a non-positive duration.
    pub fn register(&mut self, name: &str, duration: f32, looping: bool) -> Result<ClipId, String> {
        if name.is_empty() {
            return Err("Clip registration failed: name is empty".to_string());
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(format!(
                "Clip registration failed: clip '{}' has invalid duration {}",
                name, duration
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(format!(
                "Clip registration failed: clip '{}' is already registered",
                name
            ));
        }

        let id = ClipId(self.clips.len());
        self.clips.push(AnimationClip {
            name: name.to_string(),
            duration,
            looping,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<ClipId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: ClipId) -> &str {
        &self.clips[id.0].name
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClipId> {
        (0..self.clips.len()).map(ClipId)
    }
}

/// Runtime state for one clip inside the mixer.
#[derive(Debug, Clone, Copy, Default)]
struct ActionState {
    time: f32,
    weight: f32,
    fade_from: f32,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    target: ClipId,
    duration: f32,
    elapsed: f32,
}

pub struct AnimationMixer {
    registry: ClipRegistry,
    actions: Vec<ActionState>,
    fade: Option<Fade>,
}

impl AnimationMixer {
    /// Create a mixer with every clip at zero weight. Call `play` to seed one.
    pub fn new(registry: ClipRegistry) -> Self {
        let actions = vec![ActionState::default(); registry.len()];
        Self {
            registry,
            actions,
            fade: None,
        }
    }

    pub fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    /// Snap to `clip` at full weight, restarting it and cancelling any fade.
    pub fn play(&mut self, clip: ClipId) {
        for (i, action) in self.actions.iter_mut().enumerate() {
            action.weight = if i == clip.0 { 1.0 } else { 0.0 };
            action.fade_from = action.weight;
        }
        self.actions[clip.0].time = 0.0;
        self.fade = None;
    }

    /// Start blending toward `clip` over `duration` seconds.
    ///
    /// Any fade already in flight is replaced; the new one starts from the
    /// weights as they are right now. A clip entering from zero weight is
    /// restarted at time 0.
    pub fn cross_fade_to(&mut self, clip: ClipId, duration: f32) {
        if !(duration.is_finite() && duration > 0.0) {
            log::warn!(
                "Cross-fade to '{}' with invalid duration {}; snapping instead",
                self.registry.name(clip),
                duration
            );
            let time = self.actions[clip.0].time;
            self.play(clip);
            self.actions[clip.0].time = time;
            return;
        }

        if self.actions[clip.0].weight <= 0.0 {
            self.actions[clip.0].time = 0.0;
        }
        for action in &mut self.actions {
            action.fade_from = action.weight;
        }
        self.fade = Some(Fade {
            target: clip,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advance playback time of every weighted clip and progress the active fade.
    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        for (i, action) in self.actions.iter_mut().enumerate() {
            if action.weight <= 0.0 {
                continue;
            }
            let clip = &self.registry.clips[i];
            action.time += dt;
            if clip.looping {
                action.time = action.time.rem_euclid(clip.duration);
            } else {
                action.time = action.time.min(clip.duration);
            }
        }

        let Some(mut fade) = self.fade else {
            return;
        };
        fade.elapsed += dt;
        let t = (fade.elapsed / fade.duration).min(1.0);

        if t >= 1.0 {
            for (i, action) in self.actions.iter_mut().enumerate() {
                action.weight = if i == fade.target.0 { 1.0 } else { 0.0 };
                action.fade_from = action.weight;
            }
            self.fade = None;
            return;
        }

        for (i, action) in self.actions.iter_mut().enumerate() {
            let goal = if i == fade.target.0 { 1.0 } else { 0.0 };
            action.weight = action.fade_from + (goal - action.fade_from) * t;
        }
        self.fade = Some(fade);
    }

    pub fn weight(&self, clip: ClipId) -> f32 {
        self.actions[clip.0].weight
    }

    pub fn time(&self, clip: ClipId) -> f32 {
        self.actions[clip.0].time
    }

    pub fn total_weight(&self) -> f32 {
        self.actions.iter().map(|a| a.weight).sum()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// The clip currently being faded in, if a fade is active.
    pub fn fade_target(&self) -> Option<ClipId> {
        self.fade.map(|f| f.target)
    }

    /// The clip playing alone at full weight, if the blend has settled.
    pub fn settled_clip(&self) -> Option<ClipId> {
        if self.fade.is_some() {
            return None;
        }
        self.registry.ids().find(|&id| self.actions[id.0].weight >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn registry() -> (ClipRegistry, ClipId, ClipId, ClipId) {
        let mut reg = ClipRegistry::new();
        let idle = reg.register("Idle", 2.0, true).expect("idle");
        let walk = reg.register("Walk", 1.0, true).expect("walk");
        let run = reg.register("Run", 0.8, true).expect("run");
        (reg, idle, walk, run)
    }

    #[test]
    fn register_rejects_duplicates_and_bad_durations() {
        let (mut reg, _, _, _) = registry();
        let err = reg.register("Idle", 1.0, true).expect_err("duplicate");
        assert!(err.contains("already registered"));
        let err = reg.register("Jump", 0.0, false).expect_err("zero duration");
        assert!(err.contains("invalid duration"));
        let err = reg.register("", 1.0, false).expect_err("empty name");
        assert!(err.contains("name is empty"));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn lookup_by_name() {
        let (reg, idle, _, run) = registry();
        assert_eq!(reg.get("Idle"), Some(idle));
        assert_eq!(reg.name(run), "Run");
        assert!(reg.get("Swim").is_none());
    }

    #[test]
    fn play_seeds_single_full_weight_clip() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        assert_eq!(mixer.total_weight(), 0.0);
        mixer.play(idle);
        assert_eq!(mixer.weight(idle), 1.0);
        assert_eq!(mixer.weight(walk), 0.0);
        assert_eq!(mixer.settled_clip(), Some(idle));
    }

    #[test]
    fn cross_fade_weights_sum_to_one_throughout() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.cross_fade_to(walk, 0.2);

        for _ in 0..10 {
            mixer.update(0.03);
            assert!((mixer.total_weight() - 1.0).abs() < EPSILON);
        }
        assert!(!mixer.is_fading());
        assert_eq!(mixer.weight(walk), 1.0);
        assert_eq!(mixer.weight(idle), 0.0);
    }

    #[test]
    fn halfway_through_fade_weights_are_even() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.cross_fade_to(walk, 0.2);
        mixer.update(0.1);
        assert!((mixer.weight(idle) - 0.5).abs() < EPSILON);
        assert!((mixer.weight(walk) - 0.5).abs() < EPSILON);
        assert_eq!(mixer.fade_target(), Some(walk));
    }

    #[test]
    fn restarted_fade_starts_from_current_blend() {
        let (reg, idle, walk, run) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.cross_fade_to(walk, 0.2);
        mixer.update(0.05);
        let idle_before = mixer.weight(idle);
        let walk_before = mixer.weight(walk);

        mixer.cross_fade_to(run, 0.2);
        // Starting a fade does not move any weight by itself.
        assert_eq!(mixer.weight(idle), idle_before);
        assert_eq!(mixer.weight(walk), walk_before);
        assert_eq!(mixer.weight(run), 0.0);

        mixer.update(0.1);
        assert!((mixer.weight(idle) - idle_before * 0.5).abs() < EPSILON);
        assert!((mixer.weight(walk) - walk_before * 0.5).abs() < EPSILON);
        assert!((mixer.weight(run) - 0.5).abs() < EPSILON);
        assert!((mixer.total_weight() - 1.0).abs() < EPSILON);

        mixer.update(0.2);
        assert_eq!(mixer.settled_clip(), Some(run));
    }

    #[test]
    fn fade_back_to_partially_weighted_clip_keeps_its_time() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.update(0.5);
        mixer.cross_fade_to(walk, 0.2);
        mixer.update(0.1);
        let idle_time = mixer.time(idle);
        mixer.cross_fade_to(idle, 0.2);
        assert_eq!(mixer.time(idle), idle_time);
    }

    #[test]
    fn clip_entering_from_zero_weight_restarts() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(walk);
        mixer.update(0.4);
        mixer.cross_fade_to(idle, 0.2);
        mixer.update(0.3);
        assert_eq!(mixer.weight(walk), 0.0);
        mixer.cross_fade_to(walk, 0.2);
        assert_eq!(mixer.time(walk), 0.0);
    }

    #[test]
    fn looping_time_wraps_and_one_shot_clamps() {
        let mut reg = ClipRegistry::new();
        let loop_clip = reg.register("Walk", 1.0, true).expect("walk");
        let once = reg.register("Wave", 1.0, false).expect("wave");
        let mut mixer = AnimationMixer::new(reg);

        mixer.play(loop_clip);
        mixer.update(1.25);
        assert!((mixer.time(loop_clip) - 0.25).abs() < EPSILON);

        mixer.play(once);
        mixer.update(1.25);
        assert_eq!(mixer.time(once), 1.0);
    }

    #[test]
    fn zero_and_invalid_dt_do_not_advance() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.cross_fade_to(walk, 0.2);
        mixer.update(0.0);
        mixer.update(-1.0);
        mixer.update(f32::NAN);
        assert_eq!(mixer.weight(idle), 1.0);
        assert_eq!(mixer.time(idle), 0.0);
        assert!(mixer.is_fading());
    }

    #[test]
    fn invalid_fade_duration_snaps() {
        let (reg, idle, walk, _) = registry();
        let mut mixer = AnimationMixer::new(reg);
        mixer.play(idle);
        mixer.cross_fade_to(walk, 0.0);
        assert_eq!(mixer.settled_clip(), Some(walk));
    }
}
