//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. The held set is what the locomotion controller reads,
//!   via an explicit [`KeySet`] snapshot taken once per frame.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened, cleared by `end_frame()`. The host uses these
//!   for one-shot actions such as flipping the run toggle.
//!
//! Keys are named with lowercase strings (`"w"`, `"arrowup"`, `"shift"`).
//! Unknown names are ignored rather than treated as errors.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    #[serde(rename = "w")]
    W,
    #[serde(rename = "a")]
    A,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "d")]
    D,
    #[serde(rename = "arrowup")]
    Up,
    #[serde(rename = "arrowdown")]
    Down,
    #[serde(rename = "arrowleft")]
    Left,
    #[serde(rename = "arrowright")]
    Right,
    #[serde(rename = "shift")]
    Shift,
    #[serde(rename = "space")]
    Space,
    #[serde(rename = "escape")]
    Escape,
}

const KEY_NAMES: &[(Key, &str)] = &[
    (Key::W, "w"),
    (Key::A, "a"),
    (Key::S, "s"),
    (Key::D, "d"),
    (Key::Up, "arrowup"),
    (Key::Down, "arrowdown"),
    (Key::Left, "arrowleft"),
    (Key::Right, "arrowright"),
    (Key::Shift, "shift"),
    (Key::Space, "space"),
    (Key::Escape, "escape"),
];

impl Key {
    /// Every key the engine knows about, in table order.
    pub const ALL: &'static [Key] = &[
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Shift,
        Key::Space,
        Key::Escape,
    ];

    /// Look up a key by its lowercase name. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Key> {
        let lowered = name.trim().to_ascii_lowercase();
        KEY_NAMES
            .iter()
            .find(|(_, n)| *n == lowered)
            .map(|&(key, _)| key)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::W => "w",
            Self::A => "a",
            Self::S => "s",
            Self::D => "d",
            Self::Up => "arrowup",
            Self::Down => "arrowdown",
            Self::Left => "arrowleft",
            Self::Right => "arrowright",
            Self::Shift => "shift",
            Self::Space => "space",
            Self::Escape => "escape",
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable snapshot of the keys held during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: HashSet<Key>,
}

impl KeySet {
    /// Build a snapshot from key names, silently skipping unrecognized ones.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| Key::from_name(name.as_ref()))
            .collect()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn contains_any(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.keys.contains(k))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Name-based variant of `key_down` for hosts that receive key strings.
    /// Returns false for unrecognized names.
    pub fn key_down_named(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.key_down(key);
                true
            }
            None => false,
        }
    }

    pub fn key_up_named(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.key_up(key);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn snapshot(&self) -> KeySet {
        self.held.iter().copied().collect()
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
