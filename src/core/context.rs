/// Evaluation context — per-key value stacks, modifier registry, and the
/// random-integer source every expansion draws from.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::operation::Operation;

/// A pure text transform: `(value, params) -> value`.
pub type ModifierFn = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;

/// Source of random indices for `Select` nodes.
///
/// Any `FnMut(usize) -> usize` closure is a source, which is how tests pin
/// selection to a fixed or table-driven sequence.
pub trait RandomSource: Send {
    /// Return an index in `[0, bound)`. `bound` is never zero.
    fn random_int(&mut self, bound: usize) -> usize;
}

impl<F> RandomSource for F
where
    F: FnMut(usize) -> usize + Send,
{
    fn random_int(&mut self, bound: usize) -> usize {
        self(bound)
    }
}

/// Default random source backed by a seeded `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the current system time.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(seed)
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Mutable state an operation tree resolves against.
///
/// Each key owns a stack of operations; the top entry is the current value.
/// Once a key has a value its stack never empties again: popping the last
/// entry is a no-op.
pub struct Context {
    stacks: FxHashMap<String, Vec<Arc<Operation>>>,
    modifiers: FxHashMap<String, ModifierFn>,
    random: Box<dyn RandomSource>,
    max_depth: Option<usize>,
    depth: usize,
}

impl Context {
    pub fn new(random: impl RandomSource + 'static) -> Self {
        Self::from_boxed(Box::new(random))
    }

    pub(crate) fn from_boxed(random: Box<dyn RandomSource>) -> Self {
        Self {
            stacks: FxHashMap::default(),
            modifiers: FxHashMap::default(),
            random,
            max_depth: None,
            depth: 0,
        }
    }

    /// Current value for `key`, if it has ever been assigned.
    pub fn lookup(&self, key: &str) -> Option<Arc<Operation>> {
        self.stacks.get(key).and_then(|stack| stack.last()).cloned()
    }

    pub fn push(&mut self, key: &str, op: Operation) {
        self.stacks
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(op));
    }

    pub fn pop(&mut self, key: &str) {
        if let Some(stack) = self.stacks.get_mut(key) {
            if stack.len() > 1 {
                stack.pop();
            }
        }
    }

    /// Number of entries on `key`'s stack.
    pub fn stack_len(&self, key: &str) -> usize {
        self.stacks.get(key).map_or(0, Vec::len)
    }

    /// Draw an index in `[0, bound)`. Out-of-range draws from a custom
    /// source wrap around; a zero bound yields zero.
    pub fn random_int(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.random.random_int(bound) % bound
    }

    pub fn set_random(&mut self, random: impl RandomSource + 'static) {
        self.random = Box::new(random);
    }

    pub fn register_modifier<F>(&mut self, name: impl Into<String>, modifier: F)
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.insert_modifier(name.into(), Arc::new(modifier));
    }

    pub(crate) fn insert_modifier(&mut self, name: String, modifier: ModifierFn) {
        self.modifiers.insert(name, modifier);
    }

    pub fn lookup_modifier(&self, name: &str) -> Option<ModifierFn> {
        self.modifiers.get(name).cloned()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Limit nested symbol expansion. `None` disables the guard.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
    }

    /// Current nesting of symbol expansions.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one level of symbol expansion. Returns false when the depth
    /// guard refuses.
    pub(crate) fn enter(&mut self) -> bool {
        if let Some(max) = self.max_depth {
            if self.depth >= max {
                return false;
            }
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(SeededRandom::from_time())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modifiers: Vec<&String> = self.modifiers.keys().collect();
        modifiers.sort();
        f.debug_struct("Context")
            .field("stacks", &self.stacks)
            .field("modifiers", &modifiers)
            .field("max_depth", &self.max_depth)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
