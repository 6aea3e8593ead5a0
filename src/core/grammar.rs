/// Grammar façade — owns the evaluation context and drives parse + resolve.
use std::sync::Arc;
use tracing::debug;

use crate::core::context::{Context, ModifierFn, RandomSource, SeededRandom};
use crate::core::operation::Operation;
use crate::core::parse::{parse, parse_alternatives};
use crate::schema::rule_set::RuleSet;

/// A generative grammar: rules, modifiers and a random source.
///
/// State accumulates across calls. Values pushed while flattening one
/// expression remain visible to the next; build a fresh `Grammar` for a
/// clean slate. Expansion is single-threaded and recursive. Wrap a shared
/// grammar in a `Mutex` to flatten from several threads.
#[derive(Debug)]
pub struct Grammar {
    context: Context,
}

/// Builder for constructing a `Grammar`.
pub struct GrammarBuilder {
    seed: Option<u64>,
    random: Option<Box<dyn RandomSource>>,
    max_depth: Option<usize>,
    default_modifiers: bool,
    modifiers: Vec<(String, ModifierFn)>,
    rule_sets: Vec<RuleSet>,
}

impl Grammar {
    /// An empty grammar with a time-seeded random source.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> GrammarBuilder {
        GrammarBuilder {
            seed: None,
            random: None,
            max_depth: None,
            default_modifiers: false,
            modifiers: Vec::new(),
            rule_sets: Vec::new(),
        }
    }

    /// Parse `source` and resolve it against the live context.
    pub fn flatten(&mut self, source: &str) -> String {
        let tree = parse(source);
        let out = tree.resolve(&mut self.context);
        debug!(input_len = source.len(), output_len = out.len(), "flattened");
        out
    }

    /// Push each source onto `key` as its own stack entry. The last one
    /// pushed is the current value.
    pub fn push_rules<I, S>(&mut self, key: &str, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for source in sources {
            self.context.push(key, parse(source.as_ref()));
            count += 1;
        }
        debug!(key, count, "pushed rules");
    }

    /// Load every key of `rules` as a single stack entry that picks one of
    /// the key's strings at random each time it is read.
    pub fn load_rule_set(&mut self, rules: &RuleSet) {
        for (key, rule) in &rules.rules {
            self.context.push(key, parse_alternatives(rule.alternatives()));
        }
        debug!(keys = rules.rules.len(), "loaded rule set");
    }

    pub fn register_modifier<F>(&mut self, name: &str, modifier: F)
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        debug!(modifier = name, "registered modifier");
        self.context.register_modifier(name, modifier);
    }

    /// Current value for `key`, unresolved.
    pub fn lookup(&self, key: &str) -> Option<Arc<Operation>> {
        self.context.lookup(key)
    }

    pub fn set_random(&mut self, random: impl RandomSource + 'static) {
        self.context.set_random(random);
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.context.set_max_depth(max_depth);
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    /// Use a `StdRng` seeded with `seed` instead of the system time.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the random source entirely. Takes precedence over `seed`.
    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Cap nested symbol expansion at `depth` levels.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn modifier<F>(mut self, name: &str, modifier: F) -> Self
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.modifiers.push((name.to_string(), Arc::new(modifier)));
        self
    }

    /// Register the English modifier pack.
    pub fn with_default_modifiers(mut self) -> Self {
        self.default_modifiers = true;
        self
    }

    pub fn rule_set(mut self, rules: RuleSet) -> Self {
        self.rule_sets.push(rules);
        self
    }

    pub fn build(self) -> Grammar {
        let context = match (self.random, self.seed) {
            (Some(random), _) => Context::from_boxed(random),
            (None, Some(seed)) => Context::new(SeededRandom::from_seed(seed)),
            (None, None) => Context::new(SeededRandom::from_time()),
        };
        let mut grammar = Grammar { context };
        grammar.set_max_depth(self.max_depth);

        if self.default_modifiers {
            crate::modifiers::en::register(&mut grammar);
        }
        for (name, modifier) in self.modifiers {
            grammar.context.insert_modifier(name, modifier);
        }
        for rules in &self.rule_sets {
            grammar.load_rule_set(rules);
        }
        grammar
    }
}
