/// Operation tree — the parsed form of grammar source text.
///
/// Trees are immutable once built. All evaluation side effects land in the
/// [`Context`], never in the tree.
use tracing::{trace, warn};

use crate::core::context::Context;

/// A single node of a parsed grammar expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Text emitted as-is.
    Literal(String),
    /// `#key.mod.mod(param)#` — reads the current value of `key`.
    Symbol {
        key: String,
        modifiers: Vec<ModifierCall>,
    },
    /// Children resolved left to right and joined.
    Concat(Vec<Operation>),
    /// `[key:value]` — resolves `value` and pushes the result onto `key`.
    Push { key: String, value: Box<Operation> },
    /// `[key:POP]`
    Pop(String),
    /// One alternative chosen by the context's random source.
    Select(Vec<Operation>),
}

/// A modifier invocation attached to a symbol: `.name(param, param)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierCall {
    pub name: String,
    pub params: Vec<Operation>,
}

impl ModifierCall {
    pub fn new(name: impl Into<String>, params: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// A call without a parameter list.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Thread `value` through this modifier.
    ///
    /// Parameters are resolved against the live context on every call, so
    /// they may push or pop. An unregistered modifier appends its sentinel
    /// and leaves its parameters unevaluated.
    pub fn apply(&self, mut value: String, ctx: &mut Context) -> String {
        let Some(modifier) = ctx.lookup_modifier(&self.name) else {
            trace!(modifier = %self.name, "unresolved modifier");
            value.push_str(&unresolved_modifier(&self.name));
            return value;
        };

        let params: Vec<String> = self.params.iter().map(|p| p.resolve(ctx)).collect();
        modifier(&value, &params)
    }
}

/// Sentinel for a symbol with no value.
pub fn unresolved_symbol(key: &str) -> String {
    format!("(({}))", key)
}

/// Sentinel for a modifier that isn't registered.
pub fn unresolved_modifier(name: &str) -> String {
    format!("((.{}))", name)
}

impl Operation {
    pub fn literal(value: impl Into<String>) -> Self {
        Operation::Literal(value.into())
    }

    pub fn symbol(key: impl Into<String>) -> Self {
        Self::symbol_with(key, Vec::new())
    }

    pub fn symbol_with(key: impl Into<String>, modifiers: Vec<ModifierCall>) -> Self {
        Operation::Symbol {
            key: key.into(),
            modifiers,
        }
    }

    pub fn push(key: impl Into<String>, value: Operation) -> Self {
        Operation::Push {
            key: key.into(),
            value: Box::new(value),
        }
    }

    pub fn pop(key: impl Into<String>) -> Self {
        Operation::Pop(key.into())
    }

    /// Resolve this node to text against `ctx`.
    pub fn resolve(&self, ctx: &mut Context) -> String {
        match self {
            Operation::Literal(value) => value.clone(),
            Operation::Concat(children) => children.iter().map(|c| c.resolve(ctx)).collect(),
            Operation::Symbol { key, modifiers } => {
                let Some(rule) = ctx.lookup(key) else {
                    trace!(symbol = %key, "unresolved symbol");
                    return unresolved_symbol(key);
                };

                if !ctx.enter() {
                    warn!(symbol = %key, depth = ctx.depth(), "expansion depth limit reached");
                    return unresolved_symbol(key);
                }
                let mut out = rule.resolve(ctx);
                ctx.leave();

                for call in modifiers {
                    out = call.apply(out, ctx);
                }
                out
            }
            Operation::Push { key, value } => {
                let result = value.resolve(ctx);
                ctx.push(key, Operation::Literal(result));
                String::new()
            }
            Operation::Pop(key) => {
                ctx.pop(key);
                String::new()
            }
            Operation::Select(alternatives) => {
                if alternatives.is_empty() {
                    return String::new();
                }
                let index = ctx.random_int(alternatives.len());
                alternatives[index].resolve(ctx)
            }
        }
    }
}
