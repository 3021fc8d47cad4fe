use crate::Value;
use std::ops::{Deref, DerefMut};

/// Default prefix of numbered placeholders.
pub const DEFAULT_PARAMETER_PREFIX: &str = "$";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlCount,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlInsertInto,
    SqlInsertIntoOnConflict,
    SqlInsertIntoValues,
    SqlSelect,
    SqlSelectLimit,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// Rendering state shared by a writer while it produces one statement.
///
/// Every parameter written is appended to `args`, its placeholder number is its position there.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub fragment: Fragment,
    pub prefix: String,
    pub args: Vec<Value>,
}

impl Context {
    pub fn new(fragment: Fragment, prefix: impl Into<String>) -> Self {
        Self {
            fragment,
            prefix: prefix.into(),
            args: Vec::new(),
        }
    }
    /// Register an argument and return its 1-based placeholder number.
    pub fn push_arg(&mut self, value: Value) -> usize {
        self.args.push(value);
        self.args.len()
    }
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        let previous = self.fragment;
        self.fragment = fragment;
        ContextUpdater {
            current: self,
            previous,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Fragment::None, DEFAULT_PARAMETER_PREFIX)
    }
}

/// Restores the previous fragment when dropped.
pub struct ContextUpdater<'a> {
    pub current: &'a mut Context,
    pub previous: Fragment,
}

impl<'a> Deref for ContextUpdater<'a> {
    type Target = Context;
    fn deref(&self) -> &Self::Target {
        self.current
    }
}

impl<'a> DerefMut for ContextUpdater<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.current
    }
}

impl<'a> Drop for ContextUpdater<'a> {
    fn drop(&mut self) {
        self.current.fragment = self.previous;
    }
}
