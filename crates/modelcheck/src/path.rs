//! Path resolution inside a validation target graph.
//!
//! A path is a sequence of tokens separated by `/` or `.`. Each token is a
//! property name, an array index (digits) or `..`, which moves to the logical
//! parent of the current node:
//!
//! ```text
//! other            sibling field
//! ../limit         field on the parent model
//! ../../settings/0 first element of a grandparent's list
//! ```
//!
//! Parent links live in [`Scope`], a borrowed chain built on the stack while
//! the orchestrator descends into nested models. Nothing is ever written into
//! the values themselves, so no traversal state survives a validation pass.

use crate::error::PathError;
use crate::value::Value;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| Regex::new(r"\.\.|[^/.]+").unwrap())
}

/// A single step of a parsed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathToken<'p> {
    Parent,
    Key(&'p str),
}

/// Split a path into tokens.
pub fn tokenize(path: &str) -> Result<Vec<PathToken<'_>>, PathError> {
    let tokens: Vec<PathToken<'_>> = token_regex()
        .find_iter(path)
        .map(|m| match m.as_str() {
            ".." => PathToken::Parent,
            key => PathToken::Key(key),
        })
        .collect();

    if tokens.is_empty() {
        return Err(PathError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(tokens)
}

/// One node of the traversal context: a value and the scope it was reached from.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    node: &'a Value,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// A scope with no parent.
    pub fn root(node: &'a Value) -> Self {
        Self { node, parent: None }
    }

    /// A scope for `node` whose logical parent is `self`.
    pub fn child<'b>(&'b self, node: &'b Value) -> Scope<'b> {
        Scope {
            node,
            parent: Some(self),
        }
    }

    pub fn node(&self) -> &'a Value {
        self.node
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    /// Number of ancestors above this scope.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent;
        }
        depth
    }
}

/// Resolves paths relative to a bound scope.
#[derive(Debug, Clone, Copy)]
pub struct PathAccessor<'a> {
    scope: &'a Scope<'a>,
    ignore_nullish: bool,
}

impl<'a> PathAccessor<'a> {
    pub fn new(scope: &'a Scope<'a>) -> Self {
        Self {
            scope,
            ignore_nullish: false,
        }
    }

    /// Return `Undefined`/`Null` values instead of failing on them.
    pub fn ignoring_nullish(mut self) -> Self {
        self.ignore_nullish = true;
        self
    }

    pub fn scope(&self) -> &'a Scope<'a> {
        self.scope
    }

    /// Resolve `path` starting at the bound node.
    pub fn resolve(&self, path: &str) -> Result<&'a Value, PathError> {
        let tokens = tokenize(path)?;

        let mut scope = self.scope;
        // Nodes entered below `scope`, innermost last.
        let mut trail: Vec<&'a Value> = Vec::new();
        let mut parent_hops = 0;

        for (index, token) in tokens.iter().enumerate() {
            let step = index + 1;
            match token {
                PathToken::Parent => {
                    if trail.pop().is_some() {
                        continue;
                    }
                    let parent = scope.parent().ok_or_else(|| PathError::NoParent {
                        step,
                        path: path.to_string(),
                    })?;
                    if !parent.node().is_container() {
                        return Err(PathError::ParentNotObject {
                            step,
                            path: path.to_string(),
                        });
                    }
                    scope = parent;
                    parent_hops += 1;
                }
                PathToken::Key(key) => {
                    let current = trail.last().copied().unwrap_or(scope.node());
                    let next = child_of(current, key).ok_or_else(|| PathError::NotFound {
                        path: path.to_string(),
                        segment: key.to_string(),
                        parent_hops,
                    })?;
                    if next.is_nullish() && !self.ignore_nullish {
                        return Err(PathError::InvalidProperty {
                            path: path.to_string(),
                            segment: key.to_string(),
                        });
                    }
                    trail.push(next);
                }
            }
        }

        Ok(trail.last().copied().unwrap_or(scope.node()))
    }
}

/// Values looked up before an async check starts, keyed by the path that
/// named them.
///
/// Async futures outlive the traversal scope, so the paths they need are
/// resolved up front and handed over as owned values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPaths {
    values: BTreeMap<String, Result<Value, PathError>>,
}

impl ResolvedPaths {
    /// Resolve every path against `accessor`, keeping failures alongside values.
    pub fn capture<I, S>(accessor: &PathAccessor<'_>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = paths
            .into_iter()
            .map(|path| {
                let path = path.into();
                let resolved = accessor.resolve(&path).cloned();
                (path, resolved)
            })
            .collect();
        Self { values }
    }

    /// The outcome of resolving `path`, or `None` if it was never requested.
    pub fn get(&self, path: &str) -> Option<Result<&Value, &PathError>> {
        self.values.get(path).map(Result::as_ref)
    }

    /// Like [`get`](Self::get), turning an unrequested path into a `NotFound` error.
    pub fn resolve(&self, path: &str) -> Result<&Value, PathError> {
        match self.values.get(path) {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(err.clone()),
            None => Err(PathError::NotFound {
                path: path.to_string(),
                segment: path.to_string(),
                parent_hops: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn child_of<'v>(node: &'v Value, key: &str) -> Option<&'v Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
