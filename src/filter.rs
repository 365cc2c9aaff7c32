//! Composable class predicates.
//!
//! A [`ClassFilter`] is a small boolean expression over [`ClassInfo`] records.
//! Leaves test a single property; `Not`, `And` and `Or` combine them. `And` and
//! `Or` evaluate their children in insertion order and stop as soon as the
//! outcome is known. An empty `And` or `Or` accepts everything.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::hierarchy::HierarchyResolver;
use crate::info::{ClassInfo, ClassModifiers};

#[derive(Debug, Clone)]
pub enum ClassFilter {
    /// The class name contains a match for the pattern.
    Name(Regex),
    /// The class is an interface.
    Interface,
    /// The class carries the abstract modifier, as every interface does.
    Abstract,
    /// The class carries every one of the given modifiers.
    Modifiers(ClassModifiers),
    /// The class extends or implements the named type, transitively, within
    /// the registry being searched.
    Subclass(String),
    /// The class carries the named annotation.
    Annotated(String),
    /// Caller-supplied predicate.
    Predicate(Predicate),
    Not(Box<ClassFilter>),
    And(Vec<ClassFilter>),
    Or(Vec<ClassFilter>),
}

type PredicateFn = dyn Fn(&ClassInfo, &HierarchyResolver<'_>) -> bool + Send + Sync;

/// A shareable closure usable as a filter leaf.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl ClassFilter {
    /// Name filter from a regular expression.
    pub fn name(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Name(Regex::new(pattern)?))
    }

    pub fn subclass_of(name: impl Into<String>) -> Self {
        Self::Subclass(name.into())
    }

    pub fn annotated_with(name: impl Into<String>) -> Self {
        Self::Annotated(name.into())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ClassInfo, &HierarchyResolver<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate(Arc::new(f)))
    }

    pub fn not(filter: ClassFilter) -> Self {
        Self::Not(Box::new(filter))
    }

    pub fn all_of(filters: impl IntoIterator<Item = ClassFilter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    pub fn any_of(filters: impl IntoIterator<Item = ClassFilter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    /// Conjunction with `other`, appending to an existing `And`.
    pub fn and(self, other: ClassFilter) -> Self {
        match self {
            Self::And(mut filters) => {
                filters.push(other);
                Self::And(filters)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction with `other`, appending to an existing `Or`.
    pub fn or(self, other: ClassFilter) -> Self {
        match self {
            Self::Or(mut filters) => {
                filters.push(other);
                Self::Or(filters)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    pub fn accept(&self, class: &ClassInfo, hierarchy: &HierarchyResolver<'_>) -> bool {
        match self {
            Self::Name(pattern) => pattern.is_match(class.name()),
            Self::Interface => class.is_interface(),
            Self::Abstract => class.is_abstract(),
            Self::Modifiers(required) => class.modifiers().contains(*required),
            Self::Subclass(name) => hierarchy.is_subtype_of(class, name),
            Self::Annotated(name) => class.has_annotation(name),
            Self::Predicate(Predicate(f)) => f(class, hierarchy),
            Self::Not(inner) => !inner.accept(class, hierarchy),
            Self::And(filters) => filters.iter().all(|f| f.accept(class, hierarchy)),
            Self::Or(filters) => {
                filters.is_empty() || filters.iter().any(|f| f.accept(class, hierarchy))
            }
        }
    }
}
