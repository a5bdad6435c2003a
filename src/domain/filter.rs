//! Composable predicates over flat text records.
//!
//! A [`Predicate`] is a small boolean expression built from case-insensitive
//! substring tests. The same value is evaluated in memory by [`Predicate::matches`]
//! and compiled to SQL by the Postgres adapter, so both stores agree on semantics.

use std::fmt::Debug;

/// A text column that predicates can test.
pub trait RecordField: Copy + Eq + Debug + Send + Sync + 'static {
    /// Column name in persistent storage.
    fn column(self) -> &'static str;
}

/// A record whose text fields can be matched by a [`Predicate`].
pub trait FilterableRecord {
    type Field: RecordField;

    fn text(&self, field: Self::Field) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F> {
    /// Matches every record.
    All,
    /// Case-insensitive substring containment of `term` in `field`.
    Contains { field: F, term: String },
    /// Logical OR. An empty list matches nothing.
    Any(Vec<Predicate<F>>),
    /// Logical AND. An empty list matches everything.
    Every(Vec<Predicate<F>>),
}

impl<F: RecordField> Predicate<F> {
    pub fn contains(field: F, term: impl Into<String>) -> Self {
        Self::Contains {
            field,
            term: term.into(),
        }
    }

    /// OR of `Contains` over every `(term, field)` pair.
    pub fn any_term<'a, I>(fields: &[F], terms: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let alternatives = terms
            .into_iter()
            .flat_map(|term| {
                fields
                    .iter()
                    .map(move |field| Self::contains(*field, term))
            })
            .collect();
        Self::Any(alternatives)
    }

    /// Conjunction that keeps the expression flat and drops `All` operands.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::All, other) | (other, Self::All) => other,
            (Self::Every(mut left), Self::Every(right)) => {
                left.extend(right);
                Self::Every(left)
            }
            (Self::Every(mut left), other) => {
                left.push(other);
                Self::Every(left)
            }
            (this, Self::Every(mut right)) => {
                right.insert(0, this);
                Self::Every(right)
            }
            (left, right) => Self::Every(vec![left, right]),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: FilterableRecord<Field = F>,
    {
        match self {
            Self::All => true,
            Self::Contains { field, term } => contains_ignore_case(record.text(*field), term),
            Self::Any(alternatives) => alternatives.iter().any(|p| p.matches(record)),
            Self::Every(conditions) => conditions.iter().all(|p| p.matches(record)),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
