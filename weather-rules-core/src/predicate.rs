//! Typed predicate combinators.
//!
//! A [`Predicate<T>`] is a pure boolean test over a document `T`. Values are
//! pulled out of the document through named [`Path`]s, so a rule reads like
//! `greater_than(TODAY_TEMPERATURE, 75.0)` while staying fully typed.
//!
//! Quantifiers walk a [`Sequence`] inside the document and apply an
//! [`ElementPredicate`], which sees both the current element and the whole
//! document.

use std::{fmt, sync::Arc};

use crate::error::PredicateError;

pub type PredicateResult = Result<bool, PredicateError>;

/// A named numeric accessor into a document of type `T`.
pub struct Path<T> {
    name: &'static str,
    resolve: fn(&T) -> Option<f64>,
}

impl<T> Path<T> {
    pub const fn new(name: &'static str, resolve: fn(&T) -> Option<f64>) -> Self {
        Self { name, resolve }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn resolve(&self, data: &T) -> Result<f64, PredicateError> {
        (self.resolve)(data).ok_or(PredicateError::Unresolved { path: self.name })
    }
}

impl<T> Clone for Path<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Path<T> {}

impl<T> fmt::Debug for Path<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path").field(&self.name).finish()
    }
}

/// A named slice inside a document, used by the quantifiers.
pub struct Sequence<T, E> {
    name: &'static str,
    items: fn(&T) -> &[E],
}

impl<T, E> Sequence<T, E> {
    pub const fn new(name: &'static str, items: fn(&T) -> &[E]) -> Self {
        Self { name, items }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn items<'a>(&self, data: &'a T) -> &'a [E] {
        (self.items)(data)
    }
}

impl<T, E> Clone for Sequence<T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Sequence<T, E> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Equals,
}

impl Comparison {
    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::GreaterThan => left > right,
            Comparison::GreaterThanOrEquals => left >= right,
            Comparison::LessThan => left < right,
            Comparison::LessThanOrEquals => left <= right,
            Comparison::Equals => left == right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEquals => ">=",
            Comparison::LessThan => "<",
            Comparison::LessThanOrEquals => "<=",
            Comparison::Equals => "==",
        }
    }
}

/// One side of a document-level comparison.
pub enum Operand<T> {
    Path(Path<T>),
    Literal(f64),
}

impl<T> Operand<T> {
    fn resolve(&self, data: &T) -> Result<f64, PredicateError> {
        match self {
            Operand::Path(path) => path.resolve(data),
            Operand::Literal(value) => Ok(*value),
        }
    }
}

impl<T> From<Path<T>> for Operand<T> {
    fn from(path: Path<T>) -> Self {
        Operand::Path(path)
    }
}

impl<T> From<f64> for Operand<T> {
    fn from(value: f64) -> Self {
        Operand::Literal(value)
    }
}

impl<T> fmt::Display for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Path(path) => f.write_str(path.name()),
            Operand::Literal(value) => write!(f, "{value}"),
        }
    }
}

/// One side of an element-level comparison inside a quantifier.
pub enum ScopedOperand<E, T> {
    /// A field of the element currently being visited.
    Current(Path<E>),
    /// A field of the enclosing document.
    Document(Path<T>),
    Literal(f64),
}

impl<E, T> ScopedOperand<E, T> {
    fn resolve(&self, element: &E, document: &T) -> Result<f64, PredicateError> {
        match self {
            ScopedOperand::Current(path) => path.resolve(element),
            ScopedOperand::Document(path) => path.resolve(document),
            ScopedOperand::Literal(value) => Ok(*value),
        }
    }
}

impl<E, T> fmt::Display for ScopedOperand<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedOperand::Current(path) => write!(f, "current.{}", path.name()),
            ScopedOperand::Document(path) => f.write_str(path.name()),
            ScopedOperand::Literal(value) => write!(f, "{value}"),
        }
    }
}

type Eval<T> = dyn Fn(&T) -> PredicateResult + Send + Sync;

/// A pure boolean test over a document.
pub struct Predicate<T> {
    description: String,
    eval: Arc<Eval<T>>,
}

impl<T> Predicate<T> {
    pub fn new(
        description: impl Into<String>,
        eval: impl Fn(&T) -> PredicateResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            eval: Arc::new(eval),
        }
    }

    pub fn test(&self, data: &T) -> PredicateResult {
        (self.eval)(data)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.description).finish()
    }
}

type ElementEval<E, T> = dyn Fn(&E, &T) -> PredicateResult + Send + Sync;

/// A test over one element of a sequence, with the enclosing document in scope.
pub struct ElementPredicate<E, T> {
    description: String,
    eval: Arc<ElementEval<E, T>>,
}

impl<E: 'static, T: 'static> ElementPredicate<E, T> {
    pub fn new(
        description: impl Into<String>,
        eval: impl Fn(&E, &T) -> PredicateResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            eval: Arc::new(eval),
        }
    }

    pub fn compare(
        op: Comparison,
        left: ScopedOperand<E, T>,
        right: ScopedOperand<E, T>,
    ) -> Self {
        Self::new(format!("{left} {} {right}", op.symbol()), move |element, document| {
            Ok(op.holds(
                left.resolve(element, document)?,
                right.resolve(element, document)?,
            ))
        })
    }
}

impl<E, T> ElementPredicate<E, T> {
    pub fn test(&self, element: &E, document: &T) -> PredicateResult {
        (self.eval)(element, document)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<E, T> Clone for ElementPredicate<E, T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<E, T> fmt::Debug for ElementPredicate<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementPredicate")
            .field(&self.description)
            .finish()
    }
}

pub fn compare<T: 'static>(
    op: Comparison,
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    let (left, right) = (left.into(), right.into());
    Predicate::new(format!("{left} {} {right}", op.symbol()), move |data| {
        Ok(op.holds(left.resolve(data)?, right.resolve(data)?))
    })
}

pub fn greater_than<T: 'static>(
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    compare(Comparison::GreaterThan, left, right)
}

pub fn greater_than_or_equals<T: 'static>(
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    compare(Comparison::GreaterThanOrEquals, left, right)
}

pub fn less_than<T: 'static>(
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    compare(Comparison::LessThan, left, right)
}

pub fn less_than_or_equals<T: 'static>(
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    compare(Comparison::LessThanOrEquals, left, right)
}

pub fn equals<T: 'static>(
    left: impl Into<Operand<T>>,
    right: impl Into<Operand<T>>,
) -> Predicate<T> {
    compare(Comparison::Equals, left, right)
}

pub fn not<T: 'static>(inner: Predicate<T>) -> Predicate<T> {
    Predicate::new(format!("not ({})", inner.description()), move |data| {
        Ok(!inner.test(data)?)
    })
}

pub fn or<T: 'static>(left: Predicate<T>, right: Predicate<T>) -> Predicate<T> {
    let description = format!("({}) or ({})", left.description(), right.description());
    Predicate::new(description, move |data| {
        Ok(left.test(data)? || right.test(data)?)
    })
}

pub fn and<T: 'static>(left: Predicate<T>, right: Predicate<T>) -> Predicate<T> {
    let description = format!("({}) and ({})", left.description(), right.description());
    Predicate::new(description, move |data| {
        Ok(left.test(data)? && right.test(data)?)
    })
}

/// True when `predicate` holds for every element; vacuously true when empty.
pub fn every<T: 'static, E: 'static>(
    sequence: Sequence<T, E>,
    predicate: ElementPredicate<E, T>,
) -> Predicate<T> {
    let description = format!("every {}: {}", sequence.name(), predicate.description());
    Predicate::new(description, move |document| {
        for element in sequence.items(document) {
            if !predicate.test(element, document)? {
                return Ok(false);
            }
        }
        Ok(true)
    })
}

/// True when `predicate` holds for at least one element.
pub fn some<T: 'static, E: 'static>(
    sequence: Sequence<T, E>,
    predicate: ElementPredicate<E, T>,
) -> Predicate<T> {
    let description = format!("some {}: {}", sequence.name(), predicate.description());
    Predicate::new(description, move |document| {
        for element in sequence.items(document) {
            if predicate.test(element, document)? {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        level: Option<f64>,
        limit: f64,
        readings: Vec<f64>,
    }

    const LEVEL: Path<Doc> = Path::new("level", level);
    const LIMIT: Path<Doc> = Path::new("limit", limit);
    const READINGS: Sequence<Doc, f64> = Sequence::new("readings", readings);
    const READING: Path<f64> = Path::new("value", reading);

    fn level(doc: &Doc) -> Option<f64> {
        doc.level
    }

    fn limit(doc: &Doc) -> Option<f64> {
        Some(doc.limit)
    }

    fn readings(doc: &Doc) -> &[f64] {
        &doc.readings
    }

    fn reading(value: &f64) -> Option<f64> {
        Some(*value)
    }

    fn doc(level: Option<f64>, readings: Vec<f64>) -> Doc {
        Doc {
            level,
            limit: 10.0,
            readings,
        }
    }

    fn under_limit() -> ElementPredicate<f64, Doc> {
        ElementPredicate::compare(
            Comparison::LessThanOrEquals,
            ScopedOperand::Current(READING),
            ScopedOperand::Document(LIMIT),
        )
    }

    #[test]
    fn comparisons_against_literals_and_paths() {
        let d = doc(Some(10.0), vec![]);

        assert!(greater_than(LEVEL, 9.0).test(&d).unwrap());
        assert!(!greater_than(LEVEL, 10.0).test(&d).unwrap());
        assert!(greater_than_or_equals(LEVEL, 10.0).test(&d).unwrap());
        assert!(less_than(LEVEL, 11.0).test(&d).unwrap());
        assert!(less_than_or_equals(LEVEL, LIMIT).test(&d).unwrap());
        assert!(equals(LEVEL, LIMIT).test(&d).unwrap());
    }

    #[test]
    fn unresolved_path_is_an_error() {
        let d = doc(None, vec![]);
        let err = greater_than(LEVEL, 1.0).test(&d).unwrap_err();
        assert_eq!(err, PredicateError::Unresolved { path: "level" });
    }

    #[test]
    fn logical_combinators() {
        let d = doc(Some(5.0), vec![]);
        let high = greater_than(LEVEL, 8.0);
        let low = less_than(LEVEL, 2.0);

        assert!(!or(high.clone(), low.clone()).test(&d).unwrap());
        assert!(not(or(high.clone(), low.clone())).test(&d).unwrap());
        assert!(and(not(high), not(low)).test(&d).unwrap());
    }

    #[test]
    fn not_propagates_errors() {
        let d = doc(None, vec![]);
        assert!(not(greater_than(LEVEL, 1.0)).test(&d).is_err());
    }

    #[test]
    fn every_checks_each_element_against_document() {
        assert!(every(READINGS, under_limit()).test(&doc(None, vec![1.0, 10.0])).unwrap());
        assert!(!every(READINGS, under_limit()).test(&doc(None, vec![1.0, 11.0])).unwrap());
    }

    #[test]
    fn every_is_vacuously_true() {
        assert!(every(READINGS, under_limit()).test(&doc(None, vec![])).unwrap());
    }

    #[test]
    fn some_finds_a_match() {
        assert!(some(READINGS, under_limit()).test(&doc(None, vec![20.0, 3.0])).unwrap());
        assert!(!some(READINGS, under_limit()).test(&doc(None, vec![20.0])).unwrap());
        assert!(!some(READINGS, under_limit()).test(&doc(None, vec![])).unwrap());
    }

    #[test]
    fn element_predicate_errors_propagate_through_quantifier() {
        let level_bound = ElementPredicate::compare(
            Comparison::LessThanOrEquals,
            ScopedOperand::Current(READING),
            ScopedOperand::Document(LEVEL),
        );
        let err = every(READINGS, level_bound)
            .test(&doc(None, vec![1.0]))
            .unwrap_err();
        assert_eq!(err, PredicateError::Unresolved { path: "level" });
    }

    #[test]
    fn descriptions_read_like_expressions() {
        let p = not(or(greater_than(LEVEL, 75.0), less_than(LEVEL, 50.0)));
        assert_eq!(p.description(), "not ((level > 75) or (level < 50))");

        let q = every(READINGS, under_limit());
        assert_eq!(q.description(), "every readings: current.value <= limit");
    }
}
