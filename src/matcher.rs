//! Multiset matching of expected types against a declaration's actual types.
//!
//! Counts matter: asking for two `string` parameters against a declaration
//! with one fails in every mode. Exact mode additionally requires the
//! expected and actual lists to have the same length.

use crate::decl::NamedType;
use std::collections::HashMap;

/// An entry of a type list: a bare type (`string`) or a binding (`n int`).
pub trait TypeItem {
    /// Binding name; `None` or empty means "any name".
    fn item_name(&self) -> Option<&str>;
    /// Type text; empty means "any type".
    fn item_type(&self) -> &str;
}

impl TypeItem for String {
    fn item_name(&self) -> Option<&str> {
        None
    }

    fn item_type(&self) -> &str {
        self
    }
}

impl TypeItem for &str {
    fn item_name(&self) -> Option<&str> {
        None
    }

    fn item_type(&self) -> &str {
        self
    }
}

impl TypeItem for NamedType {
    fn item_name(&self) -> Option<&str> {
        Some(&self.name).filter(|n| !n.is_empty()).map(String::as_str)
    }

    fn item_type(&self) -> &str {
        &self.type_name
    }
}

/// Remaining occurrences per type, plus the type bound to each name.
struct TypeCounts<'a> {
    remaining: HashMap<&'a str, isize>,
    by_name: HashMap<&'a str, &'a str>,
}

impl<'a> TypeCounts<'a> {
    fn new<T: TypeItem>(actual: &'a [T]) -> Self {
        let mut remaining: HashMap<&str, isize> = HashMap::new();
        let mut by_name = HashMap::new();
        for item in actual {
            *remaining.entry(item.item_type()).or_default() += 1;
            if let Some(name) = item.item_name() {
                by_name.insert(name, item.item_type());
            }
        }
        TypeCounts { remaining, by_name }
    }

    /// Resolve the actual type an expected item claims, or `None` when the
    /// item does not fit.
    fn resolve<T: TypeItem>(&self, expected: &'a T) -> Option<&'a str> {
        let wanted = expected.item_type();
        match expected.item_name() {
            Some(name) => {
                let bound = *self.by_name.get(name)?;
                (wanted.is_empty() || wanted == bound).then_some(bound)
            }
            None => self.remaining.contains_key(wanted).then_some(wanted),
        }
    }

    /// Take one occurrence of `ty`; `false` once more are claimed than exist.
    fn take(&mut self, ty: &str) -> bool {
        match self.remaining.get_mut(ty) {
            Some(count) => {
                *count -= 1;
                *count >= 0
            }
            None => false,
        }
    }
}

/// Whether `actual` satisfies `expected`.
///
/// A set `presence` flag decides on its own: `Some(true)` requires `actual`
/// to be empty, `Some(false)` requires it to be non-empty. Validation
/// guarantees the expected list is empty whenever the flag is set.
pub fn matches<T: TypeItem>(
    expected: &[T],
    actual: &[T],
    exact: bool,
    presence: Option<bool>,
) -> bool {
    if let Some(empty) = presence {
        return empty == actual.is_empty();
    }
    if exact && expected.len() != actual.len() {
        return false;
    }
    if expected.is_empty() {
        return true;
    }

    let mut counts = TypeCounts::new(actual);
    for item in expected {
        let Some(ty) = counts.resolve(item) else {
            return false;
        };
        if !counts.take(ty) {
            return false;
        }
    }
    true
}
