//! Process-wide interning for on-screen label text.
//!
//! The renderer keys its rasterized labels by [`Atom`]; the numeric ids let
//! callers precompute label sets (countdown values, trial counters) once.

use lazy_static::lazy_static;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref TEXT_INTERNER: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

// a panic while holding the lock cannot leave the Vec half-written
fn read() -> RwLockReadGuard<'static, Vec<Atom>> {
    TEXT_INTERNER.read().unwrap_or_else(|e| e.into_inner())
}

fn write() -> RwLockWriteGuard<'static, Vec<Atom>> {
    TEXT_INTERNER.write().unwrap_or_else(|e| e.into_inner())
}

/// Intern a string and return its ID
pub fn intern_text(s: &str) -> usize {
    let atom = Atom::from(s);
    if let Some(idx) = read().iter().position(|a| *a == atom) {
        return idx;
    }
    let mut v = write();
    match v.iter().position(|a| *a == atom) {
        Some(idx) => idx,
        None => {
            v.push(atom);
            v.len() - 1
        }
    }
}

/// Current count of unique texts
pub fn text_count() -> usize {
    read().len()
}

pub fn get_text(id: usize) -> Option<Atom> {
    read().get(id).cloned()
}

/// Atom for `s`, interning it on first use.
pub fn label(s: &str) -> Atom {
    let id = intern_text(s);
    get_text(id).unwrap_or_else(|| Atom::from(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_id() {
        let a = intern_text("Time remaining: 4:59");
        let b = intern_text("Time remaining: 4:59");
        assert_eq!(a, b);
        assert_eq!(get_text(a).as_deref(), Some("Time remaining: 4:59"));
    }

    #[test]
    fn distinct_texts_grow_the_table() {
        let a = intern_text("cache-test-alpha");
        let b = intern_text("cache-test-beta");
        assert_ne!(a, b);
        assert!(text_count() > a.max(b));
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(get_text(usize::MAX).is_none());
    }

    #[test]
    fn label_round_trips() {
        assert_eq!(&*label("Trial 3 of 12"), "Trial 3 of 12");
    }
}
