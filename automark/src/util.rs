use std::collections::HashSet;
use std::rc::Rc;

#[inline]
pub fn alphabet_equal(a: &[Rc<str>], b: &[Rc<str>]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let set1 = a.iter().collect::<HashSet<_>>();
    let set2 = b.iter().collect::<HashSet<_>>();
    set1 == set2
}

/// Symbols in `a` that are not in `b`, sorted so messages come out deterministic
pub fn alphabet_difference<'a>(a: &'a [Rc<str>], b: &[Rc<str>]) -> Vec<&'a str> {
    let other = b.iter().map(Rc::as_ref).collect::<HashSet<_>>();
    let mut diff = a
        .iter()
        .map(Rc::as_ref)
        .filter(|sym| !other.contains(*sym))
        .collect::<Vec<_>>();
    diff.sort_unstable();
    diff.dedup();
    diff
}
