//! Leaf classification: the change code of a single position from the
//! presence of its inputs and their pairwise content equality.

use tdiff_types::ChangeCode;

use crate::error::{DiffError, DiffResult};

/// Classify one position.
///
/// `equal` is only consulted for pairs that are both present, and only as
/// often as the decision needs. In two-way mode `ancestor` is ignored and the
/// result never carries direction or pseudo-conflict bits.
pub fn classify_leaf<T>(
    three_way: bool,
    ancestor: Option<&T>,
    left: Option<&T>,
    right: Option<&T>,
    equal: impl Fn(&T, &T) -> bool,
) -> DiffResult<ChangeCode> {
    if three_way {
        classify_three_way(ancestor, left, right, equal)
    } else {
        classify_two_way(left, right, equal)
    }
}

fn classify_two_way<T>(
    left: Option<&T>,
    right: Option<&T>,
    equal: impl Fn(&T, &T) -> bool,
) -> DiffResult<ChangeCode> {
    let code = match (left, right) {
        (None, None) => return Err(DiffError::EmptyPosition { three_way: false }),
        (None, Some(_)) => ChangeCode::ADDITION,
        (Some(_), None) => ChangeCode::DELETION,
        (Some(l), Some(r)) if equal(l, r) => ChangeCode::NO_CHANGE,
        (Some(_), Some(_)) => ChangeCode::CHANGE,
    };
    Ok(code)
}

fn classify_three_way<T>(
    ancestor: Option<&T>,
    left: Option<&T>,
    right: Option<&T>,
    equal: impl Fn(&T, &T) -> bool,
) -> DiffResult<ChangeCode> {
    let conflicting_change = ChangeCode::CONFLICTING | ChangeCode::CHANGE;
    let pseudo_if = |code: ChangeCode, same: bool| {
        if same {
            code | ChangeCode::PSEUDO_CONFLICT
        } else {
            code
        }
    };

    let code = match (ancestor, left, right) {
        (None, None, None) => return Err(DiffError::EmptyPosition { three_way: true }),
        (None, None, Some(_)) => ChangeCode::RIGHT | ChangeCode::ADDITION,
        (None, Some(_), None) => ChangeCode::LEFT | ChangeCode::ADDITION,
        (None, Some(l), Some(r)) => {
            pseudo_if(ChangeCode::CONFLICTING | ChangeCode::ADDITION, equal(l, r))
        }
        // Both sides deleted it: they agree with each other.
        (Some(_), None, None) => {
            ChangeCode::CONFLICTING | ChangeCode::DELETION | ChangeCode::PSEUDO_CONFLICT
        }
        (Some(a), None, Some(r)) => {
            if equal(a, r) {
                ChangeCode::LEFT | ChangeCode::DELETION
            } else {
                conflicting_change
            }
        }
        (Some(a), Some(l), None) => {
            if equal(a, l) {
                ChangeCode::RIGHT | ChangeCode::DELETION
            } else {
                conflicting_change
            }
        }
        (Some(a), Some(l), Some(r)) => match (equal(a, l), equal(a, r)) {
            (true, true) => ChangeCode::NO_CHANGE,
            (true, false) => ChangeCode::RIGHT | ChangeCode::CHANGE,
            (false, true) => ChangeCode::LEFT | ChangeCode::CHANGE,
            (false, false) => pseudo_if(conflicting_change, equal(l, r)),
        },
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn two(left: Option<&str>, right: Option<&str>) -> DiffResult<ChangeCode> {
        classify_leaf(false, None, left.as_ref(), right.as_ref(), |a, b| a == b)
    }

    fn three(ancestor: Option<&str>, left: Option<&str>, right: Option<&str>) -> ChangeCode {
        classify_leaf(true, ancestor.as_ref(), left.as_ref(), right.as_ref(), |a, b| a == b).unwrap()
    }

    // -----------------------------------------------------------------------
    // Two-way
    // -----------------------------------------------------------------------

    #[test]
    fn two_way_table() {
        assert_eq!(two(None, Some("x")), Ok(ChangeCode::ADDITION));
        assert_eq!(two(Some("x"), None), Ok(ChangeCode::DELETION));
        assert_eq!(two(Some("a"), Some("a")), Ok(ChangeCode::NO_CHANGE));
        assert_eq!(two(Some("a"), Some("b")), Ok(ChangeCode::CHANGE));
    }

    #[test]
    fn two_way_rejects_empty_position() {
        assert_eq!(two(None, None), Err(DiffError::EmptyPosition { three_way: false }));
    }

    #[test]
    fn two_way_ignores_ancestor() {
        let code = classify_leaf(false, Some(&"a"), Some(&"b"), Some(&"b"), |a, b| a == b).unwrap();
        assert_eq!(code, ChangeCode::NO_CHANGE);
        let err = classify_leaf(false, Some(&"a"), None, None, |a: &&str, b: &&str| a == b);
        assert_eq!(err, Err(DiffError::EmptyPosition { three_way: false }));
    }

    // -----------------------------------------------------------------------
    // Three-way
    // -----------------------------------------------------------------------

    #[test]
    fn three_way_additions() {
        assert_eq!(three(None, None, Some("x")), ChangeCode::RIGHT | ChangeCode::ADDITION);
        assert_eq!(three(None, Some("x"), None), ChangeCode::LEFT | ChangeCode::ADDITION);
        assert_eq!(
            three(None, Some("x"), Some("y")),
            ChangeCode::CONFLICTING | ChangeCode::ADDITION
        );
        assert_eq!(
            three(None, Some("x"), Some("x")),
            ChangeCode::CONFLICTING | ChangeCode::ADDITION | ChangeCode::PSEUDO_CONFLICT
        );
    }

    #[test]
    fn three_way_deletions() {
        assert_eq!(
            three(Some("a"), None, None),
            ChangeCode::CONFLICTING | ChangeCode::DELETION | ChangeCode::PSEUDO_CONFLICT
        );
        assert_eq!(three(Some("a"), None, Some("a")), ChangeCode::LEFT | ChangeCode::DELETION);
        assert_eq!(three(Some("a"), Some("a"), None), ChangeCode::RIGHT | ChangeCode::DELETION);
    }

    #[test]
    fn delete_versus_modify_conflicts() {
        let conflict = ChangeCode::CONFLICTING | ChangeCode::CHANGE;
        assert_eq!(three(Some("a"), None, Some("b")), conflict);
        assert_eq!(three(Some("a"), Some("b"), None), conflict);
    }

    #[test]
    fn three_way_changes() {
        assert_eq!(three(Some("a"), Some("a"), Some("a")), ChangeCode::NO_CHANGE);
        assert_eq!(three(Some("a"), Some("a"), Some("b")), ChangeCode::RIGHT | ChangeCode::CHANGE);
        assert_eq!(three(Some("a"), Some("b"), Some("a")), ChangeCode::LEFT | ChangeCode::CHANGE);
    }

    #[test]
    fn both_sides_changed_differently_is_a_real_conflict() {
        let code = three(Some("a"), Some("b"), Some("c"));
        assert_eq!(code, ChangeCode::CONFLICTING | ChangeCode::CHANGE);
        assert!(!code.is_pseudo_conflict());
    }

    #[test]
    fn both_sides_changed_identically_is_a_pseudo_conflict() {
        assert_eq!(
            three(Some("a"), Some("b"), Some("b")),
            ChangeCode::CONFLICTING | ChangeCode::CHANGE | ChangeCode::PSEUDO_CONFLICT
        );
    }

    #[test]
    fn three_way_rejects_empty_position() {
        let err = classify_leaf(true, None::<&u8>, None, None, |a, b| a == b);
        assert_eq!(err, Err(DiffError::EmptyPosition { three_way: true }));
    }

    #[test]
    fn left_right_equality_only_consulted_when_needed() {
        let calls = Cell::new(0);
        let counting = |a: &&str, b: &&str| {
            calls.set(calls.get() + 1);
            a == b
        };
        classify_leaf(true, Some(&"a"), Some(&"a"), Some(&"b"), counting).unwrap();
        assert_eq!(calls.get(), 2);
    }
}
