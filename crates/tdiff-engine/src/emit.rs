//! Second pass: walk a classified [`Comparison`] top-down and hand every
//! changed position to a caller-supplied [`ResultSink`].

use std::marker::PhantomData;

use tdiff_types::ChangeCode;

use crate::comparison::Comparison;

/// Receives changed positions, parents before children.
///
/// `Context` is threaded from parent to children: whatever `on_position`
/// returns for a position is passed as `parent` for each of its changed
/// children. The default sink, [`ResultTree`](crate::ResultTree), uses node
/// ids as contexts and builds a parent-linked tree.
pub trait ResultSink<T> {
    type Context;

    fn on_position(
        &mut self,
        parent: &Self::Context,
        code: ChangeCode,
        ancestor: Option<&T>,
        left: Option<&T>,
        right: Option<&T>,
    ) -> Self::Context;
}

/// Emit `comparison` into `sink` under `parent`.
///
/// Positions whose change type is `NO_CHANGE` are skipped together with
/// their whole subtree; a changed descendant always has changed ancestors,
/// so nothing is lost. Returns the context produced for `comparison`
/// itself, or `None` when it is unchanged.
pub fn emit<T, S>(comparison: &Comparison<T>, sink: &mut S, parent: &S::Context) -> Option<S::Context>
where
    S: ResultSink<T> + ?Sized,
{
    let code = comparison.code();
    if code.is_unchanged() {
        return None;
    }

    let context = sink.on_position(
        parent,
        code,
        comparison.ancestor(),
        comparison.left(),
        comparison.right(),
    );
    for child in comparison.children() {
        emit(child, sink, &context);
    }
    Some(context)
}

/// A [`ResultSink`] backed by a closure.
pub struct FnSink<C, F> {
    f: F,
    _context: PhantomData<fn(&C) -> C>,
}

impl<C, F> FnSink<C, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _context: PhantomData,
        }
    }
}

impl<T, C, F> ResultSink<T> for FnSink<C, F>
where
    F: FnMut(&C, ChangeCode, Option<&T>, Option<&T>, Option<&T>) -> C,
{
    type Context = C;

    fn on_position(
        &mut self,
        parent: &C,
        code: ChangeCode,
        ancestor: Option<&T>,
        left: Option<&T>,
        right: Option<&T>,
    ) -> C {
        (self.f)(parent, code, ancestor, left, right)
    }
}
