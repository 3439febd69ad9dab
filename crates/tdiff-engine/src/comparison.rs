use tdiff_types::{ChangeCode, Side};

/// One classified position of a comparison.
///
/// Built bottom-up by the differencer: a position's code is fixed after all
/// of its children have been classified and is never changed afterwards.
/// Children are kept even when they are unchanged; pruning happens when the
/// tree is emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison<T> {
    ancestor: Option<T>,
    left: Option<T>,
    right: Option<T>,
    code: ChangeCode,
    children: Vec<Comparison<T>>,
}

impl<T> Comparison<T> {
    pub(crate) fn new(
        ancestor: Option<T>,
        left: Option<T>,
        right: Option<T>,
        code: ChangeCode,
        children: Vec<Comparison<T>>,
    ) -> Self {
        Self {
            ancestor,
            left,
            right,
            code,
            children,
        }
    }

    pub fn ancestor(&self) -> Option<&T> {
        self.ancestor.as_ref()
    }

    pub fn left(&self) -> Option<&T> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&T> {
        self.right.as_ref()
    }

    /// The input on `side`, if present.
    pub fn endpoint(&self, side: Side) -> Option<&T> {
        match side {
            Side::Ancestor => self.ancestor(),
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    pub fn code(&self) -> ChangeCode {
        self.code
    }

    pub fn children(&self) -> &[Comparison<T>] {
        &self.children
    }

    /// Returns `true` if the engine did not descend into this position.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// This position and everything below it, parents before children.
    pub fn descendants(&self) -> Descendants<'_, T> {
        Descendants { stack: vec![self] }
    }

    /// Number of positions in this subtree, including this one.
    pub fn position_count(&self) -> usize {
        self.descendants().count()
    }

    /// Number of positions in this subtree whose change type is not
    /// `NO_CHANGE`.
    pub fn changed_count(&self) -> usize {
        self.descendants().filter(|c| !c.code.is_unchanged()).count()
    }
}

/// Pre-order iterator over a [`Comparison`] subtree.
pub struct Descendants<'c, T> {
    stack: Vec<&'c Comparison<T>>,
}

impl<'c, T> Iterator for Descendants<'c, T> {
    type Item = &'c Comparison<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
