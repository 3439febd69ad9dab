//! The tree diff engine.
//!
//! A run is two passes. [`Differencer::classify`] walks the inputs and
//! builds a fully classified [`Comparison`] tree bottom-up. [`emit`] then
//! walks that tree top-down, prunes unchanged subtrees, and feeds the
//! survivors to a [`ResultSink`]. [`Differencer::diff`] runs both.

use std::collections::HashMap;
use std::hash::Hash;

use tdiff_structure::{
    ContentEquality, ContentSource, DefaultStructure, StreamEquality, StructureProvider, Structured,
};
use tdiff_types::{ChangeCode, Side};
use tracing::{debug, trace};

use crate::cancel::CancellationToken;
use crate::classify::classify_leaf;
use crate::comparison::Comparison;
use crate::emit::{emit, ResultSink};
use crate::error::{DiffError, DiffResult};
use crate::progress::{NoProgress, ProgressObserver};
use crate::result::ResultTree;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The triple a run compares, plus the mode.
///
/// In two-way mode there is no ancestor. In three-way mode any one or two
/// of the inputs may be absent.
pub struct DiffInput<'t, T> {
    three_way: bool,
    ancestor: Option<&'t T>,
    left: Option<&'t T>,
    right: Option<&'t T>,
}

impl<'t, T> DiffInput<'t, T> {
    pub fn two_way(left: Option<&'t T>, right: Option<&'t T>) -> Self {
        Self {
            three_way: false,
            ancestor: None,
            left,
            right,
        }
    }

    pub fn three_way(ancestor: Option<&'t T>, left: Option<&'t T>, right: Option<&'t T>) -> Self {
        Self {
            three_way: true,
            ancestor,
            left,
            right,
        }
    }

    pub fn is_three_way(&self) -> bool {
        self.three_way
    }

    pub fn endpoint(&self, side: Side) -> Option<&'t T> {
        match side {
            Side::Ancestor => self.ancestor,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl<T> Clone for DiffInput<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DiffInput<'_, T> {}

// ---------------------------------------------------------------------------
// Differencer
// ---------------------------------------------------------------------------

/// Compares two or three trees of `T`.
///
/// Children of corresponding positions are matched by `T`'s own `Eq` and
/// `Hash`. The matched positions are visited in order of first appearance
/// across the ancestor, left, and right child lists. If one side lists the
/// same key twice, the later child wins.
///
/// A differencer holds no state between runs and can be reused.
pub struct Differencer<'a, T> {
    structure: Box<dyn StructureProvider<T> + 'a>,
    equality: Box<dyn ContentEquality<T> + 'a>,
    progress: Box<dyn ProgressObserver<T> + 'a>,
}

impl<'a, T> Differencer<'a, T>
where
    T: Clone + Eq + Hash,
{
    pub fn new(
        structure: impl StructureProvider<T> + 'a,
        equality: impl ContentEquality<T> + 'a,
    ) -> Self {
        Self {
            structure: Box::new(structure),
            equality: Box::new(equality),
            progress: Box::new(NoProgress),
        }
    }

    /// Report every visited position to `progress`.
    pub fn with_progress(mut self, progress: impl ProgressObserver<T> + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Pass one: classify every position reachable from `input`.
    ///
    /// The returned tree keeps unchanged positions. Fails with
    /// [`DiffError::Cancelled`] if `cancel` is observed set at any position,
    /// and with [`DiffError::EmptyPosition`] if `input` has nothing to
    /// compare.
    pub fn classify(
        &self,
        input: DiffInput<'_, T>,
        cancel: &CancellationToken,
    ) -> DiffResult<Comparison<T>> {
        debug!(three_way = input.three_way, "starting diff");
        let mut run = Run {
            differencer: self,
            three_way: input.three_way,
            cancel,
            visited: 0,
        };

        match run.visit(input.ancestor, input.left, input.right, 0) {
            Ok(comparison) => {
                debug!(
                    three_way = input.three_way,
                    visited = run.visited,
                    changed = comparison.changed_count(),
                    "diff classified"
                );
                Ok(comparison)
            }
            Err(DiffError::Cancelled) => {
                debug!(visited = run.visited, "diff cancelled");
                Err(DiffError::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    /// Classify `input` and emit every changed position into `sink`, the
    /// top-level position under `initial`.
    ///
    /// Returns the context `sink` produced for the top-level position, or
    /// `None` if nothing differs. On error nothing is emitted.
    pub fn diff<S>(
        &self,
        input: DiffInput<'_, T>,
        cancel: &CancellationToken,
        sink: &mut S,
        initial: &S::Context,
    ) -> DiffResult<Option<S::Context>>
    where
        S: ResultSink<T> + ?Sized,
    {
        let comparison = self.classify(input, cancel)?;
        Ok(emit(&comparison, sink, initial))
    }

    /// Classify `input` into a fresh [`ResultTree`].
    pub fn diff_tree(
        &self,
        input: DiffInput<'_, T>,
        cancel: &CancellationToken,
    ) -> DiffResult<ResultTree<T>> {
        let mut tree = ResultTree::new();
        let root = tree.root();
        self.diff(input, cancel, &mut tree, &root)?;
        Ok(tree)
    }
}

impl<'a, T> Differencer<'a, T>
where
    T: Clone + Eq + Hash + Structured + ContentSource,
{
    /// A differencer that asks inputs for their own children and compares
    /// leaves by streaming their bytes.
    pub fn for_structured() -> Self {
        Self::new(DefaultStructure, StreamEquality::new())
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

struct Run<'r, 'a, T> {
    differencer: &'r Differencer<'a, T>,
    three_way: bool,
    cancel: &'r CancellationToken,
    visited: usize,
}

impl<T> Run<'_, '_, T>
where
    T: Clone + Eq + Hash,
{
    fn visit(
        &mut self,
        ancestor: Option<&T>,
        left: Option<&T>,
        right: Option<&T>,
        depth: usize,
    ) -> DiffResult<Comparison<T>> {
        self.cancel.check()?;
        self.differencer.progress.on_visit(ancestor, left, right);
        self.visited += 1;
        trace!(depth, visited = self.visited, "visiting position");

        let structure = &self.differencer.structure;
        let ancestor_children = if self.three_way {
            ancestor.and_then(|a| structure.children(a))
        } else {
            None
        };
        let left_children = left.and_then(|l| structure.children(l));
        let right_children = right.and_then(|r| structure.children(r));

        let mut code = ChangeCode::NO_CHANGE;
        let mut children = Vec::new();
        if let (Some(left_children), Some(right_children)) = (left_children, right_children) {
            if !self.three_way || ancestor_children.is_some() {
                let slots = union_children(
                    ancestor_children.unwrap_or_default(),
                    left_children,
                    right_children,
                );
                children.reserve(slots.len());
                for slot in slots {
                    let child = self.visit(
                        slot.ancestor.as_ref(),
                        slot.left.as_ref(),
                        slot.right.as_ref(),
                        depth + 1,
                    )?;
                    code |= child.code().propagated();
                    children.push(child);
                }
            }
        }

        // A container without differing children is compared as a whole.
        if code.is_unchanged() {
            let equality = &self.differencer.equality;
            code = classify_leaf(self.three_way, ancestor, left, right, |a, b| {
                equality.contents_equal(a, b)
            })?;
        }

        Ok(Comparison::new(
            ancestor.cloned(),
            left.cloned(),
            right.cloned(),
            code,
            children,
        ))
    }
}

/// Children of one position on each side, matched by key.
struct Slot<T> {
    ancestor: Option<T>,
    left: Option<T>,
    right: Option<T>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            ancestor: None,
            left: None,
            right: None,
        }
    }

    fn set(&mut self, side: Side, child: T) {
        match side {
            Side::Ancestor => self.ancestor = Some(child),
            Side::Left => self.left = Some(child),
            Side::Right => self.right = Some(child),
        }
    }
}

fn union_children<T>(ancestor: Vec<T>, left: Vec<T>, right: Vec<T>) -> Vec<Slot<T>>
where
    T: Clone + Eq + Hash,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut slots: Vec<Slot<T>> = Vec::new();
    for (side, children) in Side::ALL.into_iter().zip([ancestor, left, right]) {
        for child in children {
            let i = *index.entry(child.clone()).or_insert_with(|| {
                slots.push(Slot::empty());
                slots.len() - 1
            });
            slots[i].set(side, child);
        }
    }
    slots
}
