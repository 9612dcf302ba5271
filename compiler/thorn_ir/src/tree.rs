//! Decision tree types for compiled pattern matching.
//!
//! These types represent the output of `thorn_match::compile` — a branching
//! test program that dispatches a runtime value to the correct arm and
//! records where each bound variable lives relative to the scrutinee root.
//! The tree is handed to an external code generator; this core never
//! executes it.
//!
//! # References
//!
//! - Maranget (2008) "Compiling Pattern Matching to Good Decision Trees"

use crate::{GuardId, Name, Pat};

/// A path from the root scrutinee to a sub-value.
///
/// When testing nested patterns, the scrutinee for inner tests is derived
/// by projecting fields from the outer scrutinee. A `ScrutineePath` tracks
/// how to reach any sub-scrutinee from the root.
///
/// # Example
///
/// Matching `Move { x, .. }` inside `Some(Move { .. })`:
/// path to `x` is `[TagPayload(0), RecordField(0)]`.
pub type ScrutineePath = Vec<PathInstruction>;

/// One step in a scrutinee path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathInstruction {
    /// Extract payload field `i` of a finite-type constructor, after a tag
    /// test has confirmed the constructor.
    TagPayload(u32),
    /// Extract element `i` of a tuple.
    TupleIndex(u32),
    /// Extract record field `i` (by canonical position; field order is
    /// fixed after normalization).
    RecordField(u32),
}

/// What kind of test a `Switch` node performs. One `TestKind` per node;
/// the edges carry the individual [`TestValue`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestKind {
    /// Compare the constructor tag of a finite-type value.
    VariantTag,
    /// Compare an integer for equality.
    IntEq,
    /// Check whether an integer falls in a range. Also used when a column
    /// mixes range and literal edges.
    IntRange,
    /// Compare an interned string for equality.
    StrEq,
    /// Compare a float for exact bit equality.
    FloatEq,
}

/// A specific test value for one edge of a `Switch` node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TestValue {
    /// Constructor tag of a finite type.
    Tag {
        /// Discriminant index used for the switch instruction.
        index: u32,
        /// Constructor name for diagnostics and readability.
        name: Name,
    },
    /// Integer literal.
    Int(i64),
    /// Interned string literal.
    Str(Name),
    /// Float literal (exact bits).
    Float(u64),
    /// Integer range.
    IntRange { lo: i64, hi: i64, inclusive: bool },
}

/// A compiled decision tree.
///
/// Edges of a `Switch` are tested in order; the `default` subtree handles
/// values no edge covers. Guard nodes fall through to the remaining
/// compatible arms when the predicate fails — guards never shrink
/// coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecisionTree {
    /// Test a sub-scrutinee and branch on the result.
    Switch {
        /// How to reach the value being tested.
        path: ScrutineePath,
        /// The kind of test being performed.
        test_kind: TestKind,
        /// Branches: each edge maps a test value to a subtree.
        edges: Vec<(TestValue, DecisionTree)>,
        /// Subtree for values not covered by any edge.
        default: Option<Box<DecisionTree>>,
    },
    /// Reached a match arm. Bind variables and execute the body.
    Leaf {
        /// Index of the arm in the original match expression.
        arm_index: usize,
        /// Each binding maps a name to the path of its value relative to
        /// the root scrutinee, resolved once per arm.
        bindings: Vec<(Name, ScrutineePath)>,
    },
    /// Guarded leaf. Evaluate the predicate with the bindings in scope;
    /// on failure, continue with `on_fail` — the remaining compatible
    /// arms, not just the next one in source order.
    Guard {
        arm_index: usize,
        bindings: Vec<(Name, ScrutineePath)>,
        guard: GuardId,
        on_fail: Box<DecisionTree>,
    },
    /// No arm matches here. Reachable only in non-exhaustive matches
    /// compiled in diagnostic-continue mode.
    Fail,
}

/// A row in the pattern matrix (one match arm).
#[derive(Clone, Debug)]
pub struct PatternRow {
    /// Remaining patterns to test, one per column.
    pub pats: Vec<Pat>,
    /// The arm index in the original match expression.
    pub arm_index: usize,
    /// Guard predicate, if any.
    pub guard: Option<GuardId>,
    /// Bindings accumulated as columns were consumed by specialization.
    pub bindings: Vec<(Name, ScrutineePath)>,
}

impl PatternRow {
    /// A fresh single-column row for one arm.
    pub fn new(pat: Pat, arm_index: usize, guard: Option<GuardId>) -> Self {
        PatternRow {
            pats: vec![pat],
            arm_index,
            guard,
            bindings: Vec::new(),
        }
    }
}

/// The pattern matrix: rows of arms, columns of sub-patterns.
pub type PatternMatrix = Vec<PatternRow>;
