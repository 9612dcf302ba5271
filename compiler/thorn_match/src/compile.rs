//! Decision tree construction via the Maranget (2008) algorithm.
//!
//! Compiles a [`PatternMatrix`] into a [`DecisionTree`] by recursively
//! selecting the best column to split on and specializing the matrix
//! for each distinct constructor.
//!
//! # Algorithm
//!
//! 1. **Base cases**: empty matrix → `Fail`; first row all wildcards →
//!    `Leaf`/`Guard`
//! 2. **Pick column**: choose the column with the most non-wildcard rows
//! 3. **Expand or-rows**: a row with an or-pattern at the chosen column
//!    becomes one row per alternative, in arm order
//! 4. **Gather edges**: collect the test values at the chosen column
//! 5. **Specialize**: for each test value, filter compatible rows and recurse
//! 6. **Default**: rows with wildcards at the chosen column form the default
//!
//! Integer columns are switched on disjoint interval pieces (the column's
//! literals and ranges split at every boundary), so overlapping ranges and
//! guarded arms stay correct: each edge's subtree holds every row
//! compatible with that piece, in arm order.
//!
//! # References
//!
//! - Maranget (2008) "Compiling Pattern Matching to Good Decision Trees"

use rustc_hash::FxHashSet;

use thorn_ir::{
    DecisionTree, Lit, Name, Pat, PathInstruction, PatternMatrix, PatternRow, ScrutineePath,
    TestKind, TestValue,
};

/// Compile a pattern matrix into a decision tree.
///
/// `paths` provides the scrutinee path for each column. Initially, this is
/// a single-element vec with an empty path (the root scrutinee). As the
/// algorithm recurses, columns are added for sub-patterns and paths are
/// extended.
///
/// Rows must be in arm order; the tree preserves arm priority. A
/// non-exhaustive matrix compiles to a tree with reachable [`Fail`]
/// nodes.
///
/// [`Fail`]: DecisionTree::Fail
#[expect(
    clippy::needless_pass_by_value,
    reason = "recursive — sub-calls pass owned specialized matrices"
)]
pub fn compile(matrix: PatternMatrix, paths: Vec<ScrutineePath>) -> DecisionTree {
    debug_assert!(
        matrix.iter().all(|row| row.pats.len() == paths.len()),
        "column count mismatch: {} paths",
        paths.len(),
    );

    if matrix.is_empty() {
        return DecisionTree::Fail;
    }

    // First row irrefutable at every remaining column: match found.
    if matrix[0].pats.iter().all(Pat::is_wildcard_like) {
        let bindings = extract_all_bindings(&matrix[0], &paths);

        if let Some(guard) = matrix[0].guard {
            // Guard may fail at runtime; continue with the remaining rows,
            // not just the next one in source order.
            let remaining = matrix[1..].to_vec();
            let on_fail = compile(remaining, paths);
            return DecisionTree::Guard {
                arm_index: matrix[0].arm_index,
                bindings,
                guard,
                on_fail: Box::new(on_fail),
            };
        }

        return DecisionTree::Leaf {
            arm_index: matrix[0].arm_index,
            bindings,
        };
    }

    let col = pick_column(&matrix);
    let path = paths[col].clone();

    // Or-patterns at the chosen column expand into one row per
    // alternative before any specialization. Fields of one alternative
    // must never mix with another's.
    let matrix = if matrix.iter().any(|row| has_or(&row.pats[col])) {
        expand_or_rows(&matrix, col)
    } else {
        matrix
    };

    match column_kind(&matrix, col) {
        // Tuples and records have a single shape: no runtime test, just
        // unconditional decomposition into sub-pattern columns.
        ColumnKind::Product => {
            let decomposed = decompose_product(&matrix, col, &paths, &path);
            compile(decomposed.matrix, decomposed.paths)
        }
        ColumnKind::Tag => build_tag_switch(&matrix, col, &paths, path),
        ColumnKind::Integer => build_integer_switch(&matrix, col, &paths, path),
        ColumnKind::Equality(test_kind) => {
            build_equality_switch(&matrix, col, &paths, path, test_kind)
        }
    }
}

// Or-pattern row expansion

/// Whether the pattern is an or-pattern, possibly under binding wrappers.
fn has_or(pat: &Pat) -> bool {
    match pat {
        Pat::Or(_) => true,
        Pat::Binding { sub, .. } => has_or(sub),
        _ => false,
    }
}

/// Expand or-patterns at `col` into one row per alternative, in arm
/// order. Binding wrappers are re-applied around each alternative so the
/// name binds in every expanded row.
fn expand_or_rows(matrix: &PatternMatrix, col: usize) -> PatternMatrix {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix {
        if has_or(&row.pats[col]) {
            for alt in or_alternatives(&row.pats[col]) {
                let mut pats = row.pats.clone();
                pats[col] = alt;
                out.push(PatternRow {
                    pats,
                    arm_index: row.arm_index,
                    guard: row.guard,
                    bindings: row.bindings.clone(),
                });
            }
        } else {
            out.push(row.clone());
        }
    }
    out
}

fn or_alternatives(pat: &Pat) -> Vec<Pat> {
    match pat {
        Pat::Or(alts) => alts.iter().flat_map(or_alternatives).collect(),
        Pat::Binding { name, sub } => or_alternatives(sub)
            .into_iter()
            .map(|alt| Pat::Binding {
                name: *name,
                sub: Box::new(alt),
            })
            .collect(),
        other => vec![other.clone()],
    }
}

// Column selection

/// Choose the column to split on: the one the most rows constrain,
/// breaking ties toward the leftmost.
fn pick_column(matrix: &PatternMatrix) -> usize {
    let ncols = matrix[0].pats.len();
    let mut best_col = 0;
    let mut best_score = 0;

    for col in 0..ncols {
        let score = matrix
            .iter()
            .filter(|row| !row.pats[col].is_wildcard_like())
            .count();
        if score > best_score {
            best_score = score;
            best_col = col;
        }
    }
    best_col
}

/// What kind of test the chosen column needs.
enum ColumnKind {
    /// Finite-type constructors: switch on the tag.
    Tag,
    /// Integer literals and ranges: switch on disjoint pieces.
    Integer,
    /// Tuple or record patterns: decompose without a test.
    Product,
    /// Scalar equality (strings, floats).
    Equality(TestKind),
}

fn column_kind(matrix: &PatternMatrix, col: usize) -> ColumnKind {
    for row in matrix {
        if let Some(kind) = pattern_column_kind(&row.pats[col]) {
            return kind;
        }
    }
    // Unreachable for a picked column, but a wildcard column decomposes
    // to nothing either way.
    ColumnKind::Product
}

fn pattern_column_kind(pat: &Pat) -> Option<ColumnKind> {
    match pat {
        Pat::Wildcard => None,
        Pat::Binding { sub, .. } => pattern_column_kind(sub),
        Pat::Or(alts) => alts.iter().find_map(pattern_column_kind),
        Pat::Variant { .. } => Some(ColumnKind::Tag),
        Pat::Tuple(_) | Pat::Record { .. } => Some(ColumnKind::Product),
        Pat::Lit(Lit::Int(_)) | Pat::Range { .. } => Some(ColumnKind::Integer),
        Pat::Lit(Lit::Str(_)) => Some(ColumnKind::Equality(TestKind::StrEq)),
        Pat::Lit(Lit::Float(_)) => Some(ColumnKind::Equality(TestKind::FloatEq)),
    }
}

// Tag switches

fn build_tag_switch(
    matrix: &PatternMatrix,
    col: usize,
    paths: &[ScrutineePath],
    path: ScrutineePath,
) -> DecisionTree {
    let mut seen = FxHashSet::default();
    let mut edges = Vec::new();
    for row in matrix {
        let Some((index, name)) = tag_in_pattern(&row.pats[col]) else {
            continue;
        };
        if !seen.insert(index) {
            continue;
        }
        let tv = TestValue::Tag { index, name };
        let spec = specialize_tag(matrix, col, index, paths, &path);
        edges.push((tv, compile(spec.matrix, spec.paths)));
    }

    let default_spec = default_matrix(matrix, col, paths);
    let default = if default_spec.matrix.is_empty() {
        None
    } else {
        Some(Box::new(compile(default_spec.matrix, default_spec.paths)))
    };

    DecisionTree::Switch {
        path,
        test_kind: TestKind::VariantTag,
        edges,
        default,
    }
}

/// Variant tag a pattern puts on an edge, if any.
fn tag_in_pattern(pat: &Pat) -> Option<(u32, Name)> {
    match pat {
        Pat::Variant { index, name, .. } => Some((*index, *name)),
        Pat::Binding { sub, .. } => tag_in_pattern(sub),
        _ => None,
    }
}

/// Field count for a tag, taken from the first row that names it.
fn tag_arity(matrix: &PatternMatrix, col: usize, index: u32) -> usize {
    fn from_pattern(pat: &Pat, index: u32) -> Option<usize> {
        match pat {
            Pat::Variant {
                index: pat_index,
                fields,
                ..
            } if *pat_index == index => Some(fields.len()),
            Pat::Binding { sub, .. } => from_pattern(sub, index),
            _ => None,
        }
    }
    matrix
        .iter()
        .find_map(|row| from_pattern(&row.pats[col], index))
        .unwrap_or(0)
}

fn specialize_tag(
    matrix: &PatternMatrix,
    col: usize,
    index: u32,
    paths: &[ScrutineePath],
    base_path: &ScrutineePath,
) -> Specialized {
    let arity = tag_arity(matrix, col, index);
    let new_paths = replace_column_paths(paths, col, base_path, arity, PathInstruction::TagPayload);

    let col_path = &paths[col];
    let mut new_matrix = Vec::new();
    for row in matrix {
        let Some(fields) = tag_fields(&row.pats[col], index, arity) else {
            continue;
        };
        new_matrix.push(replace_column(row, col, fields, col_path));
    }
    Specialized {
        matrix: new_matrix,
        paths: new_paths,
    }
}

/// Sub-patterns a pattern contributes under a tag edge, or `None` if it
/// cannot match that tag.
fn tag_fields(pat: &Pat, index: u32, arity: usize) -> Option<Vec<Pat>> {
    match pat {
        Pat::Binding { sub, .. } => tag_fields(sub, index, arity),
        Pat::Variant {
            index: pat_index,
            fields,
            ..
        } => (*pat_index == index).then(|| fields.clone()),
        Pat::Wildcard => Some(vec![Pat::Wildcard; arity]),
        _ => None,
    }
}

// Integer switches

fn build_integer_switch(
    matrix: &PatternMatrix,
    col: usize,
    paths: &[ScrutineePath],
    path: ScrutineePath,
) -> DecisionTree {
    let mut intervals = Vec::new();
    for row in matrix {
        collect_intervals(&row.pats[col], &mut intervals);
    }
    let pieces = split_intervals(&intervals);

    let ranged = pieces.iter().any(|&(lo, hi)| lo != hi);
    let mut edges = Vec::new();
    for &piece in &pieces {
        let tv = if piece.0 == piece.1 {
            TestValue::Int(clip(piece.0))
        } else {
            TestValue::IntRange {
                lo: clip(piece.0),
                hi: clip(piece.1),
                inclusive: true,
            }
        };
        let spec = specialize_interval(matrix, col, piece, paths);
        edges.push((tv, compile(spec.matrix, spec.paths)));
    }

    let default_spec = default_matrix(matrix, col, paths);
    let default = if default_spec.matrix.is_empty() {
        None
    } else {
        Some(Box::new(compile(default_spec.matrix, default_spec.paths)))
    };

    DecisionTree::Switch {
        path,
        test_kind: if ranged {
            TestKind::IntRange
        } else {
            TestKind::IntEq
        },
        edges,
        default,
    }
}

/// Inclusive intervals a pattern covers on an integer column.
fn collect_intervals(pat: &Pat, out: &mut Vec<(i128, i128)>) {
    match pat {
        Pat::Lit(Lit::Int(v)) => out.push((i128::from(*v), i128::from(*v))),
        Pat::Range { lo, hi, inclusive } => {
            let hi = if *inclusive {
                i128::from(*hi)
            } else {
                i128::from(*hi) - 1
            };
            out.push((i128::from(*lo), hi));
        }
        Pat::Binding { sub, .. } => collect_intervals(sub, out),
        _ => {}
    }
}

/// Split the hull of `intervals` at every boundary, keeping only pieces
/// at least one interval covers. Values in no piece take the default.
fn split_intervals(intervals: &[(i128, i128)]) -> Vec<(i128, i128)> {
    let mut starts: Vec<i128> = Vec::new();
    for &(lo, hi) in intervals {
        starts.push(lo);
        starts.push(hi + 1);
    }
    starts.sort_unstable();
    starts.dedup();

    let mut pieces = Vec::new();
    for pair in starts.windows(2) {
        let (start, end) = (pair[0], pair[1] - 1);
        if intervals.iter().any(|&(lo, hi)| lo <= start && end <= hi) {
            pieces.push((start, end));
        }
    }
    pieces
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "interval bounds come from i64 pattern literals"
)]
fn clip(value: i128) -> i64 {
    value as i64
}

/// Whether a pattern covers the whole `piece` (pieces never straddle a
/// boundary of any pattern in the column).
fn covers_piece(pat: &Pat, piece: (i128, i128)) -> bool {
    if pat.is_wildcard_like() {
        return true;
    }
    let mut intervals = Vec::new();
    collect_intervals(pat, &mut intervals);
    intervals
        .iter()
        .any(|&(lo, hi)| lo <= piece.0 && piece.1 <= hi)
}

fn specialize_interval(
    matrix: &PatternMatrix,
    col: usize,
    piece: (i128, i128),
    paths: &[ScrutineePath],
) -> Specialized {
    let mut new_paths = Vec::with_capacity(paths.len() - 1);
    new_paths.extend_from_slice(&paths[..col]);
    new_paths.extend_from_slice(&paths[col + 1..]);

    let col_path = &paths[col];
    let mut new_matrix = Vec::new();
    for row in matrix {
        if covers_piece(&row.pats[col], piece) {
            new_matrix.push(replace_column(row, col, Vec::new(), col_path));
        }
    }
    Specialized {
        matrix: new_matrix,
        paths: new_paths,
    }
}

// Scalar equality switches (strings, floats)

fn build_equality_switch(
    matrix: &PatternMatrix,
    col: usize,
    paths: &[ScrutineePath],
    path: ScrutineePath,
    test_kind: TestKind,
) -> DecisionTree {
    let mut seen = FxHashSet::default();
    let mut edges = Vec::new();
    for row in matrix {
        for lit in literals_in_pattern(&row.pats[col]) {
            if !seen.insert(lit) {
                continue;
            }
            let tv = match lit {
                Lit::Int(v) => TestValue::Int(v),
                Lit::Str(s) => TestValue::Str(s),
                Lit::Float(bits) => TestValue::Float(bits),
            };
            let spec = specialize_literal(matrix, col, lit, paths);
            edges.push((tv, compile(spec.matrix, spec.paths)));
        }
    }

    let default_spec = default_matrix(matrix, col, paths);
    let default = if default_spec.matrix.is_empty() {
        None
    } else {
        Some(Box::new(compile(default_spec.matrix, default_spec.paths)))
    };

    DecisionTree::Switch {
        path,
        test_kind,
        edges,
        default,
    }
}

fn literals_in_pattern(pat: &Pat) -> Vec<Lit> {
    match pat {
        Pat::Lit(lit) => vec![*lit],
        Pat::Binding { sub, .. } => literals_in_pattern(sub),
        _ => Vec::new(),
    }
}

fn matches_literal(pat: &Pat, lit: Lit) -> bool {
    match pat {
        Pat::Wildcard => true,
        Pat::Lit(pat_lit) => *pat_lit == lit,
        Pat::Binding { sub, .. } => matches_literal(sub, lit),
        _ => false,
    }
}

fn specialize_literal(
    matrix: &PatternMatrix,
    col: usize,
    lit: Lit,
    paths: &[ScrutineePath],
) -> Specialized {
    let mut new_paths = Vec::with_capacity(paths.len() - 1);
    new_paths.extend_from_slice(&paths[..col]);
    new_paths.extend_from_slice(&paths[col + 1..]);

    let col_path = &paths[col];
    let mut new_matrix = Vec::new();
    for row in matrix {
        if matches_literal(&row.pats[col], lit) {
            new_matrix.push(replace_column(row, col, Vec::new(), col_path));
        }
    }
    Specialized {
        matrix: new_matrix,
        paths: new_paths,
    }
}

// Product decomposition

fn decompose_product(
    matrix: &PatternMatrix,
    col: usize,
    paths: &[ScrutineePath],
    base_path: &ScrutineePath,
) -> Specialized {
    let (arity, instruction) = product_shape(matrix, col);
    let new_paths = replace_column_paths(paths, col, base_path, arity, instruction);

    let col_path = &paths[col];
    let new_matrix = matrix
        .iter()
        .map(|row| {
            let fields = product_fields(&row.pats[col], arity);
            replace_column(row, col, fields, col_path)
        })
        .collect();
    Specialized {
        matrix: new_matrix,
        paths: new_paths,
    }
}

/// Arity and path instruction for the first concrete product pattern in
/// the column.
fn product_shape(matrix: &PatternMatrix, col: usize) -> (usize, fn(u32) -> PathInstruction) {
    fn from_pattern(pat: &Pat) -> Option<(usize, fn(u32) -> PathInstruction)> {
        match pat {
            Pat::Tuple(elements) => Some((elements.len(), PathInstruction::TupleIndex)),
            Pat::Record { fields } => Some((fields.len(), PathInstruction::RecordField)),
            Pat::Binding { sub, .. } => from_pattern(sub),
            _ => None,
        }
    }
    matrix
        .iter()
        .find_map(|row| from_pattern(&row.pats[col]))
        .unwrap_or((0, PathInstruction::TupleIndex))
}

fn product_fields(pat: &Pat, arity: usize) -> Vec<Pat> {
    match pat {
        Pat::Tuple(elements) => elements.clone(),
        Pat::Record { fields } => fields.iter().map(|(_, sub)| sub.clone()).collect(),
        Pat::Binding { sub, .. } if !sub.is_wildcard_like() => product_fields(sub, arity),
        _ => vec![Pat::Wildcard; arity],
    }
}

// Shared row plumbing

/// The result of specializing or defaulting a matrix.
struct Specialized {
    matrix: PatternMatrix,
    paths: Vec<ScrutineePath>,
}

/// Replace column `col` of `row` with `fields`, collecting the bindings
/// the consumed pattern carried at `col_path`.
fn replace_column(
    row: &PatternRow,
    col: usize,
    fields: Vec<Pat>,
    col_path: &ScrutineePath,
) -> PatternRow {
    let mut bindings = row.bindings.clone();
    collect_consumed_bindings(&row.pats[col], col_path, &mut bindings);

    let mut pats = Vec::with_capacity(row.pats.len() - 1 + fields.len());
    pats.extend_from_slice(&row.pats[..col]);
    pats.extend(fields);
    pats.extend_from_slice(&row.pats[col + 1..]);
    PatternRow {
        pats,
        arm_index: row.arm_index,
        guard: row.guard,
        bindings,
    }
}

/// New column paths after replacing column `col` with `arity` sub-columns
/// projected through `instruction`.
fn replace_column_paths(
    paths: &[ScrutineePath],
    col: usize,
    base_path: &ScrutineePath,
    arity: usize,
    instruction: fn(u32) -> PathInstruction,
) -> Vec<ScrutineePath> {
    let mut new_paths = Vec::with_capacity(paths.len() - 1 + arity);
    new_paths.extend_from_slice(&paths[..col]);
    for i in 0..arity {
        let mut sub_path = base_path.clone();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "field indices bounded by declared arity, far below u32::MAX"
        )]
        sub_path.push(instruction(i as u32));
        new_paths.push(sub_path);
    }
    new_paths.extend_from_slice(&paths[col + 1..]);
    new_paths
}

/// Compute the default matrix: rows where column `col` is wildcard-like.
/// The column is removed (it has been tested).
fn default_matrix(matrix: &PatternMatrix, col: usize, paths: &[ScrutineePath]) -> Specialized {
    let mut new_paths = Vec::with_capacity(paths.len() - 1);
    new_paths.extend_from_slice(&paths[..col]);
    new_paths.extend_from_slice(&paths[col + 1..]);

    let col_path = &paths[col];
    let mut new_matrix = Vec::new();
    for row in matrix {
        if row.pats[col].is_wildcard_like() {
            new_matrix.push(replace_column(row, col, Vec::new(), col_path));
        }
    }
    Specialized {
        matrix: new_matrix,
        paths: new_paths,
    }
}

// Binding extraction

/// Bindings of a row where every remaining pattern is wildcard-like:
/// the accumulated bindings from consumed columns plus whatever the
/// remaining patterns bind.
fn extract_all_bindings(row: &PatternRow, paths: &[ScrutineePath]) -> Vec<(Name, ScrutineePath)> {
    let mut bindings = row.bindings.clone();
    for (pat, path) in row.pats.iter().zip(paths.iter()) {
        pat.collect_bindings(path, &mut bindings);
    }
    bindings
}

/// Bindings a pattern carries at the column being consumed. Bindings
/// nested inside constructor fields survive in the specialized columns;
/// only wrappers around the consumed position are collected here.
fn collect_consumed_bindings(
    pat: &Pat,
    path: &ScrutineePath,
    out: &mut Vec<(Name, ScrutineePath)>,
) {
    match pat {
        Pat::Binding { name, sub } => {
            out.push((*name, path.clone()));
            collect_consumed_bindings(sub, path, out);
        }
        _ => {}
    }
}
