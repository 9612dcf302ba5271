#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use thorn_ir::{
    Constructor, Lit, Name, Pat, StringInterner, TypeDescriptor, TypeId, TypeTable,
};

use super::{AnalysisConfig, UsefulnessCtx};
use crate::MatchError;

fn ctx(types: &TypeTable) -> UsefulnessCtx<'_> {
    UsefulnessCtx::new(types, &AnalysisConfig::default())
}

fn variant(name: Name, index: u32, fields: Vec<Pat>) -> Pat {
    Pat::Variant {
        name,
        index,
        fields,
    }
}

fn int_lit(value: i64) -> Pat {
    Pat::Lit(Lit::Int(value))
}

fn range(lo: i64, hi: i64) -> Pat {
    Pat::Range {
        lo,
        hi,
        inclusive: true,
    }
}

/// Two-constructor type standing in for `bool`: `True` at 0, `False` at 1.
fn bool_ty(types: &mut TypeTable, interner: &mut StringInterner) -> (TypeId, Name, Name) {
    let t = interner.intern("True");
    let f = interner.intern("False");
    let ty = types.add(TypeDescriptor::finite(vec![
        Constructor::nullary(t),
        Constructor::nullary(f),
    ]));
    (ty, t, f)
}

fn option_int(types: &mut TypeTable, interner: &mut StringInterner) -> (TypeId, Name, Name) {
    let int = types.add(TypeDescriptor::IntegerLike { lo: None, hi: None });
    let some = interner.intern("Some");
    let none = interner.intern("None");
    let ty = types.add(TypeDescriptor::finite(vec![
        Constructor {
            name: some,
            fields: vec![int],
        },
        Constructor::nullary(none),
    ]));
    (ty, some, none)
}

#[test]
fn covering_both_tags_is_exhaustive() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, t, f) = bool_ty(&mut types, &mut interner);

    let arms = [variant(t, 0, vec![]), variant(f, 1, vec![])];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert!(report.is_exhaustive());
    assert!(!report.truncated);
}

#[test]
fn missing_tag_is_the_witness() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, t, f) = bool_ty(&mut types, &mut interner);

    let arms = [variant(t, 0, vec![])];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert_eq!(report.witnesses, vec![variant(f, 1, vec![])]);
}

#[test]
fn empty_type_with_no_arms_is_exhaustive() {
    let mut types = TypeTable::new();
    let ty = types.add(TypeDescriptor::finite(vec![]));

    let report = ctx(&types).check_exhaustiveness(&[], ty).unwrap();
    assert!(report.is_exhaustive());
}

#[test]
fn integer_gaps_become_range_witnesses() {
    let mut types = TypeTable::new();
    let ty = types.add(TypeDescriptor::IntegerLike {
        lo: Some(0),
        hi: Some(10),
    });

    let arms = [range(1, 3), int_lit(7)];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert_eq!(
        report.witnesses,
        vec![int_lit(0), range(4, 6), range(8, 10)]
    );
}

#[test]
fn unbounded_integer_needs_a_wildcard() {
    let mut types = TypeTable::new();
    let ty = types.add(TypeDescriptor::IntegerLike { lo: None, hi: None });

    let without = ctx(&types)
        .check_exhaustiveness(&[int_lit(0)], ty)
        .unwrap();
    assert!(!without.is_exhaustive());

    let with = ctx(&types)
        .check_exhaustiveness(&[int_lit(0), Pat::Wildcard], ty)
        .unwrap();
    assert!(with.is_exhaustive());
}

#[test]
fn ranges_covering_the_whole_domain_are_exhaustive() {
    let mut types = TypeTable::new();
    let ty = types.add(TypeDescriptor::IntegerLike {
        lo: Some(0),
        hi: Some(255),
    });

    let arms = [range(0, 99), range(100, 255)];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert!(report.is_exhaustive());
}

#[test]
fn literal_inside_covered_range_is_not_useful() {
    let mut types = TypeTable::new();
    let ty = types.add(TypeDescriptor::IntegerLike { lo: None, hi: None });

    let earlier = [range(1, 10)];
    let mut ctx = ctx(&types);
    assert!(!ctx.is_useful(&earlier, &int_lit(5), ty).unwrap());
    // 11 and 12 are uncovered, so the overlapping range is still useful.
    assert!(ctx.is_useful(&earlier, &range(5, 12), ty).unwrap());
}

#[test]
fn wildcard_after_full_cover_is_unreachable() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, some, none) = option_int(&mut types, &mut interner);

    let earlier = [
        variant(some, 0, vec![int_lit(50)]),
        variant(some, 0, vec![Pat::Wildcard]),
        Pat::Wildcard,
    ];
    let mut ctx = ctx(&types);
    assert!(!ctx.is_useful(&earlier, &variant(none, 1, vec![]), ty).unwrap());
    // Before the wildcard, `None` was still uncovered.
    assert!(ctx
        .is_useful(&earlier[..2], &Pat::Wildcard, ty)
        .unwrap());
}

#[test]
fn nested_tuple_witness_is_specific() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (b, t, f) = bool_ty(&mut types, &mut interner);
    let pair = types.add(TypeDescriptor::Tuple(vec![b, b]));

    let arms = [
        Pat::Tuple(vec![variant(t, 0, vec![]), variant(t, 0, vec![])]),
        Pat::Tuple(vec![variant(t, 0, vec![]), variant(f, 1, vec![])]),
        Pat::Tuple(vec![variant(f, 1, vec![]), variant(t, 0, vec![])]),
    ];
    let report = ctx(&types).check_exhaustiveness(&arms, pair).unwrap();
    assert_eq!(
        report.witnesses,
        vec![Pat::Tuple(vec![variant(f, 1, vec![]), variant(f, 1, vec![])])]
    );
}

#[test]
fn record_witness_names_its_fields() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (b, t, f) = bool_ty(&mut types, &mut interner);
    let x = interner.intern("x");
    let y = interner.intern("y");
    let rec = types.add(TypeDescriptor::Record(vec![(x, b), (y, b)]));

    let arms = [Pat::Record {
        fields: vec![(x, variant(t, 0, vec![])), (y, Pat::Wildcard)],
    }];
    let report = ctx(&types).check_exhaustiveness(&arms, rec).unwrap();
    assert_eq!(
        report.witnesses,
        vec![Pat::Record {
            fields: vec![(x, variant(f, 1, vec![])), (y, Pat::Wildcard)],
        }]
    );
}

#[test]
fn missing_variant_witness_carries_wildcard_fields() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = types.add(TypeDescriptor::IntegerLike { lo: None, hi: None });
    let quit = interner.intern("Quit");
    let mv = interner.intern("Move");
    let write = interner.intern("Write");
    let msg = types.add(TypeDescriptor::finite(vec![
        Constructor::nullary(quit),
        Constructor {
            name: mv,
            fields: vec![int, int],
        },
        Constructor {
            name: write,
            fields: vec![int],
        },
    ]));

    let arms = [variant(quit, 0, vec![]), variant(write, 2, vec![Pat::Wildcard])];
    let report = ctx(&types).check_exhaustiveness(&arms, msg).unwrap();
    assert_eq!(
        report.witnesses,
        vec![variant(mv, 1, vec![Pat::Wildcard, Pat::Wildcard])]
    );
}

#[test]
fn or_pattern_covers_both_alternatives() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, t, f) = bool_ty(&mut types, &mut interner);

    let arms = [Pat::Or(vec![variant(t, 0, vec![]), variant(f, 1, vec![])])];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert!(report.is_exhaustive());

    let mut ctx = ctx(&types);
    assert!(!ctx.is_useful(&arms, &variant(t, 0, vec![]), ty).unwrap());
}

#[test]
fn bindings_cover_like_wildcards() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, some, _) = option_int(&mut types, &mut interner);
    let n = interner.intern("n");

    let arms = [
        variant(some, 0, vec![Pat::binding(n)]),
        Pat::binding(interner.intern("other")),
    ];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert!(report.is_exhaustive());
}

#[test]
fn opaque_scrutinee_needs_a_wildcard() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let ty = types.add(TypeDescriptor::Opaque);
    let hello = Pat::Lit(Lit::Str(interner.intern("hello")));

    let without = ctx(&types)
        .check_exhaustiveness(std::slice::from_ref(&hello), ty)
        .unwrap();
    assert_eq!(without.witnesses, vec![Pat::Wildcard]);

    let with = ctx(&types)
        .check_exhaustiveness(&[hello.clone(), Pat::Wildcard], ty)
        .unwrap();
    assert!(with.is_exhaustive());

    // Equal literals shadow each other even though the type is opaque.
    let mut ctx = ctx(&types);
    assert!(!ctx
        .is_useful(std::slice::from_ref(&hello), &hello, ty)
        .unwrap());
}

#[test]
fn witness_list_is_capped_and_flagged() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let names: Vec<Name> = (0..8).map(|i| interner.intern(&format!("C{i}"))).collect();
    let ctors: Vec<Constructor> = names.iter().map(|&n| Constructor::nullary(n)).collect();
    let ty = types.add(TypeDescriptor::finite(ctors));

    // One covered constructor leaves seven uncovered.
    let arms = [variant(names[0], 0, vec![])];
    let report = ctx(&types).check_exhaustiveness(&arms, ty).unwrap();
    assert_eq!(report.witnesses.len(), 5);
    assert!(report.truncated);
}

#[test]
fn no_arms_over_an_inhabited_type_yields_one_wildcard_witness() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, _, _) = bool_ty(&mut types, &mut interner);

    // An unconstrained column reports a plain wildcard, not one witness
    // per constructor.
    let report = ctx(&types).check_exhaustiveness(&[], ty).unwrap();
    assert_eq!(report.witnesses, vec![Pat::Wildcard]);
    assert!(!report.truncated);
}

#[test]
fn witness_cap_of_zero_still_reports_a_witness() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, t, f) = bool_ty(&mut types, &mut interner);

    let config = AnalysisConfig {
        max_witnesses: 0,
        ..AnalysisConfig::default()
    };
    let mut ctx = UsefulnessCtx::new(&types, &config);
    let report = ctx
        .check_exhaustiveness(&[variant(t, 0, vec![])], ty)
        .unwrap();
    assert!(!report.is_exhaustive());
    assert_eq!(report.witnesses, vec![variant(f, 1, vec![])]);
}

#[test]
fn step_budget_aborts_analysis() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, t, f) = bool_ty(&mut types, &mut interner);

    let config = AnalysisConfig {
        step_budget: Some(1),
        ..AnalysisConfig::default()
    };
    let mut ctx = UsefulnessCtx::new(&types, &config);
    let arms = [variant(t, 0, vec![]), variant(f, 1, vec![])];
    assert_eq!(
        ctx.check_exhaustiveness(&arms, ty),
        Err(MatchError::AnalysisBudgetExceeded)
    );
}

#[test]
fn repeated_queries_hit_the_memo_without_changing_results() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (ty, some, none) = option_int(&mut types, &mut interner);

    let earlier = [variant(some, 0, vec![Pat::Wildcard])];
    let mut ctx = ctx(&types);
    let first = ctx.is_useful(&earlier, &variant(none, 1, vec![]), ty).unwrap();
    let second = ctx.is_useful(&earlier, &variant(none, 1, vec![]), ty).unwrap();
    assert!(first);
    assert_eq!(first, second);
}
