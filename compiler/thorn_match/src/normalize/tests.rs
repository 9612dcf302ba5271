#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use thorn_ir::{
    Constructor, Lit, Name, Pat, PatId, PatternArena, RawPattern, Span, StringInterner,
    TypeDescriptor, TypeId, TypeTable,
};

use super::NormalizeCtx;
use crate::MatchError;

fn wild(arena: &mut PatternArena) -> PatId {
    arena.alloc(RawPattern::Wildcard, Span::DUMMY)
}

fn rest(arena: &mut PatternArena) -> PatId {
    arena.alloc(RawPattern::Rest, Span::DUMMY)
}

fn lit_int(arena: &mut PatternArena, value: i64) -> PatId {
    arena.alloc(RawPattern::Literal(Lit::Int(value)), Span::DUMMY)
}

fn bind(arena: &mut PatternArena, name: Name) -> PatId {
    arena.alloc(RawPattern::Binding { name, sub: None }, Span::DUMMY)
}

fn int_ty(types: &mut TypeTable) -> TypeId {
    types.add(TypeDescriptor::IntegerLike { lo: None, hi: None })
}

/// `Option<int>` with `Some` at index 0 and `None` at index 1.
fn option_int(
    types: &mut TypeTable,
    interner: &mut StringInterner,
) -> (TypeId, Name, Name) {
    let int = int_ty(types);
    let some = interner.intern("Some");
    let none = interner.intern("None");
    let option = types.add(TypeDescriptor::finite(vec![
        Constructor {
            name: some,
            fields: vec![int],
        },
        Constructor::nullary(none),
    ]));
    (option, some, none)
}

#[test]
fn rest_expands_in_tuple_middle() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);
    let quad = types.add(TypeDescriptor::Tuple(vec![int, int, int, int]));

    let mut arena = PatternArena::new();
    let one = lit_int(&mut arena, 1);
    let dots = rest(&mut arena);
    let four = lit_int(&mut arena, 4);
    let pat = arena.alloc(RawPattern::Tuple(vec![one, dots, four]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, quad).unwrap(),
        Pat::Tuple(vec![
            Pat::Lit(Lit::Int(1)),
            Pat::Wildcard,
            Pat::Wildcard,
            Pat::Lit(Lit::Int(4)),
        ])
    );
}

#[test]
fn rest_expands_in_constructor_args() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (option, some, _) = option_int(&mut types, &mut interner);

    let mut arena = PatternArena::new();
    let dots = rest(&mut arena);
    let pat = arena.alloc(
        RawPattern::Ctor {
            name: some,
            args: vec![dots],
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, option).unwrap(),
        Pat::Variant {
            name: some,
            index: 0,
            fields: vec![Pat::Wildcard],
        }
    );
}

#[test]
fn two_rests_in_one_list_are_ambiguous() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);
    let triple = types.add(TypeDescriptor::Tuple(vec![int, int, int]));

    let mut arena = PatternArena::new();
    let a = rest(&mut arena);
    let b = rest(&mut arena);
    let pat = arena.alloc(RawPattern::Tuple(vec![a, b]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert!(matches!(
        ctx.normalize(pat, triple),
        Err(MatchError::AmbiguousRest { .. })
    ));
}

#[test]
fn rest_outside_a_sibling_list_is_misplaced() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);

    let mut arena = PatternArena::new();
    let pat = rest(&mut arena);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert!(matches!(
        ctx.normalize(pat, int),
        Err(MatchError::MisplacedRest { .. })
    ));
}

#[test]
fn arity_mismatch_without_rest() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);
    let triple = types.add(TypeDescriptor::Tuple(vec![int, int, int]));

    let mut arena = PatternArena::new();
    let a = lit_int(&mut arena, 1);
    let b = lit_int(&mut arena, 2);
    let pat = arena.alloc(RawPattern::Tuple(vec![a, b]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert!(matches!(
        ctx.normalize(pat, triple),
        Err(MatchError::ArityMismatch {
            expected: 3,
            found: 2,
            ..
        })
    ));
}

#[test]
fn record_fields_reordered_shorthand_and_completed() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let x = interner.intern("x");
    let y = interner.intern("y");
    let z = interner.intern("z");
    let point = types.add(TypeDescriptor::Record(vec![(x, int), (y, int), (z, int)]));

    let mut arena = PatternArena::new();
    let one = lit_int(&mut arena, 1);
    let pat = arena.alloc(
        RawPattern::Record {
            fields: vec![(z, Some(one)), (x, None)],
            rest: true,
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, point).unwrap(),
        Pat::Record {
            fields: vec![
                (x, Pat::binding(x)),
                (y, Pat::Wildcard),
                (z, Pat::Lit(Lit::Int(1))),
            ],
        }
    );
}

#[test]
fn record_missing_field_without_rest_is_an_arity_mismatch() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let x = interner.intern("x");
    let y = interner.intern("y");
    let point = types.add(TypeDescriptor::Record(vec![(x, int), (y, int)]));

    let mut arena = PatternArena::new();
    let pat = arena.alloc(
        RawPattern::Record {
            fields: vec![(x, None)],
            rest: false,
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert!(matches!(
        ctx.normalize(pat, point),
        Err(MatchError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

#[test]
fn record_rejects_unknown_and_duplicate_fields() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let x = interner.intern("x");
    let w = interner.intern("w");
    let point = types.add(TypeDescriptor::Record(vec![(x, int)]));

    let mut arena = PatternArena::new();
    let unknown = arena.alloc(
        RawPattern::Record {
            fields: vec![(w, None)],
            rest: true,
        },
        Span::DUMMY,
    );
    let duplicate = arena.alloc(
        RawPattern::Record {
            fields: vec![(x, None), (x, None)],
            rest: false,
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(unknown, point),
        Err(MatchError::UnknownField {
            name: w,
            span: Span::DUMMY,
        })
    );
    assert_eq!(
        ctx.normalize(duplicate, point),
        Err(MatchError::DuplicateField {
            name: x,
            span: Span::DUMMY,
        })
    );
}

#[test]
fn unknown_constructor_is_rejected() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (option, _, _) = option_int(&mut types, &mut interner);
    let bogus = interner.intern("Sum");

    let mut arena = PatternArena::new();
    let pat = arena.alloc(
        RawPattern::Ctor {
            name: bogus,
            args: vec![],
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, option),
        Err(MatchError::UnknownConstructor {
            name: bogus,
            span: Span::DUMMY,
        })
    );
}

#[test]
fn or_alternatives_must_bind_the_same_names() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let a = interner.intern("a");

    let mut arena = PatternArena::new();
    let with = bind(&mut arena, a);
    let without = wild(&mut arena);
    let pat = arena.alloc(RawPattern::Or(vec![with, without]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, int),
        Err(MatchError::OrPatternBindingMismatch {
            name: a,
            span: Span::DUMMY,
        })
    );
}

#[test]
fn or_alternatives_must_bind_at_the_same_types() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let other = types.add(TypeDescriptor::Opaque);
    let pair = types.add(TypeDescriptor::Tuple(vec![int, other]));
    let v = interner.intern("v");

    let mut arena = PatternArena::new();
    let left_bind = bind(&mut arena, v);
    let left_wild = wild(&mut arena);
    let left = arena.alloc(RawPattern::Tuple(vec![left_bind, left_wild]), Span::DUMMY);
    let right_wild = wild(&mut arena);
    let right_bind = bind(&mut arena, v);
    let right = arena.alloc(RawPattern::Tuple(vec![right_wild, right_bind]), Span::DUMMY);
    let pat = arena.alloc(RawPattern::Or(vec![left, right]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, pair),
        Err(MatchError::OrPatternBindingMismatch {
            name: v,
            span: Span::DUMMY,
        })
    );
}

#[test]
fn or_with_consistent_bindings_normalizes() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (option, some, none) = option_int(&mut types, &mut interner);

    let mut arena = PatternArena::new();
    let some_arg = wild(&mut arena);
    let some_pat = arena.alloc(
        RawPattern::Ctor {
            name: some,
            args: vec![some_arg],
        },
        Span::DUMMY,
    );
    let none_pat = arena.alloc(
        RawPattern::Ctor {
            name: none,
            args: vec![],
        },
        Span::DUMMY,
    );
    let pat = arena.alloc(RawPattern::Or(vec![some_pat, none_pat]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, option).unwrap(),
        Pat::Or(vec![
            Pat::Variant {
                name: some,
                index: 0,
                fields: vec![Pat::Wildcard],
            },
            Pat::Variant {
                name: none,
                index: 1,
                fields: vec![],
            },
        ])
    );
}

#[test]
fn single_alternative_or_collapses() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);

    let mut arena = PatternArena::new();
    let one = lit_int(&mut arena, 1);
    let pat = arena.alloc(RawPattern::Or(vec![one]), Span::DUMMY);

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(ctx.normalize(pat, int).unwrap(), Pat::Lit(Lit::Int(1)));
}

#[test]
fn range_validation() {
    let mut types = TypeTable::new();
    let int = int_ty(&mut types);

    let mut arena = PatternArena::new();
    let reversed = arena.alloc(
        RawPattern::Range {
            lo: 5,
            hi: 1,
            inclusive: true,
        },
        Span::DUMMY,
    );
    let empty = arena.alloc(
        RawPattern::Range {
            lo: 3,
            hi: 3,
            inclusive: false,
        },
        Span::DUMMY,
    );
    let singleton = arena.alloc(
        RawPattern::Range {
            lo: 3,
            hi: 3,
            inclusive: true,
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert!(matches!(
        ctx.normalize(reversed, int),
        Err(MatchError::InvalidRangePattern { lo: 5, hi: 1, .. })
    ));
    assert!(matches!(
        ctx.normalize(empty, int),
        Err(MatchError::InvalidRangePattern { lo: 3, hi: 3, .. })
    ));
    assert_eq!(
        ctx.normalize(singleton, int).unwrap(),
        Pat::Range {
            lo: 3,
            hi: 3,
            inclusive: true,
        }
    );
}

#[test]
fn canonical_input_passes_through_unchanged() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let (option, some, _) = option_int(&mut types, &mut interner);

    // Fully explicit surface pattern: exact arity, no rest, no shorthand.
    let mut arena = PatternArena::new();
    let arg = lit_int(&mut arena, 3);
    let pat = arena.alloc(
        RawPattern::Ctor {
            name: some,
            args: vec![arg],
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    let canonical = ctx.normalize(pat, option).unwrap();
    assert_eq!(
        canonical,
        Pat::Variant {
            name: some,
            index: 0,
            fields: vec![Pat::Lit(Lit::Int(3))],
        }
    );
}

#[test]
fn binding_keeps_its_sub_pattern() {
    let mut types = TypeTable::new();
    let mut interner = StringInterner::new();
    let int = int_ty(&mut types);
    let n = interner.intern("n");

    let mut arena = PatternArena::new();
    let range = arena.alloc(
        RawPattern::Range {
            lo: 1,
            hi: 5,
            inclusive: true,
        },
        Span::DUMMY,
    );
    let pat = arena.alloc(
        RawPattern::Binding {
            name: n,
            sub: Some(range),
        },
        Span::DUMMY,
    );

    let ctx = NormalizeCtx::new(&arena, &types);
    assert_eq!(
        ctx.normalize(pat, int).unwrap(),
        Pat::Binding {
            name: n,
            sub: Box::new(Pat::Range {
                lo: 1,
                hi: 5,
                inclusive: true,
            }),
        }
    );
}
