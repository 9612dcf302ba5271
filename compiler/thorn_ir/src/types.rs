//! Type descriptors: the constructor space of a scrutinee's type.
//!
//! The pattern core does not own a type system. It receives a read-only
//! lookup capability ([`TypeResolver`]) from the embedding compiler and asks
//! it one question: "what values can this type have?" — answered by a
//! [`TypeDescriptor`]. [`TypeTable`] is the straightforward Vec-backed
//! implementation used by the driver and by tests.

use crate::Name;

/// Identifier for a resolved type, assigned by the external type checker.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One constructor of a [`TypeDescriptor::Finite`] type.
///
/// Arity is fixed per constructor: `fields.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constructor {
    pub name: Name,
    pub fields: Vec<TypeId>,
}

impl Constructor {
    /// A constructor with no payload (e.g. `None`, `true`, unit).
    pub fn nullary(name: Name) -> Self {
        Constructor {
            name,
            fields: Vec::new(),
        }
    }

    /// Number of payload fields.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// The constructor space of a type, as seen by the pattern algorithms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Sum type with a fixed, enumerable constructor set. Booleans and unit
    /// are 2- and 1-constructor `Finite` types.
    ///
    /// Constructor names within one descriptor are unique (checked by
    /// [`TypeDescriptor::finite`]).
    Finite(Vec<Constructor>),
    /// Product type with positional fields.
    Tuple(Vec<TypeId>),
    /// Product type with named fields, in canonical declaration order.
    Record(Vec<(Name, TypeId)>),
    /// Integer-like scalar with an ordered domain. `None` bounds mean the
    /// full `i64` range on that side.
    IntegerLike { lo: Option<i64>, hi: Option<i64> },
    /// Scalar with an infinite or unknown domain (strings, floats). Literal
    /// patterns over an opaque type can never be exhaustive.
    Opaque,
}

impl TypeDescriptor {
    /// Build a `Finite` descriptor, checking constructor-name uniqueness.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if two constructors share a name.
    pub fn finite(constructors: Vec<Constructor>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<Name> = constructors.iter().map(|c| c.name).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate constructor name in Finite descriptor"
        );
        TypeDescriptor::Finite(constructors)
    }

    /// Look up a constructor of a `Finite` descriptor by name.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "constructor count bounded far below u32::MAX"
    )]
    pub fn constructor_by_name(&self, name: Name) -> Option<(u32, &Constructor)> {
        match self {
            TypeDescriptor::Finite(ctors) => ctors
                .iter()
                .enumerate()
                .find(|(_, c)| c.name == name)
                .map(|(i, c)| (i as u32, c)),
            _ => None,
        }
    }

    /// Look up a constructor of a `Finite` descriptor by index.
    pub fn constructor(&self, index: u32) -> Option<&Constructor> {
        match self {
            TypeDescriptor::Finite(ctors) => ctors.get(index as usize),
            _ => None,
        }
    }

    /// The integer domain of an `IntegerLike` descriptor, inclusive.
    pub fn integer_domain(&self) -> Option<(i64, i64)> {
        match self {
            TypeDescriptor::IntegerLike { lo, hi } => {
                Some((lo.unwrap_or(i64::MIN), hi.unwrap_or(i64::MAX)))
            }
            _ => None,
        }
    }
}

/// Read-only lookup of type descriptors, supplied per analysis.
///
/// The descriptor registry lives in the embedding compiler; this core only
/// borrows it, holding no process-wide mutable state.
pub trait TypeResolver {
    /// Resolve a type to its constructor-space description.
    fn descriptor(&self, ty: TypeId) -> &TypeDescriptor;
}

/// Vec-backed [`TypeResolver`] used by the driver and by tests.
#[derive(Default)]
pub struct TypeTable {
    descriptors: Vec<TypeDescriptor>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, returning its id.
    pub fn add(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = u32::try_from(self.descriptors.len()).unwrap_or_else(|_| {
            panic!("type table exceeded capacity: {}", self.descriptors.len())
        });
        self.descriptors.push(descriptor);
        TypeId::from_raw(id)
    }
}

impl TypeResolver for TypeTable {
    fn descriptor(&self, ty: TypeId) -> &TypeDescriptor {
        static OPAQUE: TypeDescriptor = TypeDescriptor::Opaque;
        // Unknown ids resolve to Opaque: conservative, no false positives.
        self.descriptors.get(ty.raw() as usize).unwrap_or(&OPAQUE)
    }
}
