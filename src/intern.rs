//! String interning.
//!
//! Interned strings are reference counted, so an atom stays valid after
//! the interner that produced it is dropped.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use hashbrown::HashSet;
use rustc_hash::FxBuildHasher;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringAtom(Rc<str>);

impl StringAtom {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both atoms came from the same interner entry.
    #[inline]
    pub fn ptr_eq(&self, other: &StringAtom) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for StringAtom {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StringAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for StringAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Default)]
pub struct Interner {
    strings: HashSet<Rc<str>, FxBuildHasher>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> StringAtom {
        StringAtom(self.strings.get_or_insert_with(s, |s| Rc::from(s)).clone())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.strings.iter()).finish()
    }
}
