//! Member and class modifiers
//!
//! Modifier sets are bitflags in the same shape as access flags in a class
//! file. Keywords render in canonical source order.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Modifier flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers (package-private)
    pub const NONE: Self = Self(0x0000);
    /// `public`
    pub const PUBLIC: Self = Self(0x0001);
    /// `private`
    pub const PRIVATE: Self = Self(0x0002);
    /// `protected`
    pub const PROTECTED: Self = Self(0x0004);
    /// `static`
    pub const STATIC: Self = Self(0x0008);
    /// `final`
    pub const FINAL: Self = Self(0x0010);
    /// `synchronized`
    pub const SYNCHRONIZED: Self = Self(0x0020);
    /// `volatile`
    pub const VOLATILE: Self = Self(0x0040);
    /// `transient`
    pub const TRANSIENT: Self = Self(0x0080);
    /// `native`
    pub const NATIVE: Self = Self(0x0100);
    /// `abstract`
    pub const ABSTRACT: Self = Self(0x0400);

    /// Mask of the three visibility flags
    pub const VISIBILITY_MASK: Self = Self(0x0007);

    /// Keywords in canonical source order
    const ORDER: [(Self, &'static str); 10] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::ABSTRACT, "abstract"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::TRANSIENT, "transient"),
        (Self::VOLATILE, "volatile"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::NATIVE, "native"),
    ];

    /// Create from raw bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any flag of `other` is set
    pub const fn intersects(&self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Union of modifiers
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Flags set in both
    pub const fn intersection(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Whether no flag is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `public` set
    pub const fn is_public(&self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// `private` set
    pub const fn is_private(&self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// `protected` set
    pub const fn is_protected(&self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// `static` set
    pub const fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    /// `final` set
    pub const fn is_final(&self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Resolved visibility
    pub const fn visibility(&self) -> Visibility {
        if self.is_public() {
            Visibility::Public
        } else if self.is_protected() {
            Visibility::Protected
        } else if self.is_private() {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    /// Whether any visibility keyword was written
    pub const fn has_explicit_visibility(&self) -> bool {
        self.intersects(Self::VISIBILITY_MASK)
    }

    /// Parse a single keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ORDER
            .iter()
            .find(|(_, kw)| *kw == s)
            .map(|(flag, _)| *flag)
    }

    /// Keywords of the set flags in canonical order
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::ORDER
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, kw)| *kw)
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kw in self.keywords() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(kw)?;
            first = false;
        }
        Ok(())
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// no keyword
    Package,
    /// `private`
    Private,
}

impl Visibility {
    /// Keyword used in diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package-private",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
