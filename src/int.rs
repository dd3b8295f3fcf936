//! Integer wrappers selecting a non-default wire encoding
//!
//! A bare integer field is encoded as a plain varint (`int32`, `uint64`, and
//! so forth). Wrapping it selects one of the two alternatives instead:
//!
//!   * [`Signed<T>`]: zigzag-mapped varint (`sint32`, `sint64`), which keeps
//!     small negative numbers short.
//!   * [`Fixed<T>`]: raw little-endian bytes of the full width (`fixed32`,
//!     `sfixed64`, and so forth).
//!
//! Both wrappers are `#[repr(transparent)]` and deref to the underlying
//! integer. They also carry the usual arithmetic, bitwise and shift
//! operators, against both `Self` and `T`, so that a wrapped field can be used
//! in expressions without unwrapping it first.
//!
//! The [`Value`](crate::conv::Value) implementations for these types live in
//! [`crate::conv`].

use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

#[cfg(feature = "serde_impls")]
use serde::{Deserialize, Serialize};

/// Integer encoded as a zigzag varint
///
/// Implemented over `i8`, `i16` and `i32` (all carried as `sint32`) and `i64`
/// (carried as `sint64`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Signed<T>(pub T);

/// Integer encoded as raw little-endian bytes of its full width
///
/// Implemented over `bool`, `u8`, `u16` and `u32` (all carried as
/// `fixed32`), `i8`, `i16` and `i32` (`sfixed32`), `u64` (`fixed64`) and
/// `i64` (`sfixed64`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Fixed<T>(pub T);

macro_rules! wrapper_common {
    ($wrap:ident) => {
        impl<T> $wrap<T> {
            #[inline]
            #[must_use]
            pub const fn new(val: T) -> Self {
                Self(val)
            }

            #[inline]
            #[must_use]
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T: Copy> $wrap<T> {
            #[inline]
            #[must_use]
            pub const fn get(&self) -> T {
                self.0
            }
        }

        impl<T> From<T> for $wrap<T> {
            fn from(val: T) -> Self {
                Self(val)
            }
        }

        impl<T> Deref for $wrap<T> {
            type Target = T;

            fn deref(&self) -> &T {
                &self.0
            }
        }

        impl<T> DerefMut for $wrap<T> {
            fn deref_mut(&mut self) -> &mut T {
                &mut self.0
            }
        }

        impl<T: Display> Display for $wrap<T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

wrapper_common!(Signed);
wrapper_common!(Fixed);

macro_rules! binop {
    ($wrap:ident, $tr:ident, $meth:ident, $tr_assign:ident, $meth_assign:ident) => {
        impl<T: std::ops::$tr<Output = T>> std::ops::$tr for $wrap<T> {
            type Output = Self;

            fn $meth(self, rhs: Self) -> Self {
                $wrap(std::ops::$tr::$meth(self.0, rhs.0))
            }
        }

        impl<T: std::ops::$tr<Output = T>> std::ops::$tr<T> for $wrap<T> {
            type Output = Self;

            fn $meth(self, rhs: T) -> Self {
                $wrap(std::ops::$tr::$meth(self.0, rhs))
            }
        }

        impl<T: std::ops::$tr_assign> std::ops::$tr_assign for $wrap<T> {
            fn $meth_assign(&mut self, rhs: Self) {
                std::ops::$tr_assign::$meth_assign(&mut self.0, rhs.0)
            }
        }

        impl<T: std::ops::$tr_assign> std::ops::$tr_assign<T> for $wrap<T> {
            fn $meth_assign(&mut self, rhs: T) {
                std::ops::$tr_assign::$meth_assign(&mut self.0, rhs)
            }
        }
    };
}

macro_rules! all_binops {
    ($wrap:ident) => {
        binop!($wrap, Add, add, AddAssign, add_assign);
        binop!($wrap, Sub, sub, SubAssign, sub_assign);
        binop!($wrap, Mul, mul, MulAssign, mul_assign);
        binop!($wrap, Div, div, DivAssign, div_assign);
        binop!($wrap, Rem, rem, RemAssign, rem_assign);
        binop!($wrap, BitAnd, bitand, BitAndAssign, bitand_assign);
        binop!($wrap, BitOr, bitor, BitOrAssign, bitor_assign);
        binop!($wrap, BitXor, bitxor, BitXorAssign, bitxor_assign);

        impl<T: std::ops::Not<Output = T>> std::ops::Not for $wrap<T> {
            type Output = Self;

            fn not(self) -> Self {
                $wrap(!self.0)
            }
        }

        impl<T: std::ops::Neg<Output = T>> std::ops::Neg for $wrap<T> {
            type Output = Self;

            fn neg(self) -> Self {
                $wrap(-self.0)
            }
        }

        impl<T: std::ops::Shl<u32, Output = T>> std::ops::Shl<u32> for $wrap<T> {
            type Output = Self;

            fn shl(self, rhs: u32) -> Self {
                $wrap(self.0 << rhs)
            }
        }

        impl<T: std::ops::Shr<u32, Output = T>> std::ops::Shr<u32> for $wrap<T> {
            type Output = Self;

            fn shr(self, rhs: u32) -> Self {
                $wrap(self.0 >> rhs)
            }
        }
    };
}

all_binops!(Signed);
all_binops!(Fixed);

// Plain integer on the left-hand side, e.g. `1 + Signed(2)`.
macro_rules! lhs_binops {
    ($wrap:ident, $($t:ty),+) => {
        $(
            impl std::ops::Add<$wrap<$t>> for $t {
                type Output = $wrap<$t>;

                fn add(self, rhs: $wrap<$t>) -> $wrap<$t> {
                    $wrap(self + rhs.0)
                }
            }

            impl std::ops::Sub<$wrap<$t>> for $t {
                type Output = $wrap<$t>;

                fn sub(self, rhs: $wrap<$t>) -> $wrap<$t> {
                    $wrap(self - rhs.0)
                }
            }

            impl std::ops::Mul<$wrap<$t>> for $t {
                type Output = $wrap<$t>;

                fn mul(self, rhs: $wrap<$t>) -> $wrap<$t> {
                    $wrap(self * rhs.0)
                }
            }

            impl PartialEq<$t> for $wrap<$t> {
                fn eq(&self, other: &$t) -> bool {
                    self.0 == *other
                }
            }
        )+
    };
}

lhs_binops!(Signed, i8, i16, i32, i64);
lhs_binops!(Fixed, u8, u16, u32, i8, i16, i32, u64, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let mut x = Signed(5i32);
        x += 3;
        assert_eq!(x, 8);
        x -= Signed(10);
        assert_eq!(x, Signed(-2));
        assert_eq!(-x, 2);
        assert_eq!(x * 4, -8);
        assert_eq!(10i32 - x, Signed(12));
        assert_eq!(Signed(1i64) << 40, 1i64 << 40);

        let f = Fixed(0xf0u32) | Fixed(0x0f);
        assert_eq!(f, 0xff);
        assert_eq!(!Fixed(0u64), u64::MAX);
        assert_eq!(*f + 1, 0x100);
        assert_eq!(f.get(), 0xff);
        assert_eq!(f.to_string(), "255");
    }
}
