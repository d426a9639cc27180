// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A declarative macro for the small flag sets used across the renderer API.

/// Declares a copyable flag-set newtype over an unsigned integer.
///
/// The generated type exposes one associated constant per flag, `EMPTY`,
/// the usual set queries and the `|`, `&` and `|=` operators. Its `Debug`
/// output lists the names of the set flags, e.g. `SamplerFlags { CLAMP_S | FILTER }`.
#[macro_export]
#[doc(hidden)]
macro_rules! tessera_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// A set with no flag raised.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Builds a set from raw bits. Unknown bits are preserved.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits }
            }

            /// The raw bit pattern.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// `true` when every flag of `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` when `self` and `other` share at least one flag.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Raises the flags of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }
        }

        impl ::core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl ::core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl ::core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let mut rest = self.bits;
                let mut first = true;
                write!(f, "{} {{ ", stringify!($name))?;
                $(
                    if $flag_value != 0 && (rest & $flag_value) == $flag_value {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        rest &= !$flag_value;
                        first = false;
                    }
                )*
                if rest != 0 {
                    if !first {
                        write!(f, " | ")?;
                    }
                    write!(f, "UNKNOWN({:#x})", rest)?;
                    first = false;
                }
                if first {
                    write!(f, "EMPTY")?;
                }
                write!(f, " }}")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::tessera_bitflags;

    tessera_bitflags! {
        /// Flags used only by these tests.
        pub struct Channels: u16 {
            const RED = 1 << 0;
            const GREEN = 1 << 1;
            const BLUE = 1 << 2;
        }
    }

    #[test]
    fn test_empty_set() {
        let flags = Channels::default();
        assert!(flags.is_empty());
        assert_eq!(flags, Channels::EMPTY);
        assert_eq!(format!("{flags:?}"), "Channels { EMPTY }");
    }

    #[test]
    fn test_union_and_queries() {
        let flags = Channels::RED | Channels::BLUE;
        assert_eq!(flags.bits(), 0b101);
        assert!(flags.contains(Channels::RED));
        assert!(!flags.contains(Channels::RED | Channels::GREEN));
        assert!(flags.intersects(Channels::RED | Channels::GREEN));
        assert!(!flags.intersects(Channels::GREEN));
        assert_eq!((flags & Channels::BLUE), Channels::BLUE);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut flags = Channels::GREEN;
        flags.insert(Channels::RED);
        flags |= Channels::BLUE;
        assert_eq!(flags.bits(), 0b111);
        flags.remove(Channels::GREEN);
        assert_eq!(flags, Channels::RED | Channels::BLUE);
    }

    #[test]
    fn test_debug_lists_names_and_unknown_bits() {
        let flags = Channels::GREEN | Channels::from_bits_truncate(0x40);
        assert_eq!(format!("{flags:?}"), "Channels { GREEN | UNKNOWN(0x40) }");
    }
}
