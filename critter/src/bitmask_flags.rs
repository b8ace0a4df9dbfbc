use num_traits::{One, PrimInt};

/// A flag enum whose variants each own exactly one bit of `Storage`.
///
/// The enum discriminant (via `#[repr(u8)]`) is the bit index, so two distinct
/// variants can never share a bit. Composite states are expressed by holding
/// several flags at once, never by giving a flag a multi-bit value.
pub trait FlagBitmask: Copy {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of single-bit flags backed by a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    /// Builds a set containing every flag in `flags`.
    pub fn of<U: FlagBitmask<Storage = T>>(flags: &[U]) -> Self {
        let mut set = Self::empty();
        for &flag in flags {
            set.add(flag);
        }
        set
    }

    pub fn bits(&self) -> T {
        self.bits
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }
}

/// Declare a single-bit flag enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```rust
/// critter::define_bitmask_flags!(Sense, u8, {
///     Sight,
///     Smell,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}
