use std::fmt::{self, Debug};

pub mod describe;
pub mod layout;
pub mod prefix;
pub mod primitive;

use describe::Describe;
use layout::{BOXED_MASK, CONST_POINTER_STENCIL, NAN_VALUE, POINTER_MASK, POINTER_STENCIL, SIGN_MASK};
use prefix::{type_prefix_mask, Layout};
use primitive::Primitive;


/// Returns `true` for boxed values and `false` for doubles
pub const fn is_boxed(word: u64) -> bool {
    (word & BOXED_MASK) > NAN_VALUE
}

pub const fn is_double(word: u64) -> bool {
    !is_boxed(word)
}


/// A double or a boxed value in a single 64 bit word
///
/// Any [`Primitive`] converts into a `Word` with [`From`], doubles go through
/// [`Word::from_f64`].
///
/// ```rust
/// # use nanword::Word;
/// let int = Word::from(42i32);
/// assert!(int.is_boxed());
/// assert_eq!(int.to_bits(), 0x7FF8_0400_0000_002A);
/// assert_eq!(int.downcast::<i32>(), Some(42));
/// assert_eq!(int.downcast::<f32>(), None);
///
/// let double = Word::from_f64(4.5);
/// assert!(double.is_double());
/// assert_eq!(double.to_f64(), Some(4.5));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Word(u64);

#[cfg(test)]
#[test]
fn word_size() {
    use std::mem::size_of;

    assert_eq!(size_of::<Word>(), size_of::<u64>());
    assert_eq!(size_of::<Word>(), 8);
}

impl Word {
    pub const fn from_bits(bits: u64) -> Word {
        Word(bits)
    }

    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Stores a double
    ///
    /// NaNs with a payload that would classify as boxed are replaced by the canonical quiet
    /// NaN with the same sign, all other doubles are stored bit for bit.
    pub fn from_f64(n: f64) -> Word {
        let bits = n.to_bits();
        if is_boxed(bits) {
            Word((bits & SIGN_MASK) | NAN_VALUE)
        } else {
            Word(bits)
        }
    }

    pub fn to_f64(self) -> Option<f64> {
        if self.is_double() {
            Some(f64::from_bits(self.0))
        } else {
            None
        }
    }

    pub const fn is_boxed(self) -> bool {
        is_boxed(self.0)
    }

    pub const fn is_double(self) -> bool {
        is_double(self.0)
    }

    /// Returns `true` if the type prefix of the word is the stencil of `P`
    pub fn is<P: Primitive>(&self) -> bool {
        self.0 & type_prefix_mask(P::WIDTH) == P::STENCIL
    }

    /// Unboxes the payload if the word holds a `P`
    pub fn downcast<P: Primitive>(self) -> Option<P> {
        if self.is::<P>() {
            Some(self.unbox::<P>())
        } else {
            None
        }
    }

    /// Unboxes the payload as `P` without checking the type prefix
    ///
    /// The word has to come from boxing a `P`, anything else yields an arbitrary `P` made from
    /// whatever bits are in the payload region. With the `checked-unbox` feature a mismatch
    /// panics instead.
    ///
    /// ```rust
    /// # use nanword::Word;
    /// assert_eq!(Word::from(-7i32).unbox::<i32>(), -7);
    /// ```
    pub fn unbox<P: Primitive>(self) -> P {
        #[cfg(feature = "checked-unbox")]
        assert!(self.is::<P>(), "unboxing {:?} as {}", self, P::NAME);

        P::from_payload(self.0 & P::WIDTH.payload_mask())
    }

    /// Boxes the low 48 bits of `bits` as a mutable pointer payload
    pub const fn from_pointer_bits(bits: u64) -> Word {
        Word(POINTER_STENCIL | (bits & POINTER_MASK))
    }

    /// Boxes the low 48 bits of `bits` as a const pointer payload
    pub const fn from_const_pointer_bits(bits: u64) -> Word {
        Word(CONST_POINTER_STENCIL | (bits & POINTER_MASK))
    }

    /// Payload of either pointer variant
    pub const fn pointer_bits(self) -> u64 {
        self.0 & POINTER_MASK
    }

    /// See [`prefix::indicator_bit_position`]
    pub const fn indicator_bit_position(self) -> u32 {
        prefix::indicator_bit_position(self.0)
    }

    /// See [`prefix::type_indicator_width`]
    pub const fn type_indicator_width(self) -> i32 {
        prefix::type_indicator_width(self.0)
    }

    /// See [`prefix::type_prefix_width`]
    pub const fn type_prefix_width(self) -> i32 {
        prefix::type_prefix_width(self.0)
    }

    pub const fn layout(self) -> Option<Layout> {
        Layout::decode(self.0)
    }

    /// Human readable breakdown of the word's fields
    pub fn describe(self) -> Describe {
        Describe::new(self)
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_f64() {
            Some(n) => f.debug_tuple("Word").field(&n).finish(),
            None => write!(f, "Word({:#018x})", self.0),
        }
    }
}

impl<P: Primitive> From<P> for Word {
    fn from(p: P) -> Self {
        Word(P::STENCIL | (p.to_payload() & P::WIDTH.payload_mask()))
    }
}

impl From<Word> for u64 {
    fn from(word: Word) -> Self {
        word.0
    }
}
