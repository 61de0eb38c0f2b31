//! Type prefix algebra
//!
//! Everything in a boxed word except the payload is its *type prefix*. The prefix is made of
//! the NaN marker, a single *indicator bit* and a *type offset*. The position of the indicator
//! bit encodes how wide the payload is, the offset tells apart types of the same width.
//!
//! Narrower payloads leave more room for the offset, every 2 bits taken from the payload move
//! the indicator down by one and make the offset field one bit wider.
//!
//! ```rust
//! # use nanword::prefix::{type_prefix, indicator_bit_position};
//! # use nanword::ValueWidth;
//! let width = ValueWidth::new(32).unwrap();
//!
//! let prefix = type_prefix(width, 8);
//! assert_eq!(prefix, 0x7FF8_0408_0000_0000);
//! assert_eq!(indicator_bit_position(prefix), 42);
//! ```

use std::error;
use std::fmt::{self, Debug, Display};

use super::is_double;
use super::layout::{
    ALL_ONES, INDICATOR_BIT, MANTISSA_BITS, MANTISSA_MASK, NAN_VALUE, NO_INDICATOR, SIGN_MASK,
};


pub const MAX_VALUE_WIDTH: u32 = 48;


/// Width of a payload in bits
///
/// Only even widths from 0 to 48 (inclusive) have a width class. Odd widths would need to
/// share an indicator position with their even neighbour and widths above 48 leave no room for
/// the type offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueWidth(u32);

impl ValueWidth {
    pub const MIN: ValueWidth = ValueWidth(0);
    pub const MAX: ValueWidth = ValueWidth(MAX_VALUE_WIDTH);

    pub const fn new(bits: u32) -> Result<ValueWidth, PrefixError> {
        if bits > MAX_VALUE_WIDTH {
            Err(PrefixError::WidthOutOfRange { bits })
        } else if bits % 2 != 0 {
            Err(PrefixError::OddWidth { bits })
        } else {
            Ok(ValueWidth(bits))
        }
    }

    /// Same as [`ValueWidth::new`] but panics on an invalid width
    ///
    /// Meant for constants, where the panic turns into a compile error.
    ///
    /// ```rust,compile_fail
    /// # use nanword::ValueWidth;
    /// const ODD: ValueWidth = ValueWidth::new_const(31);
    /// # let _ = ODD;
    /// ```
    pub const fn new_const(bits: u32) -> ValueWidth {
        match ValueWidth::new(bits) {
            Ok(width) => width,
            Err(PrefixError::OddWidth { .. }) => panic!("value width must be even"),
            Err(_) => panic!("value width must be at most 48 bits"),
        }
    }

    /// All width classes, narrowest first
    pub fn all() -> impl DoubleEndedIterator<Item = ValueWidth> {
        (0..MAX_VALUE_WIDTH + 1).step_by(2).map(ValueWidth)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Zero bits between the quiet bit and the indicator
    const fn numb_zeros(self) -> u32 {
        let indicator_length = MANTISSA_BITS - self.0;
        indicator_length / 2 - 1
    }

    /// Bit index of the indicator bit for this width class
    pub const fn indicator_position(self) -> u32 {
        INDICATOR_BIT.trailing_zeros() - self.numb_zeros()
    }

    /// Finds the width class with its indicator at `position`
    pub const fn from_indicator_position(position: u32) -> Option<ValueWidth> {
        let lowest = ValueWidth::MIN.indicator_position();
        let highest = ValueWidth::MAX.indicator_position();

        if position < lowest || position > highest {
            None
        } else {
            Some(ValueWidth(2 * (position - lowest)))
        }
    }

    /// Width of the type offset field in bits
    pub const fn offset_width(self) -> u32 {
        self.numb_zeros() + 2
    }

    pub const fn max_type_offset(self) -> u64 {
        !(ALL_ONES << self.offset_width())
    }

    /// Mask of the payload bits
    pub const fn payload_mask(self) -> u64 {
        !type_prefix_mask(self)
    }
}

impl Debug for ValueWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueWidth({})", self.0)
    }
}

impl Display for ValueWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for ValueWidth {
    type Error = PrefixError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        ValueWidth::new(bits)
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixError {
    OddWidth { bits: u32 },
    WidthOutOfRange { bits: u32 },
    OffsetOverflow { width: ValueWidth, offset: u64 },
}

impl Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixError::OddWidth { bits } => {
                write!(f, "value width {} is odd, only even widths have a width class", bits)
            },
            PrefixError::WidthOutOfRange { bits } => {
                write!(f, "value width {} is wider than {} bits", bits, MAX_VALUE_WIDTH)
            },
            PrefixError::OffsetOverflow { width, offset } => write!(
                f,
                "type offset {:#x} doesn't fit {} bits available for value width {}",
                offset,
                width.offset_width(),
                width,
            ),
        }
    }
}

impl error::Error for PrefixError {}


/// Leading bits of a boxed value of `width`, everything except the payload
///
/// Bits of `type_offset` which don't fit in the offset field are silently dropped, see
/// [`try_type_prefix`] for the checked version.
pub const fn type_prefix(width: ValueWidth, type_offset: u64) -> u64 {
    let indicator_bit = INDICATOR_BIT >> width.numb_zeros();

    let masked_type_offset = width.max_type_offset() & type_offset;
    let positioned_type_offset = masked_type_offset << width.bits();

    NAN_VALUE | indicator_bit | positioned_type_offset
}

pub const fn try_type_prefix(width: ValueWidth, type_offset: u64) -> Result<u64, PrefixError> {
    if type_offset > width.max_type_offset() {
        Err(PrefixError::OffsetOverflow { width, offset: type_offset })
    } else {
        Ok(type_prefix(width, type_offset))
    }
}

/// Mask extracting the type prefix out of a boxed value of `width`
pub const fn type_prefix_mask(width: ValueWidth) -> u64 {
    ALL_ONES << width.bits()
}

/// Position (0-50) of the indicator bit of a boxed value
///
/// Returns [`NO_INDICATOR`] (64) for doubles.
///
/// The indicator is found as the highest set bit below the quiet bit, which only holds for
/// words built from a [`type_prefix`]. On any other boxed word the top payload bit is reported
/// instead.
pub const fn indicator_bit_position(word: u64) -> u32 {
    if is_double(word) {
        return NO_INDICATOR;
    }

    // a boxed word always has some mantissa bit set, otherwise it would compare equal to
    // NAN_VALUE and classify as a double
    let mantissa = word & MANTISSA_MASK;
    if mantissa == 0 {
        return NO_INDICATOR;
    }

    63 - mantissa.leading_zeros()
}

/// Total width of the indicator and type offset region of the word's width class
///
/// Negative for doubles.
pub const fn type_indicator_width(word: u64) -> i32 {
    2 * (MANTISSA_BITS as i32 - indicator_bit_position(word) as i32) + 1
}

/// Mantissa bits outside the type indicator region
pub const fn type_prefix_width(word: u64) -> i32 {
    MANTISSA_BITS as i32 - type_indicator_width(word)
}


/// Fields of a boxed word
///
/// Classification ignores the sign bit, so it's kept as its own field. No built-in stencil has
/// it set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub sign: bool,
    pub width: ValueWidth,
    pub type_offset: u64,
    pub payload: u64,
}

impl Layout {
    /// Splits a boxed word into its fields
    ///
    /// Returns `None` for doubles and for boxed words whose indicator bit doesn't belong to any
    /// width class.
    pub const fn decode(word: u64) -> Option<Layout> {
        let width = match ValueWidth::from_indicator_position(indicator_bit_position(word)) {
            Some(width) => width,
            None => return None,
        };

        Some(Layout {
            sign: word & SIGN_MASK != 0,
            width,
            type_offset: (word >> width.bits()) & width.max_type_offset(),
            payload: word & width.payload_mask(),
        })
    }

    pub const fn prefix(&self) -> u64 {
        type_prefix(self.width, self.type_offset)
    }

    pub const fn encode(&self) -> u64 {
        let sign = if self.sign { SIGN_MASK } else { 0 };
        sign | self.prefix() | (self.payload & self.width.payload_mask())
    }
}
