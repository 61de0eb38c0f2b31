//! Bit-level constants of the word format.
//!
//! Boxed 32 bit integer `0x7FF8_0400_0000_002A`, most significant bit first:
//!
//! ```text
//! bit 63       sign, ignored
//! bits 62..52  exponent, all ones
//! bit 51       quiet bit, set
//! bits 50..43  zeros, 8 of them for a 32 bit payload
//! bit 42       indicator bit
//! bits 41..32  type offset, 10 bits
//! bits 31..0   payload
//! ```
//!
//! A word is a double as long as it stays at or below [`NAN_VALUE`] once the sign is cleared,
//! everything above it is a boxed value.

pub const ALL_ONES: u64 = 0xFFFF_FFFF_FFFF_FFFF;

/// Canonical quiet NaN, the largest sign-cleared pattern that is still a double
pub const NAN_VALUE: u64 = 0x7FF8_0000_0000_0000;

/// Low 51 bits, everything below the quiet bit
pub const MANTISSA_MASK: u64 = 0x0007_FFFF_FFFF_FFFF;

/// Clears the sign bit
pub const BOXED_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;

pub const SIGN_MASK: u64 = 0x8000_0000_0000_0000;

/// Indicator bit of the widest (48 bit) width class, narrower classes shift it right
pub const INDICATOR_BIT: u64 = 0x0004_0000_0000_0000;

/// Number of bits covered by [`MANTISSA_MASK`]
pub const MANTISSA_BITS: u32 = 51;

/// Returned by [`indicator_bit_position`](crate::prefix::indicator_bit_position) for doubles
pub const NO_INDICATOR: u32 = 64;


// Stencils of the built-in codecs. These have to stay bit-exact, anything else
// producing or consuming boxed words relies on them.

pub const INT_STENCIL: u64 = 0x7FF8_0400_0000_0000;
pub const FLOAT_STENCIL: u64 = 0x7FF8_0401_0000_0000;
pub const BOOL_STENCIL: u64 = 0x7FF8_0000_0800_0000;
pub const POINTER_STENCIL: u64 = 0x7FFC_0000_0000_0000;
pub const CONST_POINTER_STENCIL: u64 = 0x7FFD_0000_0000_0000;

pub const BOOL_MASK: u64 = 0x0000_0000_0000_0001;

pub const POINTER_BITS: u32 = 48;
pub const POINTER_MASK: u64 = !(ALL_ONES << POINTER_BITS);
