use super::layout::{BOOL_STENCIL, CONST_POINTER_STENCIL, FLOAT_STENCIL, INT_STENCIL, POINTER_STENCIL};
use super::prefix::{type_prefix, ValueWidth};
use crate::handle::{ConstHandle, Handle};


/// Raw bits a [`Primitive`] can be made of
///
/// Conversions have to be lossless for every value of the type, `from_bits` only ever sees
/// bits produced by `to_bits` (masked to `BITS`) when the codec is used correctly.
pub trait Payload: Copy {
    const BITS: u32;

    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_payload_unsigned {
    ( $($T:ty),* $(,)? ) => { $(
        impl Payload for $T {
            const BITS: u32 = <$T>::BITS;

            fn to_bits(self) -> u64 {
                self as u64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $T
            }
        }
    )* };
}

macro_rules! impl_payload_signed {
    ( $($T:ty => $U:ty),* $(,)? ) => { $(
        impl Payload for $T {
            const BITS: u32 = <$T>::BITS;

            fn to_bits(self) -> u64 {
                // noop cast to the unsigned variant and zero extend
                (self as $U) as u64
            }

            fn from_bits(bits: u64) -> Self {
                // truncate and noop cast to signed
                (bits as $U) as $T
            }
        }
    )* };
}

impl_payload_unsigned! { u8, u16, u32 }
impl_payload_signed! { i8 => u8, i16 => u16, i32 => u32 }

impl Payload for f32 {
    const BITS: u32 = 32;

    fn to_bits(self) -> u64 {
        f32::to_bits(self) as u64
    }

    fn from_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl Payload for bool {
    const BITS: u32 = 1;

    fn to_bits(self) -> u64 {
        self as u64
    }

    fn from_bits(bits: u64) -> Self {
        bits & 0x1 != 0
    }
}


/// Types which can be boxed into a [`Word`](crate::Word)
///
/// Every type gets a *stencil*: the type prefix for its `WIDTH` and `TYPE_OFFSET`. Boxing ORs
/// the payload into the stencil, unboxing masks the payload back out.
///
/// Types of the same width must use different offsets, each stencil has to be unique. This is
/// not checked, the built-in types take these:
///
/// | Type          | Width | Offset | Stencil                 |
/// |---------------|-------|--------|-------------------------|
/// | `i32`         | 32    | 0      | `0x7FF8_0400_0000_0000` |
/// | `f32`         | 32    | 1      | `0x7FF8_0401_0000_0000` |
/// | `bool`        | 2     | 0      | `0x7FF8_0000_0800_0000` |
/// | `Handle`      | 48    | 0      | `0x7FFC_0000_0000_0000` |
/// | `ConstHandle` | 48    | 1      | `0x7FFD_0000_0000_0000` |
///
/// Host types usually implement it with [`derive@crate::Primitive`].
pub trait Primitive: Copy {
    const WIDTH: ValueWidth;
    const TYPE_OFFSET: u64;
    const STENCIL: u64 = type_prefix(Self::WIDTH, Self::TYPE_OFFSET);

    /// Name for debugging purposes
    const NAME: &'static str;

    /// Payload bits, anything above `WIDTH` is masked off when boxing
    fn to_payload(self) -> u64;
    fn from_payload(payload: u64) -> Self;
}


impl Primitive for i32 {
    const WIDTH: ValueWidth = ValueWidth::new_const(32);
    const TYPE_OFFSET: u64 = 0;
    const NAME: &'static str = "Int32";

    fn to_payload(self) -> u64 {
        Payload::to_bits(self)
    }

    fn from_payload(payload: u64) -> Self {
        Payload::from_bits(payload)
    }
}

impl Primitive for f32 {
    const WIDTH: ValueWidth = ValueWidth::new_const(32);
    const TYPE_OFFSET: u64 = 1;
    const NAME: &'static str = "Float32";

    fn to_payload(self) -> u64 {
        Payload::to_bits(self)
    }

    fn from_payload(payload: u64) -> Self {
        Payload::from_bits(payload)
    }
}

// A single bit would need an odd width, bool takes the 2 bit class and leaves
// bit 1 of the payload clear.
impl Primitive for bool {
    const WIDTH: ValueWidth = ValueWidth::new_const(2);
    const TYPE_OFFSET: u64 = 0;
    const NAME: &'static str = "Bool";

    fn to_payload(self) -> u64 {
        Payload::to_bits(self)
    }

    fn from_payload(payload: u64) -> Self {
        Payload::from_bits(payload)
    }
}

impl Primitive for Handle {
    const WIDTH: ValueWidth = ValueWidth::MAX;
    const TYPE_OFFSET: u64 = 0;
    const NAME: &'static str = "Handle";

    fn to_payload(self) -> u64 {
        self.to_bits()
    }

    fn from_payload(payload: u64) -> Self {
        Handle::from_bits(payload)
    }
}

impl Primitive for ConstHandle {
    const WIDTH: ValueWidth = ValueWidth::MAX;
    const TYPE_OFFSET: u64 = 1;
    const NAME: &'static str = "ConstHandle";

    fn to_payload(self) -> u64 {
        self.to_bits()
    }

    fn from_payload(payload: u64) -> Self {
        ConstHandle::from_bits(payload)
    }
}

const _STENCIL_SANITY_CHECK: () = {
    assert!(<i32 as Primitive>::STENCIL == INT_STENCIL);
    assert!(<f32 as Primitive>::STENCIL == FLOAT_STENCIL);
    assert!(<bool as Primitive>::STENCIL == BOOL_STENCIL);
    assert!(<Handle as Primitive>::STENCIL == POINTER_STENCIL);
    assert!(<ConstHandle as Primitive>::STENCIL == CONST_POINTER_STENCIL);
};


#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::{BOOL_MASK, NAN_VALUE};
    use crate::prefix::type_prefix_mask;
    use crate::Word;

    /// Deterministic sample of 32 bit patterns
    fn sample_u32() -> impl Iterator<Item = u32> {
        let mut state = 0x2545_F491_u32;
        let random = std::iter::from_fn(move || {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Some(state)
        });

        [0, 1, 0x7FFF_FFFF, 0x8000_0000, 0xFFFF_FFFF]
            .into_iter()
            .chain(random.take(10_000))
    }

    #[test]
    fn int_round_trip() {
        let edges = [0, 1, -1, 42, i32::MIN, i32::MAX];
        for i in edges.into_iter().chain(sample_u32().map(|bits| bits as i32)) {
            let word = Word::from(i);
            assert!(word.is_boxed(), "{}", i);
            assert_eq!(word.unbox::<i32>(), i);
            assert_eq!(word.to_bits(), INT_STENCIL | i as u32 as u64);
        }
    }

    #[test]
    fn float_round_trip() {
        let edges = [
            0.0f32,
            -0.0,
            4.25,
            f32::MIN_POSITIVE,
            f32::from_bits(1), // smallest subnormal
            f32::from_bits(0x807F_FFFF), // largest negative subnormal
            f32::MAX,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NAN,
            f32::from_bits(0x7FC0_0001), // NaN with payload
            f32::from_bits(0xFF80_0001), // negative signalling NaN
        ];
        for f in edges.into_iter().chain(sample_u32().map(f32::from_bits)) {
            let word = Word::from(f);
            assert!(word.is_boxed(), "{:?}", f);
            assert_eq!(word.unbox::<f32>().to_bits(), f.to_bits());
            assert_eq!(word.to_bits(), FLOAT_STENCIL | f.to_bits() as u64);
        }
    }

    #[test]
    fn bool_round_trip() {
        for b in [false, true] {
            let word = Word::from(b);
            assert!(word.is_boxed());
            assert_eq!(word.unbox::<bool>(), b);
            assert_eq!(word.to_bits(), BOOL_STENCIL | b as u64);
            assert_eq!(word.to_bits() & BOOL_MASK, b as u64);
        }
    }

    #[test]
    fn int_and_float_stencils_are_exclusive() {
        let mask = type_prefix_mask(<i32 as Primitive>::WIDTH);

        for bits in sample_u32() {
            let int = Word::from(bits as i32);
            let float = Word::from(f32::from_bits(bits));

            assert_eq!(int.to_bits() & mask, INT_STENCIL);
            assert_eq!(float.to_bits() & mask, FLOAT_STENCIL);

            assert!(int.is::<i32>() && !int.is::<f32>());
            assert!(float.is::<f32>() && !float.is::<i32>());
            assert_eq!(int.downcast::<f32>(), None);
            assert_eq!(float.downcast::<i32>(), None);
        }
    }

    #[test]
    fn builtin_stencils_are_exclusive() {
        let words = [
            Word::from(-1i32),
            Word::from(f32::from_bits(u32::MAX)),
            Word::from(true),
            Word::from(Handle::from_bits(u64::MAX)),
            Word::from(ConstHandle::from_bits(u64::MAX)),
        ];

        for (i, word) in words.iter().enumerate() {
            let matches = [
                word.is::<i32>(),
                word.is::<f32>(),
                word.is::<bool>(),
                word.is::<Handle>(),
                word.is::<ConstHandle>(),
            ];
            for (j, matched) in matches.into_iter().enumerate() {
                assert_eq!(matched, i == j, "{:?} matched codec {}", word, j);
            }
        }
    }

    #[test]
    fn doubles_match_no_codec() {
        for n in [0.0f64, 1.0, f64::NAN, f64::INFINITY] {
            let word = Word::from_f64(n);
            assert!(!word.is::<i32>());
            assert!(!word.is::<bool>());
            assert!(!word.is::<Handle>());
        }
        assert_eq!(Word::from_bits(NAN_VALUE).downcast::<bool>(), None);
    }

    #[cfg(not(feature = "checked-unbox"))]
    #[test]
    fn mismatched_unbox_is_garbage() {
        // no error, just the payload bits read as the wrong type
        let word = Word::from(4.25f32);
        assert_eq!(word.unbox::<i32>(), 4.25f32.to_bits() as i32);
        assert!(!Word::from(2i32).unbox::<bool>());
    }

    #[cfg(feature = "checked-unbox")]
    #[test]
    #[should_panic]
    fn mismatched_unbox_panics() {
        let _ = Word::from(4.25f32).unbox::<i32>();
    }

    #[test]
    fn payload_bits() {
        assert_eq!(Payload::to_bits(-1i8), 0xFF);
        assert_eq!(<i8 as Payload>::from_bits(0xFF), -1);
        assert_eq!(Payload::to_bits(-2i16), 0xFFFE);
        assert_eq!(<i16 as Payload>::from_bits(0xFFFE), -2);
        assert_eq!(<u16 as Payload>::from_bits(0x1_FFFF), 0xFFFF);
        assert_eq!(<bool as Payload>::from_bits(0b10), false);
        assert_eq!(<bool as Payload>::BITS, 1);
    }
}
