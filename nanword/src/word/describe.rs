use std::fmt::{self, Display};

use super::Word;
use crate::handle::{ConstHandle, Handle};


/// Field by field breakdown of a [`Word`], see [`Word::describe`]
///
/// ```rust
/// # use nanword::Word;
/// assert_eq!(
///     Word::from(42i32).describe().to_string(),
///     "boxed indicator=42 width=32 offset=0x0 payload=0x2a Int32(42)",
/// );
/// assert_eq!(Word::from_f64(-2.5).describe().to_string(), "double -2.5");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Describe(Word);

impl Describe {
    pub(super) fn new(word: Word) -> Describe {
        Describe(word)
    }
}

impl Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = self.0;

        if let Some(n) = word.to_f64() {
            return write!(f, "double {:?}", n);
        }

        let layout = match word.layout() {
            Some(layout) => layout,
            None => {
                return write!(
                    f,
                    "boxed indicator={} (no width class)",
                    word.indicator_bit_position(),
                )
            },
        };

        f.write_str("boxed")?;
        if layout.sign {
            // the stencils of the built-in codecs all have the sign bit clear
            f.write_str(" sign")?;
        }
        write!(
            f,
            " indicator={} width={} offset={:#x} payload={:#x}",
            word.indicator_bit_position(),
            layout.width,
            layout.type_offset,
            layout.payload,
        )?;

        if let Some(i) = word.downcast::<i32>() {
            write!(f, " Int32({})", i)
        } else if let Some(n) = word.downcast::<f32>() {
            write!(f, " Float32({:?})", n)
        } else if let Some(b) = word.downcast::<bool>() {
            write!(f, " Bool({})", b)
        } else if let Some(h) = word.downcast::<Handle>() {
            write!(f, " {:?}", h)
        } else if let Some(h) = word.downcast::<ConstHandle>() {
            write!(f, " {:?}", h)
        } else {
            Ok(())
        }
    }
}
