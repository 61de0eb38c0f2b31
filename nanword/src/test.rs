use crate::diagnostic::Report;
use crate::handle::{ConstPool, HandleTable};
use crate::literal::{parse, HexOutOfRange, IntOutOfRange, InvalidToken, LiteralKind};
use crate::prefix::{indicator_bit_position, type_prefix, type_prefix_mask, ValueWidth};
use crate::{ConstHandle, Handle, Primitive, Word};


/// Installs the test log subscriber, filtered through `RUST_LOG`
pub(crate) fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .without_time()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

macro_rules! if_ok {
    ( (Ok $($_:tt)*) $($tt:tt)* ) => { $($tt)* };
    ( (Err $($_:tt)*) $($__:tt)* ) => {};
}

macro_rules! parse {
    (
        $(#[$m:meta])*
        $name:ident,
        $code:literal,
        $($res:tt)*
    ) => {
        $(#[$m])*
        #[test]
        fn $name() {
            init();

            let src = unindent::unindent($code);
            let literals = parse(&src);

            if_ok! { ($($res)*)
                if let Err(errors) = &literals {
                    for err in errors {
                        err.report(&src);
                    }
                }
            }

            // Change the type from `Result<Vec<T>, Vec<E>>` to `Result<&[T], &[E]>` so we
            // can reasonably match on it.
            let res = match &literals {
                Ok(literals) => Ok(literals.as_slice()),
                Err(errors) => Err(errors.as_slice()),
            };
            assert!(matches!(res, $($res)*), "{:?}", res);
        }
    };
}


#[test]
fn demonstration() {
    assert!(!Word::from_f64(4.5).is_boxed());
    assert!(!crate::is_boxed(crate::layout::NAN_VALUE));
    assert_eq!(type_prefix(ValueWidth::new_const(32), 8), 0x7FF8_0408_0000_0000);

    assert_eq!(indicator_bit_position(0x7FFC_0000_0000_0000), 50);
    assert_eq!(indicator_bit_position(0x7FF8_4008_FFFF_FFFF), 46);
    for i in 0..51 {
        assert_eq!(indicator_bit_position(0x7FF8_0000_0000_0000 | 1 << i), i);
    }

    assert_eq!(Word::from(4.25f32).unbox::<f32>(), 4.25);
    assert_eq!(Word::from(42i32).unbox::<i32>(), 42);

    let word = Word::from_bits(0x7FF8_0408_FFFF_FFFF);
    assert_eq!(word.indicator_bit_position(), 42);
    assert_eq!(word.type_indicator_width(), 19);
    assert_eq!(word.type_prefix_width(), 32);
}

#[test]
fn prefix_table() {
    let table = ValueWidth::all()
        .rev()
        .map(|width| format!("value width = {}   type prefix = {:016X}", width, type_prefix(width, 0)))
        .collect::<Vec<_>>();

    assert_eq!(table.len(), 25);
    assert_eq!(table[0], "value width = 48   type prefix = 7FFC000000000000");
    assert_eq!(table[8], "value width = 32   type prefix = 7FF8040000000000");
    assert_eq!(table[23], "value width = 2   type prefix = 7FF8000008000000");
    assert_eq!(table[24], "value width = 0   type prefix = 7FF8000004000000");
}

#[test]
fn classification_is_idempotent() {
    let words = [
        Word::from_f64(-0.0),
        Word::from_f64(f64::NAN),
        Word::from(0i32),
        Word::from(f32::NAN),
        Word::from(false),
        Word::from_pointer_bits(0),
    ];
    for word in words {
        let again = Word::from_bits(word.to_bits());
        assert_eq!(again.is_boxed(), word.is_boxed());
        assert_eq!(again.is_boxed(), !again.is_double());
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Primitive)]
#[primitive(width = 32, offset = 2)]
struct Symbol(u32);

#[derive(Clone, Copy, Debug, PartialEq, Primitive)]
#[primitive(width = 8, offset = 3)]
struct Tag(i8);

#[test]
fn derived_stencils() {
    assert_eq!(Symbol::STENCIL, 0x7FF8_0402_0000_0000);
    assert_eq!(Symbol::NAME, "Symbol");
    assert_eq!(Tag::STENCIL, 0x7FF8_0000_4000_0300);
    assert_eq!(Tag::WIDTH.indicator_position(), 30);
}

#[test]
fn derived_round_trip() {
    let word = Word::from(Symbol(0xDEAD_BEEF));
    assert_eq!(word.downcast::<Symbol>(), Some(Symbol(0xDEAD_BEEF)));
    assert_eq!(word.downcast::<i32>(), None);
    assert_eq!(word.downcast::<f32>(), None);
    assert_eq!(word.to_bits() & type_prefix_mask(Symbol::WIDTH), Symbol::STENCIL);

    for i in [i8::MIN, -1, 0, 1, i8::MAX] {
        let word = Word::from(Tag(i));
        assert_eq!(word.unbox::<Tag>(), Tag(i));
        assert!(!word.is::<bool>() && !word.is::<Symbol>());
    }
}

#[test]
fn handles_in_words() {
    init();

    let mut table = HandleTable::new();
    let mut pool = ConstPool::new();

    let list = table.insert(vec![1, 2, 3]).unwrap();
    let name = pool.intern("name").unwrap();

    let words = [Word::from(list), Word::from(name), Word::from(list.as_const())];
    assert_eq!(words[0].downcast::<Handle>(), Some(list));
    assert_eq!(words[1].downcast::<ConstHandle>(), Some(name));
    assert_eq!(words[1].downcast::<Handle>(), None);

    table.get_mut(words[0].unbox()).unwrap().push(4);
    assert_eq!(table.get_const(words[2].unbox()).unwrap(), &[1, 2, 3, 4]);
    assert_eq!(pool.get(words[1].unbox()), Ok(&"name"));

    table.remove(list).unwrap();
    assert!(table.get(words[0].unbox()).is_err());
}


parse! {
    literals_empty,
    "
        # nothing but a comment
    ",
    Ok([]),
}

parse! {
    literals_mixed,
    "
        true, 42i32
        4.25f32 1.5
    ",
    Ok([a, b, c, d])
        if a.kind == LiteralKind::Bool
        && b.word == Word::from(42i32)
        && c.word.to_bits() == 0x7FF8_0401_4088_0000
        && d.word.to_f64() == Some(1.5),
}

parse! {
    literals_raw_words,
    "0x7ffc_0000_0000_0001 0x7ff8_0400_ffff_ffff",
    Ok([a, b])
        if a.word.downcast::<Handle>().map(Handle::index) == Some(1)
        && b.word.downcast::<i32>() == Some(-1),
}

parse! {
    literals_int_overflow,
    "-2147483649i32",
    Err([e]) if e.is::<IntOutOfRange>(),
}

parse! {
    literals_hex_overflow,
    "0x1_0000_0000_0000_0000",
    Err([e]) if e.is::<HexOutOfRange>(),
}

parse! {
    literals_invalid_token,
    "true -- false",
    Err([e, ..]) if e.is::<InvalidToken>(),
}
