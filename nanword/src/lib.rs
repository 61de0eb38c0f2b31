// every payload is plain bits, pointers are replaced by handles
#![forbid(unsafe_code)]

// lets the derive macro refer to `::nanword` from inside this crate too
extern crate self as nanword;


pub mod diagnostic;
pub mod handle;
pub mod lexer;
pub mod literal;
pub mod span;
mod word;

pub use word::describe::Describe;
pub use word::layout;
pub use word::prefix::{self, Layout, PrefixError, ValueWidth};
pub use word::primitive::{Payload, Primitive};
pub use word::{is_boxed, is_double, Word};

pub use handle::{ConstHandle, ConstPool, Handle, HandleError, HandleTable};

// derive macros
pub use nanword_macro::Primitive;


#[cfg(test)]
mod test;
