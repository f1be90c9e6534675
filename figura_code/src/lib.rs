// Figura structural-code codec.
//
// A structural code is a comma-separated list of signed integer tokens, one
// per position of a figural structure. Runs of identical tokens may be packed
// as `<count>*<value>`, so `"3*1,0"` and `"1,1,1,0"` describe the same
// structure. This crate converts between the two forms and parses codes into
// digit vectors. It knows nothing about systems or structures beyond the
// `order`/`degree` bounds passed into the parsers.
//
// Module overview:
// - `codec.rs`: Tokenizer, lazy run expansion, `pack`/`unpack`, and rendering
//               of digit slices to flat or packed codes.
// - `parse.rs`: Lenient (`parse_digits`) and strict (`parse_digits_strict`)
//               conversion of codes to digit vectors.
// - `error.rs`: `CodeError`, returned only by the strict parser.
//
// Guarantee: `pack(&unpack(code)) == code` for every code produced by
// `render_packed` or `pack`. Arbitrary external strings get no such promise;
// the lenient parser drops what it cannot read.

pub mod codec;
pub mod error;
pub mod parse;

pub use codec::{
    RUN_MARK, SEPARATOR, expand, pack, render, render_packed, token_count, tokens, unpack,
};
pub use error::CodeError;
pub use parse::{parse_digits, parse_digits_strict, parse_values};
