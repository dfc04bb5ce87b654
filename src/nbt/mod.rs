//! Named binary tag trees and their wire codec.

pub mod codec;
pub mod float;
pub mod io;
mod string;
mod tag;
mod tag_type;

pub use io::{decode, encode, print_tag, read_file, write_file};
pub use string::NbtString;
pub use tag::{Compound, List, Tag, Value};
pub use tag_type::TagType;
