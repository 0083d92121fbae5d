// OPS envelope codec: `dt_assoc` / `dt_array` trees to and from XML.

mod reader;
mod value;
mod writer;

pub use reader::parse_data_block;
pub use value::{Assoc, OpsValue};
pub use writer::write_envelope;
