pub(crate) mod buffer;
pub(crate) mod cubic;
pub(crate) mod parser;
pub(crate) mod serialize;
