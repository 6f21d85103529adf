pub(crate) mod reader;
pub(crate) mod text;
pub(crate) mod xml;
pub(crate) mod zip;
