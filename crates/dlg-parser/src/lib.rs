mod document;

pub use document::parse_document;
