//! XML text helpers shared by the package writers.

mod escape;

pub use escape::escape_xml;
