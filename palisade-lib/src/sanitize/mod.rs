pub mod headers;
pub mod markup;

pub use headers::{apply_directives, build_directives, HeaderDirective, HeaderOp};
pub use markup::{filter_links, trim_head, LinkTag};
