pub mod document;
pub mod link_extractor;
pub mod snippet;

pub use document::{Document, ElementExt, HtmlParser, ScraperHtmlParser};
pub use link_extractor::LinkExtractor;
