// Grid layout: 4×8 pages of word/image cells rendered to HTML.
// Pure and synchronous; PDF output lives in `render`.

pub mod candidates;
pub mod combined;
pub mod document;
pub mod paginator;
pub mod template;

// Re-export the public API consumed by the grid command.
pub use candidates::CandidatePolicy;
pub use combined::combine_wordlists;
pub use document::render_document;
pub use paginator::{paginate, Page};
pub use template::{GridTemplate, PageSpec};
