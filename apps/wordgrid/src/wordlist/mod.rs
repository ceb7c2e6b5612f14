// Wordlist files: loading, discovery, and the chunk builder.

pub mod builder;
pub mod source;

pub use builder::{build_wordlists, default_sources, BuildRequest, CHUNK_SIZE};
pub use source::{discover_wordlists, load_lines};
