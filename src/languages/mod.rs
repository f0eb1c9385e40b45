pub mod colors;
pub mod lines;

pub use colors::language_color;
pub use lines::{bytes_per_line, estimate_lines, FALLBACK_BYTES_PER_LINE};
