//! Layout-to-structure reconstruction.
//!
//! Groups positioned fragments into lines, lines into paragraphs, splits
//! paragraphs into sentences and assigns each paragraph a semantic role.

mod classifier;
mod lines;
mod options;
mod paragraph;
mod reconstruct;
mod sentence;

pub use classifier::{BlockClassifier, ClassifyContext, FontStatistics, HeuristicClassifier};
pub use lines::{compose_line, group_fragments_into_lines, sort_lines, ComposedLine, Line};
pub use options::LayoutOptions;
pub use paragraph::{segment_paragraphs, Paragraph};
pub use reconstruct::{Reconstruction, Reconstructor};
pub use sentence::{SentenceSplitter, SplitResult};
