//! Data model for positioned input and reconstructed output.
//!
//! Input side: [`RawFragment`] as decoded from the caller, validated into
//! [`Fragment`]. Output side: [`Page`] of classified [`Block`]s, each holding
//! [`Sentence`]s that are either plain strings or styled [`Span`] runs.

mod document;
mod fragment;
mod page;
mod sentence;

pub use document::Document;
pub use fragment::{Fragment, RawFragment};
pub use page::{Block, BlockType, Page};
pub use sentence::{push_span, Sentence, Span};
