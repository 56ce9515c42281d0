//! Analysis of rendered types: shape, short labels, and references

pub mod classify;
pub mod references;
pub mod short_label;

pub use classify::{count_top_level_pipes, BracketDepth, TypeShape};
pub use references::{collect, expand, should_expand, Definitions, TypeReference};
pub use short_label::{name_label, short_label, short_label_for_node, LabelNames};
