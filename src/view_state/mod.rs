//! View-state layer: cell geometry and list row bookkeeping.
//!
//! # Module Structure
//!
//! - `types`: Point, Size, Rect, EdgeInsets
//! - `text`: styled fragments and the `TextMeasurer` seam
//! - `rating`: pre-rendered star strips
//! - `layout_params`: fixed cell geometry
//! - `cell_config`: ReviewCellConfig and the record mapping
//! - `layout`: ReviewCellLayout and frame computation
//! - `height_index`: O(log n) prefix sums via Fenwick tree
//! - `list_view`: row heights driven by store events
//! - `pagination`: scroll-distance trigger

pub mod cell_config;
pub mod height_index;
pub mod layout;
pub mod layout_params;
pub mod list_view;
pub mod pagination;
pub mod rating;
pub mod text;
pub mod types;
