//! Folio Core Library
//!
//! Platform-agnostic page, block and position state for the Folio page
//! builder. Blocks are composed into a [`VisualTree`], dragged freely inside
//! their page through a [`DragEngine`], and tracked by offset per page.

pub mod canvas;
pub mod composer;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod items;
pub mod layout;
pub mod link;
pub mod pages;
pub mod positions;
pub mod selection;
pub mod snap;
pub mod tree;

pub use canvas::{Canvas, CanvasConfig, CanvasSnapshot, PAGE_CLASS, ROOT_ID};
pub use composer::{compose_block, Block};
pub use error::{FolioError, FolioResult};
pub use ids::{BlockId, IdGenerator, RandomIds, SequentialIds};
pub use interaction::{DragEngine, DragHandle, DragMoveEvent, DragOptions, Restriction, SimulatedDragEngine};
pub use items::{create_fragment, BlockKind, Fragment};
pub use layout::{BlockBox, PageMetrics, Primitive, TextRun, TextStyle};
pub use link::LinkTarget;
pub use pages::{PageNumber, PageRegistry};
pub use positions::PositionStore;
pub use selection::{PageOption, PageSelection};
pub use snap::{snap_point, snap_to_grid, SnapRange, GRID_SIZE};
pub use tree::{MemoryTree, NodeId, TreeError, TreeResult, VisualTree};
