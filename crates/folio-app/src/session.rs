//! An editing session: canvas, drag engine and export backend.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::ui::UiAction;
use folio_core::{
    Block, BlockId, Canvas, PageNumber, SequentialIds, SimulatedDragEngine, VisualTree,
};
use folio_render::{export_document, DocumentRasterizer, ExportOptions, ExportedDocument, PdfRasterizer};
use kurbo::{Point, Vec2};

/// Result of a dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    BlockAdded(BlockId),
    PageAdded(PageNumber),
    PageSelected(PageNumber),
    /// A drag finished (or was cancelled) with the block at this offset.
    Moved { block: BlockId, offset: Vec2 },
    /// The link selection after a click.
    LinkSelection(Option<BlockId>),
    /// Whether a link URL was written.
    LinkUpdated(bool),
    Exported(ExportedDocument),
}

pub struct Session<R: DocumentRasterizer = PdfRasterizer> {
    canvas: Canvas,
    drag: SimulatedDragEngine,
    rasterizer: R,
    export: ExportOptions,
    /// Block ids in creation order, as referenced by actions.
    created: Vec<BlockId>,
}

impl Session<PdfRasterizer> {
    /// Start a session with a single empty page.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let rasterizer = PdfRasterizer::new().with_metrics(config.page);
        Self::with_rasterizer(config, rasterizer)
    }
}

impl<R: DocumentRasterizer> Session<R> {
    pub fn with_rasterizer(config: &AppConfig, rasterizer: R) -> AppResult<Self> {
        let mut canvas = if config.sequential_ids {
            Canvas::with_ids(SequentialIds::new(), config.canvas_config())?
        } else {
            Canvas::new(config.canvas_config())?
        };
        canvas.add_page()?;
        log::info!("Started {} session", config.title);

        Ok(Self {
            canvas,
            drag: SimulatedDragEngine::new(),
            rasterizer,
            export: config.export_options(),
            created: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn drag_engine(&self) -> &SimulatedDragEngine {
        &self.drag
    }

    /// Block ids in creation order.
    pub fn created(&self) -> &[BlockId] {
        &self.created
    }

    fn block(&self, index: usize) -> AppResult<&Block> {
        self.created
            .get(index)
            .and_then(|id| self.canvas.block(id))
            .ok_or_else(|| AppError::InvalidAction(format!("No block #{}", index)))
    }

    /// Run one action to completion.
    pub async fn dispatch(&mut self, action: UiAction) -> AppResult<ActionOutcome> {
        log::debug!("Dispatching {:?}", action);
        match action {
            UiAction::AddBlock { kind } => {
                let block = self.canvas.add_block_tag(&kind, &mut self.drag)?;
                self.created.push(block.id.clone());
                Ok(ActionOutcome::BlockAdded(block.id))
            }
            UiAction::AddPage => Ok(ActionOutcome::PageAdded(self.canvas.add_page()?)),
            UiAction::SelectPage { page } => {
                self.canvas.set_current_page(page)?;
                Ok(ActionOutcome::PageSelected(page))
            }
            UiAction::Drag { block, path } => self.drag_along(block, &path, false),
            UiAction::CancelDrag { block, path } => self.drag_along(block, &path, true),
            UiAction::Click { block, link } => {
                let node = match block {
                    Some(index) => {
                        let container = self.block(index)?.node;
                        if link {
                            self.canvas
                                .tree()
                                .children(container)
                                .first()
                                .copied()
                                .unwrap_or(container)
                        } else {
                            container
                        }
                    }
                    None => self.canvas.root(),
                };
                self.canvas.click(node);
                Ok(ActionOutcome::LinkSelection(self.canvas.link().target().cloned()))
            }
            UiAction::SetLinkUrl { url } => Ok(ActionOutcome::LinkUpdated(self.canvas.submit_link_url(&url)?)),
            UiAction::Download => Ok(ActionOutcome::Exported(self.download().await?)),
        }
    }

    /// Replay a gesture through the drag engine and apply its moves.
    fn drag_along(&mut self, index: usize, path: &[Point], cancel: bool) -> AppResult<ActionOutcome> {
        let id = self.block(index)?.id.clone();
        let (&start, rest) = path
            .split_first()
            .ok_or_else(|| AppError::InvalidAction("Drag path is empty".to_string()))?;

        let bounds = self.canvas.drag_bounds(&id)?;
        let offset = self.canvas.offset(&id).unwrap_or(Vec2::ZERO);
        if !self.drag.begin(&id, start, offset, Some(bounds)) {
            return Err(AppError::InvalidAction(format!("{} cannot be dragged", id)));
        }
        for &point in rest {
            self.drag.move_to(point);
        }
        if cancel {
            self.drag.cancel();
        } else {
            self.drag.end();
        }

        let applied = self.canvas.pump_drag_events(&mut self.drag);
        let offset = self.canvas.offset(&id).unwrap_or(Vec2::ZERO);
        log::debug!("Drag of {} applied {} moves, offset ({}, {})", id, applied, offset.x, offset.y);
        Ok(ActionOutcome::Moved { block: id, offset })
    }

    /// Export every page.
    pub async fn download(&self) -> AppResult<ExportedDocument> {
        let tree: &dyn VisualTree = self.canvas.tree();
        Ok(export_document(&self.rasterizer, tree, self.canvas.root(), &self.export).await?)
    }

    /// Remove a block by creation index.
    pub fn remove_block(&mut self, index: usize) -> AppResult<BlockId> {
        let id = self.block(index)?.id.clone();
        self.canvas.remove_block(&id, &mut self.drag)?;
        Ok(id)
    }

    /// Dispatch actions in order, stopping at the first failure.
    pub async fn run_script(&mut self, actions: Vec<UiAction>) -> AppResult<Vec<ActionOutcome>> {
        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            outcomes.push(self.dispatch(action).await?);
        }
        Ok(outcomes)
    }
}
