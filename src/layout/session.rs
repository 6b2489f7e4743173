use super::error::LayoutError;
use super::types::Layout;
use crate::selection::{NodeClick, Selection};

/// Identifies one layout request. Only the most recent ticket may install its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
}

/// Holds the rendered layout and the selection state between the core and the
/// rendering surface. Layout requests resolve latest-wins.
#[derive(Debug, Default)]
pub struct LayoutSession {
    latest: u64,
    current: Option<Layout>,
    selection: Option<Selection>,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LayoutTicket {
        self.latest += 1;
        LayoutTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LayoutTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Installs a finished layout. A failed layout keeps the previous one on
    /// screen and is returned to the caller; stale tickets are ignored either way.
    pub fn complete(
        &mut self,
        ticket: LayoutTicket,
        result: Result<Layout, LayoutError>,
    ) -> Result<Completion, LayoutError> {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding stale layout");
            return Ok(Completion::Stale);
        }
        let layout = result?;
        self.selection = Some(Selection::new(layout.edges.clone()));
        self.current = Some(layout);
        Ok(Completion::Applied)
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.current.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn click(&mut self, click: &NodeClick) -> bool {
        match self.selection.as_mut() {
            Some(selection) => selection.click(click),
            None => false,
        }
    }

    pub fn show_all(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.show_all();
        }
    }
}
