//! View registry
//!
//! Routes name their views with plain descriptors. The registry maps those
//! names to drawing functions. Each view draws into the area it is given and
//! returns the area its child view should draw into, so a route's view chain
//! nests outermost first.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use libmoonwave::{Route, State, ViewDescriptor};
use ratatui::{layout::Rect, Frame};

use crate::error::{Result, TuiError};

/// What every view receives besides its area
#[derive(Debug, Clone, Copy)]
pub struct ViewProps<'a> {
    pub state: &'a State,
    pub route: &'a Route,
}

/// Draws a view and returns the inner area for its child
pub type ViewFn = Rc<dyn Fn(&mut Frame, Rect, &ViewProps) -> Rect>;

#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<String, ViewFn>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: impl Into<String>, view: F) -> Self
    where
        F: Fn(&mut Frame, Rect, &ViewProps) -> Rect + 'static,
    {
        self.views.insert(name.into(), Rc::new(view));
        self
    }

    pub fn get(&self, descriptor: &ViewDescriptor) -> Option<ViewFn> {
        self.views.get(descriptor.name()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Look up every view of a chain before anything is drawn
    pub fn resolve(&self, chain: &[ViewDescriptor]) -> Result<Vec<ViewFn>> {
        chain
            .iter()
            .map(|descriptor| {
                self.get(descriptor)
                    .ok_or_else(|| TuiError::UnknownView(descriptor.name().to_string()))
            })
            .collect()
    }

    /// Draw a resolved chain, each view inside the area its parent returned
    pub fn draw_chain(frame: &mut Frame, views: &[ViewFn], props: &ViewProps) {
        let mut area = frame.area();
        for view in views {
            area = view(frame, area, props);
        }
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.views.keys().collect();
        names.sort();
        f.debug_struct("ViewRegistry").field("views", &names).finish()
    }
}
