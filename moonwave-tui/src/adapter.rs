//! Terminal view binding
//!
//! [`moonwave`] returns a builder whose render function draws the current
//! route's view chain onto a shared ratatui terminal and whose unrender
//! clears it. Everything else (state, routes, actions) is configured on the
//! returned builder as usual.

use std::cell::RefCell;
use std::rc::Rc;

use libmoonwave::{App, Moonwave, MoonwaveError, State};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, trace};

use crate::view::{ViewProps, ViewRegistry};

/// Mount target: the terminal every render draws on
pub type Root<B> = Rc<RefCell<Terminal<B>>>;

/// Builder pre-wired with terminal render and unrender
pub fn moonwave<B: Backend + 'static>(views: ViewRegistry) -> Moonwave<Root<B>> {
    Moonwave::new()
        .render(move |app: &App<Root<B>>| renderer(app, views.clone()))
        .unrender(|app: &App<Root<B>>| {
            debug!(app = %app.id(), "Clearing terminal");
            app.root()
                .borrow_mut()
                .clear()
                .map_err(|e| MoonwaveError::Render(e.to_string()))
        })
}

/// Wrap a terminal as a mount target
pub fn root<B: Backend>(terminal: Terminal<B>) -> Root<B> {
    Rc::new(RefCell::new(terminal))
}

fn renderer<B: Backend + 'static>(
    app: &App<Root<B>>,
    views: ViewRegistry,
) -> impl Fn(State) -> libmoonwave::Result<()> {
    let terminal = Rc::clone(app.root());
    let router = app.router();

    move |state: State| {
        // Nothing to draw until the router has delivered a route
        let route = match state.route() {
            Some(route) => route,
            None => return Ok(()),
        };

        let chain = router.data(&route.pattern);
        let resolved = views.resolve(&chain)?;
        let props = ViewProps {
            state: &state,
            route: &route,
        };

        trace!(pattern = %route.pattern, views = chain.len(), "Drawing view chain");
        terminal
            .borrow_mut()
            .draw(|frame| ViewRegistry::draw_chain(frame, &resolved, &props))
            .map_err(|e| MoonwaveError::Render(e.to_string()))?;
        Ok(())
    }
}
