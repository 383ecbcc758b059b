//! Routes and navigation
//!
//! Pages are addressed by hash paths (`#employee/bills`) inside the document
//! and by plain paths (`/employee/bills`) over HTTP. Controllers navigate
//! through a [`Navigator`] they receive at construction.

pub mod app;

use crate::views::{ActiveIcon, Document, ViewRenderer};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

pub use app::{App, Page};

/// A page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Bills,
    NewBill,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Bills, Route::NewBill];

    /// Hash path used inside the document
    pub fn path(&self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }

    /// Path served over HTTP
    pub fn url(&self) -> &'static str {
        match self {
            Route::Bills => "/employee/bills",
            Route::NewBill => "/employee/bill/new",
        }
    }

    /// Route for a hash path or HTTP path
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.path() == path || r.url() == path)
    }

    pub fn active_icon(&self) -> ActiveIcon {
        match self {
            Route::Bills => ActiveIcon::Bills,
            Route::NewBill => ActiveIcon::NewBill,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Something that can switch the current page
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Renders a route's static view into a document
///
/// The Bills page is rendered without data: fetching belongs to
/// [`App::on_navigate`].
#[derive(Clone)]
pub struct RouteNavigator {
    document: Document,
    renderer: Arc<ViewRenderer>,
}

impl RouteNavigator {
    pub fn new(document: Document, renderer: Arc<ViewRenderer>) -> Self {
        Self { document, renderer }
    }
}

/// Static markup for `route`, or an error page when rendering fails
pub fn render_route(renderer: &ViewRenderer, route: Route) -> String {
    let rendered = match route {
        Route::Bills => renderer.bills(&[]),
        Route::NewBill => renderer.new_bill(),
    };
    rendered.unwrap_or_else(|e| renderer.error(route.active_icon(), &e.to_string()))
}

impl Navigator for RouteNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigating");
        self.document.set_body(render_route(&self.renderer, route));
    }
}

/// Records navigations without rendering anything
#[derive(Debug, Clone, Default)]
pub struct NavigationLog {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
