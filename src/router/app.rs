//! Page assembly
//!
//! [`App`] plays the part of the single-page shell: on each navigation it
//! loads the session, shows the loading view and mounts the controller of
//! the requested page on a shared [`Document`].
//!
//! Controllers navigate synchronously. The shell's navigator shows the
//! loading view and records the route; [`App::settle`] then mounts it.

use super::{Navigator, Route};
use crate::containers::{BillsController, NewBillController};
use crate::core::error::BilledResult;
use crate::core::session::{SessionStorage, UserSession};
use crate::core::store::BillStore;
use crate::core::validation::AttachmentPolicy;
use crate::views::{Document, ViewRenderer};
use std::sync::{Arc, Mutex, PoisonError};

/// A mounted page and its controller
pub enum Page {
    Bills(BillsController),
    NewBill(NewBillController),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Bills(_) => Route::Bills,
            Page::NewBill(_) => Route::NewBill,
        }
    }

    pub fn document(&self) -> &Document {
        match self {
            Page::Bills(c) => c.document(),
            Page::NewBill(c) => c.document(),
        }
    }
}

/// Navigator handed to the shell's controllers
struct ShellNavigator {
    document: Document,
    renderer: Arc<ViewRenderer>,
    pending: Arc<Mutex<Option<Route>>>,
}

impl Navigator for ShellNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigation requested");
        let loading = self
            .renderer
            .loading(route.active_icon())
            .unwrap_or_else(|e| self.renderer.error(route.active_icon(), &e.to_string()));
        self.document.set_body(loading);
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

/// The employee application shell
#[derive(Clone)]
pub struct App {
    document: Document,
    renderer: Arc<ViewRenderer>,
    store: Arc<dyn BillStore>,
    sessions: Arc<dyn SessionStorage>,
    attachments: AttachmentPolicy,
    pending: Arc<Mutex<Option<Route>>>,
}

impl App {
    pub fn new(
        store: Arc<dyn BillStore>,
        sessions: Arc<dyn SessionStorage>,
        attachments: AttachmentPolicy,
    ) -> BilledResult<Self> {
        let renderer = Arc::new(ViewRenderer::with_policy(attachments.clone())?);
        Ok(Self {
            document: Document::new(),
            renderer,
            store,
            sessions,
            attachments,
            pending: Arc::new(Mutex::new(None)),
        })
    }

    /// A copy sharing store, sessions and templates, with its own document
    pub fn fork(&self) -> Self {
        Self {
            document: Document::new(),
            pending: Arc::new(Mutex::new(None)),
            ..self.clone()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn renderer(&self) -> &Arc<ViewRenderer> {
        &self.renderer
    }

    /// Navigator recording the next page to mount on this app
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::new(ShellNavigator {
            document: self.document.clone(),
            renderer: self.renderer.clone(),
            pending: self.pending.clone(),
        })
    }

    /// Route requested by a controller and not mounted yet
    pub fn pending(&self) -> Option<Route> {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mount the page a controller navigated to, if any
    pub async fn settle(&self) -> BilledResult<Option<Page>> {
        let route = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match route {
            Some(route) => self.on_navigate(route).await.map(Some),
            None => Ok(None),
        }
    }

    /// Mount the page for `route`
    ///
    /// The Bills page is fully loaded when this returns: its markup holds
    /// either the user's bills or the store error.
    pub async fn on_navigate(&self, route: Route) -> BilledResult<Page> {
        let session = UserSession::load(self.sessions.as_ref())?;
        tracing::debug!(%route, email = ?session.email, "mounting page");

        self.document
            .set_body(self.renderer.loading(route.active_icon())?);

        match route {
            Route::Bills => {
                let controller = BillsController::new(
                    self.document.clone(),
                    self.navigator(),
                    self.store.clone(),
                    session,
                    self.renderer.clone(),
                );
                controller.mount().await;
                Ok(Page::Bills(controller))
            }
            Route::NewBill => {
                self.document.set_body(self.renderer.new_bill()?);
                let controller = NewBillController::new(
                    self.document.clone(),
                    self.navigator(),
                    self.store.clone(),
                    session,
                    self.attachments.clone(),
                );
                Ok(Page::NewBill(controller))
            }
        }
    }
}
