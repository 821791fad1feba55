//! GTK side implementations of the gesture controller's collaborators.

use crate::gui::menu::MenuView;
use crate::gui::window;
use glib::{JoinHandle, MainContext};
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wedge::action::Action;
use wedge::geometry::{Point, RingGeometry, WedgeGeometry};
use wedge::gesture::{ActionDispatcher, HoldTimer, HoldToken, MenuPresentation};
use wedge::registry::MenuEntry;

pub struct OverlayPresentation {
    view: Rc<RefCell<MenuView>>,
    window: gtk::ApplicationWindow,
    drawing_area: gtk::DrawingArea,
}

impl OverlayPresentation {
    pub fn new(
        view: Rc<RefCell<MenuView>>,
        window: gtk::ApplicationWindow,
        drawing_area: gtk::DrawingArea,
    ) -> Self {
        Self {
            view,
            window,
            drawing_area,
        }
    }

    pub fn set_ring(&mut self, ring: RingGeometry) {
        self.view.borrow_mut().set_ring(ring);
        self.drawing_area.queue_draw();
    }
}

impl MenuPresentation for OverlayPresentation {
    fn show_at(&mut self, anchor: Point) {
        window::move_to_active_monitor(&self.window);
        self.view.borrow_mut().open_at(anchor);
        self.window.set_visible(true);
        self.drawing_area.queue_draw();
    }

    fn hide(&mut self) {
        self.view.borrow_mut().close();
        self.window.set_visible(false);
    }

    fn set_selection(&mut self, selection: Option<usize>) {
        self.view.borrow_mut().set_selection(selection);
        self.drawing_area.queue_draw();
    }

    fn rebuild_layout(&mut self, entries: &[MenuEntry], wedges: &[WedgeGeometry]) {
        self.view.borrow_mut().rebuild(entries, wedges);
        self.drawing_area.queue_draw();
    }
}

/// Hands actions to the dispatch worker on the tokio runtime.
pub struct ChannelDispatcher {
    tx: async_channel::Sender<Action>,
}

impl ChannelDispatcher {
    pub fn new(tx: async_channel::Sender<Action>) -> Self {
        Self { tx }
    }
}

impl ActionDispatcher for ChannelDispatcher {
    fn invoke(&mut self, action: &Action) {
        if let Err(e) = self.tx.try_send(action.clone()) {
            log::error!("Failed to queue action: {}", e);
        }
    }
}

type PendingHold = Rc<RefCell<Option<(HoldToken, JoinHandle<()>)>>>;

/// One-shot timeouts on a glib main context. At most one is pending;
/// scheduling again replaces it.
pub struct GlibHoldTimer {
    context: MainContext,
    on_elapsed: Rc<dyn Fn(HoldToken)>,
    pending: PendingHold,
}

impl GlibHoldTimer {
    /// Runs on the default main context, the one GTK dispatches from.
    pub fn new(on_elapsed: impl Fn(HoldToken) + 'static) -> Self {
        Self::with_context(MainContext::default(), on_elapsed)
    }

    pub fn with_context(context: MainContext, on_elapsed: impl Fn(HoldToken) + 'static) -> Self {
        Self {
            context,
            on_elapsed: Rc::new(on_elapsed),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn pending(&self) -> Option<HoldToken> {
        self.pending.borrow().as_ref().map(|(token, _)| *token)
    }
}

impl HoldTimer for GlibHoldTimer {
    fn schedule(&mut self, delay: Duration, token: HoldToken) {
        if let Some((stale, handle)) = self.pending.borrow_mut().take() {
            log::trace!("Replacing hold timer {:?}", stale);
            handle.abort();
        }

        let on_elapsed = self.on_elapsed.clone();
        let pending = self.pending.clone();
        let handle = self.context.spawn_local(async move {
            glib::timeout_future(delay).await;
            {
                let mut slot = pending.borrow_mut();
                if slot.as_ref().is_some_and(|(t, _)| *t == token) {
                    slot.take();
                }
            }
            on_elapsed(token);
        });
        *self.pending.borrow_mut() = Some((token, handle));
    }

    fn cancel(&mut self, token: HoldToken) {
        let mut slot = self.pending.borrow_mut();
        if slot.as_ref().is_some_and(|(t, _)| *t == token)
            && let Some((_, handle)) = slot.take()
        {
            handle.abort();
        }
    }
}
