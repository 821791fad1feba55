//! Press / hold / drag / release state machine.
//!
//! The controller owns the single live [`GestureSession`] and the
//! [`ActionRegistry`]. It never draws, waits, or sends keys itself; those go
//! through the [`MenuPresentation`], [`HoldTimer`] and [`ActionDispatcher`]
//! collaborators, which keeps every transition testable without a display.

use crate::action::Action;
use crate::geometry::{Point, RingGeometry, WedgeGeometry};
use crate::pointer::{Button, PointerEvent};
use crate::registry::{ActionRegistry, MenuEntry, RegistryError};
use derive_more::From;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

pub const DEFAULT_HOLD: Duration = Duration::from_millis(200);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum GestureMode {
    /// The menu opens once the button has been held for the hold duration.
    /// Releasing earlier is an ordinary click.
    #[default]
    Hold,
    /// The menu opens on press.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub mode: GestureMode,
    pub hold: Duration,
    pub button: Button,
    pub ring: RingGeometry,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mode: GestureMode::default(),
            hold: DEFAULT_HOLD,
            button: Button::RIGHT,
            ring: RingGeometry::default(),
        }
    }
}

/// Identifies one scheduled hold timer, so that a timer firing after its
/// gesture ended is recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub struct HoldToken(u64);

pub trait MenuPresentation {
    /// Opens the menu centered on `anchor` (absolute screen coordinates).
    fn show_at(&mut self, anchor: Point);
    fn hide(&mut self);
    fn set_selection(&mut self, selection: Option<usize>);
    /// The entry set changed; any cached wedge geometry is stale.
    fn rebuild_layout(&mut self, entries: &[MenuEntry], wedges: &[WedgeGeometry]);
}

pub trait ActionDispatcher {
    /// Queues `action` for execution. Must not block.
    fn invoke(&mut self, action: &Action);
}

pub trait HoldTimer {
    /// Arranges for `on_hold_elapsed(token)` to be called after `delay`.
    fn schedule(&mut self, delay: Duration, token: HoldToken);
    fn cancel(&mut self, token: HoldToken);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pending,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub anchor: Point,
    pub armed: bool,
    pub selection: Option<usize>,
    hold: Option<HoldToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No gesture of ours was in progress.
    Ignored,
    /// Released before the menu opened.
    Click,
    /// The menu closed with nothing selected.
    Dismissed,
    Dispatched(usize),
}

pub struct GestureController<P, D, T> {
    config: GestureConfig,
    registry: ActionRegistry,
    session: Option<GestureSession>,
    next_token: u64,
    presentation: P,
    dispatcher: D,
    timer: T,
}

impl<P, D, T> GestureController<P, D, T>
where
    P: MenuPresentation,
    D: ActionDispatcher,
    T: HoldTimer,
{
    pub fn new(
        config: GestureConfig,
        registry: ActionRegistry,
        presentation: P,
        dispatcher: D,
        timer: T,
    ) -> Self {
        let mut controller = Self {
            config,
            registry,
            session: None,
            next_token: 0,
            presentation,
            dispatcher,
            timer,
        };
        controller.rebuild_layout();
        controller
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn selection(&self) -> Option<usize> {
        self.session.and_then(|s| s.selection)
    }

    pub fn state(&self) -> GestureState {
        match self.session {
            None => GestureState::Idle,
            Some(s) if s.armed => GestureState::Armed,
            Some(_) => GestureState::Pending,
        }
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<ReleaseOutcome> {
        match event {
            PointerEvent::Press { position, button } => {
                self.on_press(position, button);
                None
            }
            PointerEvent::Move { position } => {
                self.on_move(position);
                None
            }
            PointerEvent::Release { position, button } => Some(self.on_release(position, button)),
        }
    }

    pub fn on_press(&mut self, position: Point, button: Button) {
        if button != self.config.button {
            log::trace!("Ignoring press of button {}", button);
            return;
        }
        if self.session.is_some() {
            log::debug!("Press while a gesture is live, ignored");
            return;
        }
        if self.registry.is_empty() {
            log::warn!("Press ignored: the menu has no entries");
            return;
        }

        let mut session = GestureSession {
            anchor: position,
            armed: false,
            selection: None,
            hold: None,
        };

        match self.config.mode {
            GestureMode::Hold => {
                let token = self.next_hold_token();
                session.hold = Some(token);
                self.session = Some(session);
                log::debug!("Press at ({}, {}), waiting for hold", position.x, position.y);
                self.timer.schedule(self.config.hold, token);
            }
            GestureMode::Immediate => {
                self.session = Some(session);
                self.arm();
            }
        }
    }

    pub fn on_hold_elapsed(&mut self, token: HoldToken) {
        match self.session {
            Some(s) if !s.armed && s.hold == Some(token) => self.arm(),
            _ => log::trace!("Stale hold timer {:?}", token),
        }
    }

    pub fn on_move(&mut self, position: Point) {
        let Some(count) = self.registry.entry_count() else {
            return;
        };
        let Some(session) = self.session.as_mut().filter(|s| s.armed) else {
            return;
        };

        let local = self.config.ring.to_local(position, session.anchor);
        let selection = self.config.ring.select(local, count);
        if selection == session.selection {
            return;
        }

        session.selection = selection;
        match selection.and_then(|i| self.registry.get(i)) {
            Some(entry) => log::debug!("Selection updated: {}", entry.name),
            None => log::debug!("Selection cleared"),
        }
        self.presentation.set_selection(selection);
    }

    pub fn on_release(&mut self, _position: Point, button: Button) -> ReleaseOutcome {
        if button != self.config.button {
            return ReleaseOutcome::Ignored;
        }
        let Some(session) = self.session.take() else {
            log::trace!("Release without a matching press");
            return ReleaseOutcome::Ignored;
        };

        if !session.armed {
            if let Some(token) = session.hold {
                self.timer.cancel(token);
            }
            log::debug!("Released before the hold threshold");
            return ReleaseOutcome::Click;
        }

        self.presentation.hide();

        let chosen = session
            .selection
            .and_then(|i| self.registry.get(i).map(|entry| (i, entry)));
        match chosen {
            Some((index, entry)) => {
                log::info!("Action selected: {}", entry.name);
                self.dispatcher.invoke(&entry.action);
                ReleaseOutcome::Dispatched(index)
            }
            None => {
                log::debug!("No action selected");
                ReleaseOutcome::Dismissed
            }
        }
    }

    /// Ends the live gesture without dispatching, e.g. when the menu was
    /// closed from outside.
    pub fn abort(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(token) = session.hold {
            self.timer.cancel(token);
        }
        if session.armed {
            self.presentation.hide();
        }
        log::debug!("Gesture aborted");
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        if config != self.config {
            self.abort();
            self.config = config;
        }
    }

    pub fn append_entry(&mut self, entry: MenuEntry) {
        self.registry.append(entry);
        self.layout_changed();
    }

    pub fn remove_entry(&mut self, name: &str) -> Result<Option<MenuEntry>, RegistryError> {
        let removed = self.registry.remove(name)?;
        if removed.is_some() {
            self.layout_changed();
        }
        Ok(removed)
    }

    pub fn reorder_entries(&mut self, order: &[usize]) -> Result<(), RegistryError> {
        self.registry.reorder(order)?;
        self.layout_changed();
        Ok(())
    }

    pub fn replace_registry(&mut self, registry: ActionRegistry) {
        self.registry = registry;
        self.layout_changed();
    }

    fn layout_changed(&mut self) {
        // a live selection index refers to the old layout
        self.abort();
        self.rebuild_layout();
    }

    fn rebuild_layout(&mut self) {
        let wedges = self.registry.wedges();
        self.presentation
            .rebuild_layout(self.registry.entries(), &wedges);
    }

    fn arm(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.armed = true;
        session.hold = None;
        let anchor = session.anchor;
        log::debug!("Showing radial menu at ({}, {})", anchor.x, anchor.y);
        self.presentation.show_at(anchor);
    }

    fn next_hold_token(&mut self) -> HoldToken {
        self.next_token += 1;
        HoldToken(self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Builtin;
    use crate::keymap::{Keymap, Platform};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ShowAt(Point),
        Hide,
        Select(Option<usize>),
        Rebuild(usize),
        Invoke(Action),
        Schedule(Duration, HoldToken),
        Cancel(HoldToken),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.0.borrow().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.0.borrow().iter().filter(|c| pred(c)).count()
        }

        fn last_token(&self) -> HoldToken {
            self.0
                .borrow()
                .iter()
                .rev()
                .find_map(|c| match c {
                    Call::Schedule(_, token) => Some(*token),
                    _ => None,
                })
                .unwrap()
        }

        fn push(&self, call: Call) {
            self.0.borrow_mut().push(call);
        }
    }

    impl MenuPresentation for Recorder {
        fn show_at(&mut self, anchor: Point) {
            self.push(Call::ShowAt(anchor));
        }
        fn hide(&mut self) {
            self.push(Call::Hide);
        }
        fn set_selection(&mut self, selection: Option<usize>) {
            self.push(Call::Select(selection));
        }
        fn rebuild_layout(&mut self, entries: &[MenuEntry], wedges: &[WedgeGeometry]) {
            assert_eq!(entries.len(), wedges.len());
            self.push(Call::Rebuild(entries.len()));
        }
    }

    impl ActionDispatcher for Recorder {
        fn invoke(&mut self, action: &Action) {
            self.push(Call::Invoke(action.clone()));
        }
    }

    impl HoldTimer for Recorder {
        fn schedule(&mut self, delay: Duration, token: HoldToken) {
            self.push(Call::Schedule(delay, token));
        }
        fn cancel(&mut self, token: HoldToken) {
            self.push(Call::Cancel(token));
        }
    }

    type Controller = GestureController<Recorder, Recorder, Recorder>;

    fn keymap() -> Keymap {
        Keymap::for_platform(Platform::Other)
    }

    fn controller_with(mode: GestureMode, registry: ActionRegistry) -> (Controller, Recorder) {
        let rec = Recorder::default();
        let config = GestureConfig {
            mode,
            ..GestureConfig::default()
        };
        let c = GestureController::new(config, registry, rec.clone(), rec.clone(), rec.clone());
        (c, rec)
    }

    fn controller(mode: GestureMode) -> (Controller, Recorder) {
        controller_with(mode, ActionRegistry::default_menu(&keymap()))
    }

    /// Absolute point over wedge `index` of an eight wedge ring opened at `anchor`.
    fn over_wedge(anchor: Point, index: usize) -> Point {
        let wedge = WedgeGeometry::layout(8)[index];
        wedge.anchor_point(anchor, 100.0)
    }

    const ANCHOR: Point = Point { x: 100.0, y: 100.0 };

    #[test]
    fn test_short_click_never_shows_menu() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        assert_eq!(c.state(), GestureState::Pending);
        let token = rec.last_token();

        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Click);
        assert_eq!(c.state(), GestureState::Idle);

        // the timer firing late must not resurrect the menu
        c.on_hold_elapsed(token);

        assert_eq!(rec.count(|c| matches!(c, Call::ShowAt(_))), 0);
        assert_eq!(rec.count(|c| matches!(c, Call::Invoke(_))), 0);
        assert!(rec.calls().contains(&Call::Cancel(token)));
    }

    #[test]
    fn test_hold_drag_release_dispatches_selected_entry() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        assert!(rec.calls().contains(&Call::Schedule(DEFAULT_HOLD, rec.last_token())));

        c.on_hold_elapsed(rec.last_token());
        assert_eq!(c.state(), GestureState::Armed);

        c.on_move(over_wedge(ANCHOR, 1));
        c.on_move(over_wedge(ANCHOR, 3));
        assert_eq!(c.selection(), Some(3));

        let outcome = c.on_release(over_wedge(ANCHOR, 3), Button::RIGHT);
        assert_eq!(outcome, ReleaseOutcome::Dispatched(3));

        let expected = c.registry().get(3).unwrap().action.clone();
        let calls = rec.calls();
        let invokes: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Invoke(_)))
            .collect();
        assert_eq!(invokes.len(), 1);
        assert_eq!(invokes[0].1, &Call::Invoke(expected));
        assert_eq!(rec.count(|c| *c == Call::Hide), 1);

        let invoke_at = invokes[0].0;
        let last_select = calls
            .iter()
            .rposition(|c| matches!(c, Call::Select(_)))
            .unwrap();
        assert!(last_select < invoke_at);
        assert!(calls.contains(&Call::ShowAt(ANCHOR)));
    }

    #[test]
    fn test_dead_zone_release_dispatches_nothing() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_hold_elapsed(rec.last_token());

        c.on_move(Point::new(ANCHOR.x + 5.0, ANCHOR.y - 3.0));
        assert_eq!(rec.count(|c| matches!(c, Call::Select(_))), 0);

        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Dismissed);
        assert_eq!(rec.count(|c| *c == Call::Hide), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::Invoke(_))), 0);
    }

    #[test]
    fn test_returning_to_dead_zone_clears_selection() {
        let (mut c, rec) = controller(GestureMode::Immediate);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_move(over_wedge(ANCHOR, 5));
        c.on_move(ANCHOR);
        assert_eq!(c.selection(), None);
        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Dismissed);
        let selects: Vec<_> = rec
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Select(_)))
            .collect();
        assert_eq!(selects, vec![Call::Select(Some(5)), Call::Select(None)]);
    }

    #[test]
    fn test_immediate_mode_shows_on_press() {
        let (mut c, rec) = controller(GestureMode::Immediate);
        c.on_press(ANCHOR, Button::RIGHT);
        assert_eq!(c.state(), GestureState::Armed);
        assert!(rec.calls().contains(&Call::ShowAt(ANCHOR)));
        assert_eq!(rec.count(|c| matches!(c, Call::Schedule(..))), 0);
    }

    #[test]
    fn test_selection_reported_only_on_change() {
        let (mut c, rec) = controller(GestureMode::Immediate);
        c.on_press(ANCHOR, Button::RIGHT);
        let p = over_wedge(ANCHOR, 2);
        c.on_move(p);
        c.on_move(Point::new(p.x + 1.0, p.y));
        c.on_move(p);
        assert_eq!(rec.count(|c| matches!(c, Call::Select(_))), 1);
    }

    #[test]
    fn test_stray_events_are_noops() {
        let (mut c, rec) = controller(GestureMode::Hold);
        let before = rec.calls();

        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Ignored);
        c.on_move(over_wedge(ANCHOR, 1));
        c.on_press(ANCHOR, Button::LEFT);
        c.on_hold_elapsed(HoldToken(42));

        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(rec.calls(), before);
    }

    #[test]
    fn test_moves_while_pending_are_ignored() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_move(over_wedge(ANCHOR, 4));
        assert_eq!(c.selection(), None);
        assert_eq!(rec.count(|c| matches!(c, Call::Select(_))), 0);
    }

    #[test]
    fn test_second_press_while_live_is_ignored() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_press(Point::new(500.0, 500.0), Button::RIGHT);
        assert_eq!(rec.count(|c| matches!(c, Call::Schedule(..))), 1);
        assert_eq!(c.session().unwrap().anchor, ANCHOR);
    }

    #[test]
    fn test_stale_hold_token_is_ignored() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        let first = rec.last_token();
        c.on_release(ANCHOR, Button::RIGHT);

        c.on_press(ANCHOR, Button::RIGHT);
        let second = rec.last_token();
        assert_ne!(first, second);

        c.on_hold_elapsed(first);
        assert_eq!(c.state(), GestureState::Pending);
        c.on_hold_elapsed(second);
        assert_eq!(c.state(), GestureState::Armed);
    }

    #[test]
    fn test_stalled_pointer_keeps_menu_open() {
        let (mut c, rec) = controller(GestureMode::Hold);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_hold_elapsed(rec.last_token());
        c.on_move(over_wedge(ANCHOR, 6));
        // no more events: nothing times out on its own
        assert_eq!(c.state(), GestureState::Armed);
        assert_eq!(c.selection(), Some(6));
        assert_eq!(rec.count(|c| *c == Call::Hide), 0);
    }

    #[test]
    fn test_empty_registry_never_arms() {
        let (mut c, rec) = controller_with(GestureMode::Immediate, ActionRegistry::new());
        c.on_press(ANCHOR, Button::RIGHT);
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(rec.count(|c| matches!(c, Call::ShowAt(_))), 0);
    }

    #[test]
    fn test_abort_hides_without_dispatch() {
        let (mut c, rec) = controller(GestureMode::Immediate);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_move(over_wedge(ANCHOR, 2));
        c.abort();
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(rec.count(|c| *c == Call::Hide), 1);
        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Ignored);
        assert_eq!(rec.count(|c| matches!(c, Call::Invoke(_))), 0);
    }

    #[test]
    fn test_registry_mutations_rebuild_layout() {
        let (mut c, rec) = controller(GestureMode::Hold);
        assert_eq!(rec.calls(), vec![Call::Rebuild(8)]);

        c.append_entry(MenuEntry::builtin(Builtin::Delete, &keymap()));
        assert_eq!(rec.calls().last(), Some(&Call::Rebuild(9)));

        assert_eq!(c.remove_entry("Nope"), Ok(None));
        assert!(c.reorder_entries(&[0, 1]).is_err());
        assert_eq!(rec.count(|c| matches!(c, Call::Rebuild(_))), 2);

        c.remove_entry("Delete").unwrap();
        assert_eq!(rec.calls().last(), Some(&Call::Rebuild(8)));

        c.reorder_entries(&[7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
        assert_eq!(c.registry().get(0).unwrap().name.as_str(), "Select All");
        assert_eq!(rec.count(|c| matches!(c, Call::Rebuild(_))), 4);
    }

    #[test]
    fn test_layout_change_mid_gesture_closes_menu() {
        let (mut c, rec) = controller(GestureMode::Immediate);
        c.on_press(ANCHOR, Button::RIGHT);
        c.on_move(over_wedge(ANCHOR, 7));

        c.replace_registry(ActionRegistry::default_menu(&keymap()));
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(rec.count(|c| *c == Call::Hide), 1);
        assert_eq!(c.on_release(ANCHOR, Button::RIGHT), ReleaseOutcome::Ignored);
    }

    #[test]
    fn test_handle_routes_events() {
        let (mut c, _rec) = controller(GestureMode::Immediate);
        assert_eq!(
            c.handle(PointerEvent::Press {
                position: ANCHOR,
                button: Button::RIGHT
            }),
            None
        );
        c.handle(PointerEvent::Move {
            position: over_wedge(ANCHOR, 0),
        });
        assert_eq!(
            c.handle(PointerEvent::Release {
                position: ANCHOR,
                button: Button::RIGHT
            }),
            Some(ReleaseOutcome::Dispatched(0))
        );
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("hold".parse::<GestureMode>(), Ok(GestureMode::Hold));
        assert_eq!("Immediate".parse::<GestureMode>(), Ok(GestureMode::Immediate));
    }
}
