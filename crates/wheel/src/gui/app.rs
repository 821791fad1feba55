use crate::config::{self, Settings};
use crate::events::AppEvent;
use crate::gui::bridge::{ChannelDispatcher, GlibHoldTimer, OverlayPresentation};
use crate::gui::menu::{self, MenuView};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::dispatch::SharedDispatchSettings;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wedge::action::Action;
use wedge::geometry::Point;
use wedge::gesture::{GestureController, HoldToken};
use wedge::pointer::{Button, PointerEvent};

type Controller = GestureController<OverlayPresentation, ChannelDispatcher, GlibHoldTimer>;

pub struct AppModel {
    controller: Controller,
    dispatch: SharedDispatchSettings,
}

pub struct AppInit {
    pub settings: Settings,
    pub dispatch: SharedDispatchSettings,
    pub actions: async_channel::Sender<Action>,
    pub events: async_channel::Receiver<AppEvent>,
}

#[derive(Debug)]
pub enum AppMsg {
    Pointer(PointerEvent),
    HoldElapsed(HoldToken),
    Dismiss,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Pointer(e) => AppMsg::Pointer(e),
            AppEvent::Dismiss => AppMsg::Dismiss,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Wheel"),
            add_css_class: "wheel-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Dismiss);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "wheel-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::Pointer(PointerEvent::Move {
                            position: Point::new(x, y),
                        }));
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_released[sender] => move |gesture, _, x, y| {
                        sender.input(AppMsg::Pointer(PointerEvent::Release {
                            position: Point::new(x, y),
                            button: Button::new(gesture.current_button()),
                        }));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            settings,
            dispatch,
            actions,
            events,
        } = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let widgets = view_output!();

        let view = Rc::new(RefCell::new(MenuView::new(settings.gesture.ring)));
        let view_draw = view.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = menu::draw(cr, &view_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let controller = GestureController::new(
            settings.gesture,
            settings.registry,
            OverlayPresentation::new(view, root.clone(), widgets.drawing_area.clone()),
            ChannelDispatcher::new(actions),
            GlibHoldTimer::new({
                let sender = sender.input_sender().clone();
                move |token| sender.emit(AppMsg::HoldElapsed(token))
            }),
        );

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        let model = AppModel {
            controller,
            dispatch,
        };
        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Pointer(event) => self.handle_pointer(event),
            AppMsg::HoldElapsed(token) => self.controller.on_hold_elapsed(token),
            AppMsg::Dismiss => self.controller.abort(),
            AppMsg::ConfigReload => match config::load_settings() {
                Ok(settings) => {
                    self.apply(settings);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn handle_pointer(&mut self, event: PointerEvent) {
        // while the button is held the compositor keeps motion on the
        // surface that was pressed, so the release position may be the only sample
        if let PointerEvent::Release { position, .. } = event {
            self.controller.on_move(position);
        }
        if let Some(outcome) = self.controller.handle(event) {
            log::debug!("Gesture finished: {:?}", outcome);
        }
    }

    fn apply(&mut self, settings: Settings) {
        self.controller.set_config(settings.gesture);
        self.controller
            .presentation_mut()
            .set_ring(settings.gesture.ring);
        self.controller.replace_registry(settings.registry);
        *self.dispatch.write() = settings.dispatch;
    }
}
