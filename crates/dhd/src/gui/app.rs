use crate::config;
use crate::events::AppEvent;
use crate::gui::fault::{self, FrameFault};
use crate::gui::gate::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH, Session};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use chevron::{Action, Intent, Key, Point};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub session: Rc<RefCell<Session>>,
    pub halted: Rc<Cell<bool>>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Frame(Duration),
    PointerMove(Point),
    PointerPress(Point),
    Key(Key),
    Remote(Action),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Remote(action) => AppMsg::Remote(action),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Logs `fault` and quits. Later frames are skipped instead of retried.
fn shut_down(halted: &Cell<bool>, fault: FrameFault) {
    if halted.replace(true) {
        return;
    }
    log::error!("{}; shutting down", fault);
    relm4::main_application().quit();
}

impl AppModel {
    fn present_intents(&self) {
        let (intents, mute) = {
            let mut session = self.session.borrow_mut();
            (session.drain_intents(), session.mute)
        };
        for intent in intents {
            match intent {
                Intent::Cue(cue) => window::present_cue(&self.root, cue, mute),
                Intent::Status(status) => log::debug!("status: {}", status),
            }
        }
    }

    fn reload_config(&self) {
        match config::load_config() {
            Ok(new_config) => match new_config.preset_book() {
                Ok(presets) => {
                    let mut session = self.session.borrow_mut();
                    session.set_presets(presets);
                    session.mute = new_config.mute;
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Session, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Stargate Dialing Computer + DHD"),
            set_default_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            add_css_class: "dhd-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match window::map_key(key) {
                        Some(key) => {
                            sender.input(AppMsg::Key(key));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "dhd-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 1,
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::PointerPress(Point::new(x, y)));
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
        let (session, rx) = init;

        theme::load_css();

        let model = AppModel {
            session: Rc::new(RefCell::new(session)),
            halted: Rc::new(Cell::new(false)),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let session_draw = model.session.clone();
        let halted_draw = model.halted.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                if halted_draw.get() {
                    return;
                }
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let rendered = fault::guarded("render", || {
                    let mut session = session_draw.borrow_mut();
                    session.resize(width as f64, height as f64);
                    gate::draw(cr, &session, &colors)
                });
                if let Err(fault) = rendered {
                    shut_down(&halted_draw, fault);
                }
            });

        let sender_tick = sender.clone();
        widgets.drawing_area.add_tick_callback(move |_, clock| {
            sender_tick.input(AppMsg::Frame(window::frame_time(clock)));
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Frame(now) => {
                if self.halted.get() {
                    return;
                }
                let stepped = fault::guarded("update", || {
                    self.session.borrow_mut().tick(now);
                    Ok::<(), Infallible>(())
                });
                if let Err(fault) = stepped {
                    log::error!("frame at {:?} did not complete", now);
                    shut_down(&self.halted, fault);
                    return;
                }
                self.present_intents();
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerMove(point) => {
                if self.session.borrow_mut().pointer_moved(point) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerPress(point) => {
                let action = self.session.borrow_mut().pointer_pressed(point);
                if let Some(action) = action {
                    log::debug!("pointer action: {}", action);
                }
                self.present_intents();
            }
            AppMsg::Key(key) => {
                self.session.borrow_mut().key_pressed(key);
                self.present_intents();
            }
            AppMsg::Remote(action) => {
                self.session.borrow_mut().remote(&action);
                self.present_intents();
            }
            AppMsg::ConfigReload => {
                self.reload_config();
                self.drawing_area.queue_draw();
            }
        }
    }
}
