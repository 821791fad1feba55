use crate::gui::icon::{self, IconName};
use crate::gui::menu::ICON_SIZE;
use gdk_pixbuf::Pixbuf;
use std::iter::zip;
use wedge::geometry::{Point, RingGeometry, WedgeGeometry};
use wedge::registry::MenuEntry;

#[derive(Clone)]
pub struct WedgeSlot {
    pub title: String,
    pub shortcut: String,
    pub geometry: WedgeGeometry,
    pub icon: Option<Pixbuf>,
}

impl WedgeSlot {
    pub fn new(entry: &MenuEntry, geometry: WedgeGeometry) -> Self {
        let icon = entry
            .icon
            .as_deref()
            .map(IconName::from)
            .and_then(|name| icon::load_icon(&name, ICON_SIZE));

        Self {
            title: entry.name.to_string(),
            shortcut: entry.shortcut_label.clone(),
            geometry,
            icon,
        }
    }
}

/// What the overlay draws. Only changed through the presentation adapter.
pub struct MenuView {
    pub ring: RingGeometry,
    /// Menu center in overlay coordinates.
    pub anchor: Point,
    pub visible: bool,
    pub selection: Option<usize>,
    pub slots: Vec<WedgeSlot>,
}

impl MenuView {
    pub fn new(ring: RingGeometry) -> Self {
        Self {
            ring,
            anchor: Point::default(),
            visible: false,
            selection: None,
            slots: Vec::new(),
        }
    }

    pub fn open_at(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.selection = None;
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.selection = None;
    }

    pub fn set_selection(&mut self, selection: Option<usize>) {
        self.selection = selection.filter(|&i| i < self.slots.len());
    }

    pub fn set_ring(&mut self, ring: RingGeometry) {
        self.ring = ring;
    }

    pub fn rebuild(&mut self, entries: &[MenuEntry], wedges: &[WedgeGeometry]) {
        self.slots = zip(entries, wedges)
            .map(|(entry, geometry)| WedgeSlot::new(entry, *geometry))
            .collect();
        self.selection = None;
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection == Some(index)
    }

    /// Labels sit halfway across the ring band.
    pub fn label_radius(&self) -> f64 {
        (self.ring.inner_radius + self.ring.outer_radius) / 2.0
    }

    pub fn label_position(&self, slot: &WedgeSlot) -> Point {
        slot.geometry.anchor_point(self.anchor, self.label_radius())
    }
}
