//! Tab strips: a container mapping string tab ids onto button/content
//! widget pairs. Referencing an id that was never registered is structural
//! misuse and fails hard.

use uuid::Uuid;

use crate::scene::Scene;
use crate::utils::Position;
use crate::widget::{ContainerKind, Widget, WidgetBehavior, WidgetKind};

/// Gap between tab buttons along the strip.
const TAB_GAP: i32 = 2;

#[derive(Debug, Clone)]
pub struct TabEntry {
    pub tab_id: String,
    pub button: Uuid,
    pub content: Uuid,
}

#[derive(Debug, Default)]
pub struct TabStrip {
    entries: Vec<TabEntry>,
    active: Option<String>,
}

impl TabStrip {
    pub fn entries(&self) -> &[TabEntry] {
        &self.entries
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn entry(&self, tab_id: &str) -> Option<&TabEntry> {
        self.entries.iter().find(|e| e.tab_id == tab_id)
    }
}

struct TabButtonBehavior {
    tabs: Uuid,
    tab_id: String,
}

impl WidgetBehavior for TabButtonBehavior {
    fn on_mouse_clicked(&mut self, scene: &mut Scene, _id: Uuid, _pointer: Position) {
        Tabs::select(scene, self.tabs, &self.tab_id);
    }
}

pub struct Tabs;

impl Tabs {
    pub fn create(scene: &mut Scene) -> Uuid {
        scene.register(Widget::container(ContainerKind::Tabs(TabStrip::default())))
    }

    fn strip(scene: &Scene, tabs: Uuid) -> &TabStrip {
        match &scene.widget(tabs).kind {
            WidgetKind::Container {
                layout: ContainerKind::Tabs(strip),
                ..
            } => strip,
            _ => panic!("widget {tabs} is not a tab strip"),
        }
    }

    fn strip_mut(scene: &mut Scene, tabs: Uuid) -> &mut TabStrip {
        match &mut scene.widget_mut(tabs).kind {
            WidgetKind::Container {
                layout: ContainerKind::Tabs(strip),
                ..
            } => strip,
            _ => panic!("widget {tabs} is not a tab strip"),
        }
    }

    /// Register a tab: a button placed at the end of the strip and a
    /// content widget shown only while the tab is active. The first tab
    /// registered becomes active.
    pub fn add_tab(
        scene: &mut Scene,
        tabs: Uuid,
        tab_id: &str,
        button: Widget,
        content: Widget,
    ) -> (Uuid, Uuid) {
        assert!(
            Self::strip(scene, tabs).entry(tab_id).is_none(),
            "tab '{tab_id}' is already registered with this tab strip"
        );

        // next slot: past the rightmost existing button
        let next_x: i32 = Self::strip(scene, tabs)
            .entries()
            .iter()
            .map(|e| {
                let b = scene.widget(e.button);
                b.offset.x + b.width + TAB_GAP
            })
            .max()
            .unwrap_or(0);

        let button = button
            .offset_px(next_x, 0)
            .with_behavior(Box::new(TabButtonBehavior {
                tabs,
                tab_id: tab_id.to_string(),
            }));
        let button_id = scene.add_child(tabs, button);

        let first = Self::strip(scene, tabs).entries().is_empty();
        let mut content = content;
        content.hidden = !first;
        let content_id = scene.add_child(tabs, content);

        let strip = Self::strip_mut(scene, tabs);
        strip.entries.push(TabEntry {
            tab_id: tab_id.to_string(),
            button: button_id,
            content: content_id,
        });
        if first {
            strip.active = Some(tab_id.to_string());
        }
        (button_id, content_id)
    }

    /// Activate a tab. Panics when `tab_id` was never registered: a
    /// desynchronized id mapping indicates structural misuse.
    pub fn select(scene: &mut Scene, tabs: Uuid, tab_id: &str) {
        let entries: Vec<TabEntry> = {
            let strip = Self::strip(scene, tabs);
            assert!(
                strip.entry(tab_id).is_some(),
                "tab '{tab_id}' is not registered with this tab strip"
            );
            strip.entries.clone()
        };
        for entry in &entries {
            scene.widget_mut(entry.content).hidden = entry.tab_id != tab_id;
        }
        Self::strip_mut(scene, tabs).active = Some(tab_id.to_string());
    }

    pub fn active(scene: &Scene, tabs: Uuid) -> Option<String> {
        Self::strip(scene, tabs).active().map(str::to_string)
    }
}
