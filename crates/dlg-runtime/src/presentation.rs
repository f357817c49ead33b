use std::cell::RefCell;
use std::rc::Rc;

use dlg_core::{ChoiceItem, DialogueView, PresentationEvent};

/// Rendering side of the engine. Choices carry stable indices; a selection
/// comes back through `DialogueEngine::choose`.
pub trait PresentationAdapter {
    fn render_line(&mut self, speaker: &str, text: &str);
    fn render_choices(&mut self, items: &[ChoiceItem]);
    fn clear_choices(&mut self);
    fn hide(&mut self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl PresentationAdapter for NullPresentation {
    fn render_line(&mut self, _speaker: &str, _text: &str) {}
    fn render_choices(&mut self, _items: &[ChoiceItem]) {}
    fn clear_choices(&mut self) {}
    fn hide(&mut self) {}
}

/// Records presentation calls so a host can drain them after each command.
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct EventBuffer {
    events: Rc<RefCell<Vec<PresentationEvent>>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<PresentationEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn events(&self) -> Vec<PresentationEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: PresentationEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PresentationAdapter for EventBuffer {
    fn render_line(&mut self, speaker: &str, text: &str) {
        self.push(PresentationEvent::Line {
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
    }

    fn render_choices(&mut self, items: &[ChoiceItem]) {
        self.push(PresentationEvent::Choices {
            items: items.to_vec(),
        });
    }

    fn clear_choices(&mut self) {
        self.push(PresentationEvent::ChoicesCleared);
    }

    fn hide(&mut self) {
        self.push(PresentationEvent::Hidden);
    }
}

pub trait DialogueListener {
    fn on_updated(&mut self, _view: &DialogueView) {}
    fn on_ended(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Updated(DialogueView),
    Ended,
}

/// Listener that keeps every notification; clones share the log.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Rc<RefCell<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn ended_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| matches!(entry, Notification::Ended))
            .count()
    }

    pub fn updated_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| matches!(entry, Notification::Updated(_)))
            .count()
    }
}

impl DialogueListener for NotificationLog {
    fn on_updated(&mut self, view: &DialogueView) {
        self.entries
            .borrow_mut()
            .push(Notification::Updated(view.clone()));
    }

    fn on_ended(&mut self) {
        self.entries.borrow_mut().push(Notification::Ended);
    }
}
