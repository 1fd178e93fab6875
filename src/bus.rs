//! Resize notification bus.
//!
//! A minimal publish/subscribe seam so the scene and renderer learn about
//! window resizes without polling the window layer. Subscribers run on the
//! owning thread, in subscription order.

pub enum Notification {
    Resized { width: u32, height: u32 },
}

type Subscriber = Box<dyn FnMut(&Notification)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(&Notification) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    pub fn publish(&mut self, notification: &Notification) {
        for sub in &mut self.subscribers {
            sub(notification);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn publish_reaches_all_subscribers_in_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(Cell::new((0u32, 0u32)));
        let count = Rc::new(Cell::new(0usize));

        let seen_a = Rc::clone(&seen);
        let count_a = Rc::clone(&count);
        bus.subscribe(move |n| {
            let Notification::Resized { width, height } = n;
            seen_a.set((*width, *height));
            count_a.set(count_a.get() + 1);
        });
        let count_b = Rc::clone(&count);
        bus.subscribe(move |_| count_b.set(count_b.get() + 1));

        bus.publish(&Notification::Resized {
            width: 1280,
            height: 720,
        });
        assert_eq!(seen.get(), (1280, 720));
        assert_eq!(count.get(), 2);
    }
}
