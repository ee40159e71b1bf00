use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::kinds::Message;

/// Something that consumes messages of one name.
pub trait Handler {
    fn handle(&mut self, message: &Message);
}

impl<F> Handler for F
where
    F: FnMut(&Message),
{
    fn handle(&mut self, message: &Message) {
        self(message)
    }
}

/// Handlers keyed by message name, at most one per name.
#[derive(Default)]
pub struct Handlers {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages called `name`, replacing any handler
    /// already registered under it.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            warn!(name = %name, "replacing service message handler");
        }

        self.handlers.insert(name, Box::new(handler));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Hand `message` to the handler registered under its name. Returns
    /// whether one was found.
    pub fn dispatch(&mut self, message: &Message) -> bool {
        match self.handlers.get_mut(message.name()) {
            Some(handler) => {
                handler.handle(message);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::kinds::{BlockOpened, TestStarted};

    struct Count(Rc<RefCell<usize>>);

    impl Handler for Count {
        fn handle(&mut self, _message: &Message) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn dispatch_by_name() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut handlers = Handlers::new();
        handlers.register("testStarted", move |message: &Message| {
            sink.borrow_mut().push(message.to_string());
        });

        let started: Message = TestStarted::new("t", false, None).into();
        let opened: Message = BlockOpened::new("b", None).into();
        assert!(handlers.dispatch(&started));
        assert!(!handlers.dispatch(&opened));
        assert_eq!(*seen.borrow(), vec!["##teamcity[testStarted name='t']"]);
    }

    #[test]
    fn replace_and_remove() {
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));

        let mut handlers = Handlers::new();
        handlers.register("blockOpened", Count(Rc::clone(&first)));
        handlers.register("blockOpened", Count(Rc::clone(&second)));

        let message: Message = BlockOpened::new("b", None).into();
        handlers.dispatch(&message);
        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);

        assert!(handlers.contains("blockOpened"));
        assert!(handlers.remove("blockOpened"));
        assert!(!handlers.remove("blockOpened"));
        assert!(!handlers.dispatch(&message));
    }
}
