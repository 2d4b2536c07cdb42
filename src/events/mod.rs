pub mod keyboard;
pub mod pointer;

use std::cell::RefCell;
use std::rc::Rc;
use trail_core::InputEvent;

pub use keyboard::wire_keyboard;
pub use pointer::wire_pointer;

/// Intents queued by DOM handlers, drained once per animation frame.
pub type EventQueue = Rc<RefCell<Vec<InputEvent>>>;

#[inline]
pub(crate) fn enqueue(queue: &EventQueue, ev: InputEvent) {
    queue.borrow_mut().push(ev);
}
