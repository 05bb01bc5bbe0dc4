//! Per-thread decode frames.
//!
//! serde gives field adapters no way to reach the decoder that drives them, so the
//! active problem handler and the last substitute it produced live in a thread-local
//! stack of frames. Each decode call pushes a frame and pops it when done, which keeps
//! nested and concurrent decodes apart.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde_json::Value;

use super::problem::{Problem, ProblemHandler};
use crate::path::JsonPath;

pub(crate) type SharedHandler = Rc<RefCell<dyn ProblemHandler>>;

struct Frame {
    handler: Option<SharedHandler>,
    substitute: Option<Value>,
}

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame pushed by [`enter`] when dropped.
pub(crate) struct ScopeGuard {
    _private: (),
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

/// Pushes a frame. Without a handler, problems are not recovered from.
pub(crate) fn enter(handler: Option<SharedHandler>) -> ScopeGuard {
    FRAMES.with(|frames| {
        frames.borrow_mut().push(Frame {
            handler,
            substitute: None,
        })
    });
    ScopeGuard { _private: () }
}

/// Reports a located problem to the innermost frame's handler.
pub(crate) fn intercept(path: &JsonPath, problem: &Problem) {
    let handler = FRAMES.with(|frames| {
        frames
            .borrow()
            .last()
            .and_then(|frame| frame.handler.clone())
    });
    let Some(handler) = handler else {
        return;
    };

    debug!("decode problem at `{}`: {}", path, problem);
    let substitute = handler.borrow_mut().handle(path, problem);

    FRAMES.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            frame.substitute = Some(substitute);
        }
    });
}

/// Takes the substitute for the most recent problem, if the innermost frame recovers.
pub(crate) fn take_substitute() -> Option<Value> {
    FRAMES.with(|frames| {
        frames
            .borrow_mut()
            .last_mut()
            .and_then(|frame| frame.substitute.take())
    })
}
