use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle returned by the host for one outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Host capability: invoke the owner once before the next repaint.
///
/// Contract: the host answers a request by calling back into the owner (for a
/// [`FrameScheduler`], [`FrameScheduler::run_frame`]) exactly once, unless the request was
/// cancelled first. Implementations must not call back synchronously from inside
/// `request_frame` or `cancel_frame`.
pub trait FrameRequester {
    /// Request one frame.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Cancel a request that has not fired yet.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Timing information handed to every callback of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Monotonic host time in milliseconds.
    pub now_ms: f64,
}

type CallbackCell = RefCell<dyn FnMut(&FrameTick)>;

/// A shared per-frame callable.
///
/// Cloning shares the callable; two handles are the same callback exactly when they share
/// it. Any context the callback needs is captured by the closure.
#[derive(Clone)]
pub struct FrameCallback(Rc<CallbackCell>);

impl FrameCallback {
    /// Wrap a closure.
    pub fn new(f: impl FnMut(&FrameTick) + 'static) -> Self {
        Self(Rc::new(RefCell::new(f)))
    }

    /// Return `true` when both handles refer to the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Create a non-owning handle, e.g. for a callback that needs to remove itself.
    pub fn downgrade(&self) -> WeakFrameCallback {
        WeakFrameCallback(Rc::downgrade(&self.0))
    }

    /// Invoke the callable. Returns `false` when it is already running and was skipped.
    fn invoke(&self, tick: &FrameTick) -> bool {
        match self.0.try_borrow_mut() {
            Ok(mut f) => {
                (&mut *f)(tick);
                true
            }
            Err(_) => false,
        }
    }
}

impl fmt::Debug for FrameCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrameCallback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Non-owning [`FrameCallback`] handle.
#[derive(Clone)]
pub struct WeakFrameCallback(Weak<CallbackCell>);

impl WeakFrameCallback {
    /// Recover the callback if it is still alive.
    pub fn upgrade(&self) -> Option<FrameCallback> {
        self.0.upgrade().map(FrameCallback)
    }
}

impl fmt::Debug for WeakFrameCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakFrameCallback")
    }
}

struct SchedulerState {
    callbacks: Vec<FrameCallback>,
    requester: Box<dyn FrameRequester>,
    pending: Option<FrameRequestId>,
}

impl SchedulerState {
    fn ensure_requested(&mut self) {
        if self.pending.is_none() && !self.callbacks.is_empty() {
            let id = self.requester.request_frame();
            tracing::debug!(id = id.0, "requested frame");
            self.pending = Some(id);
        }
    }

    fn cancel_if_idle(&mut self) {
        if self.callbacks.is_empty()
            && let Some(id) = self.pending.take()
        {
            tracing::debug!(id = id.0, "cancelled frame");
            self.requester.cancel_frame(id);
        }
    }
}

/// Registry of callbacks run once per animation frame.
///
/// The scheduler keeps at most one frame request outstanding with its [`FrameRequester`]:
/// one is requested when the registry becomes non-empty and cancelled when it becomes
/// empty. Handles are cheap to clone and share the same registry, so callbacks may add or
/// remove entries while a frame runs.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl FrameScheduler {
    /// Create a scheduler driven by `requester`.
    pub fn new(requester: impl FrameRequester + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerState {
                callbacks: Vec::new(),
                requester: Box::new(requester),
                pending: None,
            })),
        }
    }

    /// Register `callback` to run every frame, after all earlier registrations.
    pub fn add(&self, callback: FrameCallback) {
        let mut state = self.inner.borrow_mut();
        state.callbacks.push(callback);
        state.ensure_requested();
    }

    /// Remove every registration of `callback`, returning how many were removed.
    pub fn remove(&self, callback: &FrameCallback) -> usize {
        let mut state = self.inner.borrow_mut();
        let mut removed = 0;
        for i in (0..state.callbacks.len()).rev() {
            if state.callbacks[i].ptr_eq(callback) {
                state.callbacks.remove(i);
                removed += 1;
            }
        }
        if removed > 0 {
            state.cancel_if_idle();
        }
        removed
    }

    /// Drop all registrations and cancel the outstanding request.
    pub fn clear(&self) {
        let mut state = self.inner.borrow_mut();
        state.callbacks.clear();
        state.cancel_if_idle();
    }

    /// Number of registrations (duplicates count separately).
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().callbacks.is_empty()
    }

    /// Return `true` while a frame request is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Run one frame. Called by the host when the requested frame fires.
    ///
    /// Callbacks run in registration order over the registry as it was when the frame
    /// started; additions and removals made by callbacks take effect from the next frame.
    pub fn run_frame(&self, tick: FrameTick) {
        let snapshot = {
            let mut state = self.inner.borrow_mut();
            state.pending = None;
            state.callbacks.clone()
        };
        for cb in &snapshot {
            if !cb.invoke(&tick) {
                tracing::trace!(?cb, "skipped callback that is already running");
            }
        }
        self.inner.borrow_mut().ensure_requested();
    }

    /// Create a non-owning handle. Callbacks that need the scheduler should hold one of
    /// these so that the registry and its entries do not keep each other alive.
    pub fn downgrade(&self) -> WeakFrameScheduler {
        WeakFrameScheduler(Rc::downgrade(&self.inner))
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("callbacks", &state.callbacks.len())
            .field("pending", &state.pending)
            .finish()
    }
}

/// Non-owning [`FrameScheduler`] handle.
#[derive(Clone)]
pub struct WeakFrameScheduler(Weak<RefCell<SchedulerState>>);

impl WeakFrameScheduler {
    /// Recover the scheduler if it is still alive.
    pub fn upgrade(&self) -> Option<FrameScheduler> {
        self.0.upgrade().map(|inner| FrameScheduler { inner })
    }
}

impl fmt::Debug for WeakFrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakFrameScheduler")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/scheduler.rs"]
mod tests;
