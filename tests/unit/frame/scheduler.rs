use super::*;
use std::cell::Cell;

#[derive(Default)]
struct HostLog {
    next: Cell<u64>,
    outstanding: RefCell<Vec<FrameRequestId>>,
    requests: Cell<usize>,
    cancels: Cell<usize>,
}

#[derive(Clone, Default)]
struct MockHost(Rc<HostLog>);

impl FrameRequester for MockHost {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.0.next.get());
        self.0.next.set(id.0 + 1);
        self.0.requests.set(self.0.requests.get() + 1);
        self.0.outstanding.borrow_mut().push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.0.cancels.set(self.0.cancels.get() + 1);
        self.0.outstanding.borrow_mut().retain(|&o| o != id);
    }
}

impl MockHost {
    fn outstanding(&self) -> usize {
        self.0.outstanding.borrow().len()
    }

    /// Fire the outstanding request, like a host repaint would.
    fn fire(&self, sched: &FrameScheduler, now_ms: f64) {
        let fired = self.0.outstanding.borrow_mut().pop();
        assert!(fired.is_some(), "no frame was requested");
        sched.run_frame(FrameTick { now_ms });
    }
}

fn counter() -> (Rc<Cell<u32>>, FrameCallback) {
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    (hits, FrameCallback::new(move |_| h.set(h.get() + 1)))
}

#[test]
fn one_outstanding_request_for_many_callbacks() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    assert!(!sched.has_pending_frame());

    let (_, a) = counter();
    let (_, b) = counter();
    sched.add(a);
    assert_eq!(host.outstanding(), 1);
    sched.add(b);
    assert_eq!(host.outstanding(), 1);
    assert_eq!(host.0.requests.get(), 1);
    assert!(sched.has_pending_frame());
}

#[test]
fn removing_last_entry_cancels_request() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let (_, a) = counter();
    let (_, b) = counter();
    sched.add(a.clone());
    sched.add(b.clone());

    assert_eq!(sched.remove(&a), 1);
    assert_eq!(host.outstanding(), 1);
    assert_eq!(sched.remove(&b), 1);
    assert_eq!(host.outstanding(), 0);
    assert_eq!(host.0.cancels.get(), 1);
    assert!(!sched.has_pending_frame());

    // Unknown callbacks are a no-op.
    assert_eq!(sched.remove(&a), 0);
    assert_eq!(host.0.cancels.get(), 1);
}

#[test]
fn remove_drops_every_duplicate() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let (_, a) = counter();
    let (_, b) = counter();
    sched.add(a.clone());
    sched.add(b.clone());
    sched.add(a.clone());
    assert_eq!(sched.len(), 3);

    assert_eq!(sched.remove(&a), 2);
    assert_eq!(sched.len(), 1);
    assert!(sched.has_pending_frame());
}

#[test]
fn identity_is_the_shared_callable() {
    let (_, a) = counter();
    let (_, b) = counter();
    assert!(a.ptr_eq(&a.clone()));
    assert!(!a.ptr_eq(&b));
}

#[test]
fn clear_cancels_and_empties() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let (_, a) = counter();
    sched.add(a);
    sched.clear();
    assert!(sched.is_empty());
    assert_eq!(host.outstanding(), 0);

    // Clearing an idle scheduler does not talk to the host.
    sched.clear();
    assert_eq!(host.0.cancels.get(), 1);
}

#[test]
fn frames_run_in_registration_order_and_rerequest() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["a", "b", "c"] {
        let order = order.clone();
        sched.add(FrameCallback::new(move |_| order.borrow_mut().push(name)));
    }

    host.fire(&sched, 16.0);
    assert_eq!(*order.borrow(), ["a", "b", "c"]);
    assert_eq!(host.outstanding(), 1);
    assert_eq!(host.0.requests.get(), 2);

    host.fire(&sched, 32.0);
    assert_eq!(order.borrow().len(), 6);
}

#[test]
fn mid_frame_changes_apply_next_frame() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let (late_hits, late) = counter();
    let (second_hits, second) = counter();

    let s = sched.clone();
    let second_handle = second.clone();
    let first = FrameCallback::new(move |_| {
        s.remove(&second_handle);
        s.add(late.clone());
    });
    sched.add(first.clone());
    sched.add(second);

    host.fire(&sched, 0.0);
    // `second` was in the snapshot; `late` was not.
    assert_eq!(second_hits.get(), 1);
    assert_eq!(late_hits.get(), 0);
    assert_eq!(host.outstanding(), 1);

    sched.remove(&first);
    host.fire(&sched, 16.0);
    assert_eq!(second_hits.get(), 1);
    assert_eq!(late_hits.get(), 1);
}

#[test]
fn self_removal_stops_scheduling() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let hits = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<WeakFrameCallback>>> = Rc::default();

    let (h, s, me) = (hits.clone(), sched.downgrade(), slot.clone());
    let cb = FrameCallback::new(move |_| {
        h.set(h.get() + 1);
        let me = me.borrow().as_ref().and_then(WeakFrameCallback::upgrade);
        if let (Some(me), Some(s)) = (me, s.upgrade()) {
            s.remove(&me);
        }
    });
    *slot.borrow_mut() = Some(cb.downgrade());
    sched.add(cb);

    host.fire(&sched, 0.0);
    assert_eq!(hits.get(), 1);
    assert!(sched.is_empty());
    assert_eq!(host.outstanding(), 0);
    assert!(!sched.has_pending_frame());
}

#[test]
fn reentrant_invocation_is_skipped() {
    let host = MockHost::default();
    let sched = FrameScheduler::new(host.clone());
    let depth = Rc::new(Cell::new(0));

    let (d, s) = (depth.clone(), sched.downgrade());
    sched.add(FrameCallback::new(move |tick| {
        d.set(d.get() + 1);
        if let Some(s) = s.upgrade() {
            // Runs a nested frame while this callback is still borrowed.
            s.run_frame(*tick);
        }
    }));

    host.fire(&sched, 0.0);
    assert_eq!(depth.get(), 1);
    assert_eq!(host.outstanding(), 1);
}
