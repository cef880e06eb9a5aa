//! Frame loop state machine with an explicit cancellation handle.
//!
//! ```text
//!   Idle --start()--> Running --stop()--> Stopped
//!     \________________stop()______________/
//! ```
//!
//! The loop does not own a thread or a timer. The platform calls back once
//! per frame (winit's `RedrawRequested`), and [`RenderLoop::begin_frame`]
//! decides whether that callback may draw. Scheduling goes through a
//! [`FrameScheduler`] so the loop can hold on to the pending handle and cancel
//! it on teardown.

/// Identifies one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The platform's "call me before the next repaint" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraws a pending request. Platforms that cannot retract a request
    /// may treat this as a no-op; the loop ignores callbacks once stopped.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self {
            state: LoopState::Idle,
            pending: None,
            frames: 0,
        }
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The frame request currently outstanding, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames admitted by [`begin_frame`](Self::begin_frame) so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves from `Idle` to `Running` and requests the first frame.
    ///
    /// Returns `false` if the loop has already been started or stopped.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        self.state = LoopState::Running;
        self.pending = Some(scheduler.request_frame());
        tracing::info!("render loop started");
        true
    }

    /// Called from the platform's frame callback.
    ///
    /// While running, schedules the next frame and returns `true`: the
    /// caller should animate and draw. Otherwise returns `false` and
    /// schedules nothing.
    pub fn begin_frame(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.pending = Some(scheduler.request_frame());
        self.frames += 1;
        true
    }

    /// Cancels the outstanding frame request and stops for good.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        if self.state != LoopState::Stopped {
            tracing::info!(frames = self.frames, "render loop stopped");
        }
        self.state = LoopState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        next: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for Recorder {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle::new(self.next);
            self.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn idle_loop_does_not_draw() {
        let mut scheduler = Recorder::default();
        let mut frame_loop = RenderLoop::new();
        assert!(!frame_loop.begin_frame(&mut scheduler));
        assert!(scheduler.requested.is_empty());
    }

    #[test]
    fn start_happens_once() {
        let mut scheduler = Recorder::default();
        let mut frame_loop = RenderLoop::new();
        assert!(frame_loop.start(&mut scheduler));
        assert!(!frame_loop.start(&mut scheduler));
        assert_eq!(scheduler.requested.len(), 1);
        assert_eq!(frame_loop.state(), LoopState::Running);
    }

    #[test]
    fn each_frame_schedules_the_next() {
        let mut scheduler = Recorder::default();
        let mut frame_loop = RenderLoop::new();
        frame_loop.start(&mut scheduler);

        for _ in 0..3 {
            assert!(frame_loop.begin_frame(&mut scheduler));
        }
        assert_eq!(frame_loop.frames(), 3);
        assert_eq!(scheduler.requested.len(), 4);
        assert_eq!(frame_loop.pending(), Some(FrameHandle::new(4)));
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut scheduler = Recorder::default();
        let mut frame_loop = RenderLoop::new();
        frame_loop.start(&mut scheduler);
        frame_loop.begin_frame(&mut scheduler);

        frame_loop.stop(&mut scheduler);

        assert_eq!(scheduler.cancelled, vec![FrameHandle::new(2)]);
        assert_eq!(frame_loop.pending(), None);
        assert!(!frame_loop.begin_frame(&mut scheduler));
        assert!(!frame_loop.start(&mut scheduler));
        assert_eq!(scheduler.requested.len(), 2);
    }

    #[test]
    fn stopping_twice_cancels_once() {
        let mut scheduler = Recorder::default();
        let mut frame_loop = RenderLoop::new();
        frame_loop.start(&mut scheduler);
        frame_loop.stop(&mut scheduler);
        frame_loop.stop(&mut scheduler);
        assert_eq!(scheduler.cancelled.len(), 1);
    }
}
