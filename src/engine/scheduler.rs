//! Render-on-demand scheduling.
//!
//! With `auto_render` on, every frame renders. With it off, a frame renders
//! only after someone called [`RenderScheduler::request_render`]: the
//! camera moved, accumulation still has samples left, the viewport
//! resized, or a cut (focus, reset) happened. The first frame always
//! schedules one follow-up so accumulation gets going.

/// Decides whether the next frame needs rendering.
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    auto_render: bool,
    render_next_frame: bool,
    first_frame: bool,
}

impl RenderScheduler {
    /// Create a scheduler; the first frame always renders.
    #[must_use]
    pub fn new(auto_render: bool) -> Self {
        Self {
            auto_render,
            render_next_frame: true,
            first_frame: true,
        }
    }

    /// Whether every frame renders.
    #[must_use]
    pub fn auto_render(&self) -> bool {
        self.auto_render
    }

    /// Switch continuous rendering on or off. Turning it off schedules one
    /// frame so the view is up to date.
    pub fn set_auto_render(&mut self, auto_render: bool) {
        self.auto_render = auto_render;
        if !auto_render {
            self.request_render();
        }
    }

    /// Schedule a render for the next frame.
    pub fn request_render(&mut self) {
        self.render_next_frame = true;
    }

    /// Whether a render is pending (or rendering is continuous).
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.auto_render || self.render_next_frame
    }

    /// Start a frame: returns whether to render it and consumes the pending
    /// request.
    pub fn begin_frame(&mut self) -> bool {
        let render = self.should_render();
        self.render_next_frame = false;
        render
    }

    /// Finish a frame. `busy` is whether accumulation has samples left.
    pub fn frame_end(&mut self, busy: bool) {
        if self.first_frame {
            self.first_frame = false;
            self.request_render();
        }
        if busy {
            self.request_render();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_scheduler_stops_after_first_frames() {
        let mut s = RenderScheduler::new(false);
        assert!(s.begin_frame());
        s.frame_end(false);
        // The first frame schedules a follow-up.
        assert!(s.begin_frame());
        s.frame_end(false);
        assert!(!s.begin_frame());
    }

    #[test]
    fn busy_accumulation_keeps_rendering() {
        let mut s = RenderScheduler::new(false);
        let _ = s.begin_frame();
        s.frame_end(false);
        let _ = s.begin_frame();
        s.frame_end(true);
        assert!(s.begin_frame());
        s.frame_end(false);
        assert!(!s.begin_frame());
    }

    #[test]
    fn requests_are_consumed_once() {
        let mut s = RenderScheduler::new(false);
        let _ = s.begin_frame();
        s.frame_end(false);
        let _ = s.begin_frame();
        s.request_render();
        s.request_render();
        assert!(s.begin_frame());
        assert!(!s.begin_frame());
    }

    #[test]
    fn auto_render_always_renders() {
        let mut s = RenderScheduler::new(true);
        for _ in 0..3 {
            assert!(s.begin_frame());
            s.frame_end(false);
        }
        s.set_auto_render(false);
        assert!(s.begin_frame());
        assert!(!s.begin_frame());
    }
}
