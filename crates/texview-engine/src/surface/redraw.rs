use crate::render::DrawOutcome;

/// Consecutive skipped frames retried before waiting for the next event.
pub const MAX_SKIP_RETRIES: u32 = 3;

/// When the surface draws in response to the host's per-cycle callback.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RedrawPolicy {
    /// Draw only after an invalidation (image change, resize, first show).
    #[default]
    OnDemand,
    /// Draw on every redraw callback and keep requesting the next one.
    Continuous,
}

/// Dirty flag for lazy redraw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Invalidation {
    pending: bool,
}

impl Invalidation {
    pub fn mark(&mut self) {
        self.pending = true;
    }

    pub fn clear(&mut self) {
        self.pending = false;
    }

    #[inline]
    pub fn is_pending(self) -> bool {
        self.pending
    }

    /// Returns whether a redraw was pending and clears the flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl RedrawPolicy {
    /// Decides whether a redraw callback should produce a frame, consuming
    /// the pending invalidation if it does.
    pub fn should_draw(self, invalidation: &mut Invalidation) -> bool {
        let pending = invalidation.take();
        match self {
            RedrawPolicy::Continuous => true,
            RedrawPolicy::OnDemand => pending,
        }
    }
}

/// Redraw bookkeeping for one surface: policy, dirty flag, skip retries and
/// whether the drawable has been lost for good.
#[derive(Debug, Clone, Default)]
pub struct RedrawState {
    policy: RedrawPolicy,
    invalidation: Invalidation,
    skipped_in_a_row: u32,
    lost: bool,
}

impl RedrawState {
    pub fn new(policy: RedrawPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.invalidation.is_pending()
    }

    /// Set once a frame came back [`DrawOutcome::Fatal`]; never cleared.
    #[inline]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn invalidate(&mut self) {
        self.invalidation.mark();
    }

    /// Host redraw callback: whether to produce a frame now.
    pub fn should_draw(&mut self) -> bool {
        if self.lost {
            return false;
        }
        self.policy.should_draw(&mut self.invalidation)
    }

    /// Records the outcome of a frame. Returns `true` when another redraw
    /// callback should be requested.
    ///
    /// Skips on a surface with drawable area are retried up to
    /// [`MAX_SKIP_RETRIES`] times in a row; a presented frame resets the count.
    pub fn record(&mut self, outcome: DrawOutcome, has_area: bool) -> bool {
        match outcome {
            DrawOutcome::Presented => {
                self.invalidation.clear();
                self.skipped_in_a_row = 0;
                self.policy == RedrawPolicy::Continuous
            }
            DrawOutcome::Skipped => {
                if has_area && self.skipped_in_a_row < MAX_SKIP_RETRIES {
                    self.skipped_in_a_row += 1;
                    self.invalidation.mark();
                    return true;
                }
                self.policy == RedrawPolicy::Continuous
            }
            DrawOutcome::Fatal => {
                self.lost = true;
                false
            }
        }
    }
}
