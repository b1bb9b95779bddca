use crate::foundation::error::{ReelError, ReelResult};

/// How an auxiliary track is stretched to a target duration: loop whole copies, then truncate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopPlan {
    source_duration: f64,
    target_duration: f64,
    loops_needed: u64,
}

impl LoopPlan {
    /// Plan `ceil(target / source)` copies of a `source_duration` track cut to `target_duration`.
    pub fn new(source_duration: f64, target_duration: f64) -> ReelResult<Self> {
        if !source_duration.is_finite() || source_duration <= 0.0 {
            return Err(ReelError::asset(format!(
                "track duration must be finite and > 0, got {source_duration}"
            )));
        }
        if !target_duration.is_finite() || target_duration < 0.0 {
            return Err(ReelError::validation(format!(
                "target duration must be finite and >= 0, got {target_duration}"
            )));
        }
        let loops_needed = ((target_duration / source_duration).ceil() as u64).max(1);
        Ok(Self {
            source_duration,
            target_duration,
            loops_needed,
        })
    }

    /// Number of whole source copies concatenated before truncation.
    pub fn loops_needed(&self) -> u64 {
        self.loops_needed
    }

    /// Duration of one source copy.
    pub fn source_duration(&self) -> f64 {
        self.source_duration
    }

    /// Duration of the untruncated concatenation.
    pub fn concatenated_duration(&self) -> f64 {
        self.loops_needed as f64 * self.source_duration
    }

    /// Duration after truncation; always exactly the target.
    pub fn duration(&self) -> f64 {
        self.target_duration
    }

    /// Source-local time shown at output time `t`.
    ///
    /// `t` is clamped to `[0, target]`; the result is `t mod source_duration`.
    pub fn source_time(&self, t: f64) -> f64 {
        t.clamp(0.0, self.target_duration)
            .rem_euclid(self.source_duration)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/looping.rs"]
mod tests;
