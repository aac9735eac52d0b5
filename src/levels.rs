use crate::config::LevelConfig;
use crate::error::{MascotError, Result};

/// Level → cumulative XP lookup, extrapolated linearly past the last entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: Vec<u64>,
    increment: u64,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::from_config(&LevelConfig::default())
    }
}

impl LevelTable {
    /// Build from an already validated config.
    pub fn from_config(config: &LevelConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            increment: config.increment,
        }
    }

    /// Highest level with a tabulated threshold.
    pub fn max_tabulated_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Cumulative XP needed to reach `level`.
    pub fn threshold_for(&self, level: u32) -> Result<u64> {
        if level < 1 {
            return Err(MascotError::OutOfRange { level });
        }
        let max_level = self.max_tabulated_level();
        if level <= max_level {
            return Ok(self.thresholds[(level - 1) as usize]);
        }
        let top = self.thresholds[(max_level - 1) as usize];
        let extra = u64::from(level - max_level);
        extra
            .checked_mul(self.increment)
            .and_then(|x| x.checked_add(top))
            .ok_or(MascotError::XpOverflow)
    }

    /// Highest level whose threshold `xp` satisfies, scanning up from `level_hint`.
    ///
    /// Never returns less than the hint. Past the table the step is constant,
    /// so the remaining levels are counted by division instead of walked.
    /// Fails with `XpOverflow` when the next level would not be representable.
    pub fn level_for(&self, xp: u64, level_hint: u32) -> Result<u32> {
        // validates the hint
        self.threshold_for(level_hint)?;
        let max_level = self.max_tabulated_level();
        let mut level = level_hint;
        // thresholds[level] is the cost of level + 1
        while level < max_level && xp >= self.thresholds[level as usize] {
            level += 1;
        }

        if level >= max_level {
            let top = self.thresholds[(max_level - 1) as usize];
            let extra = xp
                .saturating_sub(top)
                .checked_div(self.increment)
                .unwrap_or(0);
            let extrapolated = u64::from(max_level)
                .checked_add(extra)
                .and_then(|l| u32::try_from(l).ok())
                .ok_or(MascotError::XpOverflow)?;
            level = level.max(extrapolated);
        }

        if level == u32::MAX {
            return Err(MascotError::XpOverflow);
        }
        self.threshold_for(level + 1)?;
        Ok(level)
    }

    /// 0.0..=1.0 progress from the current level's threshold to the next
    pub fn level_progress(&self, level: u32, xp: u64) -> Result<f64> {
        let floor = self.threshold_for(level)?;
        let goal = match self.threshold_for(level.saturating_add(1)) {
            Ok(goal) => goal,
            Err(MascotError::XpOverflow) => return Ok(1.0),
            Err(e) => return Err(e),
        };
        if goal <= floor {
            return Ok(1.0);
        }
        let progress = (xp.saturating_sub(floor)) as f64 / (goal - floor) as f64;
        Ok(progress.clamp(0.0, 1.0))
    }
}
