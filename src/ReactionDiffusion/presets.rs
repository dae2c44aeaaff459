//! Named (f, k) regimes and the slow morph from one regime to another.

use super::gray_scott::{GrayScott, LiveParameters};
use crate::solver_error::{SolverError, SolverResult};
use log::info;
use nalgebra::DMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayScottPreset {
    pub name: &'static str,
    pub feed: f64,
    pub kill: f64,
}

impl GrayScottPreset {
    pub fn parameters(&self) -> LiveParameters {
        LiveParameters::new(self.feed, self.kill)
    }
}

pub const WORMS: GrayScottPreset = GrayScottPreset {
    name: "Worms",
    feed: 0.078,
    kill: 0.061,
};

pub const MAZES: GrayScottPreset = GrayScottPreset {
    name: "Mazes",
    feed: 0.029,
    kill: 0.057,
};

pub const PRESETS: [GrayScottPreset; 2] = [WORMS, MAZES];

pub fn preset_by_name(name: &str) -> Option<GrayScottPreset> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .copied()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid easing on [0, 1]: 0 -> 0, 1 -> 1, slope concentrated around 0.5.
pub fn smooth(t: f64, inflection: f64) -> f64 {
    let error = sigmoid(-inflection / 2.0);
    ((sigmoid(inflection * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

pub const SMOOTH_INFLECTION: f64 = 10.0;

/// Interpolates feed and kill between two regimes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterMorph {
    pub start: LiveParameters,
    pub end: LiveParameters,
}

impl ParameterMorph {
    pub fn new(start: LiveParameters, end: LiveParameters) -> Self {
        Self { start, end }
    }

    /// Parameters at progress `alpha` (clamped to [0, 1]) after easing.
    pub fn at(&self, alpha: f64) -> LiveParameters {
        let s = smooth(alpha.clamp(0.0, 1.0), SMOOTH_INFLECTION);
        LiveParameters::new(
            self.start.feed + (self.end.feed - self.start.feed) * s,
            self.start.kill + (self.end.kill - self.start.kill) * s,
        )
    }
}

/// Warm-up at the start regime, then one frame per morph sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphRun {
    pub morph: ParameterMorph,
    pub warmup_steps: usize,
    pub frames: usize,
    pub steps_per_frame: usize,
    pub dt: f64,
}

impl MorphRun {
    pub fn new(morph: ParameterMorph, frames: usize) -> Self {
        Self {
            morph,
            warmup_steps: 2000,
            frames,
            steps_per_frame: 5,
            dt: 1.0,
        }
    }

    /// Drives `sim` and hands every frame's V image to `on_frame`
    /// together with the frame index and the parameters used for it.
    pub fn run<F>(&self, sim: &mut GrayScott, mut on_frame: F) -> SolverResult<()>
    where
        F: FnMut(usize, &LiveParameters, DMatrix<u8>),
    {
        if self.frames == 0 {
            return Err(SolverError::domain("a morph run needs at least one frame"));
        }
        let mut live = self.morph.start;
        sim.step(&live, self.dt, self.warmup_steps)?;
        info!("warm-up finished after {} steps", self.warmup_steps);

        for frame in 0..self.frames {
            let alpha = if self.frames == 1 {
                1.0
            } else {
                frame as f64 / (self.frames - 1) as f64
            };
            let next = self.morph.at(alpha);
            live.set(next.feed, next.kill);
            sim.step(&live, self.dt, self.steps_per_frame)?;
            on_frame(frame, &live, sim.v_channel_as_image());
        }
        info!(
            "morph finished: f {:.4} -> {:.4}, k {:.4} -> {:.4} over {} frames",
            self.morph.start.feed, live.feed, self.morph.start.kill, live.kill, self.frames
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth_endpoints_and_symmetry() {
        assert_relative_eq!(smooth(0.0, 10.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(smooth(1.0, 10.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(smooth(0.5, 10.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(smooth(0.2, 10.0) + smooth(0.8, 10.0), 1.0, epsilon = 1e-12);
        assert!(smooth(0.3, 10.0) < smooth(0.31, 10.0));
    }

    #[test]
    fn test_morph_endpoints() {
        let morph = ParameterMorph::new(WORMS.parameters(), MAZES.parameters());
        assert_relative_eq!(morph.at(0.0).feed, 0.078, epsilon = 1e-12);
        assert_relative_eq!(morph.at(1.0).kill, 0.057, epsilon = 1e-12);
        assert_relative_eq!(morph.at(2.0).feed, 0.029, epsilon = 1e-12);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset_by_name("worms"), Some(WORMS));
        assert_eq!(preset_by_name("Mazes").unwrap().kill, 0.057);
        assert!(preset_by_name("spots").is_none());
    }

    #[test]
    fn test_run_emits_every_frame() {
        let mut sim = GrayScott::with_seed(16, 11).unwrap();
        let mut run = MorphRun::new(ParameterMorph::new(WORMS.parameters(), MAZES.parameters()), 4);
        run.warmup_steps = 10;
        let mut seen = Vec::new();
        run.run(&mut sim, |frame, params, image| {
            assert_eq!(image.shape(), (16, 16));
            seen.push((frame, params.feed));
        })
        .unwrap();
        assert_eq!(seen.len(), 4);
        assert_relative_eq!(seen[0].1, WORMS.feed, epsilon = 1e-12);
        assert_relative_eq!(seen[3].1, MAZES.feed, epsilon = 1e-12);
    }

    #[test]
    fn test_run_needs_frames() {
        let mut sim = GrayScott::with_seed(8, 0).unwrap();
        let run = MorphRun::new(ParameterMorph::new(WORMS.parameters(), MAZES.parameters()), 0);
        assert!(run.run(&mut sim, |_, _, _| {}).is_err());
    }
}
