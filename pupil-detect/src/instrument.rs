use std::time::Duration;

use anyhow::anyhow;
use sysinfo::{Pid, System};
use vision::StageTimings;

/// CPU usage of the whole machine and memory share of this process, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

pub struct ResourceMonitor {
    system: System,
    pid: Pid,
}

impl ResourceMonitor {
    pub fn new() -> anyhow::Result<Self> {
        let pid = sysinfo::get_current_pid().map_err(|e| anyhow!("Failed to get own pid: {e}"))?;
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu();

        Ok(Self { system, pid })
    }

    pub fn sample(&mut self) -> ResourceSample {
        self.system.refresh_cpu();
        self.system.refresh_process(self.pid);

        let total = self.system.total_memory();
        let used = self.system.process(self.pid).map(|p| p.memory()).unwrap_or(0);
        let memory_percent = if total == 0 { 0.0 } else { (used as f64 / total as f64 * 100.0) as f32 };

        ResourceSample {
            cpu_percent: self.system.global_cpu_info().cpu_usage(),
            memory_percent,
        }
    }
}

/// Totals over a run of the live detector.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub frames: usize,
    pub stages: StageTimings,
    pub draw: Duration,
    samples: Vec<ResourceSample>,
}

impl RunStats {
    pub fn add_frame(&mut self, timings: &StageTimings, draw: Duration, sample: ResourceSample) {
        self.frames += 1;
        self.stages.preprocess += timings.preprocess;
        self.stages.contours += timings.contours;
        self.stages.filter += timings.filter;
        self.draw += draw;
        self.samples.push(sample);
    }

    pub fn fps(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.frames as f64 / secs
    }

    /// Mean per-frame duration of every stage, draw included.
    pub fn mean_timings(&self) -> Option<(StageTimings, Duration)> {
        let n = u32::try_from(self.frames).ok().filter(|&n| n > 0)?;
        let stages = StageTimings {
            preprocess: self.stages.preprocess / n,
            contours: self.stages.contours / n,
            filter: self.stages.filter / n,
        };

        Some((stages, self.draw / n))
    }

    pub fn mean_resources(&self) -> Option<ResourceSample> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f32;

        Some(ResourceSample {
            cpu_percent: self.samples.iter().map(|s| s.cpu_percent).sum::<f32>() / n,
            memory_percent: self.samples.iter().map(|s| s.memory_percent).sum::<f32>() / n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn averages_over_frames() {
        let mut stats = RunStats::default();
        let timings = |p, c, f| StageTimings { preprocess: ms(p), contours: ms(c), filter: ms(f) };
        stats.add_frame(&timings(4, 2, 1), ms(3), ResourceSample { cpu_percent: 10.0, memory_percent: 1.0 });
        stats.add_frame(&timings(6, 4, 1), ms(5), ResourceSample { cpu_percent: 30.0, memory_percent: 3.0 });

        let (stages, draw) = stats.mean_timings().unwrap();
        assert_eq!(stages, timings(5, 3, 1));
        assert_eq!(draw, ms(4));
        assert_eq!(
            stats.mean_resources(),
            Some(ResourceSample { cpu_percent: 20.0, memory_percent: 2.0 })
        );
        assert_eq!(stats.fps(Duration::from_secs(4)), 0.5);
    }

    #[test]
    fn empty_run_has_no_averages() {
        let stats = RunStats::default();
        assert!(stats.mean_timings().is_none());
        assert!(stats.mean_resources().is_none());
        assert_eq!(stats.fps(Duration::ZERO), 0.0);
    }

    #[test]
    fn monitor_reports_percentages() {
        let mut monitor = ResourceMonitor::new().unwrap();
        let sample = monitor.sample();
        assert!((0.0..=100.0).contains(&sample.memory_percent));
        assert!(sample.cpu_percent >= 0.0);
    }
}
