use crate::page::{Page, PageOptions};

/// Navigation-timing deltas, in milliseconds from navigation start. These
/// come from the embedding environment; the runtime only reads and logs
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTiming {
    pub dom_content_loaded_ms: i64,
    pub load_complete_ms: i64,
    pub dom_interactive_ms: i64,
}

/// A paint-timing entry (first-paint, first-contentful-paint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintEntry {
    pub name: String,
    pub start_ms: i64,
}

impl Page {
    /// Logs the startup performance picture: navigation timing plus the
    /// capability-checked observer metrics. Anything unavailable degrades to
    /// an informational line; nothing here is ever fatal.
    pub(crate) fn log_performance(&mut self, options: &PageOptions) {
        match options.navigation_timing {
            Some(timing) => {
                self.log(format!(
                    "[perf] dom_content_loaded_ms={}",
                    timing.dom_content_loaded_ms
                ));
                self.log(format!(
                    "[perf] load_complete_ms={}",
                    timing.load_complete_ms
                ));
                self.log(format!(
                    "[perf] dom_interactive_ms={}",
                    timing.dom_interactive_ms
                ));
            }
            None => self.log("[perf] navigation timing unavailable".into()),
        }

        if !options.performance_observer {
            self.log("[perf] performance observers unavailable".into());
            return;
        }

        for entry in &options.paint_entries {
            self.log(format!(
                "[perf] paint name={} start_ms={}",
                entry.name, entry.start_ms
            ));
        }
        if let Some(delay) = options.first_input_delay_ms {
            self.log(format!("[perf] first_input_delay_ms={delay}"));
        }
        if let Some(score) = options.layout_shift_score {
            self.log(format!("[perf] cumulative_layout_shift={score}"));
        }
    }
}
