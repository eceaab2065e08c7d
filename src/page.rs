use crate::behavior::form::FormState;
use crate::behavior::lazy::LazyState;
use crate::behavior::menu::MenuState;
use crate::behavior::nav::NavState;
use crate::behavior::notify::ToastState;
use crate::behavior::perf::{NavigationTiming, PaintEntry};
use crate::consts;
use crate::dom::{Dom, NodeId, Rect};
use crate::html::parse_html;
use crate::{Error, Result};

/// What a scheduled timer does when it fires. The behaviors only ever need
/// delayed work of these three shapes, so the queue stores a closed enum
/// instead of callbacks; execution stays deterministic and replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerAction {
    FinishSubmission,
    DismissToast(NodeId),
    ScrollSweep,
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) action: TimerAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

/// Initial conditions for a page: viewport geometry, browser capabilities,
/// and the performance records the logger reads at startup.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub viewport_width: i64,
    pub viewport_height: i64,
    /// Whether the intersection capability exists; when absent, lazy images
    /// and card reveals degrade per the capability-absent rules.
    pub intersection_observer: bool,
    /// Whether performance-entry observers can be constructed.
    pub performance_observer: bool,
    pub navigation_timing: Option<NavigationTiming>,
    pub paint_entries: Vec<PaintEntry>,
    pub first_input_delay_ms: Option<i64>,
    pub layout_shift_score: Option<f64>,
    /// Opt-in debounced scroll handling: scroll bursts collapse into one
    /// trailing sweep after this quiet period instead of re-evaluating on
    /// every scroll event.
    pub scroll_debounce_ms: Option<i64>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 800,
            intersection_observer: true,
            performance_observer: true,
            navigation_timing: None,
            paint_entries: Vec::new(),
            first_input_delay_ms: None,
            layout_shift_score: None,
            scroll_debounce_ms: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Trace {
    enabled: bool,
    events: bool,
    timers: bool,
    lines: Vec<String>,
    limit: usize,
    to_stderr: bool,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            lines: Vec::new(),
            limit: 10_000,
            to_stderr: false,
        }
    }
}

pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) viewport_width: i64,
    pub(crate) viewport_height: i64,
    pub(crate) scroll_y: i64,
    pub(crate) focused: Option<NodeId>,
    pub(crate) mount: NodeId,
    pub(crate) history: Vec<String>,
    pub(crate) now_ms: i64,
    task_queue: Vec<ScheduledTask>,
    next_timer_id: i64,
    next_task_order: i64,
    timer_step_limit: usize,
    pub(crate) scroll_debounce_ms: Option<i64>,
    trace: Trace,
    pub(crate) menu: MenuState,
    pub(crate) nav: NavState,
    pub(crate) form: FormState,
    pub(crate) toast: ToastState,
    pub(crate) lazy: LazyState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_options(html, PageOptions::default())
    }

    pub fn from_html_with_options(html: &str, options: PageOptions) -> Result<Self> {
        let dom = parse_html(html)?;
        let mount = dom
            .query_selector("body")?
            .unwrap_or(dom.root);

        let mut page = Self {
            dom,
            viewport_width: options.viewport_width,
            viewport_height: options.viewport_height,
            scroll_y: 0,
            focused: None,
            mount,
            history: Vec::new(),
            now_ms: 0,
            task_queue: Vec::new(),
            next_timer_id: 1,
            next_task_order: 0,
            timer_step_limit: 10_000,
            scroll_debounce_ms: options.scroll_debounce_ms,
            trace: Trace::default(),
            menu: MenuState::default(),
            nav: NavState::default(),
            form: FormState::default(),
            toast: ToastState::default(),
            lazy: LazyState::default(),
        };

        // Each controller resolves its markup once, up front. Pages missing a
        // feature's markup leave that controller inert rather than failing.
        page.menu_init()?;
        page.nav_init()?;
        page.form_init()?;
        page.lazy_init(options.intersection_observer)?;
        page.inject_resource_hints()?;
        page.log_performance(&options);

        // Elements already in the initial viewport count as intersecting.
        page.lazy_evaluate()?;
        page.reveal_cards()?;

        Ok(page)
    }

    // --- event surface -----------------------------------------------------

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.trace_event(format!("[event] click target={selector}"));
        let outcome = self.route_click(target);
        self.capture_fault("click", outcome);
        Ok(())
    }

    /// Clicks the document position `y`, hit-testing the last element in
    /// document order whose box contains it. Positions no element occupies
    /// land on the page body, which is how tests click empty space.
    pub fn click_at(&mut self, y: i64) {
        let target = self.hit_test(y).unwrap_or(self.mount);
        if self.dom.disabled(target) {
            return;
        }
        self.trace_event(format!("[event] click y={y}"));
        let outcome = self.route_click(target);
        self.capture_fault("click", outcome);
    }

    fn hit_test(&self, y: i64) -> Option<NodeId> {
        let mut elements = Vec::new();
        self.dom.collect_elements_dfs(self.dom.root, &mut elements);
        elements
            .into_iter()
            .filter(|node| {
                let rect = self.dom.rect(*node);
                rect.height > 0 && y >= rect.top && y < rect.bottom()
            })
            .last()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text)?;
        self.trace_event(format!("[event] input target={selector}"));
        let outcome = self.field_input(target);
        self.capture_fault("input", outcome);
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.focused = Some(target);
        Ok(())
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.focused == Some(target) {
            self.focused = None;
        }
        self.trace_event(format!("[event] blur target={selector}"));
        let outcome = self.field_blur(target);
        self.capture_fault("blur", outcome);
        Ok(())
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.trace_event(format!("[event] submit target={selector}"));
        let outcome = self.form_submit(target);
        self.capture_fault("submit", outcome);
        Ok(())
    }

    pub fn press_key(&mut self, key: &str) {
        self.press_key_with(key, KeyModifiers::default());
    }

    pub fn press_key_with(&mut self, key: &str, modifiers: KeyModifiers) {
        self.trace_event(format!("[event] keydown key={key}"));
        let outcome = self.route_key(key, modifiers);
        self.capture_fault("keydown", outcome);
    }

    /// Scrolls the viewport to `y` (clamped at the top of the document) and
    /// runs the scroll behaviors, immediately in the baseline or after the
    /// quiet period when debounced mode is on.
    pub fn scroll_to(&mut self, y: i64) {
        self.scroll_y = y.max(0);
        self.trace_event(format!("[event] scroll y={}", self.scroll_y));
        if let Some(quiet_ms) = self.scroll_debounce_ms {
            if let Some(id) = self.nav.debounce_timer.take() {
                self.clear_timer(id);
            }
            let id = self.schedule(quiet_ms, TimerAction::ScrollSweep);
            self.nav.debounce_timer = Some(id);
        } else {
            let outcome = self.scroll_sweep();
            self.capture_fault("scroll", outcome);
        }
    }

    pub fn resize(&mut self, width: i64) {
        self.viewport_width = width.max(0);
        self.trace_event(format!("[event] resize width={}", self.viewport_width));
        if self.viewport_width > consts::MOBILE_BREAKPOINT_PX {
            let outcome = self.menu_close();
            self.capture_fault("resize", outcome);
        }
    }

    /// Feeds a simulated unhandled promise rejection through the page-wide
    /// rejection hook.
    pub fn report_unhandled_rejection(&mut self, reason: &str) {
        self.log(format!("[error] unhandled rejection: {reason}"));
    }

    // --- virtual clock -----------------------------------------------------

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.now_ms;
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let ran = self.run_due_timers_internal()?;
        self.trace_timer(format!(
            "[timer] advance delta_ms={} from={} to={} ran_due={}",
            delta_ms, from, self.now_ms, ran
        ));
        Ok(())
    }

    /// Runs every pending timer, advancing the clock to each one's due time.
    pub fn flush(&mut self) -> Result<()> {
        let mut steps = 0usize;
        while let Some(index) = self.next_task_index(None) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(Error::Runtime("timer step limit exceeded".into()));
            }
            let task = self.task_queue.remove(index);
            if task.due_at > self.now_ms {
                self.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        self.trace_timer(format!("[timer] flush ran={steps}"));
        Ok(())
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub(crate) fn schedule(&mut self, delay_ms: i64, action: TimerAction) -> i64 {
        let delay_ms = delay_ms.max(0);
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        let due_at = self.now_ms + delay_ms;
        self.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            action,
        });
        self.trace_timer(format!(
            "[timer] schedule id={id} due_at={due_at} action={action:?}"
        ));
        id
    }

    pub(crate) fn clear_timer(&mut self, id: i64) {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != id);
        let removed = before.saturating_sub(self.task_queue.len());
        self.trace_timer(format!("[timer] clear id={id} removed={removed}"));
    }

    fn run_due_timers_internal(&mut self) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(index) = self.next_task_index(Some(self.now_ms)) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(Error::Runtime("timer step limit exceeded".into()));
            }
            let task = self.task_queue.remove(index);
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(index, _)| index)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_timer(format!(
            "[timer] fire id={} action={:?} at={}",
            task.id, task.action, self.now_ms
        ));
        let outcome = match task.action {
            TimerAction::FinishSubmission => self.form_finish_submission(),
            TimerAction::DismissToast(node) => self.toast_dismiss_node(node),
            TimerAction::ScrollSweep => {
                self.nav.debounce_timer = None;
                self.scroll_sweep()
            }
        };
        self.capture_fault("timer", outcome);
        Ok(())
    }

    // --- viewport and geometry --------------------------------------------

    pub fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    pub fn viewport_width(&self) -> i64 {
        self.viewport_width
    }

    /// Overrides an element's document-relative geometry; fixtures usually
    /// declare this via `data-top` / `data-height` instead.
    pub fn set_rect(&mut self, selector: &str, top: i64, height: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_rect(target, Rect { top, height })
    }

    // --- history -----------------------------------------------------------

    pub fn history_entries(&self) -> &[String] {
        &self.history
    }

    pub fn current_hash(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    // --- DOM inspection ----------------------------------------------------

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.value(target).unwrap_or_default().to_string())
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name).map(str::to_string))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    /// Reads an attribute off the currently focused element, if any.
    pub fn focused_attr(&self, name: &str) -> Option<String> {
        self.focused
            .and_then(|node| self.dom.attr(node, name).map(str::to_string))
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.disabled(target))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_selector(selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.trim().to_string(),
                dom_snippet: self.dom.dump(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target).unwrap_or_default();
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.dom.dump(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        if self.dom.query_selector(selector)?.is_none() {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump(target))
    }

    // --- logging -----------------------------------------------------------

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace.lines)
    }

    /// Appends a line to the page log unconditionally (metrics, errors).
    pub(crate) fn log(&mut self, line: String) {
        if self.trace.to_stderr {
            eprintln!("{line}");
        }
        self.trace.lines.push(line);
        if self.trace.lines.len() > self.trace.limit {
            self.trace.lines.remove(0);
        }
    }

    pub(crate) fn trace_event(&mut self, line: String) {
        if self.trace.enabled && self.trace.events {
            self.log(line);
        }
    }

    pub(crate) fn trace_timer(&mut self, line: String) {
        if self.trace.enabled && self.trace.timers {
            self.log(line);
        }
    }

    /// Page-wide error boundary: controller faults are logged with context
    /// and never propagate to the event caller. Registered here exactly once;
    /// every event and timer dispatch funnels through it.
    pub(crate) fn capture_fault(&mut self, source: &str, outcome: Result<()>) {
        if let Err(error) = outcome {
            self.log(format!("[error] source={source} message={error}"));
        }
    }

    // --- plumbing ----------------------------------------------------------

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    /// Routes a click to the behavior that owns the target: the document-wide
    /// outside-click rule for the open menu runs first, then notification
    /// dismissal, menu toggling, in-page anchors, and form submission.
    fn route_click(&mut self, target: NodeId) -> Result<()> {
        // Unconditional: any click outside both toggle and panel closes an
        // open menu, whatever else the click does.
        self.menu_outside_click(target)?;

        if let Some(close) = self.dom.closest(target, ".notification-close")? {
            if self
                .toast
                .current
                .is_some_and(|toast| self.dom.contains(toast, close))
            {
                return self.toast_dismiss_current();
            }
        }

        if self
            .menu
            .toggle
            .is_some_and(|toggle| self.dom.contains(toggle, target))
        {
            return self.menu_toggle();
        }

        if let Some(anchor) = self.dom.closest(target, "a[href^='#']")? {
            return self.anchor_activate(anchor);
        }

        if let Some(control) = self.dom.closest(target, "button[type='submit'], input[type='submit']")? {
            if self
                .form
                .form
                .is_some_and(|form| self.dom.contains(form, control))
            {
                return self.form_submit(control);
            }
        }

        Ok(())
    }

    fn route_key(&mut self, key: &str, modifiers: KeyModifiers) -> Result<()> {
        match key {
            "Escape" => {
                self.menu_close()?;
                self.toast_dismiss_current()
            }
            "Enter" | " " => {
                if let Some(node) = self.focused {
                    if self.nav.links.contains(&node) {
                        return self.anchor_activate(node);
                    }
                }
                Ok(())
            }
            "ArrowDown" => self.nav_focus_step(1),
            "ArrowUp" => self.nav_focus_step(-1),
            "k" | "K" if modifiers.ctrl || modifiers.meta => {
                // Reserved for a future search focus shortcut.
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
