//! Deterministic headless runtime for a static marketing site's interactive
//! behavior layer: mobile menu toggling, smooth in-page scrolling, scroll-spy
//! navigation highlighting, contact-form validation with a simulated
//! submission, a notification toast, lazy image loading, resource hints, and
//! performance-metric logging.
//!
//! The runtime hosts an in-memory DOM parsed from an HTML fixture, a
//! simulated viewport with scroll position, and a virtual clock with a timer
//! queue. Tests drive it through synthetic events and assert on the
//! resulting DOM state:
//!
//! ```
//! use site_runtime::Page;
//!
//! # fn main() -> site_runtime::Result<()> {
//! let html = r#"
//!     <header class='header' data-height='80'></header>
//!     <button class='nav-toggle' aria-expanded='false'>
//!       <span class='bar'></span><span class='bar'></span><span class='bar'></span>
//!     </button>
//!     <ul class='nav-menu'><li><a class='nav-link' href='#about'>About</a></li></ul>
//!     <section id='about' data-top='500' data-height='400'></section>
//! "#;
//! let mut page = Page::from_html(html)?;
//! page.click(".nav-toggle")?;
//! assert_eq!(page.attr(".nav-toggle", "aria-expanded")?.as_deref(), Some("true"));
//! page.click(".nav-link")?;
//! assert_eq!(page.scroll_y(), 400); // 500 - 80 header - 20 margin
//! # Ok(())
//! # }
//! ```

use std::error::Error as StdError;
use std::fmt;

mod behavior;
mod dom;
mod html;
mod page;
mod pattern;
mod selector;

#[cfg(test)]
mod tests;

pub use behavior::form::is_valid_email;
pub use behavior::perf::{NavigationTiming, PaintEntry};
pub use dom::Rect;
pub use page::{KeyModifiers, Page, PageOptions, PendingTimer};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    Runtime(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

/// Behavior constants shared by the controllers. These mirror the rendered
/// page's CSS breakpoints and animation timings, so tests and controllers
/// agree on the same numbers.
pub mod consts {
    /// Viewport width above which the mobile menu force-closes.
    pub const MOBILE_BREAKPOINT_PX: i64 = 768;
    /// Extra breathing room left above a section after a smooth scroll.
    pub const SCROLL_MARGIN_PX: i64 = 20;
    /// Scroll offset past which downward scrolling hides the header.
    pub const HEADER_HIDE_THRESHOLD_PX: i64 = 100;
    /// Lookahead applied when resolving the current scroll-spy section.
    pub const SCROLLSPY_LOOKAHEAD_PX: i64 = 100;
    /// A card becomes visible once its top enters the bottom 80% of the
    /// viewport (expressed as a percentage to avoid float geometry).
    pub const REVEAL_VIEWPORT_PERCENT: i64 = 80;
    /// Simulated contact-form submission latency.
    pub const SUBMIT_DELAY_MS: i64 = 2000;
    /// Notification toast lifetime when not manually dismissed.
    pub const TOAST_DISMISS_MS: i64 = 5000;
    /// Quiet period for the opt-in debounced scroll mode.
    pub const SCROLL_DEBOUNCE_MS: i64 = 100;
}
