use crate::consts;
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

/// Navigation state shared by the smooth-scroll and scroll-spy behaviors:
/// the fixed header, the in-page nav links, the sections they target, and
/// the card elements revealed on scroll. All references resolve once at
/// initialization.
#[derive(Debug, Default)]
pub(crate) struct NavState {
    pub(crate) header: Option<NodeId>,
    pub(crate) links: Vec<NodeId>,
    pub(crate) sections: Vec<NodeId>,
    pub(crate) cards: Vec<NodeId>,
    pub(crate) last_scroll_top: i64,
    pub(crate) debounce_timer: Option<i64>,
}

impl Page {
    pub(crate) fn nav_init(&mut self) -> Result<()> {
        self.nav.header = self.dom.query_selector("header, .header")?;
        self.nav.links = self.dom.query_selector_all(".nav-link")?;
        self.nav.sections = self.dom.query_selector_all("section[id]")?;
        self.nav.cards = self.dom.query_selector_all(".card")?;
        Ok(())
    }

    fn header_height(&self) -> i64 {
        self.nav
            .header
            .map(|header| self.dom.rect(header).height)
            .unwrap_or(0)
    }

    /// In-page anchor activation: suppress the default jump, resolve the
    /// target by id (silently tolerating a dangling href), scroll to it
    /// below the fixed header, record the hash in history, close the mobile
    /// menu, and mark the link active.
    pub(crate) fn anchor_activate(&mut self, anchor: NodeId) -> Result<()> {
        let Some(href) = self.dom.attr(anchor, "href").map(str::to_string) else {
            return Ok(());
        };
        let Some(id) = href.strip_prefix('#') else {
            return Ok(());
        };
        if id.is_empty() {
            return Ok(());
        }
        let Some(target) = self.dom.by_id(id) else {
            // Dangling in-page link; tolerated, not an error.
            return Ok(());
        };

        let offset =
            (self.dom.rect(target).top - self.header_height() - consts::SCROLL_MARGIN_PX).max(0);
        self.scroll_to(offset);

        // History reflects the new in-page location without re-navigating.
        self.history.push(href);

        self.menu_close()?;
        if self.nav.links.contains(&anchor) {
            self.set_active_link(Some(anchor))?;
        }
        Ok(())
    }

    /// One scroll-event evaluation: header direction handling, current
    /// section resolution, card reveals, and lazy image checks.
    pub(crate) fn scroll_sweep(&mut self) -> Result<()> {
        let y = self.scroll_y;

        if let Some(header) = self.nav.header {
            if y > self.nav.last_scroll_top && y > consts::HEADER_HIDE_THRESHOLD_PX {
                self.dom.class_add(header, "header-hidden")?;
            } else if y < self.nav.last_scroll_top {
                self.dom.class_remove(header, "header-hidden")?;
            }
        }
        self.nav.last_scroll_top = y;

        if let Some(link) = self.resolve_active_link()? {
            self.set_active_link(Some(link))?;
        }

        self.reveal_cards()?;
        self.lazy_evaluate()?;
        Ok(())
    }

    /// Scans sections last to first and picks the first (lowest) one the
    /// user has scrolled past, honoring the header height and the lookahead
    /// margin. Returns the matching nav link, or `None` when no section
    /// qualifies (the active link is then left unchanged).
    fn resolve_active_link(&self) -> Result<Option<NodeId>> {
        let threshold_base = self.header_height() + consts::SCROLLSPY_LOOKAHEAD_PX;
        for section in self.nav.sections.iter().rev() {
            let top = self.dom.rect(*section).top;
            if self.scroll_y >= top - threshold_base {
                let Some(id) = self.dom.attr(*section, "id") else {
                    continue;
                };
                let wanted = format!("#{id}");
                let link = self
                    .nav
                    .links
                    .iter()
                    .copied()
                    .find(|link| self.dom.attr(*link, "href") == Some(wanted.as_str()));
                return Ok(link);
            }
        }
        Ok(None)
    }

    /// At most one link carries the `active` marker at any time.
    pub(crate) fn set_active_link(&mut self, active: Option<NodeId>) -> Result<()> {
        let links = self.nav.links.clone();
        for link in links {
            self.dom.class_set(link, "active", Some(link) == active)?;
        }
        Ok(())
    }

    /// Cards become visible once their box enters the bottom 80% of the
    /// viewport and has not yet fully scrolled past the top. The marker is
    /// never removed; reveals are one-way.
    pub(crate) fn reveal_cards(&mut self) -> Result<()> {
        let cards = self.nav.cards.clone();
        for card in cards {
            let rect = self.dom.rect(card);
            let viewport_top = rect.top - self.scroll_y;
            let viewport_bottom = rect.bottom() - self.scroll_y;
            let reveal_line = self.viewport_height * consts::REVEAL_VIEWPORT_PERCENT / 100;
            if viewport_top < reveal_line && viewport_bottom > 0 {
                self.dom.class_add(card, "visible")?;
            }
        }
        Ok(())
    }

    /// ArrowDown/ArrowUp move focus between adjacent nav links; focus stays
    /// put at either end of the list.
    pub(crate) fn nav_focus_step(&mut self, delta: i64) -> Result<()> {
        let Some(focused) = self.focused else {
            return Ok(());
        };
        let Some(index) = self.nav.links.iter().position(|link| *link == focused) else {
            return Ok(());
        };
        let next = (index as i64 + delta).clamp(0, self.nav.links.len() as i64 - 1) as usize;
        self.focused = Some(self.nav.links[next]);
        Ok(())
    }
}
