use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

/// Mobile menu controller. The only stateful value is the open flag; the
/// `aria-expanded` attribute, the panel's `active` class, and the hamburger
/// bar styles are all re-derived from it on every change, so they can never
/// drift apart.
#[derive(Debug, Default)]
pub(crate) struct MenuState {
    pub(crate) toggle: Option<NodeId>,
    pub(crate) panel: Option<NodeId>,
    pub(crate) bars: Vec<NodeId>,
    pub(crate) open: bool,
}

impl Page {
    pub(crate) fn menu_init(&mut self) -> Result<()> {
        self.menu.toggle = self.dom.query_selector(".nav-toggle")?;
        self.menu.panel = self.dom.query_selector(".nav-menu")?;
        if let Some(toggle) = self.menu.toggle {
            self.menu.bars = self.dom.query_selector_all_from(toggle, ".bar")?;
            self.dom.set_attr(toggle, "aria-expanded", "false")?;
        }
        Ok(())
    }

    pub(crate) fn menu_toggle(&mut self) -> Result<()> {
        self.menu.open = !self.menu.open;
        self.menu_apply()
    }

    pub(crate) fn menu_close(&mut self) -> Result<()> {
        if !self.menu.open {
            return Ok(());
        }
        self.menu.open = false;
        self.menu_apply()
    }

    /// Document-wide click rule: a click outside both the toggle control and
    /// the panel closes an open menu.
    pub(crate) fn menu_outside_click(&mut self, target: NodeId) -> Result<()> {
        if !self.menu.open {
            return Ok(());
        }
        let inside_toggle = self
            .menu
            .toggle
            .is_some_and(|toggle| self.dom.contains(toggle, target));
        let inside_panel = self
            .menu
            .panel
            .is_some_and(|panel| self.dom.contains(panel, target));
        if !inside_toggle && !inside_panel {
            self.menu_close()?;
        }
        Ok(())
    }

    fn menu_apply(&mut self) -> Result<()> {
        let open = self.menu.open;
        if let Some(toggle) = self.menu.toggle {
            self.dom
                .set_attr(toggle, "aria-expanded", if open { "true" } else { "false" })?;
        }
        if let Some(panel) = self.menu.panel {
            self.dom.class_set(panel, "active", open)?;
        }

        // The three hamburger lines fold into an X when open: outer bars
        // rotate toward each other, the middle bar fades out.
        let bars = self.menu.bars.clone();
        for (index, bar) in bars.into_iter().enumerate() {
            let (transform, opacity) = if open {
                match index {
                    0 => ("rotate(45deg) translate(5px, 5px)", "1"),
                    1 => ("none", "0"),
                    _ => ("rotate(-45deg) translate(7px, -6px)", "1"),
                }
            } else {
                ("none", "1")
            };
            self.dom.set_attr(
                bar,
                "style",
                &format!("transform: {transform}; opacity: {opacity}"),
            )?;
        }
        Ok(())
    }
}
