use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

/// Deferred image loading. Images carrying a `data-src` attribute are
/// observed while the intersection capability exists; without it they are
/// left for the browser's native loading, with no explicit fallback.
#[derive(Debug, Default)]
pub(crate) struct LazyState {
    pub(crate) available: bool,
    pub(crate) pending: Vec<NodeId>,
}

impl Page {
    pub(crate) fn lazy_init(&mut self, available: bool) -> Result<()> {
        self.lazy.available = available;
        if available {
            self.lazy.pending = self.dom.query_selector_all("img[data-src]")?;
        }
        Ok(())
    }

    /// Loads every observed image that currently intersects the viewport and
    /// stops observing it. One-shot per image: leaving and re-entering the
    /// viewport never re-triggers a load.
    pub(crate) fn lazy_evaluate(&mut self) -> Result<()> {
        if !self.lazy.available {
            return Ok(());
        }

        let pending = std::mem::take(&mut self.lazy.pending);
        let mut still_pending = Vec::new();
        for image in pending {
            let rect = self.dom.rect(image);
            let intersects =
                rect.top < self.scroll_y + self.viewport_height && rect.bottom() >= self.scroll_y;
            if !intersects {
                still_pending.push(image);
                continue;
            }
            if let Some(src) = self.dom.attr(image, "data-src").map(str::to_string) {
                self.dom.set_attr(image, "src", &src)?;
            }
            self.dom.class_remove(image, "lazy")?;
        }
        self.lazy.pending = still_pending;
        Ok(())
    }
}
