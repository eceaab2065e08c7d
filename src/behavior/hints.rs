use std::collections::HashMap;

use crate::page::Page;
use crate::Result;

const FONT_ORIGINS: [&str; 2] = ["https://fonts.googleapis.com", "https://fonts.gstatic.com"];

impl Page {
    /// Inserts preconnect hints for the font origins and a preload hint for
    /// the hero image into `<head>` at startup. Pages without a head element
    /// simply skip the hints.
    pub(crate) fn inject_resource_hints(&mut self) -> Result<()> {
        let Some(head) = self.dom.query_selector("head")? else {
            return Ok(());
        };

        for origin in FONT_ORIGINS {
            let mut attrs = HashMap::from([
                ("rel".to_string(), "preconnect".to_string()),
                ("href".to_string(), origin.to_string()),
            ]);
            if origin.contains("gstatic") {
                attrs.insert("crossorigin".to_string(), "true".to_string());
            }
            self.dom.create_element(head, "link".into(), attrs);
        }

        if let Some(hero) = self.dom.query_selector(".hero img")? {
            let href = self
                .dom
                .attr(hero, "src")
                .or_else(|| self.dom.attr(hero, "data-src"))
                .map(str::to_string);
            if let Some(href) = href {
                self.dom.create_element(
                    head,
                    "link".into(),
                    HashMap::from([
                        ("rel".to_string(), "preload".to_string()),
                        ("as".to_string(), "image".to_string()),
                        ("href".to_string(), href),
                    ]),
                );
            }
        }
        Ok(())
    }
}
