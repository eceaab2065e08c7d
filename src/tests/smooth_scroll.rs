use super::*;

#[test]
fn anchor_click_scrolls_below_fixed_header() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.click("a[href='#services']")?;
    // 600 section top - 80 header - 20 margin
    assert_eq!(page.scroll_y(), 500);
    assert_eq!(page.current_hash(), Some("#services"));
    Ok(())
}

#[test]
fn scroll_offset_clamps_at_document_top() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.click("a[href='#home']")?;
    assert_eq!(page.scroll_y(), 0);
    Ok(())
}

#[test]
fn dangling_anchor_is_a_tolerated_no_op() -> Result<()> {
    let mut page = Page::from_html(
        "<a class='nav-link' href='#missing'>Ghost</a><section id='real' data-top='300'></section>",
    )?;

    page.click(".nav-link")?;
    assert_eq!(page.scroll_y(), 0);
    assert!(page.history_entries().is_empty());
    Ok(())
}

#[test]
fn navigation_closes_menu_and_activates_link() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.click(".nav-toggle")?;
    page.click("a[href='#portfolio']")?;

    assert!(!page.has_class(".nav-menu", "active")?);
    assert!(page.has_class("a[href='#portfolio']", "active")?);
    assert_eq!(page.count(".nav-link.active")?, 1);
    Ok(())
}

#[test]
fn history_gains_one_entry_per_navigation() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.click("a[href='#services']")?;
    page.click("a[href='#portfolio']")?;
    page.click("a[href='#contact']")?;

    assert_eq!(
        page.history_entries(),
        ["#services", "#portfolio", "#contact"]
    );
    assert_eq!(page.current_hash(), Some("#contact"));
    Ok(())
}

#[test]
fn at_most_one_link_is_active_after_repeated_navigation() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    for target in ["#services", "#portfolio", "#home", "#contact"] {
        page.click(&format!("a[href='{target}']"))?;
        assert_eq!(page.count(".nav-link.active")?, 1);
        assert!(page.has_class(&format!("a[href='{target}']"), "active")?);
    }
    Ok(())
}
