use super::*;

const SPY_HTML: &str = r#"
    <header class='header' data-height='80'></header>
    <ul class='nav-menu'>
      <li><a class='nav-link' href='#s1'>One</a></li>
      <li><a class='nav-link' href='#s2'>Two</a></li>
      <li><a class='nav-link' href='#s3'>Three</a></li>
    </ul>
    <section id='s1' data-top='0' data-height='500'></section>
    <section id='s2' data-top='500' data-height='500'></section>
    <section id='s3' data-top='1000' data-height='500'></section>
    "#;

#[test]
fn section_resolution_honors_header_and_lookahead() -> Result<()> {
    let mut page = Page::from_html(SPY_HTML)?;

    // 550 >= 500 - 80 - 100 but 550 < 1000 - 80 - 100, so s2 wins.
    page.scroll_to(550);
    assert!(page.has_class("a[href='#s2']", "active")?);
    assert_eq!(page.count(".nav-link.active")?, 1);

    page.scroll_to(50);
    assert!(page.has_class("a[href='#s1']", "active")?);
    assert_eq!(page.count(".nav-link.active")?, 1);

    page.scroll_to(820);
    assert!(page.has_class("a[href='#s3']", "active")?);
    Ok(())
}

#[test]
fn no_qualifying_section_leaves_active_link_unchanged() -> Result<()> {
    let html = r#"
        <header class='header' data-height='80'></header>
        <a class='nav-link' href='#far'>Far</a>
        <section id='far' data-top='900' data-height='300'></section>
        "#;
    let mut page = Page::from_html(html)?;

    page.click(".nav-link")?;
    assert!(page.has_class(".nav-link", "active")?);

    // 10 < 900 - 80 - 100: nothing qualifies, the marker stays put.
    page.scroll_to(10);
    assert!(page.has_class(".nav-link", "active")?);
    Ok(())
}

#[test]
fn header_hides_scrolling_down_past_threshold_and_shows_on_any_up_scroll() -> Result<()> {
    let mut page = Page::from_html(SPY_HTML)?;

    // Down, but not past the threshold.
    page.scroll_to(90);
    assert!(!page.has_class(".header", "header-hidden")?);

    page.scroll_to(250);
    assert!(page.has_class(".header", "header-hidden")?);

    // Any upward movement shows the header again.
    page.scroll_to(240);
    assert!(!page.has_class(".header", "header-hidden")?);
    Ok(())
}

#[test]
fn cards_reveal_entering_bottom_portion_of_viewport_and_stay_revealed() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    // At the top the first card sits at 650, below the 640px reveal line.
    assert!(!page.has_class(".card", "visible")?);

    page.scroll_to(200);
    assert!(page.has_class(".card", "visible")?);

    // Reveals are one-way: scrolling back up keeps the marker.
    page.scroll_to(0);
    assert!(page.has_class(".card", "visible")?);
    Ok(())
}

#[test]
fn card_fully_scrolled_past_the_top_is_not_revealed() -> Result<()> {
    let html = r#"
        <div class='card' data-top='700' data-height='50'></div>
        <section id='tail' data-top='4000' data-height='500'></section>
        "#;
    let mut page = Page::from_html(html)?;

    // Below the reveal line at load time.
    assert!(!page.has_class(".card", "visible")?);

    // Jump straight past the card; its bottom (750) is above the viewport.
    page.scroll_to(2000);
    assert!(!page.has_class(".card", "visible")?);
    Ok(())
}

#[test]
fn unthrottled_mode_reevaluates_on_every_scroll_event() -> Result<()> {
    let mut page = Page::from_html(SPY_HTML)?;

    page.scroll_to(550);
    assert!(page.has_class("a[href='#s2']", "active")?);
    page.scroll_to(1100);
    assert!(page.has_class("a[href='#s3']", "active")?);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn debounced_mode_collapses_a_scroll_burst_into_one_trailing_sweep() -> Result<()> {
    let options = PageOptions {
        scroll_debounce_ms: Some(consts::SCROLL_DEBOUNCE_MS),
        ..PageOptions::default()
    };
    let mut page = Page::from_html_with_options(SPY_HTML, options)?;

    page.scroll_to(150);
    page.scroll_to(400);
    page.scroll_to(550);

    // Nothing has been evaluated yet; only the trailing sweep is queued.
    assert_eq!(page.count(".nav-link.active")?, 0);
    assert!(!page.has_class(".header", "header-hidden")?);
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(consts::SCROLL_DEBOUNCE_MS)?;
    assert!(page.has_class("a[href='#s2']", "active")?);
    assert!(page.has_class(".header", "header-hidden")?);
    assert!(page.pending_timers().is_empty());
    Ok(())
}
