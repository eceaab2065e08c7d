use super::*;

#[test]
fn showing_twice_replaces_the_visible_toast() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("first", "info")?;
    page.show_notification("second", "success")?;

    assert_eq!(page.count(".notification")?, 1);
    page.assert_text(".notification-message", "second")?;
    assert!(page.has_class(".notification", "notification-success")?);
    Ok(())
}

#[test]
fn toast_carries_alert_semantics_and_severity_class() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("saved", "info")?;
    assert_eq!(page.attr(".notification", "role")?.as_deref(), Some("alert"));
    assert_eq!(
        page.attr(".notification", "aria-live")?.as_deref(),
        Some("polite")
    );
    assert!(page.has_class(".notification", "notification-info")?);
    Ok(())
}

#[test]
fn close_control_dismisses_immediately() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("bye", "info")?;
    page.click(".notification-close")?;
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn toast_auto_dismisses_after_five_seconds() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("timed", "info")?;
    page.advance_time(consts::TOAST_DISMISS_MS - 1)?;
    assert_eq!(page.count(".notification")?, 1);

    page.advance_time(1)?;
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn manual_dismiss_makes_the_stale_timer_a_no_op() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("gone", "info")?;
    page.click(".notification-close")?;

    // The auto-dismiss window elapsing afterwards must not fault.
    page.advance_time(consts::TOAST_DISMISS_MS)?;
    assert_eq!(page.count(".notification")?, 0);
    assert!(page.take_logs().iter().all(|line| !line.starts_with("[error]")));
    Ok(())
}

#[test]
fn replacement_reschedules_the_dismiss_clock() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("first", "info")?;
    page.advance_time(4000)?;
    page.show_notification("second", "info")?;

    // The first toast's deadline passing leaves the replacement alone.
    page.advance_time(1500)?;
    assert_eq!(page.count(".notification")?, 1);
    page.assert_text(".notification-message", "second")?;

    page.advance_time(3500)?;
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn escape_dismisses_the_toast() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.show_notification("esc", "info")?;
    page.press_key("Escape");
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}
