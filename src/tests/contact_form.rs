use super::*;

#[test]
fn email_predicate_accepts_simple_shapes_and_rejects_malformed_ones() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email("first.last@example.org"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a b@c.com"));
    assert!(!is_valid_email("@b.com"));
    assert!(!is_valid_email("a@."));
    assert!(!is_valid_email(""));
}

#[test]
fn empty_submit_renders_both_required_errors_inline() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.submit("#contact-form")?;

    assert_eq!(page.count(".field-error")?, 2);
    let errors = page.dom.query_selector_all(".field-error")?;
    assert_eq!(page.dom.text_content(errors[0]), "Name is required");
    assert_eq!(page.dom.text_content(errors[1]), "Email is required");
    assert_eq!(page.attr("#name", "aria-invalid")?.as_deref(), Some("true"));
    assert_eq!(
        page.attr("#email", "aria-invalid")?.as_deref(),
        Some("true")
    );
    Ok(())
}

#[test]
fn name_length_boundary_sits_at_two_characters() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;
    page.type_text("#email", "a@b.co")?;

    page.type_text("#name", "A")?;
    page.submit("#contact-form")?;
    assert_eq!(page.count(".field-error")?, 1);
    let error = page.dom.query_selector(".field-error")?.expect("error node");
    assert_eq!(
        page.dom.text_content(error),
        "Name must be at least 2 characters"
    );

    page.type_text("#name", "Al")?;
    page.submit("#contact-form")?;
    assert_eq!(page.count(".field-error")?, 0);
    assert!(page.is_disabled("button[type='submit']")?);
    Ok(())
}

#[test]
fn malformed_email_is_rejected_with_format_message() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;
    page.type_text("#name", "Ada")?;
    page.type_text("#email", "ada@machine")?;

    page.submit("#contact-form")?;
    assert_eq!(page.count(".field-error")?, 1);
    let error = page.dom.query_selector(".field-error")?.expect("error node");
    assert_eq!(
        page.dom.text_content(error),
        "Please enter a valid email address"
    );
    Ok(())
}

#[test]
fn resubmitting_never_stacks_error_annotations() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.submit("#contact-form")?;
    page.submit("#contact-form")?;
    page.submit("#contact-form")?;
    assert_eq!(page.count(".field-error")?, 2);
    Ok(())
}

#[test]
fn blur_revalidates_and_input_optimistically_clears() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.type_text("#name", "A")?;
    page.blur("#name")?;
    assert_eq!(page.count(".field-error")?, 1);
    assert_eq!(page.attr("#name", "aria-invalid")?.as_deref(), Some("true"));

    // Typing clears the annotation without judging the new value.
    page.type_text("#name", "B")?;
    assert_eq!(page.count(".field-error")?, 0);
    assert_eq!(page.attr("#name", "aria-invalid")?, None);

    page.blur("#name")?;
    assert_eq!(page.count(".field-error")?, 1);
    Ok(())
}

#[test]
fn valid_submission_disables_control_then_restores_after_delay() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;
    page.type_text("#name", "Ada Lovelace")?;
    page.type_text("#email", "ada@example.org")?;
    page.type_text("#message", "Hello from the engine room.")?;

    page.click("button[type='submit']")?;
    assert!(page.is_disabled("button[type='submit']")?);
    page.assert_text("button[type='submit']", "Sending...")?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(consts::SUBMIT_DELAY_MS)?;
    assert!(!page.is_disabled("button[type='submit']")?);
    page.assert_text("button[type='submit']", "Send Message")?;
    page.assert_value("#name", "")?;
    page.assert_value("#email", "")?;
    page.assert_value("#message", "")?;

    assert_eq!(page.count(".notification")?, 1);
    assert!(page.has_class(".notification", "notification-success")?);
    page.assert_text(
        ".notification-message",
        "Thank you! Your message has been sent.",
    )?;
    Ok(())
}

#[test]
fn second_submit_while_pending_does_not_overlap() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;
    page.type_text("#name", "Ada")?;
    page.type_text("#email", "ada@example.org")?;

    page.submit("#contact-form")?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(1000)?;
    page.click("button[type='submit']")?;
    page.submit("#contact-form")?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(1000)?;
    assert_eq!(page.count(".notification")?, 1);
    assert!(page.pending_timers().iter().all(|timer| timer.due_at > 2000));
    Ok(())
}

#[test]
fn page_without_form_markup_ignores_submission() -> Result<()> {
    let mut page = Page::from_html("<div id='bare'></div>")?;
    page.submit("#bare")?;
    assert_eq!(page.count(".field-error")?, 0);
    Ok(())
}
