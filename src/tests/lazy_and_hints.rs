use super::*;

#[test]
fn deferred_image_loads_when_scrolled_into_view() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    assert_eq!(page.attr("img.lazy", "src")?, None);

    page.scroll_to(1000);
    assert_eq!(
        page.attr("img[data-src]", "src")?.as_deref(),
        Some("assets/work-1.jpg")
    );
    assert_eq!(page.count("img.lazy")?, 0);
    Ok(())
}

#[test]
fn image_already_in_the_initial_viewport_loads_at_startup() -> Result<()> {
    let html = r#"
        <img class='lazy' data-src='above-the-fold.jpg' data-top='100' data-height='200'>
        "#;
    let page = Page::from_html(html)?;

    assert_eq!(
        page.attr("img[data-src]", "src")?.as_deref(),
        Some("above-the-fold.jpg")
    );
    Ok(())
}

#[test]
fn loading_is_one_shot_per_image() -> Result<()> {
    let mut page = Page::from_html(SITE_HTML)?;

    page.scroll_to(1000);
    page.set_rect("img[data-src]", 1200, 300)?;
    page.dom
        .set_attr(page.select_one("img[data-src]")?, "data-src", "changed.jpg")?;

    // Leaving and re-entering the viewport must not reassign the source.
    page.scroll_to(0);
    page.scroll_to(1000);
    assert_eq!(
        page.attr("img[data-src]", "src")?.as_deref(),
        Some("assets/work-1.jpg")
    );
    Ok(())
}

#[test]
fn absent_intersection_capability_leaves_images_untouched() -> Result<()> {
    let options = PageOptions {
        intersection_observer: false,
        ..PageOptions::default()
    };
    let mut page = Page::from_html_with_options(SITE_HTML, options)?;

    page.scroll_to(1000);
    assert_eq!(page.attr("img[data-src]", "src")?, None);
    assert_eq!(page.count("img.lazy")?, 1);
    Ok(())
}

#[test]
fn font_preconnect_and_hero_preload_hints_are_injected_once() -> Result<()> {
    let page = Page::from_html(SITE_HTML)?;

    assert_eq!(page.count("link[rel='preconnect']")?, 2);
    assert!(page.exists("link[href='https://fonts.googleapis.com']")?);
    assert!(page.exists("link[href='https://fonts.gstatic.com'][crossorigin]")?);
    assert_eq!(page.count("link[rel='preload']")?, 1);
    assert_eq!(
        page.attr("link[rel='preload']", "href")?.as_deref(),
        Some("assets/hero.jpg")
    );
    assert_eq!(
        page.attr("link[rel='preload']", "as")?.as_deref(),
        Some("image")
    );
    Ok(())
}

#[test]
fn page_without_head_skips_resource_hints() -> Result<()> {
    let page = Page::from_html("<div class='hero'><img src='h.jpg'></div>")?;
    assert_eq!(page.count("link")?, 0);
    Ok(())
}
