use super::*;

mod contact_form;
mod lazy_and_hints;
mod notification;
mod scroll_spy;
mod smooth_scroll;

/// The marketing page most tests run against. Geometry comes from the
/// `data-top` / `data-height` attributes: hero at 0, services at 600,
/// portfolio at 1100, contact at 1800, with an 80px fixed header.
pub(crate) const SITE_HTML: &str = r#"
    <html>
    <head><title>Atelier Nord</title></head>
    <body>
    <header class='header' data-height='80'>
      <nav>
        <button class='nav-toggle' type='button' aria-label='Toggle navigation' aria-expanded='false'>
          <span class='bar'></span>
          <span class='bar'></span>
          <span class='bar'></span>
        </button>
        <ul class='nav-menu'>
          <li><a class='nav-link' href='#home'>Home</a></li>
          <li><a class='nav-link' href='#services'>Services</a></li>
          <li><a class='nav-link' href='#portfolio'>Portfolio</a></li>
          <li><a class='nav-link' href='#contact'>Contact</a></li>
        </ul>
      </nav>
    </header>
    <main>
      <section id='home' class='hero' data-top='0' data-height='600'>
        <img src='assets/hero.jpg' alt='Studio workspace'>
        <h1>Atelier Nord</h1>
      </section>
      <section id='services' data-top='600' data-height='500'>
        <div class='card' data-top='650' data-height='200'>Design</div>
        <div class='card' data-top='900' data-height='200'>Build</div>
      </section>
      <section id='portfolio' data-top='1100' data-height='700'>
        <img class='lazy' data-src='assets/work-1.jpg' data-top='1200' data-height='300' alt='Work sample'>
      </section>
      <section id='contact' data-top='1800' data-height='600'>
        <form id='contact-form'>
          <div class='form-group'>
            <input id='name' name='name' type='text'>
          </div>
          <div class='form-group'>
            <input id='email' name='email' type='email'>
          </div>
          <div class='form-group'>
            <textarea id='message' name='message'></textarea>
          </div>
          <button type='submit'>Send Message</button>
        </form>
      </section>
    </main>
    </body>
    </html>
    "#;
