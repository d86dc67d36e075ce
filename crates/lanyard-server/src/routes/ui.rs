//! Embedded front-end bundle.
//!
//! The marketing site ships inside the binary as three consts — page,
//! stylesheet, and the browser form controller — served with
//! environment-dependent cache headers. Unmatched GET paths fall back to
//! the index page so client-side navigation and direct links work.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::config::EnvMode;
use crate::state::AppState;

/// Cache policy for static assets in production (7 days).
const STATIC_CACHE: &str = "public, max-age=604800";

/// Build the UI router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_page))
        .route("/styles.css", get(stylesheet))
        .route("/main.js", get(script))
}

/// Fallback for unmatched paths: GET/HEAD get the index page (direct
/// links into client-side routes must work), everything else is 404.
pub async fn spa_fallback(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        asset(state.env, "text/html; charset=utf-8", INDEX_HTML)
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    asset(state.env, "text/html; charset=utf-8", INDEX_HTML)
}

async fn stylesheet(State(state): State<Arc<AppState>>) -> Response {
    asset(state.env, "text/css; charset=utf-8", STYLES_CSS)
}

async fn script(State(state): State<Arc<AppState>>) -> Response {
    asset(state.env, "text/javascript; charset=utf-8", MAIN_JS)
}

/// Serve an embedded asset. Production responses are cacheable; in
/// development the global no-store layer wins.
fn asset(env: EnvMode, content_type: &'static str, body: &'static str) -> Response {
    let mut response = ([(header::CONTENT_TYPE, content_type)], body).into_response();
    if env.is_production() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(STATIC_CACHE));
    }
    response
}

/// The marketing page.
const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Lanyard &mdash; Event badges, done beautifully</title>
<meta name="description" content="Lanyard designs and prints conference badges, lanyards, and on-site signage for events of every size."/>
<link rel="stylesheet" href="/styles.css"/>
</head>
<body>
<nav class="nav">
  <div class="nav-logo">Lanyard</div>
  <div class="nav-links">
    <a href="#work">Work</a>
    <a href="#services">Services</a>
    <a href="#contact" class="nav-pill">Get in touch</a>
  </div>
</nav>

<section class="hero fade-in">
  <h1>Event badges,<br/><span>done beautifully</span></h1>
  <p>Badges, lanyards, and signage your attendees will actually keep.
     Designed, printed, and delivered to the venue door.</p>
  <div class="hero-actions">
    <a href="#contact" class="btn btn-primary">Start a project</a>
    <a href="#work" class="btn btn-outline">See our work</a>
  </div>
</section>

<section id="work" class="features">
  <div class="feature fade-in">
    <h3>Conference kits</h3>
    <p>Badge, holder, lanyard, and program &mdash; one matched set, from 50 to 50,000 attendees.</p>
  </div>
  <div class="feature fade-in">
    <h3>On-site printing</h3>
    <p>Walk-up registration desks with badges printed in under ten seconds.</p>
  </div>
  <div class="feature fade-in">
    <h3>Sustainable stock</h3>
    <p>Recycled card, seed-paper inserts, and lanyards we take back and reuse.</p>
  </div>
</section>

<section id="services" class="about fade-in">
  <h2>Small studio, short lead times</h2>
  <p>We are a four-person print studio. You talk to the person running the
     press, proofs come back the same day, and nothing ships until you have
     signed off a physical sample.</p>
</section>

<section id="contact" class="contact fade-in">
  <h2>Tell us about your event</h2>
  <form id="contactForm" novalidate>
    <label for="cf-name">Name</label>
    <input id="cf-name" name="name" type="text" autocomplete="name" required/>
    <label for="cf-email">Email</label>
    <input id="cf-email" name="email" type="email" autocomplete="email" required/>
    <label for="cf-phone">Phone <span class="optional">(optional)</span></label>
    <input id="cf-phone" name="phone" type="tel" autocomplete="tel"/>
    <label for="cf-reason">What do you need?</label>
    <textarea id="cf-reason" name="reason" rows="5" required></textarea>
    <div class="trap-wrap" aria-hidden="true">
      <label for="cf-trap">Leave this field empty</label>
      <input id="cf-trap" name="trap" type="text" tabindex="-1" autocomplete="off"/>
    </div>
    <button type="submit" class="btn btn-primary">Send message</button>
    <p id="formMsg" role="status" aria-live="polite"></p>
  </form>
</section>

<footer class="footer">
  <span>Lanyard &mdash; Rotterdam, NL</span>
  <span>hello@lanyard.site</span>
</footer>

<script src="/main.js"></script>
</body>
</html>
"##;

/// Stylesheet, including the scroll-reveal transition.
const STYLES_CSS: &str = r##"*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#FAF7F2;--ink:#1C1A17;--muted:#6B6357;--accent:#C2501B;--line:rgba(28,26,23,.12);--font:-apple-system,'Segoe UI',sans-serif}
body{font-family:var(--font);background:var(--bg);color:var(--ink);line-height:1.6;-webkit-font-smoothing:antialiased}
a{color:inherit;text-decoration:none}
.nav{display:flex;align-items:center;justify-content:space-between;max-width:960px;margin:0 auto;padding:24px}
.nav-logo{font-size:20px;font-weight:800;letter-spacing:-.5px}
.nav-links{display:flex;align-items:center;gap:8px}
.nav-links a{color:var(--muted);font-size:14px;font-weight:600;padding:8px 16px;border-radius:50px;transition:all .2s}
.nav-links a:hover{color:var(--ink)}
.nav-links .nav-pill{background:var(--accent);color:#fff}
.nav-links .nav-pill:hover{opacity:.85;color:#fff}
.btn{display:inline-flex;align-items:center;justify-content:center;padding:12px 28px;border-radius:50px;font-size:14px;font-weight:700;font-family:var(--font);border:none;cursor:pointer;transition:all .25s}
.btn-primary{background:var(--accent);color:#fff}
.btn-primary:hover{opacity:.85}
.btn-primary[disabled]{opacity:.5;cursor:default}
.btn-outline{background:transparent;color:var(--ink);border:1.5px solid var(--line)}
.btn-outline:hover{border-color:var(--ink)}
.hero{text-align:center;max-width:720px;margin:0 auto;padding:96px 24px 64px}
.hero h1{font-size:52px;font-weight:800;line-height:1.08;letter-spacing:-2px;margin-bottom:20px}
.hero h1 span{color:var(--accent)}
.hero p{font-size:18px;color:var(--muted);max-width:480px;margin:0 auto 36px}
.hero-actions{display:flex;gap:14px;justify-content:center}
.features{max-width:960px;margin:0 auto;padding:24px;display:grid;grid-template-columns:repeat(3,1fr);gap:18px}
.feature{border:1px solid var(--line);border-radius:16px;padding:28px;background:#fff}
.feature h3{font-size:16px;font-weight:700;margin-bottom:8px}
.feature p{font-size:14px;color:var(--muted)}
.about{max-width:640px;margin:0 auto;padding:72px 24px;text-align:center}
.about h2,.contact h2{font-size:32px;font-weight:800;letter-spacing:-.5px;margin-bottom:16px}
.about p{color:var(--muted)}
.contact{max-width:520px;margin:0 auto;padding:48px 24px 96px}
.contact form{display:flex;flex-direction:column;gap:6px}
.contact label{font-size:13px;font-weight:600;margin-top:14px}
.contact .optional{color:var(--muted);font-weight:400}
.contact input,.contact textarea{font-family:var(--font);font-size:15px;padding:10px 12px;border:1.5px solid var(--line);border-radius:10px;background:#fff}
.contact input:focus,.contact textarea:focus{outline:none;border-color:var(--accent)}
.contact [aria-invalid="true"]{border-color:#b42318}
.contact button{margin-top:20px;align-self:flex-start}
.trap-wrap{position:absolute;left:-9999px;top:auto;width:1px;height:1px;overflow:hidden}
#formMsg{min-height:1.4em;font-size:14px;color:var(--muted);margin-top:10px}
#formMsg.error{color:#b42318}
.footer{border-top:1px solid var(--line);max-width:960px;margin:0 auto;padding:24px;display:flex;justify-content:space-between;font-size:13px;color:var(--muted)}
.fade-in{opacity:0;transform:translateY(14px);transition:opacity .6s ease,transform .6s ease}
.fade-in.revealed{opacity:1;transform:none}
@media(max-width:768px){.hero h1{font-size:34px}.features{grid-template-columns:1fr}.nav-links a:not(.nav-pill){display:none}}
@media(prefers-reduced-motion:reduce){.fade-in{opacity:1;transform:none;transition:none}}
"##;

/// Browser form controller and scroll-reveal.
const MAIN_JS: &str = r##"// Scroll-reveal: mark sections once they enter the viewport.
(function () {
  const elements = document.querySelectorAll('.fade-in');
  if (!('IntersectionObserver' in window)) {
    elements.forEach((el) => el.classList.add('revealed'));
    return;
  }
  const observer = new IntersectionObserver((entries, obs) => {
    for (const entry of entries) {
      if (entry.isIntersecting) {
        entry.target.classList.add('revealed');
        obs.unobserve(entry.target);
      }
    }
  }, { threshold: 0.12 });
  elements.forEach((el) => observer.observe(el));
})();

// Contact form controller.
(function () {
  const form = document.getElementById('contactForm');
  if (!form) return;

  const msg = document.getElementById('formMsg');
  const submitBtn = form.querySelector('button[type="submit"]');

  // Cooldown after a successful send, scoped to this form instance.
  let lockedUntil = 0;

  const field = (name) => form.querySelector('[name="' + name + '"]');
  const value = (name) => String(new FormData(form).get(name) || '').trim();
  const emailOk = (v) => /^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(v);

  const setStatus = (text, isError) => {
    if (!msg) return;
    msg.textContent = text;
    msg.classList.toggle('error', Boolean(isError));
  };

  const setInvalid = (name, invalid) => {
    const el = field(name);
    if (el) el.setAttribute('aria-invalid', invalid ? 'true' : 'false');
  };

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    if (Date.now() < lockedUntil) return;

    const name = value('name');
    const email = value('email');
    const phone = value('phone');
    let reason = value('reason');
    const trap = value('trap');

    ['name', 'email', 'reason'].forEach((n) => setInvalid(n, false));

    let firstBad = null;
    let message = '';
    if (name.length < 2) {
      firstBad = 'name';
      message = 'Please enter your name (2+ characters).';
    } else if (!emailOk(email)) {
      firstBad = 'email';
      message = 'Please enter a valid email address.';
    } else if (reason.length < 10) {
      firstBad = 'reason';
      message = 'Please provide a brief message (10+ characters).';
    }

    if (firstBad) {
      setInvalid(firstBad, true);
      setStatus(message, true);
      const el = field(firstBad);
      if (el) el.focus();
      return;
    }

    if (reason.length > 4000) reason = reason.slice(0, 4000);

    if (submitBtn) submitBtn.setAttribute('disabled', 'true');
    setStatus('Sending...');

    const controller = new AbortController();
    const timer = setTimeout(() => controller.abort(), 15000);

    try {
      const res = await fetch('/api/contact', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ name, email, phone, reason, trap }),
        signal: controller.signal,
      });

      // Decode-or-synthesize: a non-JSON body becomes a failure value.
      let ack;
      try {
        ack = await res.json();
      } catch {
        ack = { ok: false, message: 'Unexpected server response.' };
      }

      if (res.ok && ack && ack.ok) {
        setStatus("Thanks! We'll get back to you shortly.");
        form.reset();
        lockedUntil = Date.now() + 2000;
      } else {
        setStatus((ack && ack.message) || 'Unable to send right now (status ' + res.status + ').', true);
      }
    } catch (err) {
      const timedOut = err && err.name === 'AbortError';
      setStatus(timedOut ? 'Request timed out. Please try again.' : 'Network error. Please try again.', true);
    } finally {
      clearTimeout(timer);
      if (submitBtn) submitBtn.removeAttribute('disabled');
    }
  });
})();
"##;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use lanyard_core::mail::ContactEmail;

    use crate::config::MailRoute;
    use crate::mailer::{MailError, Mailer};

    use super::*;

    struct NullMailer;

    #[async_trait]
    impl Mailer for NullMailer {
        async fn dispatch(&self, _email: &ContactEmail) -> Result<String, MailError> {
            Ok(String::new())
        }
    }

    fn test_app(env: EnvMode) -> Router {
        let state = Arc::new(AppState {
            mailer: Arc::new(NullMailer),
            mail: MailRoute {
                from: "no-reply@lanyard.site".to_owned(),
                to: "hello@lanyard.site".to_owned(),
            },
            env,
        });
        router().fallback(spa_fallback).with_state(state)
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_contact_form() {
        let response = fetch(test_app(EnvMode::Development), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("id=\"contactForm\""));
        assert!(html.contains("name=\"trap\""));
        assert!(html.contains("class=\"fade-in\"") || html.contains("fade-in"));
    }

    #[tokio::test]
    async fn assets_carry_their_content_types() {
        let css = fetch(test_app(EnvMode::Development), "/styles.css").await;
        assert_eq!(
            css.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css; charset=utf-8"
        );

        let js = fetch(test_app(EnvMode::Development), "/main.js").await;
        assert_eq!(
            js.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn unknown_get_path_falls_back_to_index() {
        let response = fetch(test_app(EnvMode::Development), "/pricing/enterprise").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn unknown_post_path_is_not_found() {
        let app = test_app(EnvMode::Development);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn production_assets_are_cacheable() {
        let response = fetch(test_app(EnvMode::Production), "/styles.css").await;
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=604800"
        );
    }

    #[tokio::test]
    async fn development_assets_set_no_cache_policy_at_the_router_level() {
        // The no-store policy comes from the server-wide layer, so plain
        // route responses carry no cache header of their own.
        let response = fetch(test_app(EnvMode::Development), "/styles.css").await;
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }
}
