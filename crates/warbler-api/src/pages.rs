use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

/// Signed cookie slot carrying a one-shot banner message, consumed by
/// the next page render.
pub const FLASH_KEY: &str = "flash";

/// Landing page. Renders and clears any pending flash banner.
pub async fn homepage(jar: SignedCookieJar) -> Response {
    let flash = jar.get(FLASH_KEY).map(|c| c.value().to_string());
    let jar = match flash {
        // Removal must carry the same path as the set cookie.
        Some(_) => jar.remove(Cookie::build(FLASH_KEY).path("/").build()),
        None => jar,
    };

    let body = "<section class=\"hero\">\
                <h1>What's Happening?</h1>\
                <p>Join Warbler today.</p>\
                </section>";
    (jar, page("Warbler", flash.as_deref(), body)).into_response()
}

/// Plain 302. `axum::response::Redirect` only speaks 303/307/308 and
/// the view contract here is 302 Found.
pub fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

/// Set the flash banner and redirect. Every denial and validation
/// failure funnels through here; nothing renders a hard error page.
pub fn flash_redirect(jar: SignedCookieJar, message: &str, to: &str) -> Response {
    let jar = jar.add(Cookie::build((FLASH_KEY, message.to_string())).path("/").build());
    (jar, redirect(to)).into_response()
}

pub fn page(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let banner = match flash {
        Some(msg) => format!("<div class=\"alert alert-danger\">{}</div>", escape(msg)),
        None => String::new(),
    };
    Html(format!(
        "<!doctype html>\
         <html><head><title>{}</title></head>\
         <body>{}{}</body></html>",
        escape(title),
        banner,
        body,
    ))
}

/// Minimal HTML escaping for user-supplied text.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
pub fn format_timestamp(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.format("%d %B %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
