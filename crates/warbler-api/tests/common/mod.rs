#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use http_body_util::BodyExt;
use tower::ServiceExt;

use warbler_api::{AppState, AppStateInner, router};
use warbler_db::Database;
use warbler_types::CURR_USER_KEY;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

pub fn test_app() -> TestApp {
    let db = Database::open_in_memory().expect("in-memory db");
    let state = AppState(Arc::new(AppStateInner {
        db,
        key: Key::generate(),
    }));
    TestApp {
        app: router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Mint a signed session cookie directly, the way a login response
    /// would. Lets tests fabricate sessions for ids that do not exist.
    pub fn session_for(&self, user_id: i64) -> String {
        let jar = SignedCookieJar::new(self.state.key.clone()).add(
            Cookie::build((CURR_USER_KEY, user_id.to_string()))
                .path("/")
                .build(),
        );
        let resp = (jar, "").into_response();
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        cookie_pair(set_cookie)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.app
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.app
            .clone()
            .oneshot(req.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// What a browser does on a 302: GET the Location target, carrying
    /// along any cookies the redirect set (the flash rides here).
    pub async fn follow_redirect(&self, resp: &Response<Body>) -> Response<Body> {
        let target = location(resp).to_string();
        let cookies: Vec<String> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| cookie_pair(v.to_str().unwrap()))
            .collect();
        let cookie_header = cookies.join("; ");
        let cookie = if cookie_header.is_empty() {
            None
        } else {
            Some(cookie_header.as_str())
        };
        self.get(&target, cookie).await
    }
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// "name=value" from a Set-Cookie header, attributes stripped.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}
