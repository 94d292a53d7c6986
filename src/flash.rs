use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};

const FLASH_COOKIE: &str = "flash";

/// Queues a one-shot notice for the next rendered page.
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5));
    jar.add(cookie)
}

/// Reads and clears the pending notice, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let message = urlencoding::decode(&raw).ok().map(|m| m.into_owned()).filter(|m| !m.is_empty());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}
