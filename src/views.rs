//! Minimal HTML pages. No template engine; every dynamic value goes through [`escape`].

use axum::http::StatusCode;

use crate::session::flash::{Flash, FlashLevel};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn nav() -> &'static str {
    r#"<nav><a href="/">Home</a> | <a href="/about">About</a> | <a href="/gallery">Gallery</a> | <a href="/contact">Contact</a> | <a href="/logout">Logout</a></nav>"#
}

fn flash_block(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => {
            let class = match f.level {
                FlashLevel::Error => "flash error",
                FlashLevel::Success => "flash success",
            };
            format!(r#"<p class="{class}">{}</p>"#, escape(&f.message))
        }
        None => String::new(),
    }
}

pub fn login_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h1>Login</h1>
{}
<form method="post" action="/login">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Login</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#,
        flash_block(flash)
    );
    layout("Login", &body)
}

pub fn register_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{}
<form method="post" action="/register">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <label>Confirm password <input name="confirmPassword" type="password" required></label>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Login</a></p>"#,
        flash_block(flash)
    );
    layout("Register", &body)
}

pub fn home_page(username: &str) -> String {
    let body = format!("{}\n<h1>Welcome, {}</h1>", nav(), escape(username));
    layout("Home", &body)
}

pub fn about_page() -> String {
    layout("About", &format!("{}\n<h1>About</h1>", nav()))
}

pub fn gallery_page() -> String {
    layout("Gallery", &format!("{}\n<h1>Gallery</h1>", nav()))
}

pub fn contact_page() -> String {
    layout("Contact", &format!("{}\n<h1>Contact</h1>", nav()))
}

pub fn error_page(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        &format!("<h1>{}</h1>\n<p>Please try again later.</p>", escape(reason)),
    )
}
