//! Form-post endpoint.
//!
//! Accepts `application/x-www-form-urlencoded` bodies whose `request` field
//! picks the action: `CreateUser` writes a profile page under the users
//! directory, `Adder` sums two numbers.

use std::collections::HashMap;

use anyhow::Context;
use tokio::fs;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::config::DocumentConfig;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

const WRONG_FORMAT: &str = "Wrong format";

pub async fn handle(request: &Request, docs: &DocumentConfig) -> anyhow::Result<Response> {
    if *request.method() != Method::Post {
        return Ok(Response::not_implemented());
    }

    let body = request.body().map(|b| &b[..]).unwrap_or_default();
    let fields: HashMap<String, String> = form_urlencoded::parse(body).into_owned().collect();

    let Some(action) = fields.get("request") else {
        return Ok(Response::bad_request());
    };

    match action.as_str() {
        "CreateUser" => create_user(&fields, docs).await,
        "Adder" => Ok(html(adder(&fields))),
        other => {
            debug!(action = other, "Unknown form action");
            Ok(Response::status(StatusCode::NotAcceptable))
        }
    }
}

async fn create_user(
    fields: &HashMap<String, String>,
    docs: &DocumentConfig,
) -> anyhow::Result<Response> {
    let Some(user) = fields.get("user").filter(|u| is_safe_name(u)) else {
        return Ok(Response::bad_request());
    };

    fs::create_dir_all(&docs.users_dir)
        .await
        .with_context(|| format!("creating {}", docs.users_dir.display()))?;

    let path = docs.users_dir.join(format!("{user}.html"));
    fs::write(&path, profile_page(fields))
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(user = %user, path = %path.display(), "User page created");
    Ok(html(path.display().to_string()))
}

/// A user name becomes a file name, so it must be one plain path segment.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

fn profile_page(fields: &HashMap<String, String>) -> String {
    let field = |name: &str| escape_html(fields.get(name).map_or("", String::as_str));
    let user = field("user");

    format!(
        "<HTML><HEAD> <TITLE> Hello {user}</TITLE> </HEAD><BODY><H1>{user}</H1>\
         <DIV> Phone : {}</DIV><DIV> Email : {}</DIV></BODY></HTML>\n",
        field("phone"),
        field("mail"),
    )
}

fn adder(fields: &HashMap<String, String>) -> String {
    let number = |name: &str| fields.get(name).and_then(|v| v.trim().parse::<f64>().ok());

    match (number("number1"), number("number2")) {
        (Some(a), Some(b)) => format!("{:?}", a + b),
        _ => WRONG_FORMAT.to_string(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn html(body: String) -> Response {
    ResponseBuilder::new(StatusCode::Ok)
        .content_type("text/html")
        .body(body)
        .build()
}
