use std::sync::Arc;

use axum::response::Html;
use ui::{escape_html, Badge, BadgeVariant};

pub const PRODUCT_NAME: &str = "HUMPBANK";

/// Password-grant endpoint of the hosted backend's auth service.
pub fn auth_endpoint(backend_url: &str) -> String {
    format!("{}/auth/v1/token?grant_type=password", backend_url.trim_end_matches('/'))
}

/// Sign-in page. Credentials go straight to the hosted backend; without one the form is disabled.
pub async fn login(auth_endpoint: Option<Arc<str>>) -> Html<String> {
    Html(login_page(auth_endpoint.as_deref()))
}

pub fn login_page(auth_endpoint: Option<&str>) -> String {
    let badge = Badge::new("Back office").variant(BadgeVariant::Secondary).class("ml-2").render();
    let (form_attrs, fieldset_attrs, notice) = match auth_endpoint {
        Some(url) => (format!(r#" method="post" action="{}""#, escape_html(url)), "", ""),
        None => (
            String::new(),
            " disabled",
            "\n<p class=\"text-sm text-destructive\">Sign-in is unavailable: no backend is configured.</p>",
        ),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PRODUCT_NAME} | Sign in</title>
</head>
<body>
<main class="flex min-h-screen items-center justify-center">
<section class="w-full max-w-sm rounded-lg border p-6">
<h1 class="text-2xl font-bold">{PRODUCT_NAME}{badge}</h1>
<p class="text-sm text-muted-foreground">Sign in to your account</p>{notice}
<form{form_attrs}>
<fieldset{fieldset_attrs}>
<label for="email">Email</label>
<input id="email" name="email" type="email" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required>
<button type="submit">Sign in</button>
</fieldset>
</form>
</section>
</main>
</body>
</html>
"#
    )
}
