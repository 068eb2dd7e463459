use maud::{html, Markup, DOCTYPE};

/// Title used when a page does not supply one
pub const DEFAULT_TITLE: &str = "authloop";

pub fn base(title: Option<&str>, content: Markup) -> Markup {
    base_with_user(title, content, None)
}

pub fn base_with_user(title: Option<&str>, content: Markup, email: Option<&str>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title.unwrap_or(DEFAULT_TITLE)) }

                link rel="icon" href="/static/favicon.ico";

                // Tailwind CSS CDN
                script src="https://cdn.tailwindcss.com" {}

                // HTMX
                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body {
                (navbar(email))
                main class="max-w-5xl mx-auto px-4 py-8" {
                    (content)
                }
            }
        }
    }
}

fn navbar(email: Option<&str>) -> Markup {
    html! {
        nav class="border-b" {
            div class="max-w-5xl mx-auto px-4 py-4 flex items-center justify-between" {
                a href="/" class="text-2xl font-black" { (DEFAULT_TITLE) }

                div class="flex items-center gap-3" {
                    @if let Some(email) = email {
                        span class="text-sm font-bold" { (email) }
                        form action="/logout" method="post" {
                            button type="submit" class="px-3 py-2 text-sm font-bold" {
                                "Logout"
                            }
                        }
                    } @else {
                        a href="/login" class="px-3 py-2 text-sm font-bold" { "Login" }
                        a href="/signup" class="px-3 py-2 text-sm font-bold" { "Sign Up" }
                    }
                }
            }
        }
    }
}
