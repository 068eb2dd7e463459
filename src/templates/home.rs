use crate::models::User;
use maud::{html, Markup};

pub fn home(user: Option<&User>) -> Markup {
    html! {
        div class="max-w-md mx-auto text-center space-y-6" {
            @if let Some(user) = user {
                p class="text-lg" {
                    "Logged in as " strong { (user.email) }
                }
                p class="text-sm text-muted" {
                    "User id: " code { (user.id) }
                    br;
                    "User role: " code { (user.role().as_str()) }
                }
                form action="/logout" method="post" {
                    button type="submit" class="btn-primary" { "Logout" }
                }
            } @else {
                p class="text-lg" { "You are not logged in." }
                div class="flex justify-center gap-4" {
                    a href="/signup" class="btn-primary" { "Sign Up" }
                    a href="/login" class="btn-primary" { "Login" }
                }
            }
        }
    }
}
