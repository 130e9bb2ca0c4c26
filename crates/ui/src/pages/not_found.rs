//! 404 Not Found page component

use leptos::prelude::*;

use crate::router::routes;

/// 404 Not Found page component
#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found-page">
            <h1>"404 - Page Not Found"</h1>
            <p>"The page you're looking for doesn't exist."</p>
            <a href=routes::DASHBOARD>"Back to the dashboard"</a>
        </div>
    }
}
