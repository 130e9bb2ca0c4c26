//! Main application component

use leptos::prelude::*;

use crate::router::{AppRouter, routes};

/// Root component: header navigation and routed pages.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="app-container">
            <AppRouter />
            <footer class="app-footer">
                <p>"Playdeck - Leptos 0.7 CSR"</p>
            </footer>
        </div>
    }
}

/// Header navigation. Rendered inside the router so links navigate client
/// side.
#[component]
pub fn Navigation() -> impl IntoView {
    view! {
        <header class="app-header">
            <h1>"Playdeck"</h1>
            <nav class="app-nav">
                <a href=routes::DASHBOARD>"Dashboard"</a>
                <a href=routes::SERVERS>"Servers"</a>
                <a href=routes::TEMPLATES>"Templates"</a>
                <a href=routes::EXECUTIONS>"Executions"</a>
                <a href=routes::SCHEDULES>"Schedules"</a>
                <a href=routes::CONFIGURATIONS>"Configurations"</a>
                <a href=routes::COMMAND>"Command"</a>
            </nav>
        </header>
    }
}
