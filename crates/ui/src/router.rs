//! Router configuration for the Playdeck dashboard

use leptos::prelude::*;
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::app::Navigation;
use crate::pages::{
    Command, Configurations, Dashboard, Executions, NotFound, Schedules, Servers, Templates,
    Terminal,
};

/// Route definitions as constants for type safety
pub mod routes {
    pub const DASHBOARD: &str = "/";
    pub const SERVERS: &str = "/servers";
    pub const TEMPLATES: &str = "/templates";
    pub const EXECUTIONS: &str = "/executions";
    pub const SCHEDULES: &str = "/schedules";
    pub const CONFIGURATIONS: &str = "/configurations";
    pub const COMMAND: &str = "/command";
    /// Followed by a server id.
    pub const TERMINAL_PREFIX: &str = "/terminal/";

    /// Terminal route for one server.
    #[must_use]
    pub fn terminal(server_id: i64) -> String {
        format!("{TERMINAL_PREFIX}{server_id}")
    }
}

/// Main router component that wraps the application
#[component]
pub fn AppRouter() -> impl IntoView {
    view! {
        <Router>
            <Navigation />
            <main class="app-main">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=StaticSegment("") view=Dashboard />
                    <Route path=StaticSegment("servers") view=Servers />
                    <Route path=StaticSegment("templates") view=Templates />
                    <Route path=StaticSegment("executions") view=Executions />
                    <Route path=StaticSegment("schedules") view=Schedules />
                    <Route path=StaticSegment("configurations") view=Configurations />
                    <Route path=StaticSegment("command") view=Command />
                    <Route path=(StaticSegment("terminal"), ParamSegment("id")) view=Terminal />
                </Routes>
            </main>
        </Router>
    }
}
