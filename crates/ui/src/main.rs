//! WASM entry point for the Playdeck dashboard
//!
//! Trunk compiles this binary and mounts the [`App`] component to the body.

use leptos::prelude::*;
use playdeck_ui::App;

fn main() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();

    mount_to_body(|| {
        view! {
            <App />
        }
    })
}
