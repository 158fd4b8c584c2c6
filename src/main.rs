//! Course Learnings Editor Entry Point

mod app;
mod components;
mod context;
mod logger;
mod models;
mod store;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info });
    mount_to_body(App);
}
