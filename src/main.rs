mod app;
mod config;
mod drag;
mod input;
mod layout;
mod model;
mod render;
mod sim;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
