mod app;
mod board;
mod game;
mod lobby;
mod not_found;

use app::App;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
