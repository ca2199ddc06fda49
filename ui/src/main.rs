mod components;

fn main() {
    // Routes `tracing` output to the browser console
    dioxus::logger::initialize_default();
    dioxus::launch(components::app::App);
}
