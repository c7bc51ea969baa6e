mod app;

use app::app;

fn main() {
    #[cfg(target_family = "wasm")]
    init();

    if let Err(err) = mountpoint::start(app::<mountpoint::web::DomNode>) {
        tracing::error!(%err, "startup failed");
        wasm_bindgen::throw_str(&err.to_string());
    }
}

#[cfg(target_family = "wasm")]
fn init() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );
}
