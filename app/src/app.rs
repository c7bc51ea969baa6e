use mountpoint::prelude::*;

/// The root component. Takes no properties.
pub fn app<N: Node>() -> N {
    element("div")
        .attr("class", "app")
        .child(
            element("header")
                .child(element("h1").text("Hello, world!").build())
                .build(),
        )
        .child(
            element("main")
                .child(element("p").text("Rendered from Rust.").build())
                .build(),
        )
        .build()
}
