//! Layout demo application
//!
//! Loads a bitmap font description and a set of layout options, lays the
//! text out, and prints the positioned glyphs and metrics as RON.
//!
//! ```text
//! layout_demo [font.ron] [layout.toml]
//! ```

use std::sync::Arc;

use glyph_layout::config::{Config, ConfigError};
use glyph_layout::foundation::logging;
use glyph_layout::text::{BitmapFont, LayoutError, LayoutOptions, TextLayout};

const DEFAULT_FONT: &str = "resources/fonts/demo_font.ron";
const DEFAULT_LAYOUT: &str = "resources/layout.toml";

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Output error: {0}")]
    Output(#[from] ron::Error),
}

fn run(font_path: &str, layout_path: &str) -> Result<(), DemoError> {
    log::info!("Loading font description from {}", font_path);
    let font = Arc::new(BitmapFont::load(font_path)?);

    log::info!("Loading layout options from {}", layout_path);
    let options = LayoutOptions::load_from_file(layout_path)?.with_font(font);

    let layout = TextLayout::new(options)?;
    log::info!(
        "Layout complete: {} lines, {} glyphs",
        layout.line_count(),
        layout.glyphs().len()
    );

    let pretty = ron::ser::PrettyConfig::default();
    println!("// text: {:?}", layout.display_text());
    println!("{}", ron::ser::to_string_pretty(layout.metrics(), pretty.clone())?);
    println!("{}", ron::ser::to_string_pretty(layout.glyphs(), pretty)?);
    Ok(())
}

fn main() {
    logging::init();

    let mut args = std::env::args().skip(1);
    let font_path = args.next().unwrap_or_else(|| DEFAULT_FONT.to_string());
    let layout_path = args.next().unwrap_or_else(|| DEFAULT_LAYOUT.to_string());

    if let Err(e) = run(&font_path, &layout_path) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
