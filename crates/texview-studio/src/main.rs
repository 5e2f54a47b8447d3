mod slideshow;

use std::time::{Duration, Instant};

use anyhow::Result;
use texview_engine::assets::Bundle;
use texview_engine::device::GpuInit;
use texview_engine::logging::{init_logging, LoggingConfig};
use texview_engine::surface::{RedrawPolicy, SurfaceConfig};
use texview_engine::window::{Runtime, RuntimeConfig};

use slideshow::Slideshow;

const ROTATE_EVERY: Duration = Duration::from_secs(5);
const DEFAULT_IMAGES: [&str; 2] = ["comic-magazine-cover-template", "barca"];

/// Usage: `texview-studio [--continuous] [IMAGE...]`
///
/// Images are looked up in `$TEXVIEW_ASSETS`, `assets/` beside the binary, or
/// `./assets`.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut policy = RedrawPolicy::OnDemand;
    let mut images = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--continuous" => policy = RedrawPolicy::Continuous,
            _ => images.push(arg),
        }
    }
    if images.is_empty() {
        images = DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect();
    }

    let started = Instant::now();
    let bundle = Bundle::main();
    if let Some(root) = bundle.root() {
        log::info!("assets: {}", root.display());
    }

    let surface = SurfaceConfig::new(images[0].clone(), bundle.clone()).redraw(policy);
    let app = Slideshow::new(images, bundle, ROTATE_EVERY);
    log::debug!("studio configured in {:?}", started.elapsed());

    Runtime::run(
        RuntimeConfig {
            title: "texview studio".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        surface,
        app,
    )
}
