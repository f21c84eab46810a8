use std::path::{Path, PathBuf};

use clap::Parser;
use vitrine_assets::{ResourceDescriptor, ResourceKind, ResourceManifest, ResourcePlugin};
use vitrine_core::App;
use vitrine_interaction::{CameraConfig, InteractionPlugin};
use vitrine_renderer::RenderPlugin;
use vitrine_scene::{PlacementTable, ScenePlugin, builder};
use vitrine_window::{WindowPlugin, run_vitrine_app};

/// Interactive 3D desk tableau: orbit the rig, hover the hardware.
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
struct Cli {
    /// Lock the camera to the configured framing (no rotate/pan/zoom).
    #[arg(long)]
    showcase: bool,

    /// Directory holding the bitmap resources.
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,
}

/// The deployment's resource list. Every entry is optional at runtime:
/// a missing bitmap leaves its surface flat, nothing more.
fn manifest(dir: &Path) -> Vec<ResourceDescriptor> {
    let mut entries = vec![
        ResourceDescriptor::new(
            builder::RES_SCREEN,
            dir.join("screen.png"),
            ResourceKind::Texture,
        ),
        ResourceDescriptor::new(
            builder::RES_POSTER,
            dir.join("poster.png"),
            ResourceKind::Texture,
        ),
        ResourceDescriptor::new(
            builder::RES_LABEL_NAME,
            dir.join("label_name.png"),
            ResourceKind::LabelBitmap,
        ),
        ResourceDescriptor::new(
            builder::RES_LABEL_TITLE,
            dir.join("label_title.png"),
            ResourceKind::LabelBitmap,
        ),
    ];
    for (_, icon_key) in builder::HOTSPOT_ICONS {
        entries.push(ResourceDescriptor::new(
            icon_key,
            dir.join(format!("{icon_key}.png")),
            ResourceKind::Texture,
        ));
    }
    entries
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let camera = if cli.showcase {
        CameraConfig::showcase()
    } else {
        CameraConfig::default()
    };
    // Deployment defects stop us here, before a window ever opens.
    camera.validate().expect("camera configuration rejected");
    let placements = PlacementTable::default();
    placements.validate().expect("placement table rejected");

    log::info!(
        "starting vitrine ({} mode), assets from {:?}",
        if cli.showcase { "showcase" } else { "interactive" },
        cli.assets_dir
    );

    let mut app = App::new();
    app.world
        .insert_resource(ResourceManifest(manifest(&cli.assets_dir)));
    app.world.insert_resource(placements);

    app.add_plugin(WindowPlugin);
    app.add_plugin(ResourcePlugin);
    app.add_plugin(ScenePlugin);
    app.add_plugin(InteractionPlugin { camera });
    app.add_plugin(RenderPlugin);

    run_vitrine_app(app)
}
