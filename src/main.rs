use map_sticker_ext::config::SceneConfig;
use map_sticker_ext::metadata;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "scene_config.toml";
const METADATA_PATH: &str = "extension_metadata.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MAP_STICKER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load scene configuration
    let config = SceneConfig::load_or_create(CONFIG_PATH)?;
    info!("Loaded scene config from {CONFIG_PATH}");

    metadata::save_to_file(METADATA_PATH)?;
    info!("Extension metadata written to {METADATA_PATH}");

    let mut built = config.build_scene()?;
    let dt = config.simulation.tick_seconds;
    for tick in 0..config.simulation.ticks {
        let report = built.tick(dt);
        for id in &report.destroyed {
            info!("tick {tick}: {id:?} destroyed with the object it was stuck to");
        }
        for id in &report.unstuck {
            info!("tick {tick}: {id:?} released");
        }
    }

    let scene = &built.scene;
    for entity in scene.entities() {
        info!(
            "{} at {:?} rotation {:?} stuck: {}",
            entity.name,
            entity.transform.position,
            entity.transform.rotation,
            scene.is_stuck(entity.id)
        );
    }
    for (index, map) in scene.maps().iter().enumerate() {
        let markers = scene.rendered_markers(index)?;
        info!(
            "{}: {} tracked, {} drawn: {}",
            map.name,
            scene.tracked_count(None),
            markers.len(),
            serde_json::to_string(&markers)?
        );
    }

    Ok(())
}
