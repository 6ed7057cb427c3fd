//! rk-locate example driver
//!
//! Usage: `rk-locate-demo [config.ron]`

use std::path::PathBuf;

use glam::DVec3;
use rk_locate::{
    CadKernel, Dowel, FilletBox, LocateConfig, Locatable, Materialize, create_kernel, union_all,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rk_locate=debug,rk_locate_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => LocateConfig::load(&path)?,
        None => LocateConfig::default(),
    };
    let kernel = create_kernel(&config);
    tracing::info!("Using {} kernel", kernel.name());

    run(kernel.as_ref())
}

fn run(kernel: &dyn CadKernel) -> Result<(), Box<dyn std::error::Error>> {
    let fbox = FilletBox::new(10.0, 8.0, 5.0, 1.0);
    tracing::info!("Box: {:?}", fbox);

    let moved = fbox.translate(DVec3::new(1.0, 2.0, 3.0))?;
    tracing::info!("Translated: {:?}", moved);

    let scaled = fbox.scale(2.0)?;
    tracing::info!("Scaled: {:?}", scaled);

    match moved.scale(2.0) {
        Ok(_) => tracing::warn!("Scaling a translated box was unexpectedly allowed"),
        Err(e) => tracing::info!("Rejected as expected: {e}"),
    }

    let solid = match moved.to_solid(kernel) {
        Ok(solid) => solid,
        Err(e) => {
            tracing::warn!("Cannot materialize the box on the {} kernel: {e}", kernel.name());
            return Ok(());
        }
    };
    let bbox = kernel.bounding_box(&solid)?;
    tracing::info!(
        "Realized translated box: center {:?}, size {:?}",
        bbox.center(),
        bbox.size()
    );
    match kernel.volume(&solid) {
        Ok(volume) => tracing::info!("Volume: {volume:.4}"),
        Err(e) => tracing::info!("Volume unavailable: {e}"),
    }

    let pin = Dowel::new(0.5, 3.0).translate(bbox.center() + DVec3::new(0.0, 0.0, 2.5))?;
    let assembly = union_all(kernel, &[&moved, &pin])?;
    let bbox = kernel.bounding_box(&assembly)?;
    tracing::info!("Box with dowel: {:?} .. {:?}", bbox.min, bbox.max);

    Ok(())
}
