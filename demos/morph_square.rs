//! Headless walkthrough: two shapes in a group, driven by a fixed-step
//! playhead. Run with `RUST_LOG=debug` to see the engine's own logging.

use std::time::Duration;

use anyhow::{Context, Result};
use glam::{Vec3, Vec4, vec3};

use morphis::animation::{Easing, Playhead, SequencerEvent};
use morphis::geometry::Polygon;
use morphis::render::extract;
use morphis::scene::{Collection, Material, TransformNode};
use morphis::Stage;

fn shape(name: &str, polygon: Polygon, x: f32, color: Vec4) -> Collection {
    Collection::default().with_member(
        TransformNode::polygon(name, polygon)
            .with_material(Material::new(color))
            .with_position(vec3(x, 0.0, 0.0)),
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let mut stage = Stage::new();
    let scene = stage.add_branch(None, "scene")?;
    let square = stage.add_leaf(
        Some(scene),
        "square",
        shape("square", Polygon::rectangle(2.0, 2.0), -3.0, Vec4::new(0.2, 0.6, 1.0, 1.0)),
    )?;
    let hexagon = stage.add_leaf(
        Some(scene),
        "hexagon",
        shape("hexagon", Polygon::regular(6, 1.2), 3.0, Vec4::new(1.0, 0.4, 0.2, 1.0)),
    )?;

    stage
        .group(square)
        .duration(600.0)
        .fade_in()
        .overlap_next()
        .transform_into(shape("square", Polygon::regular(7, 1.5), -3.0, Vec4::ONE))
        .recolor(Vec4::new(0.9, 0.9, 0.2, 1.0))
        .finish()?;

    stage
        .group(hexagon)
        .duration(800.0)
        .easing(Easing::Cubic)
        .move_by(Vec3::Y * 2.0)
        .finish()?;

    stage
        .group(scene)
        .duration(1000.0)
        .rotate(Vec3::Z * 180.0)
        .scale_by(0.5)
        .finish()?;

    let sequencer = stage
        .get_mut(scene)
        .context("scene group vanished")?
        .sequencer_mut();
    sequencer.on_event(|event| {
        if let SequencerEvent::Finished { at } = event {
            log::info!("Scene finished at {at:.0} ms");
        }
    });
    sequencer.warm_cache(50.0);
    let total = sequencer.duration();
    println!("scene: {} entries, {total:.0} ms", sequencer.len());

    let mut playhead = Playhead::new();
    while playhead.elapsed_ms() <= total + 100.0 {
        let t = playhead.advance(Duration::from_millis(250));
        let frame = sequencer.cached_frame(t);
        let _ = sequencer.advance(t);

        for item in extract(&frame) {
            let origin = item.model_matrix.transform_point3(Vec3::ZERO);
            println!(
                "t={t:>6.0}  {:<8} vertices={:<4} origin=({:>5.2}, {:>5.2}) opacity={:.2}",
                item.name,
                item.positions.len() / 3,
                origin.x,
                origin.y,
                item.material.opacity
            );
        }
    }

    Ok(())
}
