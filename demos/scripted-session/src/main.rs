//! Handform scripted session
//!
//! Replays a fixed hand script against the in-memory world and prints what
//! happened to each object:
//! - point at the cube until it is selected, then push it away
//! - point at the ball until it is selected, then grow it
//! - spin everything with three fingers, then let the hand drop out of view
//!
//! Usage: `scripted-session [config.json] [--json]`. `RUST_LOG` controls log
//! verbosity (default `info`).

use handform_core::{Renderers, RigidBodies, Transforms, Vec3};
use handform_highlight::HighlightOutcome;
use handform_runtime::{init_tracing, SessionBuilder, SessionConfig};
use handform_test::{
    standard_world, MockWorld, ScriptedHand, AHEAD, BALL, CUBE, PLINTH, ROOT, TOWARD_BALL,
};
use tracing::info;

fn script(step: f32) -> ScriptedHand {
    ScriptedHand::new(step)
        .with_jitter(2024, 1.5)
        .point(AHEAD, 1.0)
        .spread(2, Vec3::new(0.0, 0.0, -600.0), 0.4)
        .fist(Vec3::new(0.0, 400.0, 0.0), 0.3)
        .point(TOWARD_BALL, 1.0)
        .spread(5, Vec3::new(0.0, 0.0, -300.0), 0.3)
        .spread(3, Vec3::new(800.0, 0.0, 0.0), 0.5)
        .absent(3.0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_logs = args.iter().any(|a| a == "--json");
    let config = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };

    init_tracing("info", json_logs)?;

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           Handform - Scripted Session                      ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let frame_dt = config.simulation.fixed_step;
    let hand = script(frame_dt);
    let frames = hand.remaining_ticks() as usize;

    let mut session = SessionBuilder::from_config(ROOT, &config)?
        .interactables([CUBE, BALL, PLINTH])
        .build(standard_world(), hand)?;

    let mut promotions = 0;
    let mut freezes = 0;
    let mut dropped = 0.0f32;
    for _ in 0..frames {
        let stats = session.frame(frame_dt);
        dropped += stats.dropped_backlog;
        for (object, outcome) in &stats.outcomes {
            match outcome {
                HighlightOutcome::Promoted => {
                    promotions += 1;
                    println!("  selected  {}", object);
                }
                HighlightOutcome::Frozen => {
                    freezes += 1;
                    println!("  parked    {}", object);
                }
            }
        }
    }
    session.shutdown();

    let world: &MockWorld = session.host();
    println!();
    println!("Final selection: {}", session.selection().object);
    for (name, id) in [("root", ROOT), ("cube", CUBE), ("ball", BALL), ("plinth", PLINTH)] {
        let position = world.position(id).unwrap_or_default();
        let scale = world.local_scale(id).unwrap_or_default();
        let tint = world.color(id).map(|c| c.to_array());
        println!(
            "  {:<7} pos ({:6.2}, {:6.2}, {:6.2})  scale {:5.2}  kinematic {:<5}  color {:?}",
            name,
            position.x,
            position.y,
            position.z,
            scale.mean_component(),
            world.is_kinematic(id),
            tint,
        );
    }

    info!(
        frames,
        promotions,
        freezes,
        dropped_secs = dropped,
        events = world.events.len(),
        "session finished"
    );
    Ok(())
}
