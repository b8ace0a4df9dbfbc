use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use critter::{
    ActorTemplate, Critter, Followable, FrameScheduler, HostContext, NoOverlays, RapierWorld,
    RulesOverrides, Signal, Target, TickResult, Vec3, WorldStaticDef,
};
use log::info;

mod avatar;
mod logging;
mod pet;

use avatar::WalkingAvatar;
use pet::HoveringPet;

/// Drive one pet following a walking avatar through a small static scene.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON file with rule overrides (snake_case rule names)
    #[arg(long)]
    rules: Option<PathBuf>,
}

fn load_overrides(path: Option<&PathBuf>) -> Result<RulesOverrides> {
    let Some(path) = path else {
        return Ok(RulesOverrides {
            max_distance: Some(10.0),
            gravity: Some(0.0),
            always_flying: Some(true),
            ..Default::default()
        });
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn scene() -> Vec<WorldStaticDef> {
    vec![
        WorldStaticDef::floor(1, 0.0),
        WorldStaticDef::block(2, Vec3::new(6.0, 0.5, 0.0), Vec3::new(0.5, 0.5, 0.5)),
        WorldStaticDef::block(3, Vec3::new(-4.0, 1.0, 4.0), Vec3::new(1.0, 1.0, 1.0)),
    ]
}

fn pet_template() -> ActorTemplate {
    let mut template = ActorTemplate::new("ExamplePet", Vec3::new(0.5, 0.5, 0.5));
    template.lifetime = Some(3600.0);
    template
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let overrides = load_overrides(args.rules.as_ref())?;

    let mut world = RapierWorld::new(scene());
    let mut scheduler = FrameScheduler::new();
    let mut overlays = NoOverlays::default();

    let mut avatar = WalkingAvatar::spawn(&mut world, 6.0, 0.4)?;
    let behavior = HoveringPet::new(
        avatar.handle().context("avatar has no entity")?,
        Target::follow(&avatar),
    );

    let mut pet = {
        let mut ctx = HostContext {
            world: &mut world,
            scheduler: &mut scheduler,
            overlays: &mut overlays,
        };
        Critter::spawn(&mut ctx, Some(pet_template()), &overrides, &["custom"], behavior)?
    };

    let mut committed = 0u32;
    for frame in 0..args.frames {
        avatar.walk(&mut world, args.dt)?;
        pet.behavior_mut().home = Target::follow(&avatar);

        let mut ctx = HostContext {
            world: &mut world,
            scheduler: &mut scheduler,
            overlays: &mut overlays,
        };
        match pet.on_tick(&mut ctx, args.dt) {
            TickResult::Committed(report) => {
                committed += 1;
                if committed % 25 == 0 {
                    info!(
                        "frame {frame}: distance {:.2} speed {:.2} state {:?}/{:?}",
                        report.distance,
                        report.speed,
                        report.state.locomotion(),
                        report.state.vertical()
                    );
                }
            }
            TickResult::Reloaded(fault) => info!("frame {frame}: respawned after {}", fault),
            TickResult::Throttled => {}
            TickResult::Inactive => {
                info!("frame {frame}: pet is gone, stopping");
                break;
            }
        }

        world.step(args.dt);
    }

    pet.on_shutdown(&mut HostContext {
        world: &mut world,
        scheduler: &mut scheduler,
        overlays: &mut overlays,
    });

    info!(
        "done: {committed} control cycles, {} reloads, {} actors left, {} frame subscriptions",
        pet.reload_count(),
        world.actor_count(),
        scheduler.connected(Signal::Update)
    );
    Ok(())
}
