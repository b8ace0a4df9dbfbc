//! Spawn, teardown and reload of one pet.
//!
//! A [`Critter`] owns the definition a pet was spawned from (template, rules,
//! timer names, behavior) and at most one live incarnation of it: the world
//! entity, its [`Controller`], the scheduler subscriptions and the optional
//! debug visual. Every control-cycle fault is answered by tearing the
//! incarnation down and building a fresh one from the same definition.

use log::{debug, error, info, warn};

use crate::{
    behavior::Behavior,
    controller::{Controller, CycleReport, TickOutcome},
    error::{ConfigurationError, Fault},
    overlay::{DebugOverlays, LineGeometry, VisualHandle},
    rules::{Rules, RulesOverrides},
    scheduler::{Scheduler, Signal, Subscription},
    types::{ActorHandle, ActorTemplate},
    world::World,
};

/// Host collaborators handed to every lifecycle and tick entry point.
pub struct HostContext<'a> {
    pub world: &'a mut dyn World,
    pub scheduler: &'a mut dyn Scheduler,
    pub overlays: &'a mut dyn DebugOverlays,
}

/// What a frame did to a pet.
#[derive(Clone, Debug, PartialEq)]
pub enum TickResult {
    /// The pet is torn down or its update subscription is gone.
    Inactive,
    Throttled,
    Committed(CycleReport),
    /// The cycle faulted and the pet was reloaded.
    Reloaded(Fault),
}

struct Incarnation {
    controller: Controller,
    update: Subscription,
    shutdown: Subscription,
    visual: Option<VisualHandle>,
}

pub struct Critter<B: Behavior> {
    template: ActorTemplate,
    rules: Rules,
    timer_names: Vec<String>,
    behavior: B,
    live: Option<Incarnation>,
    reloads: u32,
}

impl<B: Behavior> Critter<B> {
    /// Validate the definition, create the entity and subscribe to the host signals.
    pub fn spawn<S: AsRef<str>>(
        ctx: &mut HostContext<'_>,
        template: Option<ActorTemplate>,
        overrides: &RulesOverrides,
        timer_names: &[S],
        mut behavior: B,
    ) -> Result<Self, ConfigurationError> {
        let template = template.ok_or(ConfigurationError::MissingTemplate)?;
        let rules = Rules::merge(overrides)?;
        if rules.debug_enabled {
            debug!("{}: effective rules {rules:?}", template.name);
        }

        let timer_names: Vec<String> = timer_names.iter().map(|n| n.as_ref().to_owned()).collect();
        let live = incarnate(ctx, &template, rules, &timer_names, &mut behavior)?;

        Ok(Self {
            template,
            rules,
            timer_names,
            behavior,
            live: Some(live),
            reloads: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    pub fn is_alive(&self) -> bool {
        self.live.is_some()
    }

    pub fn handle(&self) -> Option<ActorHandle> {
        self.live.as_ref().map(|live| live.controller.handle())
    }

    pub fn controller(&self) -> Option<&Controller> {
        self.live.as_ref().map(|live| &live.controller)
    }

    pub fn controller_mut(&mut self) -> Option<&mut Controller> {
        self.live.as_mut().map(|live| &mut live.controller)
    }

    /// Number of reloads since the first spawn.
    pub fn reload_count(&self) -> u32 {
        self.reloads
    }

    /// Frame notification. Faults are logged and answered with a reload.
    pub fn on_tick(&mut self, ctx: &mut HostContext<'_>, dt: f32) -> TickResult {
        let Some(live) = self.live.as_mut() else {
            return TickResult::Inactive;
        };
        if !ctx.scheduler.is_connected(live.update) {
            return TickResult::Inactive;
        }

        match live.controller.on_tick(&mut *ctx.world, &mut self.behavior, dt) {
            Ok(TickOutcome::Throttled) => TickResult::Throttled,
            Ok(TickOutcome::Committed(report)) => {
                if let Some(visual) = live.visual {
                    ctx.overlays.update(
                        visual,
                        LineGeometry::velocity(report.properties.position, report.properties.velocity),
                    );
                }
                TickResult::Committed(report)
            }
            Err(fault) => {
                warn!("{}: {fault}, reloading", self.template.name);
                self.reload(ctx);
                TickResult::Reloaded(fault)
            }
        }
    }

    /// Shutdown notification. Returns whether the pet reacted to it.
    pub fn on_shutdown(&mut self, ctx: &mut HostContext<'_>) -> bool {
        let connected = self
            .live
            .as_ref()
            .is_some_and(|live| ctx.scheduler.is_connected(live.shutdown));
        if connected {
            self.teardown(ctx);
        }
        connected
    }

    /// Release everything the live incarnation holds. Subscriptions go first.
    pub fn teardown(&mut self, ctx: &mut HostContext<'_>) {
        let Some(live) = self.live.take() else {
            return;
        };
        ctx.scheduler.disconnect(live.update);
        ctx.scheduler.disconnect(live.shutdown);

        let handle = live.controller.handle();
        ctx.world.delete_entity(handle);
        if let Some(visual) = live.visual {
            ctx.overlays.destroy(visual);
        }
        info!("{}: removed {handle}", self.template.name);
    }

    /// Tear down and spawn again from the same definition.
    ///
    /// If the world refuses to recreate the entity the pet stays inactive.
    pub fn reload(&mut self, ctx: &mut HostContext<'_>) {
        self.teardown(ctx);
        self.reloads += 1;
        match incarnate(
            ctx,
            &self.template,
            self.rules,
            &self.timer_names,
            &mut self.behavior,
        ) {
            Ok(live) => self.live = Some(live),
            Err(err) => error!("{}: reload failed: {err}", self.template.name),
        }
    }
}

fn incarnate<B: Behavior>(
    ctx: &mut HostContext<'_>,
    template: &ActorTemplate,
    rules: Rules,
    timer_names: &[String],
    behavior: &mut B,
) -> Result<Incarnation, ConfigurationError> {
    let mut initial = template.clone();
    behavior.on_spawn(&mut initial.properties);

    let handle = ctx.world.create_entity(&initial)?;
    let controller = Controller::new(
        initial.name.clone(),
        rules,
        handle,
        initial.dimensions,
        timer_names,
    );
    let update = ctx.scheduler.connect(Signal::Update);
    let shutdown = ctx.scheduler.connect(Signal::Shutdown);
    let visual = rules.debug_enabled.then(|| {
        ctx.overlays.create(LineGeometry::velocity(
            initial.properties.position,
            initial.properties.velocity,
        ))
    });

    info!("{}: spawned as {handle}", initial.name);
    Ok(Incarnation {
        controller,
        update,
        shutdown,
        visual,
    })
}
