use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use snowbound::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use snowbound::engine::input::{Action, InputFrame, InputManager};
use snowbound::engine::physics::PhysicsWorld;
use snowbound::game::characters::{CharacterEvent, CharacterManager};
use snowbound::game::hazard::HazardSystem;
use snowbound::game::{GameConfig, GameSession, Level, LevelLayout};

const LOCAL_PLAYERS: usize = 2;

/// Platformer locomotion sandbox
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON file with game configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RON file with a level layout (built-in demo course otherwise)
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Number of fixed ticks to simulate in headless mode
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,

    /// Open a window and drive the characters from the keyboard
    #[arg(short, long)]
    window: bool,
}

/// Everything one running level needs
struct Simulation {
    physics: PhysicsWorld,
    hazards: HazardSystem,
    characters: CharacterManager,
    level: Level,
    session: GameSession,
    axis_deadzone: f32,
}

impl Simulation {
    fn new(config: &GameConfig, layout: &LevelLayout, players: usize) -> Result<Self> {
        let mut physics = PhysicsWorld::with_gravity(config.physics.gravity);
        let mut hazards = HazardSystem::new(config.hazard.clone());
        let level = layout.build(&mut physics, &mut hazards);
        physics.step();

        let mut characters = CharacterManager::new();
        for seat in 0..players {
            let name = format!("player{}", seat + 1);
            characters
                .spawn_character(&name, Some(seat), config, level.spawn)
                .with_context(|| format!("failed to spawn {}", name))?;
        }

        let mut session = GameSession::new();
        session.start();

        Ok(Self {
            physics,
            hazards,
            characters,
            level,
            session,
            axis_deadzone: config.input.axis_deadzone,
        })
    }

    /// One fixed step: props and queries first, then every character
    fn step(&mut self, frames: &[InputFrame]) {
        self.physics.step();

        for hit in self.hazards.process(&mut self.physics) {
            debug!("Hazard hit entity {}: {:?}", hit.entity, hit.contact);
        }

        let reports = self
            .characters
            .tick_all(frames, &mut self.physics, FIXED_TIMESTEP);
        for (id, report) in reports {
            for event in &report.events {
                match event {
                    CharacterEvent::StageChanged(stage) => {
                        info!("Character {} is now {}", id, stage.controller_name())
                    }
                    other => info!("Character {}: {:?}", id, other),
                }
            }
        }
    }
}

/// Scripted input for the headless run: double-tap into a run, collect
/// snow, hop, shed the snowball and carry on over the ice into the spikes
fn scripted_frame(tick: u32) -> InputFrame {
    let axis = match tick {
        0..=9 => 1.0,
        10..=13 => 0.0,
        _ => 1.0,
    };
    InputFrame {
        axis,
        jump_pressed: tick == 120,
        jump_released: tick == 132,
        down_held: (260..300).contains(&tick),
        release_pressed: tick == 200,
    }
}

fn run_headless(mut sim: Simulation, ticks: u32) {
    info!("Running {} headless ticks", ticks);
    for tick in 0..ticks {
        sim.step(&[scripted_frame(tick)]);
    }

    for character in sim.characters.all() {
        let position = character.position();
        info!(
            "{} finished at ({:.2}, {:.2}) as {} in phase {}",
            character.name,
            position.x,
            position.y,
            character.stage().controller_name(),
            character.phase().animation_name()
        );
    }
    info!(
        "Level had {} blocks; session ends after {} transitions",
        sim.level.blocks.len(),
        sim.session.transitions()
    );
}

fn run_window(mut sim: Simulation) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Snowbound")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut input = InputManager::new(LOCAL_PLAYERS);
    let mut game_loop = GameLoop::new();
    let mut pending: Vec<InputFrame> = Vec::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::AboutToWait => {
                if input.any_player_just_pressed(Action::Menu) {
                    sim.session.back_to_menu();
                    elwt.exit();
                    return;
                }
                if input.any_player_just_pressed(Action::Pause) {
                    game_loop.toggle_pause();
                }

                // Edges seen while no update is due carry over to the next one
                pending = (0..LOCAL_PLAYERS)
                    .filter_map(|seat| input.frame(seat, sim.axis_deadzone))
                    .enumerate()
                    .map(|(seat, frame)| match pending.get(seat) {
                        Some(earlier) => earlier.merge_edges(&frame),
                        None => frame,
                    })
                    .collect();
                input.update();

                let updates = game_loop.begin_frame();
                if updates == 0 {
                    if game_loop.is_paused() {
                        pending.clear();
                    }
                    return;
                }

                let held: Vec<InputFrame> = pending.iter().map(InputFrame::held_only).collect();
                sim.step(&pending);
                for _ in 1..updates {
                    sim.step(&held);
                }
                pending.clear();
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting Snowbound...");

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let layout = match &args.level {
        Some(path) => LevelLayout::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelLayout::demo(),
    };

    if args.window {
        let sim = Simulation::new(&config, &layout, LOCAL_PLAYERS)?;
        run_window(sim)
    } else {
        let sim = Simulation::new(&config, &layout, 1)?;
        run_headless(sim, args.ticks);
        Ok(())
    }
}
