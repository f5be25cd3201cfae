//! Space Invaders - headless native host
//!
//! Drives the simulation with a scripted key sequence at 60 Hz, renders every
//! frame into a recorder and routes events to a logging audio sink. Pass a
//! JSON configuration file as the first argument to override the defaults.

use std::error::Error;

use space_invaders::audio::{AudioManager, LogAudio};
use space_invaders::consts::FRAME_DT;
use space_invaders::render::FrameRecorder;
use space_invaders::sim::{Clock, GameEvent};
use space_invaders::{FixedStepper, GameConfig, GamePhase, Key, Simulation, SpriteSheet};

const FRAMES: u32 = 1200;

fn load_config() -> Result<GameConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {path}");
            let json = std::fs::read_to_string(&path)?;
            Ok(GameConfig::from_json(&json)?)
        }
        None => Ok(GameConfig::default()),
    }
}

/// Keys held during `frame`: sweep left and right while firing
fn script(frame: u32, sim: &mut Simulation) {
    let keys = sim.keys_mut();
    keys.press(Key::Fire);
    if (frame / 120) % 2 == 0 {
        keys.release(Key::Left);
        keys.press(Key::Right);
    } else {
        keys.release(Key::Right);
        keys.press(Key::Left);
    }

    match frame {
        600 => keys.press(Key::Upgrade),
        900 | 960 => keys.press(Key::Pause),
        _ => {}
    }

    if matches!(sim.phase(), GamePhase::Win | GamePhase::Lost) {
        sim.keys_mut().press(Key::Restart);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Space Invaders (headless) starting...");

    let config = load_config()?;
    let stepper = FixedStepper::new(config.max_step);
    let mut audio = AudioManager::new(LogAudio, config.audio.clone());
    let mut sim = Simulation::new(config, SpriteSheet::procedural()?)?;
    let mut clock = Clock::default();
    let mut frame_buffer = FrameRecorder::default();

    audio.start_theme();
    clock.tick(0.0);

    for frame in 1..=FRAMES {
        script(frame, &mut sim);

        let elapsed = clock.tick(frame as f64 * FRAME_DT);
        stepper.run(&mut sim, elapsed);

        let events = sim.drain_events();
        for event in &events {
            if let GameEvent::PhaseChanged { to, .. } = event {
                log::info!("frame {frame}: {to:?}");
            }
        }
        audio.handle_all(&events);

        frame_buffer.clear();
        sim.draw(&mut frame_buffer);
    }

    log::info!(
        "last frame: {} sprites, {} texts",
        frame_buffer.sprite_count(),
        frame_buffer.texts().count()
    );
    log::info!("final state:\n{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}
