//! Simulation loop and game phases
//!
//! `Simulation` owns the live entity set, the pending set, the key state and
//! the wave queue. Each [`Simulation::update`] admits what was staged during
//! the previous tick, advances every entity in id order, checks win/loss and
//! wave progression, then prunes the dead.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::barrier::Barrier;
use super::entity::{Entity, TickContext};
use super::formation::Formation;
use super::input::{Key, KeyState};
use super::player::PlayerLoadout;
use super::ship::Ship;
use super::state::{GameEvent, GamePhase, Snapshot};
use super::store::{EntityId, EntityStore, Pending, handle_alive};
use crate::assets::SpriteSheet;
use crate::consts::{HUD_CURRENCY_SIZE, HUD_LIVES_SIZE, OVERLAY_SIZE};
use crate::render::RenderTarget;
use crate::settings::{ConfigError, GameConfig, WaveConfig};
use crate::sprite::Sprite;
use crate::vector::Vector2D;

const PAUSE_TEXT: &str = "Pause\nPress 'P' to unpause\nPress 'U' to upgrade";
const LOST_TEXT: &str = "LOST\nPress 'R' to restart";
const WIN_TEXT: &str = "WIN\nPress 'R' to restart";

/// Player start: horizontally centred, `bottom_margin` above the bottom edge
pub(crate) fn player_origin(config: &GameConfig, sprite: &Sprite) -> Vector2D {
    Vector2D::new(
        (config.play_width - sprite.width() as f64) / 2.0,
        config.play_height - sprite.height() as f64 - config.player.bottom_margin,
    )
}

/// Bunkers spread evenly with equal gaps on both sides
fn bunker_positions(config: &GameConfig, sprite: &Sprite) -> Vec<Vector2D> {
    let count = config.bunker.count as f64;
    let width = sprite.width() as f64;
    let gap = ((config.play_width - count * width) / (count + 1.0)).floor();
    let y = config.play_height - config.bunker.bottom_offset;
    (0..config.bunker.count)
        .map(|i| {
            let i = i as f64;
            Vector2D::new(gap * (i + 1.0) + width * i, y)
        })
        .collect()
}

fn build_formation(config: &GameConfig, sprites: &SpriteSheet, wave: &WaveConfig) -> Formation {
    let mut formation = Formation::new(Vector2D::ZERO, config.formation_width(), wave.speed, &config.formation);
    for row in &wave.rows {
        formation.add_line(row.ships, row.hit_points, sprites.enemy(row.design));
    }
    formation
}

pub struct Simulation {
    config: GameConfig,
    sprites: SpriteSheet,
    store: EntityStore,
    pending: Pending,
    keys: KeyState,
    phase: GamePhase,
    player: EntityId,
    /// Index of the active wave
    wave: usize,
    active_wave: EntityId,
    /// Waves not yet released, in order
    reserve: VecDeque<Formation>,
    rng: Pcg32,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl Simulation {
    /// Validate the configuration and stage the initial layout
    pub fn new(config: GameConfig, sprites: SpriteSheet) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut pending = Pending::default();
        let player = pending.reserve_id();

        let mut simulation = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            sprites,
            store: EntityStore::default(),
            pending,
            keys: KeyState::default(),
            phase: GamePhase::Play,
            player,
            wave: 0,
            active_wave: player,
            reserve: VecDeque::new(),
            events: Vec::new(),
            ticks: 0,
        };
        simulation.build_initial();
        log::info!(
            "simulation ready: {}x{} play area, {} waves, seed {:#x}",
            simulation.config.play_width,
            simulation.config.play_height,
            simulation.config.waves.len(),
            simulation.config.seed
        );
        Ok(simulation)
    }

    /// Bunkers, player and first wave; later waves are queued
    fn build_initial(&mut self) {
        for position in bunker_positions(&self.config, &self.sprites.bunker) {
            let barrier = Barrier::new(position, Arc::clone(&self.sprites.bunker), self.config.bunker.hit_points);
            self.pending.stage(Entity::Barrier(barrier));
        }

        let tuning = &self.config.player;
        let player = Ship::player(
            player_origin(&self.config, &self.sprites.player),
            Arc::clone(&self.sprites.player),
            tuning.lives,
            tuning.speed,
            PlayerLoadout::new(tuning.upgrade_base_cost),
        );
        self.player = self.pending.stage(Entity::Ship(player));

        let mut waves = self
            .config
            .waves
            .iter()
            .map(|wave| build_formation(&self.config, &self.sprites, wave));
        if let Some(first) = waves.next() {
            self.active_wave = self.pending.stage(Entity::Formation(first));
        }
        self.reserve = waves.collect();
        self.wave = 0;
        self.events.push(GameEvent::WaveStarted { wave: 0 });
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        self.store.admit(&mut self.pending);

        if self.keys.consume(Key::Pause) {
            match self.phase {
                GamePhase::Play => self.set_phase(GamePhase::Pause),
                GamePhase::Pause => self.set_phase(GamePhase::Play),
                GamePhase::Win | GamePhase::Lost => {}
            }
        }

        if self.phase == GamePhase::Play {
            self.advance_entities(dt);
            self.check_progress();
        }

        if matches!(self.phase, GamePhase::Win | GamePhase::Lost) && self.keys.consume(Key::Restart) {
            self.restart();
        }

        self.store.prune_dead();
        self.ticks += 1;
    }

    fn advance_entities(&mut self, dt: f64) {
        let mut ctx = TickContext {
            config: &self.config,
            sprites: &self.sprites,
            keys: &mut self.keys,
            rng: &mut self.rng,
            events: &mut self.events,
            pending: &mut self.pending,
            player: self.player,
            player_line: Self::player_top(&self.store, self.player, self.config.play_height),
        };

        for index in 0..self.store.len() {
            let Some((_, mut entity)) = self.store.take_at(index) else {
                continue;
            };
            if entity.is_alive() {
                entity.advance(&mut ctx, &mut self.store, dt);
            }
            self.store.restore_at(index, entity);
        }
    }

    fn player_top(store: &EntityStore, player: EntityId, fallback: f64) -> f64 {
        store
            .get(player)
            .map_or(fallback, |entity| entity.position().y)
    }

    /// Overrun, loss, wave progression and win, in that order of priority
    fn check_progress(&mut self) {
        let player_top = Self::player_top(&self.store, self.player, self.config.play_height);
        let overrun = self
            .store
            .get(self.active_wave)
            .and_then(Entity::as_formation)
            .is_some_and(|formation| formation.is_alive() && formation.bottom() >= player_top);
        if overrun {
            log::info!("formation reached the player line");
            if let Some(ship) = self.store.get_mut(self.player).and_then(Entity::as_ship_mut) {
                ship.body.hit_points = 0;
            }
        }

        if !handle_alive(&self.store, &self.pending, self.player) {
            self.set_phase(GamePhase::Lost);
            return;
        }

        if handle_alive(&self.store, &self.pending, self.active_wave) {
            return;
        }
        match self.reserve.pop_front() {
            Some(formation) => {
                self.wave += 1;
                self.active_wave = self.pending.stage(Entity::Formation(formation));
                log::info!("wave {} incoming", self.wave + 1);
                self.events.push(GameEvent::WaveStarted { wave: self.wave });
            }
            None => self.set_phase(GamePhase::Win),
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("phase {from:?} -> {to:?}");
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Tear everything down and stage a fresh playthrough
    pub fn restart(&mut self) {
        log::info!("restarting after {} ticks", self.ticks);
        self.store.clear();
        self.pending.clear();
        self.reserve.clear();
        self.set_phase(GamePhase::Play);
        self.events.push(GameEvent::Restarted);
        self.build_initial();
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        let overlay = match self.phase {
            GamePhase::Play => None,
            GamePhase::Pause => Some(PAUSE_TEXT),
            GamePhase::Win => Some(WIN_TEXT),
            GamePhase::Lost => Some(LOST_TEXT),
        };

        if let Some(text) = overlay {
            let (width, height) = target.measure_text(text, OVERLAY_SIZE);
            let position = Vector2D::new(
                (self.config.play_width - width) / 2.0,
                (self.config.play_height - height) / 2.0 - 50.0,
            );
            target.draw_text(text, position, OVERLAY_SIZE);
            return;
        }

        for (_, entity) in self.store.iter() {
            entity.draw(target);
        }
        self.draw_hud(target);
    }

    /// Lives and currency to the right of the play area
    fn draw_hud(&self, target: &mut dyn RenderTarget) {
        let Some(ship) = self.player_ship() else {
            return;
        };
        let x = self.config.play_width + 10.0;
        target.draw_text(
            &format!("{} ♥", ship.body.hit_points),
            Vector2D::new(x, 10.0),
            HUD_LIVES_SIZE,
        );
        if let Some(loadout) = ship.loadout() {
            target.draw_text(
                &format!("{} $", loadout.currency),
                Vector2D::new(x, 40.0),
                HUD_CURRENCY_SIZE,
            );
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let player = self.player_ship();
        let loadout = player.and_then(Ship::loadout);
        Snapshot {
            phase: self.phase,
            wave: self.wave,
            ticks: self.ticks,
            player_lives: player.map_or(0, |ship| ship.body.hit_points),
            currency: loadout.map_or(0, |l| l.currency),
            fire_level: loadout.map_or(0, |l| l.fire_level),
            upgrade_cost: loadout.map_or(0, |l| l.upgrade_cost),
            live_entities: self.store.len(),
            pending_entities: self.pending.len(),
            formation: self.active_formation().map(Formation::snapshot),
        }
    }

    /// Events produced since the previous drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyState {
        &mut self.keys
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn wave(&self) -> usize {
        self.wave
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sprites(&self) -> &SpriteSheet {
        &self.sprites
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player_ship(&self) -> Option<&Ship> {
        self.store.get(self.player).and_then(Entity::as_ship)
    }

    pub fn player_ship_mut(&mut self) -> Option<&mut Ship> {
        self.store.get_mut(self.player).and_then(Entity::as_ship_mut)
    }

    pub fn active_formation(&self) -> Option<&Formation> {
        self.store.get(self.active_wave).and_then(Entity::as_formation)
    }

    pub fn active_formation_mut(&mut self) -> Option<&mut Formation> {
        self.store
            .get_mut(self.active_wave)
            .and_then(Entity::as_formation_mut)
    }

    /// Stage an entity for admission at the start of the next update
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.pending.stage(entity)
    }
}
