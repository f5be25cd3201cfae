//! Player loadout and keyboard control

use thiserror::Error;

use super::entity::TickContext;
use super::input::Key;
use super::ship::{FireMode, Ship};
use super::state::GameEvent;
use super::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeRejected {
    #[error("fire level already at maximum ({0})")]
    MaxLevel(u8),
    #[error("upgrade costs {cost}, only {available} available")]
    InsufficientFunds { cost: u32, available: u32 },
}

/// Currency and firing upgrades carried by the player's ship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLoadout {
    pub currency: u32,
    pub fire_level: u8,
    pub upgrade_cost: u32,
}

impl PlayerLoadout {
    pub fn new(base_cost: u32) -> Self {
        Self {
            currency: 0,
            fire_level: 0,
            upgrade_cost: base_cost,
        }
    }

    pub fn fire_mode(&self) -> FireMode {
        FireMode::from_level(self.fire_level)
    }

    /// Spend the current cost on the next fire level; the cost then doubles
    ///
    /// Returns the price paid.
    pub fn try_upgrade(&mut self, max_level: u8) -> Result<u32, UpgradeRejected> {
        if self.fire_level >= max_level {
            return Err(UpgradeRejected::MaxLevel(max_level));
        }
        if self.currency < self.upgrade_cost {
            return Err(UpgradeRejected::InsufficientFunds {
                cost: self.upgrade_cost,
                available: self.currency,
            });
        }
        let paid = self.upgrade_cost;
        self.currency -= paid;
        self.fire_level += 1;
        self.upgrade_cost = self.upgrade_cost.saturating_mul(2);
        Ok(paid)
    }
}

impl Ship {
    /// Read the key state: upgrade, fire, move
    pub(crate) fn control(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        if ctx.keys.consume(Key::Upgrade) {
            self.upgrade(ctx);
        }

        if ctx.keys.is_pressed(Key::Fire) {
            if let Some(mode) = self.loadout().map(PlayerLoadout::fire_mode) {
                self.shoot(mode, dt, ctx, store);
            }
        }

        let max_x = (ctx.config.play_width - self.body.width()).max(0.0);
        if ctx.keys.is_pressed(Key::Right) {
            self.body.position.x = (self.body.position.x + dt * self.speed).min(max_x);
        } else if ctx.keys.is_pressed(Key::Left) {
            self.body.position.x = (self.body.position.x - dt * self.speed).max(0.0);
        }
    }

    fn upgrade(&mut self, ctx: &mut TickContext) {
        let max_level = ctx.config.player.max_fire_level;
        let Some(loadout) = self.loadout_mut() else {
            return;
        };
        match loadout.try_upgrade(max_level) {
            Ok(cost) => {
                let level = loadout.fire_level;
                log::info!("fire level upgraded to {level} for {cost}");
                ctx.emit(GameEvent::Upgraded { level, cost });
            }
            Err(reason) => log::debug!("upgrade rejected: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::vector::Vector2D;

    #[test]
    fn test_upgrade_requires_funds() {
        let mut loadout = PlayerLoadout::new(200);
        loadout.currency = 150;
        assert_eq!(
            loadout.try_upgrade(3),
            Err(UpgradeRejected::InsufficientFunds { cost: 200, available: 150 })
        );
        assert_eq!(loadout.fire_level, 0);
        assert_eq!(loadout.currency, 150);
    }

    #[test]
    fn test_upgrade_doubles_cost_until_max() {
        let mut loadout = PlayerLoadout::new(200);
        loadout.currency = 10_000;

        assert_eq!(loadout.try_upgrade(3), Ok(200));
        assert_eq!(loadout.try_upgrade(3), Ok(400));
        assert_eq!(loadout.try_upgrade(3), Ok(800));
        assert_eq!(loadout.fire_level, 3);
        assert_eq!(loadout.currency, 10_000 - 1400);
        assert_eq!(loadout.try_upgrade(3), Err(UpgradeRejected::MaxLevel(3)));
        assert_eq!(loadout.fire_mode(), FireMode::TimedAlt);
    }

    #[test]
    fn test_movement_clamped_to_play_area() {
        let mut h = crate::sim::testing::Harness::new();
        let mut ship = h.player_ship(Vector2D::new(5.0, 300.0));

        h.keys.press(Key::Left);
        h.control(&mut ship, 0.1);
        assert_eq!(ship.body.position.x, 0.0);

        h.keys.release(Key::Left);
        h.keys.press(Key::Right);
        for _ in 0..100 {
            h.control(&mut ship, 0.1);
        }
        assert_eq!(ship.body.position.x, 480.0 - ship.body.width());
    }

    #[test]
    fn test_right_wins_over_left() {
        let mut h = crate::sim::testing::Harness::new();
        let mut ship = h.player_ship(Vector2D::new(100.0, 300.0));
        h.keys.press(Key::Left);
        h.keys.press(Key::Right);
        h.control(&mut ship, 0.1);
        assert_eq!(ship.body.position.x, 120.0);
    }

    #[test]
    fn test_upgrade_key_is_edge_triggered() {
        let mut h = crate::sim::testing::Harness::new();
        let mut ship = h.player_ship(Vector2D::new(100.0, 300.0));
        if let Some(loadout) = ship.loadout_mut() {
            loadout.currency = 1000;
        }

        h.keys.press(Key::Upgrade);
        h.control(&mut ship, 0.005);
        h.control(&mut ship, 0.005);

        let loadout = ship.loadout().unwrap();
        assert_eq!(loadout.fire_level, 1);
        assert_eq!(loadout.currency, 800);
        assert!(!h.keys.is_pressed(Key::Upgrade));
        assert!(h.events.contains(&GameEvent::Upgraded { level: 1, cost: 200 }));
    }

    #[test]
    fn test_fire_key_stages_player_shot() {
        let mut h = crate::sim::testing::Harness::new();
        let mut ship = h.player_ship(Vector2D::new(100.0, 300.0));

        h.keys.press(Key::Fire);
        h.control(&mut ship, 0.005);
        assert_eq!(h.pending.len(), 1);
        let (_, shot) = h.pending.iter().next().unwrap();
        assert!(matches!(shot, Entity::Projectile(p) if p.body.position.y < 300.0));
    }
}
