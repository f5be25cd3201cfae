//! Sprite sheet used by the simulation
//!
//! Loading image files is the host's job. `SpriteSheet::procedural` ships a
//! built-in set drawn from character art so the simulation runs headless.
//! Everything a projectile can hit (player, enemies, bunker, missiles) is drawn
//! only with the four palette colours the strict pixel rule recognises.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sprite::{Rgba, Sprite, SpriteError};

/// Enemy artwork, one per row style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyDesign {
    Squid,
    Brute,
    Crab,
    Drone,
    Scout,
    Warden,
}

impl EnemyDesign {
    pub const ALL: [EnemyDesign; 6] = [
        EnemyDesign::Squid,
        EnemyDesign::Brute,
        EnemyDesign::Crab,
        EnemyDesign::Drone,
        EnemyDesign::Scout,
        EnemyDesign::Warden,
    ];
}

/// Every sprite the simulation draws or collides with
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub player: Arc<Sprite>,
    pub squid: Arc<Sprite>,
    pub brute: Arc<Sprite>,
    pub crab: Arc<Sprite>,
    pub drone: Arc<Sprite>,
    pub scout: Arc<Sprite>,
    pub warden: Arc<Sprite>,
    pub missile: Arc<Sprite>,
    pub missile_alt: Arc<Sprite>,
    pub coin: Arc<Sprite>,
    pub extra_life: Arc<Sprite>,
    pub bunker: Arc<Sprite>,
}

const LEGEND: &[(char, Rgba)] = &[
    ('#', Rgba::WHITE),
    ('r', Rgba::DARK_RED),
    ('k', Rgba::BLACK),
    ('t', Rgba::TAN),
    ('y', Rgba::opaque(255, 221, 0)),
    ('p', Rgba::opaque(255, 60, 90)),
];

const PLAYER: &[&str] = &[
    ".......#.......",
    "......###......",
    "......###......",
    "..#..#####..#..",
    "..#.##rrr##.#..",
    ".#############.",
    "###############",
    "###tt#####tt###",
    "##...##.##...##",
];

const SQUID: &[&str] = &[
    ".....##.....",
    "....####....",
    "...######...",
    "..##k##k##..",
    "..########..",
    "....#..#....",
    "...#.##.#...",
    "..#.#..#.#..",
];

const BRUTE: &[&str] = &[
    "..rr....rr..",
    "...rr..rr...",
    "..rrrrrrrr..",
    ".rr.rrrr.rr.",
    "rrrrrrrrrrrr",
    "r.rrrrrrrr.r",
    "r.r......r.r",
    "...rr..rr...",
];

const CRAB: &[&str] = &[
    "..#......#..",
    "...#....#...",
    "..########..",
    ".##.####.##.",
    "############",
    "#.########.#",
    "#.#......#.#",
    "...##..##...",
];

const DRONE: &[&str] = &[
    "....tttt....",
    ".tttttttttt.",
    "tttkkttkkttt",
    "tttttttttttt",
    "...tt..tt...",
    "..tt.tt.tt..",
    "tt........tt",
    "............",
];

const SCOUT: &[&str] = &[
    "....####....",
    ".##########.",
    "############",
    "###..##..###",
    "############",
    "..###..###..",
    ".##..##..##.",
    "..##....##..",
];

const WARDEN: &[&str] = &[
    "...kkkkkkk...",
    ".kkkkkkkkkkk.",
    "kkk#kk#kk#kkk",
    "kkkkkkkkkkkkk",
    ".kkrrrrrrrkk.",
    "..kk.kkk.kk..",
    ".kk.......kk.",
    "kk.........kk",
];

const MISSILE: &[&str] = &["##", "##", "##", "##", "##", "##", "##", "##"];

const MISSILE_ALT: &[&str] = &[".r.", "rrr", "rtr", ".r.", ".t.", "rrr", ".t.", ".r."];

const COIN: &[&str] = &[
    "..yyyy..",
    ".yyyyyy.",
    "yyy..yyy",
    "yy.yy.yy",
    "yy.yy.yy",
    "yyy..yyy",
    ".yyyyyy.",
    "..yyyy..",
];

const EXTRA_LIFE: &[&str] = &[
    ".pp..pp.",
    "pppppppp",
    "pppppppp",
    "pppppppp",
    ".pppppp.",
    "..pppp..",
    "...pp...",
    "........",
];

const BUNKER: &[&str] = &[
    "......######################......",
    "....##########################....",
    "...############################...",
    "..##############################..",
    ".################################.",
    "##################################",
    "##################################",
    "##################################",
    "##################################",
    "##################################",
    "##################################",
    "##################################",
    "##########..............##########",
    "#########................#########",
    "########..................########",
    "########..................########",
];

fn art(rows: &[&str]) -> Result<Arc<Sprite>, SpriteError> {
    Sprite::from_art(rows, LEGEND).map(Arc::new)
}

impl SpriteSheet {
    /// Built-in character-art sprites
    pub fn procedural() -> Result<Self, SpriteError> {
        Ok(Self {
            player: art(PLAYER)?,
            squid: art(SQUID)?,
            brute: art(BRUTE)?,
            crab: art(CRAB)?,
            drone: art(DRONE)?,
            scout: art(SCOUT)?,
            warden: art(WARDEN)?,
            missile: art(MISSILE)?,
            missile_alt: art(MISSILE_ALT)?,
            coin: art(COIN)?,
            extra_life: art(EXTRA_LIFE)?,
            bunker: art(BUNKER)?,
        })
    }

    pub fn enemy(&self, design: EnemyDesign) -> &Arc<Sprite> {
        match design {
            EnemyDesign::Squid => &self.squid,
            EnemyDesign::Brute => &self.brute,
            EnemyDesign::Crab => &self.crab,
            EnemyDesign::Drone => &self.drone,
            EnemyDesign::Scout => &self.scout,
            EnemyDesign::Warden => &self.warden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::SolidRule;

    #[test]
    fn test_procedural_sheet_builds() {
        let sheet = SpriteSheet::procedural().unwrap();
        assert_eq!(sheet.player.width(), 15);
        assert_eq!(sheet.bunker.width(), 34);
        for design in EnemyDesign::ALL {
            assert!(sheet.enemy(design).opaque_count() > 0);
        }
    }

    #[test]
    fn test_victim_sprites_use_palette_only() {
        let sheet = SpriteSheet::procedural().unwrap();
        let victims = [&sheet.player, &sheet.bunker, &sheet.missile, &sheet.missile_alt]
            .into_iter()
            .chain(EnemyDesign::ALL.iter().map(|d| sheet.enemy(*d)));
        for sprite in victims {
            for y in 0..sprite.height() {
                for x in 0..sprite.width() {
                    let p = sprite.pixel(x, y);
                    assert!(p.is_transparent() || SolidRule::Palette.is_solid(p));
                }
            }
        }
    }
}
