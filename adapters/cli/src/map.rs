//! Plain-text rendering of the battlefield for terminal output.

use frost_defence_core::{BiomeBlock, EntityKind, GridCell};
use frost_defence_world::{query, World};

/// Renders the world as one character per cell, north row first.
///
/// Combatants are drawn over platforms, which are drawn over paths,
/// decorations and terrain.
pub(crate) fn render(world: &World) -> String {
    let layout = query::layout(world);
    let size = layout.grid_size().max(0);
    let width = size as usize;
    let mut cells = vec![' '; width * width];

    let mut paint = |cell: GridCell, glyph: char| {
        if cell.is_within(size) {
            cells[cell.z() as usize * width + cell.x() as usize] = glyph;
        }
    };

    for block in layout.terrain() {
        paint(
            block.cell,
            match block.block {
                BiomeBlock::Snow => '.',
                BiomeBlock::Ice => '~',
            },
        );
    }
    for decoration in layout.decorations() {
        paint(decoration.position.cell(), '*');
    }
    for path in layout.paths() {
        for cell in path.cells() {
            paint(*cell, '#');
        }
    }
    for platform in layout.platforms() {
        paint(platform.site, 'P');
    }
    for snapshot in query::combatant_view(world).iter() {
        let glyph = match snapshot.kind {
            EntityKind::Tower => 'T',
            EntityKind::Defender => 'D',
            EntityKind::Enemy => 'e',
            EntityKind::Objective => 'O',
            EntityKind::Projectile => continue,
        };
        paint(GridCell::nearest(snapshot.position), glyph);
    }

    let mut out = String::with_capacity((width + 1) * width);
    for row in cells.chunks(width.max(1)).rev() {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_defence_core::{
        config::{CombatConfig, GenerationConfig},
        BuildKind, Command, Edge,
    };
    use frost_defence_system_bootstrap::Bootstrap;
    use frost_defence_world as world;

    fn small_world() -> World {
        let generation = GenerationConfig {
            grid_size: 10,
            entrances: vec![Edge::South],
            ..GenerationConfig::default()
        };
        World::new(Bootstrap.generate(&generation, 1), CombatConfig::default())
    }

    fn glyph_at(map: &str, cell: GridCell) -> char {
        let rows: Vec<&str> = map.lines().collect();
        let row = rows[rows.len() - 1 - cell.z() as usize];
        row.chars().nth(cell.x() as usize).expect("column in row")
    }

    #[test]
    fn renders_one_line_per_row() {
        let map = render(&small_world());

        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|row| row.chars().count() == 10));
    }

    #[test]
    fn draws_objective_paths_and_platforms() {
        let map = render(&small_world());

        assert_eq!(glyph_at(&map, GridCell::new(5, 5)), 'O');
        assert_eq!(glyph_at(&map, GridCell::new(5, 0)), '#');
        assert_eq!(glyph_at(&map, GridCell::new(8, 0)), 'P');
        assert_eq!(glyph_at(&map, GridCell::new(2, 2)), 'P');
    }

    #[test]
    fn structures_and_enemies_replace_ground_glyphs() {
        let mut world = small_world();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Build {
                kind: BuildKind::Defender,
                site: GridCell::new(8, 0),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                entrance: GridCell::new(5, 0),
            },
            &mut events,
        );

        let map = render(&world);

        assert_eq!(glyph_at(&map, GridCell::new(8, 0)), 'D');
        assert_eq!(glyph_at(&map, GridCell::new(5, 0)), 'e');
    }
}
