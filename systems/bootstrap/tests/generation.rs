use std::collections::HashSet;

use frost_defence_core::{config::GenerationConfig, Edge, GridCell, ReservationKind};
use frost_defence_system_bootstrap::Bootstrap;

#[test]
fn same_seed_reproduces_layout() {
    let config = GenerationConfig::default();

    let first = Bootstrap.generate(&config, 42);
    let second = Bootstrap.generate(&config, 42);

    assert_eq!(first.occupancy(), second.occupancy());
    assert_eq!(first.paths(), second.paths());
    assert_eq!(first.platforms(), second.platforms());
    assert_eq!(first.terrain(), second.terrain());
    assert_eq!(first.decorations(), second.decorations());
}

#[test]
fn different_seeds_change_cosmetics_only() {
    let config = GenerationConfig::default();

    let first = Bootstrap.generate(&config, 1);
    let second = Bootstrap.generate(&config, 2);

    assert_eq!(first.occupancy(), second.occupancy());
    assert_eq!(first.platforms(), second.platforms());
    assert_ne!(first.terrain(), second.terrain());
}

#[test]
fn terrain_and_reservations_are_mutually_exclusive() {
    let layout = Bootstrap.generate(&GenerationConfig::default(), 7);
    let occupancy = layout.occupancy();

    for block in layout.terrain() {
        assert!(!occupancy.is_cell_reserved(block.cell));
    }

    let reserved: HashSet<GridCell> = occupancy
        .iter()
        .map(|(position, _)| position.cell())
        .collect();
    let grid_cells = (layout.grid_size() * layout.grid_size()) as usize;
    let in_grid_reserved = reserved
        .iter()
        .filter(|cell| cell.is_within(layout.grid_size()))
        .count();
    assert_eq!(layout.terrain().len() + in_grid_reserved, grid_cells);
}

#[test]
fn decorations_avoid_paths_and_platforms() {
    let layout = Bootstrap.generate(&GenerationConfig::default(), 13);

    assert!(layout.decorations().len() <= 50);
    for decoration in layout.decorations() {
        assert!(!layout
            .occupancy()
            .is_cell_near(decoration.position.cell(), 1));
    }
}

#[test]
fn platforms_respect_objective_exclusion() {
    let config = GenerationConfig::default();
    let layout = Bootstrap.generate(&config, 3);
    let objective = layout.objective();

    for platform in layout.platforms() {
        assert!(platform.site.x().abs_diff(objective.x()) > config.objective_exclusion);
        assert!(platform.site.z().abs_diff(objective.z()) > config.objective_exclusion);
        assert_eq!(
            layout.occupancy().kind_at_cell(platform.site),
            Some(ReservationKind::Platform)
        );
    }
}

#[test]
fn custom_entrances_are_honoured() {
    let config = GenerationConfig {
        grid_size: 10,
        entrances: vec![Edge::South],
        ..GenerationConfig::default()
    };

    let layout = Bootstrap.generate(&config, 5);

    assert_eq!(layout.entrances(), vec![GridCell::new(5, 0)]);
    assert_eq!(layout.paths()[0].cells().len(), 15);
}
