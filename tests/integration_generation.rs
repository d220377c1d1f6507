//! End-to-end generation tests: determinism, degenerate grids, two-room
//! connectivity and config loading.

use delve::{
    open_path, rooms_connected, DelveError, DelveResult, EndpointSelection, FrameRecorder,
    GameState, GenerationConfig, Generator, HallwayRouter, MovementPolicy, Position,
    RandomStream, Room, RoomPlanner, ScriptedInput, Tile, TileGrid, WorldBuilder,
};
use std::io::Write;

fn play(config: &GenerationConfig, script: &str) -> DelveResult<(TileGrid, Position)> {
    let world = WorldBuilder::build(config)?;
    let mut state = GameState::from_world(world, MovementPolicy::Walkable);
    let mut input = ScriptedInput::parse(script)?;
    let summary = state.run(&mut input, &mut FrameRecorder::new())?;
    Ok((state.into_grid(), summary.final_position))
}

#[test]
fn test_same_seed_and_script_replays_identically() -> DelveResult<()> {
    let config = GenerationConfig::default();
    let script = "ddddwwwwaasssdq";

    let (first_grid, first_pos) = play(&config, script)?;
    let (second_grid, second_pos) = play(&config, script)?;

    assert_eq!(first_grid, second_grid);
    assert_eq!(first_pos, second_pos);
    assert_eq!(first_grid.get(first_pos), Tile::Avatar);
    Ok(())
}

#[test]
fn test_different_seeds_give_different_worlds() -> DelveResult<()> {
    let a = WorldBuilder::build(&GenerationConfig::new(1))?;
    let b = WorldBuilder::build(&GenerationConfig::new(2))?;
    assert_ne!(a.grid, b.grid);
    Ok(())
}

#[test]
fn test_default_world_is_valid() -> DelveResult<()> {
    let config = GenerationConfig::default();
    let world = WorldBuilder::build(&config)?;
    WorldBuilder::new().validate(&world, &config)?;
    assert!(rooms_connected(&world.grid, &world.report.rooms));
    assert_eq!(world.grid.count(Tile::Avatar), 1);
    Ok(())
}

#[test]
fn test_tiny_grid_fails_without_hanging() {
    let config = GenerationConfig::new(42).with_dimensions(5, 5);
    let result = WorldBuilder::build(&config);
    assert!(matches!(
        result,
        Err(DelveError::NoValidSpawn { rooms_placed: 0, .. })
    ));
}

#[test]
fn test_two_distant_rooms_get_one_hallway() {
    let mut grid = TileGrid::new(50, 50);
    let rooms = [
        Room::new(Position::new(3, 44), 4, 4),
        Room::new(Position::new(38, 8), 5, 4),
    ];
    for room in &rooms {
        RoomPlanner::carve_room(&mut grid, room);
    }

    for selection in [EndpointSelection::PerRoom, EndpointSelection::PerComparison] {
        let mut grid = grid.clone();
        let mut rng = RandomStream::new(11);
        let hallways = HallwayRouter::new(selection).connect(&mut grid, &rooms, &mut rng);

        assert_eq!(hallways.len(), 1);
        let hallway = &hallways[0];
        assert_eq!(hallway.rooms, (0, 1));
        assert!(rooms[0].contains(hallway.start));
        assert!(rooms[1].contains(hallway.end));

        let path = open_path(&grid, hallway.start, hallway.end).expect("rooms are joined");
        assert!(path.iter().all(|&pos| grid.get(pos) == Tile::Floor));
        assert!(rooms_connected(&grid, &rooms));
    }
}

#[test]
fn test_config_file_round_trip() -> DelveResult<()> {
    let mut config = GenerationConfig::for_testing(2024);
    config.endpoint_selection = EndpointSelection::PerComparison;

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(&config)?.as_bytes())?;

    let loaded = GenerationConfig::from_json_file(file.path())?;
    assert_eq!(loaded, config);

    let world = WorldBuilder::build(&loaded)?;
    assert_eq!(world.grid.width(), 30);
    assert_eq!(world.seed, 2024);
    Ok(())
}

#[test]
fn test_partial_config_file_takes_defaults() -> DelveResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"seed": 9, "endpoint_selection": "per_comparison"}}"#)?;

    let loaded = GenerationConfig::from_json_file(file.path())?;
    assert_eq!(loaded.seed, 9);
    assert_eq!(loaded.endpoint_selection, EndpointSelection::PerComparison);
    assert_eq!(loaded.width, 50);
    assert_eq!(loaded.room_attempts, 15..500);
    Ok(())
}

#[test]
fn test_invalid_config_file_is_rejected() -> DelveResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"room_size": {{"start": 2, "end": 5}}}}"#)?;
    assert!(matches!(
        GenerationConfig::from_json_file(file.path()),
        Err(DelveError::InvalidConfig(_))
    ));

    let mut garbage = tempfile::NamedTempFile::new()?;
    write!(garbage, "not json")?;
    assert!(matches!(
        GenerationConfig::from_json_file(garbage.path()),
        Err(DelveError::Serde(_))
    ));
    Ok(())
}

#[test]
fn test_config_file_with_unreachable_geometry_is_rejected() -> DelveResult<()> {
    for body in [
        r#"{"anchor_x": {"start": 2147483640, "end": 2147483646}}"#,
        r#"{"anchor_y": {"start": 12, "end": 80}}"#,
        r#"{"room_size": {"start": 3, "end": 60000}}"#,
        r#"{"width": 4000000000, "height": 50}"#,
    ] {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{}", body)?;
        let result = GenerationConfig::from_json_file(file.path());
        assert!(
            matches!(result, Err(DelveError::InvalidConfig(_))),
            "{} should be rejected, got {:?}",
            body,
            result
        );
    }
    Ok(())
}

#[test]
fn test_resized_config_file_rederives_anchors() -> DelveResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"seed": 5, "width": 30, "height": 24}}"#)?;

    let config = GenerationConfig::from_json_file(file.path())?;
    assert!(config.anchor_x.end <= 30);
    assert!(config.anchor_y.end <= 24);

    let world = WorldBuilder::build(&config)?;
    WorldBuilder::new().validate(&world, &config)?;
    for room in &world.report.rooms {
        assert!(config.anchor_y.contains(&room.anchor.y));
    }
    Ok(())
}
