//! Individual subsystems and the factories and builders that create them

use smart_city::city::{
    CityError, EnergyGrid, EnergyReading, EnergySource, EventKind, LegacyGridMeter,
    LegacyMeterAdapter, LightConfig, LightGroup, LightKind, LightingFactory, LightingGrid,
    SecurityLevel, SecuritySystem, SignalState, Subsystem, SubsystemFactory, SubsystemKind,
    TrafficSignalBuilder, TransportNetwork, DEFAULT_GREEN_SECS, DEFAULT_LIGHTS_PER_STREET,
    DEFAULT_RED_SECS, DEFAULT_STREETS, DEFAULT_YELLOW_SECS, READING_HISTORY_LEN,
    RECENT_EVENT_COUNT, UNKNOWN_LOCATION,
};

/// Energy source that always reports the same reading
struct FixedSource(EnergyReading);

impl EnergySource for FixedSource {
    fn reading(&mut self) -> EnergyReading {
        self.0
    }
}

#[test]
fn test_light_defaults_and_consumption() {
    let mut light = LightingFactory::create(LightConfig::new("L1", LightKind::Halogen));
    assert_eq!(light.location, UNKNOWN_LOCATION);
    assert_eq!(light.brightness(), 100);
    assert_eq!(light.energy_consumption(), 0.0);

    light.turn_on();
    assert_eq!(light.energy_consumption(), 50.0);

    light.set_brightness(50);
    assert_eq!(light.energy_consumption(), 25.0);

    light.set_brightness(250);
    assert_eq!(light.brightness(), 100);
    light.set_brightness(-5);
    assert_eq!(light.brightness(), 0);
}

#[test]
fn test_street_lighting_ids() {
    let lights = LightingFactory::create_street("Elm Street", 3, LightKind::Solar);
    let ids: Vec<&str> = lights.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["Elm Street-L1", "Elm Street-L2", "Elm Street-L3"]);
    assert_eq!(lights[1].location, "Elm Street, Position 2");
    assert!(lights.iter().all(|l| l.kind == LightKind::Solar));
}

#[test]
fn test_light_group_composite() {
    let mut district = LightGroup::district("Old Town", &["A", "B"], 2, LightKind::Led);
    let mut extra = LightGroup::new("Plaza");
    extra.add_light(LightingFactory::create(LightConfig::new("P1", LightKind::Halogen)));
    district.add_group(extra);

    assert_eq!(district.child_count(), 3);
    assert_eq!(district.total_lights(), 5);
    assert!(!district.is_on());

    district.turn_on();
    assert_eq!(district.lights_on(), 5);
    // four LEDs at 10W plus one halogen at 50W
    assert_eq!(district.energy_consumption(), 90.0);

    district.turn_off();
    assert_eq!(district.lights_on(), 0);
    assert_eq!(district.energy_consumption(), 0.0);
}

#[test]
fn test_light_group_remove() {
    let mut group = LightGroup::new("Street");
    for light in LightingFactory::create_many(vec![
        LightConfig::new("S1", LightKind::Led),
        LightConfig::new("S2", LightKind::Led),
    ]) {
        group.add_light(light);
    }

    let removed = group.remove_light("S1").expect("S1 is a direct child");
    assert_eq!(removed.id, "S1");
    assert_eq!(group.total_lights(), 1);
    assert!(group.remove_light("missing").is_none());
}

#[test]
fn test_lighting_grid_lifecycle() {
    let mut grid = LightingGrid::new(
        "Lighting",
        LightGroup::district("Downtown", &["Main"], 4, LightKind::Led),
    );
    assert_eq!(grid.status(), "Lighting system offline");

    grid.start().expect("start lighting");
    assert!(grid.is_active());
    assert_eq!(grid.root().lights_on(), 4);
    assert!(grid.status().starts_with("4/4 lights on"));

    grid.stop().expect("stop lighting");
    assert!(!grid.is_active());
    assert_eq!(grid.root().lights_on(), 0);
}

#[test]
fn test_traffic_signal_builder_defaults() {
    let signal = TrafficSignalBuilder::new()
        .id("TS-9")
        .location("Harbour Road")
        .build()
        .expect("id and location are set");

    assert_eq!(signal.id(), "TS-9");
    assert_eq!(signal.state(), SignalState::Red);
    let timings = signal.timings();
    assert_eq!(
        (timings.red, timings.yellow, timings.green),
        (DEFAULT_RED_SECS, DEFAULT_YELLOW_SECS, DEFAULT_GREEN_SECS)
    );
    assert!(!signal.has_camera());
    assert!(!signal.has_pedestrian_crossing());
    assert!(signal.info().contains("Features: None"));
}

#[test]
fn test_traffic_signal_builder_requires_id_and_location() {
    let missing_id = TrafficSignalBuilder::new().location("Somewhere").build();
    assert!(matches!(
        missing_id,
        Err(CityError::MissingField { field: "id", .. })
    ));

    let missing_location = TrafficSignalBuilder::new().id("TS-1").build();
    assert!(matches!(
        missing_location,
        Err(CityError::MissingField {
            field: "location",
            ..
        })
    ));

    let reset = TrafficSignalBuilder::new()
        .id("TS-1")
        .location("Somewhere")
        .reset()
        .build();
    assert!(matches!(reset, Err(CityError::MissingField { field: "id", .. })));
}

#[test]
fn test_traffic_signal_builder_rejects_zero_phase() {
    let result = TrafficSignalBuilder::new()
        .id("TS-1")
        .location("Somewhere")
        .yellow_secs(0)
        .build();
    assert!(matches!(
        result,
        Err(CityError::InvalidValue {
            field: "yellow_secs",
            ..
        })
    ));
}

#[test]
fn test_traffic_signal_state_changes() {
    let mut signal = TrafficSignalBuilder::new()
        .id("TS-1")
        .location("Somewhere")
        .with_camera()
        .build()
        .expect("valid signal");

    assert!(matches!(
        signal.change_state(SignalState::Green),
        Err(CityError::SignalInactive(_))
    ));

    signal.start();
    signal.change_state(SignalState::Green).expect("active signal");
    assert_eq!(signal.state(), SignalState::Green);

    signal.stop();
    assert_eq!(signal.state(), SignalState::Red);
}

#[test]
fn test_transport_network_cascades() {
    let mut network = TransportNetwork::new("Transport");
    network.add_signal(
        TrafficSignalBuilder::new()
            .id("TS-1")
            .location("A")
            .build()
            .expect("valid signal"),
    );

    network.start().expect("start transport");
    assert!(network.signals().iter().all(|s| s.is_active()));

    // signals added while running start straight away
    network.add_signal(
        TrafficSignalBuilder::new()
            .id("TS-2")
            .location("B")
            .build()
            .expect("valid signal"),
    );
    assert_eq!(network.status(), "2/2 traffic signals synchronized");

    network
        .signal_mut("TS-2")
        .expect("TS-2 is registered")
        .change_state(SignalState::Yellow)
        .expect("running signal");

    network.stop().expect("stop transport");
    assert!(network.signals().iter().all(|s| !s.is_active()));
    assert!(network
        .signals()
        .iter()
        .all(|s| s.state() == SignalState::Red));
}

#[test]
fn test_energy_grid_is_zero_when_inactive() {
    let mut grid = EnergyGrid::new_with_seed("Energy", 7);
    assert_eq!(grid.sample().consumption, 0.0);
    assert_eq!(grid.sample().efficiency(), 0.0);
}

#[test]
fn test_energy_grid_seeded_readings_repeat() {
    let mut first = EnergyGrid::new_with_seed("Energy", 42);
    let mut second = EnergyGrid::new_with_seed("Energy", 42);
    first.start().expect("start");
    second.start().expect("start");

    for _ in 0..5 {
        let a = first.sample();
        let b = second.sample();
        assert_eq!(a, b);
        assert!((100.0..=500.0).contains(&a.consumption));
        assert!((80.0..=450.0).contains(&a.production));
        assert!(a.efficiency() <= 100.0);
    }
    assert_eq!(first.last_reading(), second.last_reading());
}

#[test]
fn test_legacy_meter_adapter_converts_watts_to_kilowatts() {
    let mut meter = LegacyGridMeter::new_with_seed(9);
    let mut adapter = LegacyMeterAdapter::new(LegacyGridMeter::new_with_seed(9));

    let demand = meter.read_demand_watts();
    let supply = meter.read_supply_watts();
    assert!((100_000.0..500_000.0).contains(&demand));

    let reading = adapter.reading();
    assert_eq!(reading.consumption, (demand / 1000.0) as f32);
    assert_eq!(reading.production, (supply / 1000.0) as f32);
}

#[test]
fn test_energy_grid_reads_through_any_source() {
    let fixed = EnergyReading {
        consumption: 200.0,
        production: 150.0,
    };
    let mut grid = EnergyGrid::with_source("Energy", Box::new(FixedSource(fixed)));
    assert_eq!(grid.sample(), EnergyReading::default());

    grid.start().expect("start");
    assert_eq!(grid.sample(), fixed);
    assert_eq!(grid.sample().efficiency(), 75.0);
    assert_eq!(grid.average_efficiency(), 75.0);
    assert!(grid.status().contains("Consumption: 200.0 kW"));
    assert!(grid.status().ends_with("Samples: 2"));
}

#[test]
fn test_energy_history_is_bounded() {
    let mut grid = EnergyGrid::new_with_seed("Energy", 5);
    assert!(grid.history().is_empty());
    assert_eq!(grid.sample(), EnergyReading::default());
    assert!(grid.history().is_empty());

    grid.start().expect("start");
    let mut last = EnergyReading::default();
    for _ in 0..READING_HISTORY_LEN + 20 {
        last = grid.sample();
    }

    assert_eq!(grid.history().len(), READING_HISTORY_LEN);
    assert_eq!(grid.history().back(), Some(&last));
    assert_eq!(grid.last_reading(), last);

    grid.stop().expect("stop");
    assert_eq!(grid.last_reading(), EnergyReading::default());
    assert_eq!(grid.history().len(), READING_HISTORY_LEN);
}

#[test]
fn test_security_events() {
    let mut security = SecuritySystem::default();
    assert_eq!(security.name(), "Security");
    assert_eq!(security.level(), SecurityLevel::Medium);

    security.record_event(SecurityLevel::Critical, "Gate 3", "Intrusion detected");
    assert_eq!(security.events()[0].kind, EventKind::Alert);

    for i in 0..RECENT_EVENT_COUNT + 2 {
        security.record_event(SecurityLevel::Low, "Gate 1", &format!("Badge {}", i));
    }
    assert_eq!(security.events().len(), RECENT_EVENT_COUNT + 3);
    assert_eq!(security.recent_events().len(), RECENT_EVENT_COUNT);
    assert_eq!(security.recent_events()[0].description, "Badge 2");
    assert_eq!(security.recent_events()[0].kind, EventKind::Info);
}

#[test]
fn test_factory_creates_every_kind() {
    let factory = SubsystemFactory::with_seed(1);
    for kind in SubsystemKind::ALL {
        let handle = factory.create(kind).expect("default subsystems build");
        let subsystem = handle.borrow();
        assert_eq!(subsystem.kind(), kind);
        assert_eq!(subsystem.name(), kind.default_name());
        assert!(!subsystem.is_active());
    }

    let lighting = factory.create_lighting();
    assert_eq!(
        lighting.root().total_lights(),
        DEFAULT_STREETS.len() * DEFAULT_LIGHTS_PER_STREET
    );
    assert_eq!(factory.create_transport().expect("transport").signals().len(), 2);
}

#[test]
fn test_factory_by_name() {
    let factory = SubsystemFactory::new();
    let handle = factory.create_named("Transport").expect("known kind");
    assert_eq!(handle.borrow().kind(), SubsystemKind::Transport);

    let unknown = factory.create_named("weather");
    assert!(matches!(unknown, Err(CityError::UnknownSubsystem(ref name)) if name == "weather"));
}
