mod common;

use common::{StubCompiler, actor, project, snapshot, with_batch_size};
use schemagen::{
    GenerateError, GenerateOptions, Generator, ManifestSource, PassReport, PassState, TypeManifest,
    config::Config,
    core::{
        db::{DatabaseStore, LoadOutcome, ResetReason, SchemaDatabase},
        discovery::discovery,
        types::ComponentId,
    },
    full_scan_required,
    schema::prelude::*,
};
use std::fs;

fn source(classes: Vec<TypeNode>, levels: Vec<LevelAsset>) -> ManifestSource {
    ManifestSource::new(TypeManifest {
        classes,
        levels,
        ..TypeManifest::default()
    })
}

fn generate(
    config: &Config,
    classes: Vec<TypeNode>,
    compiler: StubCompiler,
) -> Result<PassReport, GenerateError> {
    Generator::new(config.clone(), source(classes, Vec::new()), compiler)
        .run(GenerateOptions::default())
}

fn load(config: &Config) -> SchemaDatabase {
    match DatabaseStore::new(&config.generator.database)
        .load()
        .expect("load database")
    {
        LoadOutcome::Loaded(db) => db,
        LoadOutcome::Reset(reason) => panic!("expected a persisted database, got reset: {reason}"),
    }
}

fn state_id(db: &SchemaDatabase, path: &str) -> ComponentId {
    db.component(Category::State, path)
        .unwrap_or_else(|| panic!("no state component for {path}"))
}

#[test]
fn fresh_pass_persists_every_namespace() {
    let (_dir, config) = project();
    let classes = vec![
        actor("/Game/Pawn.Pawn_C", "Pawn_C").with_cull_distance(900),
        actor("/Game/Door.Door_C", "Door_C").with_cull_distance(900),
    ];
    let levels = vec![LevelAsset::new("Lobby", "/Game/Maps/Lobby")];

    let mut generator = Generator::new(
        config.clone(),
        source(classes, levels),
        StubCompiler::default(),
    );
    let report = generator.run(GenerateOptions::default()).expect("pass");

    assert_eq!(generator.state(), PassState::Done);
    assert_eq!(report.reset, Some(ResetReason::Missing));
    assert_eq!(report.classes, 2);
    assert_eq!(report.level_components, 1);
    assert_eq!(report.distance_components, 1);
    assert_eq!(report.new_ids, 4);
    assert_eq!(report.next_component_id, ComponentId::new(10_004));

    let db = load(&config);
    // classes are processed in path order
    assert_eq!(state_id(&db, "/Game/Door.Door_C"), ComponentId::new(10_000));
    assert_eq!(state_id(&db, "/Game/Pawn.Pawn_C"), ComponentId::new(10_001));
    assert_eq!(db.levels["/Game/Maps/Lobby"], ComponentId::new(10_002));
    assert_eq!(db.distance_buckets[&900], ComponentId::new(10_003));
    assert_eq!(db.component_index.len(), 4);
    assert_eq!(db.descriptor_hash, Some(report.descriptor_hash));

    let schema_dir = &config.generator.schema_dir;
    assert!(schema_dir.join("PawnC.schema").is_file());
    assert!(schema_dir.join("Sublevels/sublevels.schema").is_file());
    assert!(schema_dir.join("NetCullDistance/ncdcomponents.schema").is_file());
}

#[test]
fn rerun_without_changes_is_byte_identical() {
    let (_dir, config) = project();
    let classes = || {
        vec![
            actor("/Game/A.A_C", "A_C"),
            actor("/Game/B.B_C", "B_C").with_child(
                TypeNode::subobject("/Game/B.B_C:Arm", "Arm").with_fields(
                    Category::State,
                    vec![Field::new("/Game/B.B_C:Arm:Len", "Len", "float")],
                ),
            ),
        ]
    };

    generate(&config, classes(), StubCompiler::default()).expect("first pass");
    let first_schema = snapshot(&config.generator.schema_dir);
    let first_db = fs::read(&config.generator.database).expect("read db");

    let report = generate(&config, classes(), StubCompiler::default()).expect("second pass");

    assert_eq!(report.new_ids, 0);
    assert_eq!(report.reset, None);
    assert_eq!(snapshot(&config.generator.schema_dir), first_schema);
    assert_eq!(fs::read(&config.generator.database).expect("read db"), first_db);
}

#[test]
fn batch_size_does_not_change_assignments() {
    let classes: Vec<TypeNode> = (0..250)
        .rev()
        .map(|i| actor(&format!("/Game/Gen/C{i:03}.C{i:03}_C"), &format!("C{i:03}_C")))
        .collect();

    let assignments: Vec<_> = [1, 100, 1000]
        .into_iter()
        .map(|batch_size| {
            let (_dir, config) = project();
            let config = with_batch_size(config, batch_size);
            generate(&config, classes.clone(), StubCompiler::default()).expect("pass");

            let db = load(&config);
            (db.classes, db.components, db.next_component_id)
        })
        .collect();

    assert_eq!(assignments[0].2, ComponentId::new(10_250));
    assert_eq!(assignments[0], assignments[1]);
    assert_eq!(assignments[1], assignments[2]);
}

#[test]
fn invalid_name_aborts_with_nothing_written() {
    let (_dir, config) = project();

    let err = generate(&config, vec![actor("/Game/123Bad.123Bad", "123Bad")], StubCompiler::default())
        .expect_err("leading digit must fail");

    assert_eq!(err.stage(), PassState::Validating);
    assert!(err.to_string().contains("should not start with digits"), "got: {err}");
    assert!(!config.generator.schema_dir.exists());
    assert!(!config.generator.database.exists());
}

#[test]
fn repeated_class_path_fails_validation() {
    let (_dir, config) = project();
    let classes = vec![
        actor("/Game/Pawn.Pawn_C", "Pawn_C"),
        actor("/Game/Pawn.Pawn_C", "Pawn_C"),
    ];

    let err = generate(&config, classes, StubCompiler::default()).expect_err("repeat must fail");

    assert_eq!(err.stage(), PassState::Validating);
    assert!(err.to_string().contains("listed more than once"), "got: {err}");
    assert!(!config.generator.database.exists());
}

#[test]
fn level_path_under_two_names_fails_validation() {
    let (_dir, config) = project();
    let levels = vec![
        LevelAsset::new("Arena", "/Game/Maps/Arena"),
        LevelAsset::new("ArenaOld", "/Game/Maps/Arena"),
    ];

    let err = Generator::new(
        config.clone(),
        source(vec![actor("/Game/Pawn.Pawn_C", "Pawn_C")], levels),
        StubCompiler::default(),
    )
    .run(GenerateOptions::default())
    .expect_err("repeated level path must fail");

    assert_eq!(err.stage(), PassState::Validating);
    assert!(err.to_string().contains("/Game/Maps/Arena"), "got: {err}");
    assert!(!config.generator.schema_dir.exists());
}

#[test]
fn invalid_name_leaves_previous_output_untouched() {
    let (_dir, config) = project();
    generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default()).expect("pass");
    let schema_before = snapshot(&config.generator.schema_dir);
    let db_before = fs::read(&config.generator.database).expect("read db");

    let err = generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), actor("/Game/123Bad.123Bad", "123Bad")],
        StubCompiler::default(),
    )
    .expect_err("leading digit must fail");

    assert!(matches!(err, GenerateError::Validation(_)));
    assert_eq!(snapshot(&config.generator.schema_dir), schema_before);
    assert_eq!(fs::read(&config.generator.database).expect("read db"), db_before);
}

#[test]
fn compiler_failure_leaves_database_bit_identical() {
    let (_dir, config) = project();
    generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default()).expect("pass");
    let db_before = fs::read(&config.generator.database).expect("read db");

    let err = generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), actor("/Game/B.B_C", "B_C")],
        StubCompiler::failing(2),
    )
    .expect_err("exit code 2 must fail");

    assert_eq!(err.stage(), PassState::Compiling);
    assert!(err.to_string().contains("code 2"), "got: {err}");
    assert_eq!(fs::read(&config.generator.database).expect("read db"), db_before);
    // emitted text stays for inspection
    assert!(config.generator.schema_dir.join("BC.schema").is_file());
}

#[test]
fn missing_descriptor_fails_before_saving() {
    let (_dir, config) = project();
    let compiler = StubCompiler {
        skip_descriptor: true,
        ..StubCompiler::default()
    };

    let err = generate(&config, vec![actor("/Game/A.A_C", "A_C")], compiler)
        .expect_err("no descriptor must fail");

    assert!(matches!(err, GenerateError::MissingDescriptor { .. }), "got {err:?}");
    assert_eq!(err.stage(), PassState::Persisting);
    assert!(!config.generator.database.exists());
}

#[test]
fn removed_classes_keep_their_ids_reserved() {
    let (_dir, config) = project();

    generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), actor("/Game/B.B_C", "B_C")],
        StubCompiler::default(),
    )
    .expect("first pass");
    let b_original = state_id(&load(&config), "/Game/B.B_C");

    // B disappears, C arrives
    generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), actor("/Game/C.C_C", "C_C")],
        StubCompiler::default(),
    )
    .expect("second pass");
    let db = load(&config);
    let c = state_id(&db, "/Game/C.C_C");
    assert_ne!(c, b_original);
    assert!(c > b_original);
    assert!(!config.generator.schema_dir.join("BC.schema").exists());

    // B comes back
    generate(
        &config,
        vec![
            actor("/Game/A.A_C", "A_C"),
            actor("/Game/B.B_C", "B_C"),
            actor("/Game/C.C_C", "C_C"),
        ],
        StubCompiler::default(),
    )
    .expect("third pass");
    let db = load(&config);
    assert_eq!(state_id(&db, "/Game/B.B_C"), b_original);
    assert_eq!(state_id(&db, "/Game/C.C_C"), c);
}

#[test]
fn colliding_names_resolve_in_path_order_and_stay_put() {
    let (_dir, config) = project();
    let report = generate(
        &config,
        vec![actor("/Game/B/Foo.Foo_C", "Foo"), actor("/Game/A/Foo.Foo_C", "Foo")],
        StubCompiler::default(),
    )
    .expect("pass");

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].desired, "Foo");

    let db = load(&config);
    assert_eq!(db.classes["/Game/A/Foo.Foo_C"].schema_name, "Foo");
    assert_eq!(db.classes["/Game/B/Foo.Foo_C"].schema_name, "Foo1");

    // B alone keeps its suffixed name
    generate(&config, vec![actor("/Game/B/Foo.Foo_C", "Foo")], StubCompiler::default())
        .expect("pass");
    assert!(config.generator.schema_dir.join("Foo1.schema").is_file());
    assert!(!config.generator.schema_dir.join("Foo.schema").exists());
}

#[test]
fn discovered_candidates_join_the_pass() {
    let (_dir, config) = project();
    let manifest = TypeManifest {
        classes: vec![actor("/Game/A.A_C", "A_C")],
        catalog: vec![actor("/Game/Cooked.Cooked_C", "Cooked_C")],
        ..TypeManifest::default()
    };

    let (listener, queue) = discovery();
    let worker = std::thread::spawn(move || {
        listener.on_candidate_created("/Game/Cooked.Cooked_C");
        listener.on_candidate_created("/Game/Unknown.Unknown_C");
    });
    worker.join().expect("listener thread");

    let report = Generator::new(config.clone(), ManifestSource::new(manifest), StubCompiler::default())
        .with_discovery(queue)
        .run(GenerateOptions::default())
        .expect("pass");

    assert_eq!(report.classes, 2);
    assert!(load(&config).classes.contains_key("/Game/Cooked.Cooked_C"));
}

#[test]
fn unsupported_classes_are_skipped() {
    let (_dir, config) = project();
    let editor_only = actor("/Game/Tool.Tool_C", "Tool_C").with_flags(ClassFlags {
        editor_only: true,
        ..ClassFlags::default()
    });

    let report = generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), editor_only, actor("/Game/A.SKEL_A_C", "SKEL_A_C")],
        StubCompiler::default(),
    )
    .expect("pass");

    assert_eq!(report.classes, 1);
    assert_eq!(report.skipped, 2);
    assert!(!load(&config).classes.contains_key("/Game/Tool.Tool_C"));
}

#[test]
fn stale_database_is_discarded() {
    let (_dir, config) = project();
    fs::create_dir_all(config.generator.database.parent().expect("parent")).expect("mkdir");
    fs::write(
        &config.generator.database,
        r#"{ "next_component_id": 10000, "classes": { "/Game/Old.Old_C": { "schema_name": "OldC", "class": "root" } } }"#,
    )
    .expect("write");

    let report = generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default())
        .expect("pass");

    assert_eq!(report.reset, Some(ResetReason::Stale));
    let db = load(&config);
    assert!(!db.classes.contains_key("/Game/Old.Old_C"));
    assert_eq!(state_id(&db, "/Game/A.A_C"), ComponentId::new(10_000));
}

#[test]
fn read_only_database_fails_while_loading() {
    let (_dir, config) = project();
    generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default()).expect("pass");

    let path = &config.generator.database;
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms).expect("set permissions");

    let err = generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default())
        .expect_err("read-only database must fail");
    assert_eq!(err.stage(), PassState::Loading);

    let err = Generator::new(
        config.clone(),
        source(vec![actor("/Game/A.A_C", "A_C")], Vec::new()),
        StubCompiler::default(),
    )
    .run(GenerateOptions { reset: true })
    .expect_err("reset cannot bypass a read-only database");
    assert_eq!(err.stage(), PassState::Loading);
}

#[test]
fn explicit_reset_renumbers_from_baseline() {
    let (_dir, config) = project();
    generate(
        &config,
        vec![actor("/Game/A.A_C", "A_C"), actor("/Game/B.B_C", "B_C")],
        StubCompiler::default(),
    )
    .expect("pass");
    assert_eq!(state_id(&load(&config), "/Game/B.B_C"), ComponentId::new(10_001));

    let report = Generator::new(
        config.clone(),
        source(vec![actor("/Game/B.B_C", "B_C")], Vec::new()),
        StubCompiler::default(),
    )
    .run(GenerateOptions { reset: true })
    .expect("reset pass");

    assert_eq!(report.reset, Some(ResetReason::Requested));
    let db = load(&config);
    assert_eq!(state_id(&db, "/Game/B.B_C"), ComponentId::new(10_000));
    assert!(!db.classes.contains_key("/Game/A.A_C"));
}

#[test]
fn full_scan_is_required_until_the_first_pass() {
    let (_dir, config) = project();
    assert!(full_scan_required(&config));

    generate(&config, vec![actor("/Game/A.A_C", "A_C")], StubCompiler::default()).expect("pass");
    assert!(!full_scan_required(&config));

    fs::remove_dir_all(&config.generator.schema_dir).expect("remove schema dir");
    assert!(full_scan_required(&config));
}
