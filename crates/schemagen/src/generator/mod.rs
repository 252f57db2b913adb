//! One generation pass: load, discover, validate, emit, compile, persist.

mod state;

pub use state::PassState;

use crate::{
    error::GenerateError,
    filter::SupportFilter,
    source::TypeSource,
};
use schemagen_build::{CompilerInvocation, EmitError, SchemaCompiler, SchemaEmitter};
use schemagen_config_build::Config;
use schemagen_core::{
    db::{DATABASE_FORMAT_VERSION, DatabaseError, DatabaseStore, LoadOutcome, ResetReason},
    discovery::DiscoveryQueue,
    hash::content_hash,
    registry::{CollisionGroup, CollisionRegistry},
    types::ComponentId,
};
use schemagen_schema::{
    node::{LevelAsset, TypeNode},
    validate::validate_graph,
};
use std::{
    collections::BTreeSet,
    fs,
    time::Instant,
};
use tracing::{debug, info, warn};

///
/// GenerateOptions
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GenerateOptions {
    /// Start from an empty database. The file on disk is only replaced if
    /// the pass succeeds.
    pub reset: bool,
}

///
/// PassReport
///

#[derive(Clone, Debug)]
pub struct PassReport {
    pub classes: usize,
    pub skipped: usize,
    pub level_components: usize,
    pub distance_components: usize,
    pub new_ids: u32,
    pub collisions: Vec<CollisionGroup>,
    pub descriptor_hash: u64,
    pub next_component_id: ComponentId,
    pub reset: Option<ResetReason>,
}

/// A full scan is needed when there is no database to build on or the
/// generated schema tree is gone.
#[must_use]
pub fn full_scan_required(config: &Config) -> bool {
    !config.generator.database.is_file() || !config.generator.schema_dir.is_dir()
}

///
/// Generator
///
/// Owns the pass. The database is only read at `Loading` and only written
/// at the end of `Persisting`; every earlier failure leaves it as it was.
///

pub struct Generator<S, C> {
    config: Config,
    source: S,
    compiler: C,
    discovery: Option<DiscoveryQueue>,
    state: PassState,
}

impl<S: TypeSource, C: SchemaCompiler> Generator<S, C> {
    #[must_use]
    pub const fn new(config: Config, source: S, compiler: C) -> Self {
        Self {
            config,
            source,
            compiler,
            discovery: None,
            state: PassState::Idle,
        }
    }

    /// Also pick up candidates reported through a discovery listener.
    #[must_use]
    pub fn with_discovery(mut self, queue: DiscoveryQueue) -> Self {
        self.discovery = Some(queue);
        self
    }

    #[must_use]
    pub const fn state(&self) -> PassState {
        self.state
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&mut self, options: GenerateOptions) -> Result<PassReport, GenerateError> {
        let started = Instant::now();
        let elapsed_ms = || u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.state = PassState::Idle;

        match self.pass(options) {
            Ok(report) => {
                self.enter(PassState::Done);
                info!(
                    classes = report.classes,
                    new_ids = report.new_ids,
                    elapsed_ms = elapsed_ms(),
                    "schema generation finished"
                );

                Ok(report)
            }
            Err(err) => {
                self.enter(PassState::Failed);
                warn!(
                    stage = %err.stage(),
                    elapsed_ms = elapsed_ms(),
                    "schema generation failed"
                );

                Err(err)
            }
        }
    }

    fn enter(&mut self, next: PassState) {
        debug_assert!(self.state.can_enter(next), "{} -> {next}", self.state);
        debug!(from = %self.state, to = %next, "pass state");

        self.state = next;
    }

    fn pass(&mut self, options: GenerateOptions) -> Result<PassReport, GenerateError> {
        self.config.validate()?;

        // loading
        self.enter(PassState::Loading);
        let store = DatabaseStore::new(&self.config.generator.database);
        let outcome = if options.reset {
            if store.is_read_only() {
                return Err(GenerateError::Load(DatabaseError::ReadOnly(
                    store.path().to_path_buf(),
                )));
            }
            LoadOutcome::Reset(ResetReason::Requested)
        } else {
            store.load().map_err(GenerateError::Load)?
        };

        let reset = match &outcome {
            LoadOutcome::Reset(reason) => {
                info!(%reason, "starting from an empty schema database");
                Some(reason.clone())
            }
            LoadOutcome::Loaded(db) => {
                debug!(watermark = %db.next_component_id, "loaded schema database");
                None
            }
        };
        let mut db = outcome.into_database();

        // discovering
        self.enter(PassState::Discovering);
        let (classes, skipped) = self.discover()?;
        let levels = sorted_levels(self.source.levels()?);

        // validating
        self.enter(PassState::Validating);
        validate_graph(&classes, &levels).map_err(GenerateError::Validation)?;

        // emitting
        self.enter(PassState::Emitting);
        let generator = &self.config.generator;
        let emitter = SchemaEmitter::new(&generator.schema_dir, generator.dynamic_subobject_slots);
        emitter.prepare()?;

        let mut registry = CollisionRegistry::seed(&db);
        let mut alloc = db.allocator();
        let mut distances = BTreeSet::new();

        for (batch, chunk) in classes.chunks(generator.batch_size).enumerate() {
            for node in chunk {
                let kind = node
                    .class_kind()
                    .ok_or_else(|| EmitError::NotAClass(node.path.clone()))?;
                let schema_name = registry.resolve(&node.path, &node.name);

                db.record_identity(&node.path, &schema_name, kind);
                emitter.emit_class(node, &schema_name, &mut db, &mut alloc)?;

                if let Some(distance) = node.cull_distance_squared() {
                    distances.insert(distance);
                }
            }
            debug!(batch, classes = chunk.len(), "emitted batch");
        }

        let collisions = registry.log_collisions();
        let level_components = emitter.emit_levels(&levels, &mut db, &mut alloc)?;
        let distance_components = emitter.emit_distances(&distances, &mut db, &mut alloc)?;
        db.next_component_id = alloc.peek();

        // compiling
        self.enter(PassState::Compiling);
        let invocation = CompilerInvocation::from_config(&self.config.compiler);
        self.compiler.compile(&invocation)?;

        // persisting
        self.enter(PassState::Persisting);
        let descriptor_path = invocation.descriptor_path();
        let descriptor =
            fs::read(&descriptor_path).map_err(|source| GenerateError::MissingDescriptor {
                path: descriptor_path,
                source,
            })?;
        let descriptor_hash = content_hash(&descriptor);
        info!("compiled schema descriptor hash {descriptor_hash:016x}");

        db.descriptor_hash = Some(descriptor_hash);
        db.format_version = DATABASE_FORMAT_VERSION;
        db.rebuild_index();
        db.check_integrity().map_err(|errors| {
            GenerateError::Persist(DatabaseError::Corrupt {
                path: store.path().to_path_buf(),
                errors,
            })
        })?;
        store.save(&db).map_err(GenerateError::Persist)?;

        Ok(PassReport {
            classes: classes.len(),
            skipped,
            level_components,
            distance_components,
            new_ids: alloc.issued(),
            collisions,
            descriptor_hash,
            next_component_id: db.next_component_id,
            reset,
        })
    }

    /// Loaded classes plus resolved discovery candidates, filtered and in
    /// ascending path order. A path the source lists twice is kept twice so
    /// validation can reject it.
    fn discover(&self) -> Result<(Vec<TypeNode>, usize), GenerateError> {
        let mut candidates = self.source.classes()?;
        let loaded = candidates
            .iter()
            .map(|node| node.path.clone())
            .collect::<BTreeSet<_>>();

        if let Some(queue) = &self.discovery {
            for path in queue.drain() {
                if loaded.contains(&path) {
                    continue;
                }
                match self.source.resolve(&path) {
                    Some(node) => candidates.push(node),
                    None => warn!(%path, "could not resolve discovered candidate"),
                }
            }
        }
        candidates.sort_by(|a, b| a.path.cmp(&b.path));

        let filter = SupportFilter::new(self.config.generator.never_cook_dirs.clone());
        let mut skipped = 0;
        let classes = candidates
            .into_iter()
            .filter(|node| match filter.skip_reason(node) {
                Some(reason) => {
                    debug!(path = %node.path, %reason, "skipping unsupported class");
                    skipped += 1;
                    false
                }
                None => true,
            })
            .collect::<Vec<_>>();

        info!(classes = classes.len(), skipped, "discovered candidate classes");

        Ok((classes, skipped))
    }
}

// levels in a stable order, without duplicates
fn sorted_levels(mut levels: Vec<LevelAsset>) -> Vec<LevelAsset> {
    levels.sort();
    levels.dedup();
    levels
}
