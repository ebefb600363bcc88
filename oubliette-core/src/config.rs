//! Hot-reloadable JSON configuration for factions, archetypes, behavior
//! trees and quest templates.
//!
//! Config files live under `<root>/ai/`. Each file may be flat
//! (`{"guards": {...}}`) or wrapped in a section key
//! (`{"factions": {"guards": {...}}}`); both shapes decode identically.
//!
//! Hot reload is split across threads deliberately: the [`notify`] watcher
//! thread only forwards changed paths over a channel, and the game loop calls
//! [`ConfigStore::poll_reloads`] to drain them, debounce, and re-read files
//! synchronously. Config state is therefore only ever mutated on the caller's
//! thread.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{AiError, Result};

/// Minimum interval between reloads of the same file. Editors fire several
/// filesystem events per save; only the first one within this window counts.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The four AI config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    /// `ai/factions.json`
    Factions,
    /// `ai/archetypes.json`
    Archetypes,
    /// `ai/behavior_trees.json`
    BehaviorTrees,
    /// `ai/quest_templates.json`
    QuestTemplates,
}

impl ConfigSection {
    /// All sections, in load order.
    pub const ALL: [Self; 4] = [
        Self::Factions,
        Self::Archetypes,
        Self::BehaviorTrees,
        Self::QuestTemplates,
    ];

    /// File name under the `ai/` directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Factions => "factions.json",
            Self::Archetypes => "archetypes.json",
            Self::BehaviorTrees => "behavior_trees.json",
            Self::QuestTemplates => "quest_templates.json",
        }
    }

    /// Top-level key used by the wrapped document shape.
    #[must_use]
    pub fn wrapper_key(self) -> &'static str {
        match self {
            Self::Factions => "factions",
            Self::Archetypes => "archetypes",
            Self::BehaviorTrees => "behavior_trees",
            Self::QuestTemplates => "quest_templates",
        }
    }

    /// Path relative to the config root.
    #[must_use]
    pub fn rel_path(self) -> PathBuf {
        Path::new("ai").join(self.file_name())
    }

    fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.file_name() == name)
    }
}

// ---------------------------------------------------------------------------
// Typed definitions
// ---------------------------------------------------------------------------

/// A faction as defined in `factions.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionDef {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Flavor description.
    #[serde(default)]
    pub description: String,
    /// Stance toward other factions, each in `[-1, 1]`.
    #[serde(default)]
    pub relations: HashMap<String, f32>,
    /// Named zones the faction claims.
    #[serde(default)]
    pub territory: Vec<String>,
}

/// An AI archetype as defined in `archetypes.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchetypeDef {
    /// Personality trait overrides.
    #[serde(default)]
    pub personality: HashMap<String, f32>,
    /// Name of the behavior tree this archetype runs, if any.
    #[serde(default)]
    pub behavior_tree: Option<String>,
    /// Initial survival-need overrides.
    #[serde(default)]
    pub motivations: HashMap<String, f32>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Callback invoked after a config file is reloaded, with the file path and
/// the old and new raw documents.
pub type ReloadCallback = Box<dyn FnMut(&Path, &Value, &Value)>;

/// Loads, caches and hot-reloads the AI config files.
pub struct ConfigStore {
    root: PathBuf,
    factions: HashMap<String, FactionDef>,
    archetypes: HashMap<String, ArchetypeDef>,
    behavior_trees: Map<String, Value>,
    quest_templates: Map<String, Value>,
    raw: HashMap<ConfigSection, Value>,
    reload_callbacks: Vec<ReloadCallback>,
    last_reload: HashMap<ConfigSection, Instant>,
    watcher: Option<RecommendedWatcher>,
    changes: Option<Receiver<PathBuf>>,
}

impl ConfigStore {
    /// Create a store rooted at the given directory. Nothing is loaded yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            factions: HashMap::new(),
            archetypes: HashMap::new(),
            behavior_trees: Map::new(),
            quest_templates: Map::new(),
            raw: HashMap::new(),
            reload_callbacks: Vec::new(),
            last_reload: HashMap::new(),
            watcher: None,
            changes: None,
        }
    }

    /// The config root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load (or re-load) one config section from disk.
    ///
    /// # Errors
    ///
    /// [`AiError::ConfigNotFound`] if the file does not exist,
    /// [`AiError::ConfigIo`] if it cannot be read, and
    /// [`AiError::ConfigParse`] if it is not valid JSON or the entries do not
    /// decode.
    pub fn load_section(&mut self, section: ConfigSection) -> Result<()> {
        let rel = section.rel_path();
        let path = self.root.join(&rel);
        if !path.exists() {
            return Err(AiError::ConfigNotFound { path: rel });
        }
        let text = fs::read_to_string(&path).map_err(|source| AiError::ConfigIo {
            path: rel.clone(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text).map_err(|source| AiError::ConfigParse {
            path: rel.clone(),
            source,
        })?;
        let entries = unwrap_section(&document, section);

        match section {
            ConfigSection::Factions => {
                self.factions = decode_entries(&entries, &rel)?;
            }
            ConfigSection::Archetypes => {
                self.archetypes = decode_entries(&entries, &rel)?;
            }
            ConfigSection::BehaviorTrees => {
                self.behavior_trees = entries;
            }
            ConfigSection::QuestTemplates => {
                self.quest_templates = entries;
            }
        }
        self.raw.insert(section, document);
        debug!(file = %rel.display(), "loaded config section");
        Ok(())
    }

    /// Load every AI config section, logging and skipping files that are
    /// missing or malformed. Returns the number of sections loaded.
    pub fn load_all_ai_configs(&mut self) -> usize {
        let mut loaded = 0;
        for section in ConfigSection::ALL {
            match self.load_section(section) {
                Ok(()) => loaded += 1,
                Err(err) => {
                    warn!(file = section.file_name(), error = %err, "config section unavailable");
                }
            }
        }
        info!(loaded, total = ConfigSection::ALL.len(), "ai configs loaded");
        loaded
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Look up a faction definition.
    #[must_use]
    pub fn faction(&self, id: &str) -> Option<&FactionDef> {
        self.factions.get(id)
    }

    /// All loaded faction definitions.
    #[must_use]
    pub fn factions(&self) -> &HashMap<String, FactionDef> {
        &self.factions
    }

    /// Look up an archetype definition.
    #[must_use]
    pub fn archetype(&self, id: &str) -> Option<&ArchetypeDef> {
        self.archetypes.get(id)
    }

    /// All loaded archetype definitions.
    #[must_use]
    pub fn archetypes(&self) -> &HashMap<String, ArchetypeDef> {
        &self.archetypes
    }

    /// Raw JSON definition of a behavior tree.
    #[must_use]
    pub fn behavior_tree_def(&self, name: &str) -> Option<&Value> {
        self.behavior_trees.get(name)
    }

    /// Raw JSON definition of a quest template.
    #[must_use]
    pub fn quest_template(&self, name: &str) -> Option<&Value> {
        self.quest_templates.get(name)
    }

    /// All loaded quest template names.
    #[must_use]
    pub fn quest_template_names(&self) -> Vec<&str> {
        self.quest_templates.keys().map(String::as_str).collect()
    }

    // -----------------------------------------------------------------------
    // Hot reload
    // -----------------------------------------------------------------------

    /// Register a callback to run after any config file reloads.
    pub fn on_reload<F>(&mut self, callback: F)
    where
        F: FnMut(&Path, &Value, &Value) + 'static,
    {
        self.reload_callbacks.push(Box::new(callback));
    }

    /// Start watching the `ai/` directory for changes.
    ///
    /// The watcher thread only forwards changed paths over a channel; call
    /// [`Self::poll_reloads`] from the game loop to apply them.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Watch`] if the watcher cannot be created or the
    /// directory cannot be watched.
    pub fn watch(&mut self) -> Result<()> {
        let (tx, rx): (Sender<PathBuf>, Receiver<PathBuf>) = channel();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    for path in event.paths {
                        if path.extension().is_some_and(|ext| ext == "json") {
                            // Receiver dropped means the store is gone.
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(err) => error!(error = %err, "config watcher error"),
            }
        })?;
        let dir = self.root.join("ai");
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!(dir = %dir.display(), "watching ai config directory");
        self.watcher = Some(watcher);
        self.changes = Some(rx);
        Ok(())
    }

    /// Drain pending file-change notifications and reload the affected
    /// sections. Returns the number of sections actually reloaded.
    pub fn poll_reloads(&mut self) -> usize {
        let pending: Vec<PathBuf> = match &self.changes {
            Some(rx) => rx.try_iter().collect(),
            None => return 0,
        };
        let now = Instant::now();
        pending
            .into_iter()
            .filter(|path| self.process_change(path, now))
            .count()
    }

    /// Handle one changed path at the given instant. Split out from
    /// [`Self::poll_reloads`] so debouncing is testable without a watcher.
    pub(crate) fn process_change(&mut self, path: &Path, now: Instant) -> bool {
        let Some(section) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(ConfigSection::from_file_name)
        else {
            return false;
        };
        if let Some(last) = self.last_reload.get(&section) {
            if now.duration_since(*last) < RELOAD_DEBOUNCE {
                return false;
            }
        }
        self.last_reload.insert(section, now);

        let old = self.raw.get(&section).cloned().unwrap_or(Value::Null);
        match self.load_section(section) {
            Ok(()) => {
                let new = self.raw.get(&section).cloned().unwrap_or(Value::Null);
                let rel = section.rel_path();
                info!(file = %rel.display(), "config reloaded");
                for callback in &mut self.reload_callbacks {
                    callback(&rel, &old, &new);
                }
                true
            }
            Err(err) => {
                error!(file = section.file_name(), error = %err, "config reload failed");
                false
            }
        }
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("root", &self.root)
            .field("factions", &self.factions.len())
            .field("archetypes", &self.archetypes.len())
            .field("behavior_trees", &self.behavior_trees.len())
            .field("quest_templates", &self.quest_templates.len())
            .field("watching", &self.watcher.is_some())
            .finish_non_exhaustive()
    }
}

/// Accept both the flat and the wrapped document shape.
fn unwrap_section(document: &Value, section: ConfigSection) -> Map<String, Value> {
    let Some(object) = document.as_object() else {
        return Map::new();
    };
    if let Some(Value::Object(inner)) = object.get(section.wrapper_key()) {
        inner.clone()
    } else {
        object.clone()
    }
}

fn decode_entries<T: for<'de> Deserialize<'de>>(
    entries: &Map<String, Value>,
    rel: &Path,
) -> Result<HashMap<String, T>> {
    let mut out = HashMap::with_capacity(entries.len());
    for (id, value) in entries {
        let decoded = serde_json::from_value(value.clone()).map_err(|source| {
            AiError::ConfigParse {
                path: rel.to_path_buf(),
                source,
            }
        })?;
        out.insert(id.clone(), decoded);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn write_config(root: &Path, section: ConfigSection, body: &str) {
        let dir = root.join("ai");
        fs::create_dir_all(&dir).expect("create ai dir");
        fs::write(dir.join(section.file_name()), body).expect("write config");
    }

    #[test]
    fn loads_flat_and_wrapped_shapes() {
        let dir = TempDir::new().expect("tempdir");
        write_config(
            dir.path(),
            ConfigSection::Factions,
            r#"{"factions": {"guards": {"name": "City Guards", "relations": {"monsters": -0.8}}}}"#,
        );
        write_config(
            dir.path(),
            ConfigSection::Archetypes,
            r#"{"basic_monster": {"personality": {"aggression": 0.6}}}"#,
        );

        let mut store = ConfigStore::new(dir.path());
        store.load_section(ConfigSection::Factions).expect("factions");
        store
            .load_section(ConfigSection::Archetypes)
            .expect("archetypes");

        let guards = store.faction("guards").expect("guards");
        assert_eq!(guards.name, "City Guards");
        assert!((guards.relations["monsters"] + 0.8).abs() < f32::EPSILON);

        let monster = store.archetype("basic_monster").expect("archetype");
        assert!((monster.personality["aggression"] - 0.6).abs() < f32::EPSILON);
        assert!(monster.behavior_tree.is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        let err = store
            .load_section(ConfigSection::Factions)
            .expect_err("missing");
        assert!(matches!(err, AiError::ConfigNotFound { .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        write_config(dir.path(), ConfigSection::Factions, "{not json");
        let mut store = ConfigStore::new(dir.path());
        let err = store
            .load_section(ConfigSection::Factions)
            .expect_err("malformed");
        assert!(matches!(err, AiError::ConfigParse { .. }));
    }

    #[test]
    fn load_all_continues_past_missing_sections() {
        let dir = TempDir::new().expect("tempdir");
        write_config(dir.path(), ConfigSection::Archetypes, "{}");
        let mut store = ConfigStore::new(dir.path());
        assert_eq!(store.load_all_ai_configs(), 1);
    }

    #[test]
    fn reload_debounces_rapid_changes() {
        let dir = TempDir::new().expect("tempdir");
        write_config(dir.path(), ConfigSection::Factions, "{}");
        let mut store = ConfigStore::new(dir.path());
        let path = dir.path().join(ConfigSection::Factions.rel_path());

        let start = Instant::now();
        assert!(store.process_change(&path, start));
        assert!(!store.process_change(&path, start + Duration::from_millis(100)));
        assert!(store.process_change(&path, start + Duration::from_millis(600)));
    }

    #[test]
    fn reload_invokes_callbacks_with_old_and_new() {
        let dir = TempDir::new().expect("tempdir");
        write_config(
            dir.path(),
            ConfigSection::Factions,
            r#"{"guards": {"name": "Old Guard"}}"#,
        );
        let mut store = ConfigStore::new(dir.path());
        store.load_section(ConfigSection::Factions).expect("load");

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            store.on_reload(move |path, old, new| {
                seen.borrow_mut().push((
                    path.to_path_buf(),
                    old["guards"]["name"].clone(),
                    new["guards"]["name"].clone(),
                ));
            });
        }

        write_config(
            dir.path(),
            ConfigSection::Factions,
            r#"{"guards": {"name": "New Guard"}}"#,
        );
        let path = dir.path().join(ConfigSection::Factions.rel_path());
        assert!(store.process_change(&path, Instant::now() + RELOAD_DEBOUNCE));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, Value::String("Old Guard".to_string()));
        assert_eq!(seen[0].2, Value::String("New Guard".to_string()));
        assert_eq!(store.faction("guards").expect("guards").name, "New Guard");
    }

    #[test]
    fn unrelated_paths_are_ignored() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        assert!(!store.process_change(Path::new("ai/notes.json"), Instant::now()));
        assert!(!store.process_change(Path::new("ai/factions.txt"), Instant::now()));
    }
}
