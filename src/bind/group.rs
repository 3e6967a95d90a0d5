//! BindGroup: a named, ordered collection of binds
//!
//! The group owns registration and combo edits so it can keep its one
//! invariant: no two binds ever hold conflicting combos. Every mutating
//! operation either applies fully or leaves the group untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::bind::Bind;
use super::combo;
use super::control::ControlRegistry;
use super::error::{BindError, Result};
use super::types::{combos_conflict, BindId, Combo, ControlId};

/// Boundary record for persistence: a bind name and its combo as control names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindDefinition {
    pub name: String,
    #[serde(default)]
    pub combo: Vec<String>,
}

impl BindDefinition {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, combo: &[S]) -> Self {
        Self {
            name: name.into(),
            combo: combo.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    /// A definition with no controls
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            combo: Vec::new(),
        }
    }
}

/// Outcome of a best-effort [`BindGroup::load_bind_data`] batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Binds whose combo was set, in input order
    pub updated: Vec<BindId>,
    /// Entries that were skipped, with the bind name they referred to
    pub errors: Vec<(String, BindError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One entry of a `load_bind_data` batch that passed the per-entry checks
struct Staged {
    /// Position in the input batch
    pos: usize,
    id: BindId,
    combo: Combo,
    analog: bool,
}

fn combo_is_analog(controls: &ControlRegistry, combo: &[ControlId]) -> bool {
    combo
        .iter()
        .any(|&id| controls.get(id).is_ok_and(|c| c.is_analog()))
}

/// A named collection of binds, updated together once per tick
#[derive(Debug)]
pub struct BindGroup {
    name: String,
    binds: Vec<Bind>,
    /// Lowercased bind name -> index
    lookup: HashMap<String, BindId>,
    tick: u64,
    hold_ticks: u64,
}

impl BindGroup {
    /// Create an empty group. `hold_ticks` is the press duration after which
    /// `is_pressed_and_held` turns back on.
    pub fn new(name: impl Into<String>, hold_ticks: u64) -> Self {
        Self {
            name: name.into(),
            binds: Vec::new(),
            lookup: HashMap::new(),
            tick: 0,
            hold_ticks: hold_ticks.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Number of ticks handled so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn hold_ticks(&self) -> u64 {
        self.hold_ticks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bind> {
        self.binds.iter()
    }

    pub fn get(&self, id: BindId) -> Option<&Bind> {
        self.binds.get(id.0)
    }

    pub fn get_mut(&mut self, id: BindId) -> Option<&mut Bind> {
        self.binds.get_mut(id.0)
    }

    /// Look up a bind by name (case-insensitive)
    pub fn bind(&self, name: &str) -> Option<&Bind> {
        let id = self.id_of(name)?;
        self.binds.get(id.0)
    }

    pub fn bind_mut(&mut self, name: &str) -> Option<&mut Bind> {
        let id = self.id_of(name)?;
        self.binds.get_mut(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<BindId> {
        self.lookup.get(&name.to_lowercase()).copied()
    }

    pub fn does_bind_exist(&self, name: &str) -> bool {
        self.id_of(name).is_some()
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register a new bind at the end of the group.
    ///
    /// `silent` only suppresses the user-facing diagnostic; the result is the same.
    pub fn register_bind(
        &mut self,
        name: &str,
        combo: &[ControlId],
        controls: &ControlRegistry,
        silent: bool,
    ) -> Result<BindId> {
        let result = self.try_register(name, combo, controls);
        self.report(name, &result, silent);
        result
    }

    /// Register a new bind whose combo is given as control names
    pub fn register_bind_with_names<S: AsRef<str>>(
        &mut self,
        name: &str,
        combo_names: &[S],
        controls: &ControlRegistry,
        silent: bool,
    ) -> Result<BindId> {
        let result = combo::decode(controls, combo_names)
            .and_then(|combo| self.try_register(name, &combo, controls));
        self.report(name, &result, silent);
        result
    }

    /// Register a batch of unbound binds. All-or-nothing.
    pub fn register_binds<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<BindId>> {
        let start = self.binds.len();
        let mut added = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            if self.does_bind_exist(name) {
                self.truncate(start);
                let result = Err(BindError::NameConflict(name.to_string()));
                self.report(name, &result, false);
                return result;
            }
            added.push(self.push_bind(name, Combo::new(), false));
        }

        Ok(added)
    }

    /// Register a batch of binds with their combos. All-or-nothing: on the
    /// first failure every bind added by this call is removed again.
    pub fn register_definitions(
        &mut self,
        defs: &[BindDefinition],
        controls: &ControlRegistry,
    ) -> Result<Vec<BindId>> {
        let start = self.binds.len();
        let mut added = Vec::with_capacity(defs.len());

        for def in defs {
            match self.register_bind_with_names(&def.name, &def.combo, controls, false) {
                Ok(id) => added.push(id),
                Err(err) => {
                    self.truncate(start);
                    return Err(err);
                }
            }
        }

        Ok(added)
    }

    fn try_register(
        &mut self,
        name: &str,
        combo: &[ControlId],
        controls: &ControlRegistry,
    ) -> Result<BindId> {
        let key = name.to_lowercase();
        if self.lookup.contains_key(&key) {
            return Err(BindError::NameConflict(name.to_string()));
        }
        let (combo, analog) = self.check_combo(combo, None, controls)?;
        Ok(self.push_bind(name, combo, analog))
    }

    fn push_bind(&mut self, name: &str, combo: Combo, analog: bool) -> BindId {
        let id = BindId(self.binds.len());
        self.binds
            .push(Bind::new(name.to_string(), id, combo, analog));
        self.lookup.insert(name.to_lowercase(), id);
        tracing::debug!(group = %self.name, bind = name, index = id.0, "registered bind");
        id
    }

    fn truncate(&mut self, len: usize) {
        for bind in self.binds.drain(len..) {
            self.lookup.remove(&bind.name().to_lowercase());
        }
    }

    // ------------------------------------------------------------------------
    // Conflicts and combo edits
    // ------------------------------------------------------------------------

    /// Check whether `candidate` is ambiguous with any bind other than `except`
    pub fn does_combo_conflict(&self, candidate: &[ControlId], except: Option<BindId>) -> bool {
        self.find_conflict(candidate, except).is_some()
    }

    /// First bind (other than `except`) whose combo conflicts with `candidate`
    pub fn find_conflict(&self, candidate: &[ControlId], except: Option<BindId>) -> Option<BindId> {
        self.binds
            .iter()
            .filter(|b| Some(b.index()) != except)
            .find(|b| combos_conflict(candidate, b.combo()))
            .map(Bind::index)
    }

    /// Validate a combo for bind `except` (or a new bind) and return the
    /// committed form plus its analog flag
    fn check_combo(
        &self,
        candidate: &[ControlId],
        except: Option<BindId>,
        controls: &ControlRegistry,
    ) -> Result<(Combo, bool)> {
        combo::validate(controls, candidate)?;

        if let Some(existing) = self.find_conflict(candidate, except) {
            return Err(BindError::ComboConflict {
                existing: self.binds[existing.0].name().to_string(),
            });
        }

        Ok((
            candidate.iter().copied().collect(),
            combo_is_analog(controls, candidate),
        ))
    }

    /// Set a bind's combo. Commits only if the combo is valid and conflict-free;
    /// never fires events.
    pub fn try_set_combo(
        &mut self,
        id: BindId,
        combo: &[ControlId],
        controls: &ControlRegistry,
        silent: bool,
    ) -> Result<()> {
        let result = self.set_combo_inner(id, combo, controls);
        let name = self.bind_name(id);
        self.report(&name, &result, silent);
        result
    }

    /// Set a bind's combo from control names. A failed decode leaves the
    /// existing combo untouched.
    pub fn try_set_combo_names<S: AsRef<str>>(
        &mut self,
        id: BindId,
        combo_names: &[S],
        controls: &ControlRegistry,
        silent: bool,
    ) -> Result<()> {
        let result = combo::decode(controls, combo_names)
            .and_then(|combo| self.set_combo_inner(id, &combo, controls));
        let name = self.bind_name(id);
        self.report(&name, &result, silent);
        result
    }

    fn set_combo_inner(
        &mut self,
        id: BindId,
        combo: &[ControlId],
        controls: &ControlRegistry,
    ) -> Result<()> {
        if id.0 >= self.binds.len() {
            return Err(BindError::UnknownBindName(id.0.to_string()));
        }
        let (combo, analog) = self.check_combo(combo, Some(id), controls)?;
        self.binds[id.0].replace_combo(combo, analog);
        Ok(())
    }

    /// Remove every control from a bind's combo
    pub fn clear_combo(&mut self, id: BindId) {
        if let Some(bind) = self.binds.get_mut(id.0) {
            bind.clear_combo();
        }
    }

    pub fn clear_combos(&mut self) {
        for bind in &mut self.binds {
            bind.clear_combo();
        }
    }

    pub fn clear_subscribers(&mut self) {
        for bind in &mut self.binds {
            bind.clear_subscribers();
        }
    }

    fn bind_name(&self, id: BindId) -> String {
        self.binds
            .get(id.0)
            .map(|b| b.name().to_string())
            .unwrap_or_else(|| id.0.to_string())
    }

    fn report<T>(&self, bind: &str, result: &Result<T>, silent: bool) {
        let Err(err) = result else {
            return;
        };
        if silent {
            tracing::debug!(group = %self.name, bind, "{}", err);
        } else {
            tracing::warn!(
                target: "bindkit::diagnostics",
                group = %self.name,
                bind,
                "{}",
                err
            );
        }
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance one tick: recompute and dispatch every bind in registration order.
    ///
    /// Must run exactly once per host tick on the thread that owns the group.
    pub fn handle_input(&mut self, controls: &ControlRegistry) {
        self.tick += 1;
        for bind in &mut self.binds {
            bind.update(self.tick, self.hold_ticks, controls);
        }
    }

    // ------------------------------------------------------------------------
    // Bulk load / dump
    // ------------------------------------------------------------------------

    /// Apply a batch of definitions, best effort.
    ///
    /// Conflicts are judged against the state the batch describes: binds the
    /// batch doesn't touch keep their combos, and each entry must fit beside
    /// those and the entries accepted before it. A dump therefore loads back
    /// cleanly even after binds were swapped or shifted in between.
    ///
    /// Failing entries (unknown bind, bad combo, conflict) are recorded in the
    /// report and skipped; their binds keep the combo they had. If a bind
    /// appears more than once, its last well-formed entry counts.
    pub fn load_bind_data(
        &mut self,
        defs: &[BindDefinition],
        controls: &ControlRegistry,
    ) -> LoadReport {
        let mut errors: Vec<(usize, BindError)> = Vec::new();
        let mut staged: Vec<Staged> = Vec::with_capacity(defs.len());

        for (pos, def) in defs.iter().enumerate() {
            match self.stage(def, controls) {
                Ok((id, combo)) => {
                    staged.retain(|s| s.id != id);
                    let analog = combo_is_analog(controls, &combo);
                    staged.push(Staged {
                        pos,
                        id,
                        combo,
                        analog,
                    });
                }
                Err(err) => errors.push((pos, err)),
            }
        }

        // A rejected entry leaves its bind on the old combo, which may clash
        // with entries accepted before it, so settle again until nothing moves.
        'settle: loop {
            for i in 0..staged.len() {
                if let Some(existing) = self.staged_conflict(&staged, i) {
                    let rejected = staged.remove(i);
                    errors.push((rejected.pos, BindError::ComboConflict { existing }));
                    continue 'settle;
                }
            }
            break;
        }

        errors.sort_by_key(|(pos, _)| *pos);
        let mut report = LoadReport::default();
        for (pos, err) in errors {
            let name = &defs[pos].name;
            self.report(name, &Err::<(), _>(err.clone()), false);
            report.errors.push((name.clone(), err));
        }
        for entry in staged {
            self.binds[entry.id.0].replace_combo(entry.combo, entry.analog);
            report.updated.push(entry.id);
        }

        tracing::debug!(
            group = %self.name,
            updated = report.updated.len(),
            skipped = report.errors.len(),
            "loaded bind data"
        );
        report
    }

    /// Resolve one entry to its bind and a well-formed combo, without looking
    /// at conflicts
    fn stage(&self, def: &BindDefinition, controls: &ControlRegistry) -> Result<(BindId, Combo)> {
        let id = self
            .id_of(&def.name)
            .ok_or_else(|| BindError::UnknownBindName(def.name.clone()))?;
        let combo = combo::decode(controls, &def.combo)?;
        combo::validate(controls, &combo)?;
        Ok((id, combo))
    }

    /// Name of the bind that `staged[i]` would conflict with: one the batch
    /// leaves alone, or an entry staged before it
    fn staged_conflict(&self, staged: &[Staged], i: usize) -> Option<String> {
        let entry = &staged[i];
        let untouched = self
            .binds
            .iter()
            .filter(|b| !staged.iter().any(|s| s.id == b.index()))
            .find(|b| combos_conflict(&entry.combo, b.combo()))
            .map(|b| b.name().to_string());

        untouched.or_else(|| {
            staged[..i]
                .iter()
                .find(|s| combos_conflict(&entry.combo, &s.combo))
                .map(|s| self.binds[s.id.0].name().to_string())
        })
    }

    /// Every bind's current combo as control names, in registration order
    pub fn dump_bind_data(&self, controls: &ControlRegistry) -> Vec<BindDefinition> {
        self.binds
            .iter()
            .map(|bind| BindDefinition {
                name: bind.name().to_string(),
                combo: combo::encode(controls, bind.combo()).unwrap_or_default(),
            })
            .collect()
    }
}
