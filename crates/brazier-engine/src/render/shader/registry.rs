use std::collections::HashMap;
use std::sync::Arc;

use super::{Preset, ShaderBackend, ShaderError, ShaderSource};

/// Stable index of a registered program.
///
/// Ids are never reused: programs are only ever added.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(u32);

impl ProgramId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Name → compiled program map with first-registration-wins semantics.
///
/// Invariants:
/// - at most one program per name
/// - a failed registration leaves the registry untouched
/// - re-registering an existing name is a successful no-op (no recompile)
pub struct ShaderRegistry<B: ShaderBackend> {
    backend: B,
    programs: Vec<(String, Arc<B::Program>)>,
    by_name: HashMap<String, ProgramId>,
}

impl<B: ShaderBackend> ShaderRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            programs: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Compiles and stores a program under `name`.
    ///
    /// Failures are logged with the shader name and diagnostic and returned;
    /// they are never fatal.
    pub fn register(&mut self, name: &str, source: &ShaderSource) -> Result<ProgramId, ShaderError> {
        if let Some(&id) = self.by_name.get(name) {
            log::debug!("shader `{name}` already registered");
            return Ok(id);
        }

        let program = match self.backend.compile(name, source) {
            Ok(p) => p,
            Err(err) => {
                log::warn!("{err}");
                return Err(err);
            }
        };

        let id = ProgramId(self.programs.len() as u32);
        self.programs.push((name.to_owned(), Arc::new(program)));
        self.by_name.insert(name.to_owned(), id);

        log::debug!("shader `{name}` registered");
        Ok(id)
    }

    /// Ensures every built-in preset is present. Returns how many were newly added.
    ///
    /// Names already taken (by an earlier call or a user program) are skipped.
    pub fn load_presets(&mut self) -> usize {
        let mut added = 0;
        for preset in Preset::ALL {
            if self.contains(preset.name()) {
                continue;
            }
            if self.register(preset.name(), &preset.source()).is_ok() {
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, name: &str) -> Option<Arc<B::Program>> {
        self.resolve(name).and_then(|id| self.programs.get(id.index())).map(|(_, p)| Arc::clone(p))
    }

    pub fn resolve(&self, name: &str) -> Option<ProgramId> {
        self.by_name.get(name).copied()
    }

    pub fn program(&self, id: ProgramId) -> Option<&B::Program> {
        self.programs.get(id.index()).map(|(_, p)| p.as_ref())
    }

    pub fn name_of(&self, id: ProgramId) -> Option<&str> {
        self.programs.get(id.index()).map(|(n, _)| n.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ShaderStage;

    /// Counts compiles; rejects any source containing `#fail`.
    #[derive(Default)]
    struct CountingBackend {
        compiles: usize,
    }

    impl ShaderBackend for CountingBackend {
        type Program = usize;

        fn compile(&mut self, name: &str, source: &ShaderSource) -> Result<usize, ShaderError> {
            if source.vertex.contains("#fail") {
                return Err(ShaderError::Compile {
                    name: name.to_owned(),
                    stage: ShaderStage::Vertex,
                    diagnostic: "forced".into(),
                });
            }
            self.compiles += 1;
            Ok(self.compiles)
        }
    }

    fn src(vertex: &'static str) -> ShaderSource {
        ShaderSource::new(vertex, "fs")
    }

    // ── register ──────────────────────────────────────────────────────────

    #[test]
    fn register_twice_keeps_first_program() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());

        let a = reg.register("glow", &src("vs")).unwrap();
        let first = reg.get("glow").unwrap();
        let b = reg.register("glow", &src("other vs")).unwrap();
        let second = reg.get("glow").unwrap();

        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reg.backend().compiles, 1);
    }

    #[test]
    fn failed_register_leaves_registry_unchanged() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());
        reg.register("ok", &src("vs")).unwrap();

        let err = reg.register("bad", &src("#fail")).unwrap_err();

        assert_eq!(err.name(), "bad");
        assert!(!reg.contains("bad"));
        assert_eq!(reg.len(), 1);
        assert!(reg.get("bad").is_none());
    }

    #[test]
    fn failed_name_can_be_registered_later() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());
        assert!(reg.register("late", &src("#fail")).is_err());
        assert!(reg.register("late", &src("vs")).is_ok());
        assert!(reg.contains("late"));
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn resolve_and_name_of_agree() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());
        let id = reg.register("a", &src("vs")).unwrap();
        reg.register("b", &src("vs")).unwrap();

        assert_eq!(reg.resolve("a"), Some(id));
        assert_eq!(reg.name_of(id), Some("a"));
        assert_eq!(reg.program(id), Some(&1));
        assert_eq!(reg.names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn unknown_name_is_absent() {
        let reg = ShaderRegistry::new(CountingBackend::default());
        assert!(reg.get("missing").is_none());
        assert!(reg.resolve("missing").is_none());
        assert!(reg.is_empty());
    }

    // ── presets ───────────────────────────────────────────────────────────

    #[test]
    fn load_presets_adds_all_then_nothing() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());
        assert_eq!(reg.load_presets(), Preset::ALL.len());
        assert_eq!(reg.load_presets(), 0);
        assert_eq!(reg.backend().compiles, Preset::ALL.len());
        for p in Preset::ALL {
            assert!(reg.contains(p.name()));
        }
    }

    #[test]
    fn load_presets_skips_user_program_with_preset_name() {
        let mut reg = ShaderRegistry::new(CountingBackend::default());
        let custom = reg.register("simple", &src("custom vs")).unwrap();

        assert_eq!(reg.load_presets(), Preset::ALL.len() - 1);
        assert_eq!(reg.resolve("simple"), Some(custom));
    }
}
