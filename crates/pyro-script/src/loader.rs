//! RON show loader

use crate::error::{Error, Result};
use crate::schema::{LaunchDef, ProgramDef, ShowDef};
use indexmap::IndexMap;
use log::{debug, info};
use pyro_core::{BehaviorGen, Compiler, SimConfig};
use std::fs;
use std::path::Path;

/// A loaded show
#[derive(Debug, Clone, Default)]
pub struct Show {
    /// Display name
    pub name: String,
    /// Simulator configuration
    pub config: SimConfig,
    /// Program definitions by ID, in load order
    pub programs: IndexMap<String, ProgramDef>,
    /// Launch schedule, in load order
    pub launches: Vec<LaunchDef>,
}

impl Show {
    /// Create an empty show
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a program definition
    pub fn get_program(&self, id: &str) -> Option<&ProgramDef> {
        self.programs.get(id)
    }

    /// Compile one program
    pub fn compile(&self, compiler: &Compiler, id: &str) -> Result<BehaviorGen> {
        let program = self
            .get_program(id)
            .ok_or_else(|| Error::UnknownProgram(id.to_string()))?;
        compiler
            .compile_program(&program.statements)
            .map_err(|source| Error::Compile {
                program: id.to_string(),
                source,
            })
    }

    /// Compile every program, failing on the first error
    pub fn compile_all(&self, compiler: &Compiler) -> Result<IndexMap<String, BehaviorGen>> {
        self.programs
            .keys()
            .map(|id| Ok((id.clone(), self.compile(compiler, id)?)))
            .collect()
    }
}

/// Loader for RON show files
pub struct Loader {
    show: Show,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self { show: Show::new() }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loading show file {:?}", path);
        self.load_str(&content)
    }

    /// Load a show from a RON string
    ///
    /// Programs accumulate across calls; a repeated program ID is an error.
    /// The first non-empty name is kept, and a later config replaces an
    /// earlier one.
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let def: ShowDef = ron::from_str(content)?;

        if self.show.name.is_empty() {
            self.show.name = def.name;
        }
        if let Some(config) = def.config {
            self.show.config = config;
        }
        for program in def.programs {
            let id = program.id.clone();
            if self.show.programs.contains_key(&id) {
                return Err(Error::DuplicateDefinition(id));
            }
            self.show.programs.insert(id, program);
        }
        self.show.launches.extend(def.launches);

        info!(
            "Show {:?}: {} programs, {} launches",
            self.show.name,
            self.show.programs.len(),
            self.show.launches.len()
        );
        Ok(())
    }

    /// Load all RON files from a directory, in file name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the show
    pub fn finish(self) -> Show {
        self.show
    }

    /// Get the show loaded so far
    pub fn show(&self) -> &Show {
        &self.show
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyro_core::Ast;

    const SHOW: &str = r#"
    (
        name: "test",
        config: Some((seed: 7, step: 0.5)),
        programs: [
            (
                id: "fade",
                description: "Fade out over a minute",
                statements: [
                    List([Number(60.0), Symbol("opacity"), Number(0.0)]),
                ],
            ),
            (
                id: "pop",
                statements: [Symbol("bloomVoice"), Symbol("close")],
            ),
        ],
        launches: [
            (program: "fade", at: (0.0, 10.0, 0.0)),
            (program: "pop", tick: 5),
        ],
    )
    "#;

    #[test]
    fn test_load_show() {
        let mut loader = Loader::new();
        loader.load_str(SHOW).unwrap();

        let show = loader.finish();
        assert_eq!(show.name, "test");
        assert_eq!(show.config.seed, 7);
        assert_eq!(show.config.step, 0.5);
        assert_eq!(show.config.continuation_limit, 100);
        assert_eq!(show.programs.len(), 2);
        assert_eq!(
            show.get_program("fade").unwrap().statements[0],
            Ast::list([Ast::num(60.0), Ast::sym("opacity"), Ast::num(0.0)])
        );
        assert_eq!(show.launches[0].at, (0.0, 10.0, 0.0));
        assert_eq!(show.launches[1].tick, 5);
    }

    #[test]
    fn test_duplicate_program() {
        let mut loader = Loader::new();
        loader.load_str(SHOW).unwrap();

        let extra = r#"(programs: [(id: "pop", statements: [Symbol("nop")])])"#;
        let result = loader.load_str(extra);
        assert!(matches!(result, Err(Error::DuplicateDefinition(id)) if id == "pop"));
    }

    #[test]
    fn test_partial_files_merge() {
        let mut loader = Loader::new();
        loader.load_str(r#"(config: Some((seed: 3)))"#).unwrap();
        loader
            .load_str(r#"(name: "merged", programs: [(id: "a", statements: [Symbol("nop")])])"#)
            .unwrap();

        let show = loader.finish();
        assert_eq!(show.name, "merged");
        assert_eq!(show.config.seed, 3);
        assert!(show.get_program("a").is_some());
        assert!(show.launches.is_empty());
    }

    #[test]
    fn test_compile() {
        let mut loader = Loader::new();
        loader.load_str(SHOW).unwrap();
        let show = loader.finish();
        let compiler = Compiler::new();

        let programs = show.compile_all(&compiler).unwrap();
        assert_eq!(programs.keys().collect::<Vec<_>>(), vec!["fade", "pop"]);

        assert!(matches!(
            show.compile(&compiler, "missing"),
            Err(Error::UnknownProgram(_))
        ));
    }

    #[test]
    fn test_compile_error_names_program() {
        let mut loader = Loader::new();
        loader
            .load_str(r#"(programs: [(id: "bad", statements: [List([Symbol("translate"), Number(1.0)])])])"#)
            .unwrap();
        let show = loader.finish();

        let err = show.compile(&Compiler::new(), "bad").unwrap_err();
        assert!(matches!(
            &err,
            Error::Compile { program, source: pyro_core::Error::ArityMismatch { .. } } if program == "bad"
        ));
        assert!(err.to_string().starts_with("Program bad failed to compile"));
    }

    #[test]
    fn test_invalid_ron() {
        let mut loader = Loader::new();
        assert!(matches!(loader.load_str("(programs: ["), Err(Error::Ron(_))));
    }

    fn program_file(name: &str, id: &str) -> String {
        format!(r#"(name: "{}", programs: [(id: "{}", statements: [Symbol("nop")])])"#, name, id)
    }

    #[test]
    fn test_load_directory_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ron"), program_file("second", "b")).unwrap();
        fs::write(dir.path().join("a.ron"), program_file("first", "a")).unwrap();
        fs::write(dir.path().join("skip.txt"), "not ron at all").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.ron"), program_file("third", "c")).unwrap();

        let mut loader = Loader::new();
        loader.load_directory(dir.path()).unwrap();
        let show = loader.finish();

        assert_eq!(show.name, "first");
        assert_eq!(show.programs.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.ron"), program_file("show", "burst")).unwrap();
        fs::write(dir.path().join("two.ron"), program_file("show", "burst")).unwrap();

        let mut loader = Loader::new();
        let result = loader.load_directory(dir.path());
        assert!(matches!(result, Err(Error::DuplicateDefinition(id)) if id == "burst"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.ron");
        fs::write(&path, SHOW).unwrap();

        let mut loader = Loader::new();
        loader.load_file(&path).unwrap();
        assert_eq!(loader.show().programs.len(), 2);

        let missing = dir.path().join("missing.ron");
        assert!(matches!(loader.load_file(&missing), Err(Error::Io(_))));
        assert!(matches!(loader.load_directory(&path), Err(Error::Io(_))));
    }
}
