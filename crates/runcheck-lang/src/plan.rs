//! Compile and run invocations for one source file.

use std::env::consts::EXE_SUFFIX;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::error::{LangError, LangResult};
use crate::language::Language;

/// Programs used to build and run a language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler executable; `None` for interpreted languages.
    pub compiler: Option<String>,
    /// Runtime executable for languages that are not run as native binaries.
    pub runtime: Option<String>,
    /// Extra arguments placed right after the compiler subcommand.
    pub compile_flags: Vec<String>,
}

impl Toolchain {
    pub fn default_for(language: Language) -> Self {
        let (compiler, runtime) = match language {
            Language::Go => (Some("go"), None),
            Language::C => (Some("gcc"), None),
            Language::Cpp => (Some("g++"), None),
            Language::Rust => (Some("rustc"), None),
            Language::Java => (Some("javac"), Some("java")),
            Language::Python => (None, Some("python3")),
        };
        Self {
            compiler: compiler.map(String::from),
            runtime: runtime.map(String::from),
            compile_flags: Vec::new(),
        }
    }
}

/// A program and its arguments, ready to become a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Everything needed to build, run, and clean up one source file.
#[derive(Clone, Debug)]
pub struct BuildPlan {
    language: Language,
    source: PathBuf,
    build_dir: PathBuf,
    base_name: String,
    compiler: Option<String>,
    runtime: Option<String>,
    compile_flags: Vec<String>,
}

impl BuildPlan {
    /// Resolve the programs a language needs from `toolchain`.
    pub fn new(
        language: Language,
        source: &Path,
        build_dir: &Path,
        toolchain: Toolchain,
    ) -> LangResult<Self> {
        let base_name = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LangError::InvalidSource(source.to_path_buf()))?;

        if language.is_compiled() && toolchain.compiler.is_none() {
            return Err(LangError::MissingProgram { language, role: "compiler" });
        }
        if matches!(language, Language::Java | Language::Python) && toolchain.runtime.is_none() {
            return Err(LangError::MissingProgram { language, role: "runtime" });
        }

        let plan = Self {
            language,
            source: source.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            base_name,
            compiler: toolchain.compiler,
            runtime: toolchain.runtime,
            compile_flags: toolchain.compile_flags,
        };

        // An extensionless source built next to itself would be overwritten
        // by the compiler and then deleted by cleanup.
        if let Some(output) = plan.primary_artifact() {
            if same_file(&output, source) {
                return Err(LangError::ArtifactIsSource(output));
            }
        }
        Ok(plan)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Source file name without its extension; also the Java class name.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Where native compilers write the executable.
    pub fn binary_path(&self) -> PathBuf {
        self.build_dir.join(format!("{}{}", self.base_name, EXE_SUFFIX))
    }

    /// The build invocation, or `None` when the language runs from source.
    pub fn compile_command(&self) -> Option<CommandSpec> {
        let compiler = self.compiler.as_deref()?;
        let spec = match self.language {
            Language::Go => CommandSpec::new(compiler)
                .arg("build")
                .args(&self.compile_flags)
                .arg("-o")
                .arg(self.binary_path())
                .arg(&self.source),
            Language::C | Language::Cpp | Language::Rust => CommandSpec::new(compiler)
                .args(&self.compile_flags)
                .arg("-o")
                .arg(self.binary_path())
                .arg(&self.source),
            Language::Java => CommandSpec::new(compiler)
                .args(&self.compile_flags)
                .arg("-d")
                .arg(&self.build_dir)
                .arg(&self.source),
            Language::Python => return None,
        };
        Some(spec)
    }

    /// The execution invocation.
    pub fn run_command(&self) -> CommandSpec {
        match (self.language, self.runtime.as_deref()) {
            (Language::Java, Some(java)) => CommandSpec::new(java)
                .arg("-cp")
                .arg(&self.build_dir)
                .arg(&self.base_name),
            (Language::Python, Some(python)) => CommandSpec::new(python).arg(&self.source),
            _ => CommandSpec::new(self.binary_path()),
        }
    }

    /// The file the compiler is asked to produce.
    fn primary_artifact(&self) -> Option<PathBuf> {
        match self.language {
            Language::Go | Language::C | Language::Cpp | Language::Rust => Some(self.binary_path()),
            Language::Java => Some(self.build_dir.join(format!("{}.class", self.base_name))),
            Language::Python => None,
        }
    }

    /// Files the build step leaves behind.
    ///
    /// For Java this also lists the nested and anonymous classes
    /// (`<Base>$*.class`) currently present in the build directory.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.primary_artifact().into_iter().collect();
        if self.language != Language::Java {
            return files;
        }

        let prefix = format!("{}$", self.base_name);
        if let Ok(entries) = fs::read_dir(&self.build_dir) {
            let mut nested: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".class"))
                })
                .collect();
            nested.sort();
            files.extend(nested);
        }
        files
    }
}

/// Whether two paths name the same file.
///
/// `.` components are ignored and the parent directory is canonicalized
/// when it exists, so `./sol` and `sol` compare equal, as do paths reached
/// through a symlinked directory. The files themselves need not exist.
pub fn same_file(a: &Path, b: &Path) -> bool {
    resolve(a) == resolve(b)
}

fn resolve(path: &Path) -> PathBuf {
    let lexical: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let Some(name) = lexical.file_name() else {
        return lexical;
    };
    let parent = match lexical.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match fs::canonicalize(parent) {
        Ok(dir) => dir.join(name),
        Err(_) => lexical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(lang: Language, source: &str) -> BuildPlan {
        BuildPlan::new(lang, Path::new(source), Path::new("build"), Toolchain::default_for(lang))
            .unwrap()
    }

    fn bin(name: &str) -> String {
        Path::new("build")
            .join(format!("{name}{EXE_SUFFIX}"))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn go_build_and_run() {
        let p = plan(Language::Go, "src/sol.go");
        assert_eq!(p.base_name(), "sol");
        let compile = p.compile_command().unwrap();
        assert_eq!(compile.to_string(), format!("go build -o {} src/sol.go", bin("sol")));
        assert_eq!(p.run_command().to_string(), bin("sol"));
        assert_eq!(p.artifacts(), vec![p.binary_path()]);
    }

    #[test]
    fn cpp_uses_gpp() {
        let p = plan(Language::Cpp, "a.cpp");
        assert_eq!(
            p.compile_command().unwrap().to_string(),
            format!("g++ -o {} a.cpp", bin("a"))
        );
    }

    #[test]
    fn c_uses_gcc() {
        let p = plan(Language::C, "a.c");
        assert_eq!(p.compile_command().unwrap().program, OsString::from("gcc"));
    }

    #[test]
    fn rust_uses_rustc() {
        let p = plan(Language::Rust, "main.rs");
        assert_eq!(
            p.compile_command().unwrap().to_string(),
            format!("rustc -o {} main.rs", bin("main"))
        );
    }

    #[test]
    fn java_compiles_into_build_dir_and_runs_class() {
        let p = plan(Language::Java, "Main.java");
        assert_eq!(p.compile_command().unwrap().to_string(), "javac -d build Main.java");
        assert_eq!(p.run_command().to_string(), "java -cp build Main");
        assert_eq!(p.artifacts(), vec![Path::new("build").join("Main.class")]);
    }

    #[test]
    fn python_has_no_build_step() {
        let p = plan(Language::Python, "solve.py");
        assert!(p.compile_command().is_none());
        assert_eq!(p.run_command().to_string(), "python3 solve.py");
        assert!(p.artifacts().is_empty());
    }

    #[test]
    fn compile_flags_follow_the_compiler() {
        let toolchain = Toolchain {
            compiler: Some("clang++".into()),
            runtime: None,
            compile_flags: vec!["-O2".into(), "-std=c++17".into()],
        };
        let p = BuildPlan::new(Language::Cpp, Path::new("a.cpp"), Path::new("build"), toolchain)
            .unwrap();
        assert_eq!(
            p.compile_command().unwrap().to_string(),
            format!("clang++ -O2 -std=c++17 -o {} a.cpp", bin("a"))
        );
    }

    #[test]
    fn go_flags_follow_build_subcommand() {
        let toolchain = Toolchain {
            compile_flags: vec!["-trimpath".into()],
            ..Toolchain::default_for(Language::Go)
        };
        let p = BuildPlan::new(Language::Go, Path::new("a.go"), Path::new("build"), toolchain)
            .unwrap();
        let args = p.compile_command().unwrap().args;
        assert_eq!(args[0], OsString::from("build"));
        assert_eq!(args[1], OsString::from("-trimpath"));
    }

    #[test]
    fn missing_compiler_is_rejected() {
        let toolchain = Toolchain { compiler: None, runtime: None, compile_flags: vec![] };
        let err = BuildPlan::new(Language::Rust, Path::new("a.rs"), Path::new("."), toolchain)
            .unwrap_err();
        assert!(matches!(err, LangError::MissingProgram { role: "compiler", .. }));
    }

    #[test]
    fn missing_runtime_is_rejected() {
        let toolchain = Toolchain { compiler: None, runtime: None, compile_flags: vec![] };
        let err = BuildPlan::new(Language::Python, Path::new("a.py"), Path::new("."), toolchain)
            .unwrap_err();
        assert!(matches!(err, LangError::MissingProgram { role: "runtime", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn extensionless_source_in_build_dir_is_rejected() {
        let err = BuildPlan::new(
            Language::C,
            Path::new("work/sol"),
            Path::new("work"),
            Toolchain::default_for(Language::C),
        )
        .unwrap_err();
        assert!(matches!(err, LangError::ArtifactIsSource(p) if p == Path::new("work/sol")));
    }

    #[cfg(unix)]
    #[test]
    fn current_dir_spellings_are_the_same_file() {
        let err = BuildPlan::new(
            Language::Rust,
            Path::new("sol"),
            Path::new("."),
            Toolchain::default_for(Language::Rust),
        )
        .unwrap_err();
        assert!(matches!(err, LangError::ArtifactIsSource(_)));
    }

    #[test]
    fn class_file_named_source_is_rejected() {
        let err = BuildPlan::new(
            Language::Java,
            Path::new("build/Main.class"),
            Path::new("build"),
            Toolchain::default_for(Language::Java),
        )
        .unwrap_err();
        assert!(matches!(err, LangError::ArtifactIsSource(_)));
    }

    #[test]
    fn same_file_resolves_through_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        fs::create_dir(&nested).unwrap();

        assert!(same_file(&nested.join("x"), &dir.path().join("a/./x")));
        assert!(same_file(&nested.join("x"), &nested.join("..").join("a").join("x")));
        assert!(!same_file(&nested.join("x"), &dir.path().join("x")));
    }

    #[test]
    fn java_artifacts_include_nested_classes() {
        let dir = tempfile::tempdir().unwrap();
        let names = [
            "Main.class",
            "Main$1.class",
            "Main$Inner.class",
            "MainHelper.class",
            "Other.class",
        ];
        for name in names {
            fs::write(dir.path().join(name), b"cafebabe").unwrap();
        }
        let p = BuildPlan::new(
            Language::Java,
            Path::new("Main.java"),
            dir.path(),
            Toolchain::default_for(Language::Java),
        )
        .unwrap();

        let names: Vec<String> = p
            .artifacts()
            .iter()
            .map(|a| a.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Main.class", "Main$1.class", "Main$Inner.class"]);
    }

    #[test]
    fn default_build_dir_runs_relative_binary() {
        let p = BuildPlan::new(
            Language::C,
            Path::new("x.c"),
            Path::new("."),
            Toolchain::default_for(Language::C),
        )
        .unwrap();
        assert_eq!(p.binary_path(), Path::new(".").join(format!("x{EXE_SUFFIX}")));
    }
}
