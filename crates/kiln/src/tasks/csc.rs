//! The `<csc>` C# compiler task.
//!
//! Only the compiler configuration is bound here. A consumer that launches
//! the compiler writes [`CscTask::response_file_lines`] to a response file.

use std::path::{Path, PathBuf};

use kiln_binder::{
    Describer, Element, ElementKind, coerce::AttributeEnum, validate::IntRangeValidator,
};
use kiln_core::ElementMeta;

use super::TaskSettings;
use crate::types::{Arg, FileSet, Resource};

/// Kind of output the compiler produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetKind {
    #[default]
    Exe,
    WinExe,
    Library,
    Module,
}

impl AttributeEnum for TargetKind {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("exe", Self::Exe),
        ("winexe", Self::WinExe),
        ("library", Self::Library),
        ("module", Self::Module),
    ];
}

/// Processor architecture the output runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    AnyCpu,
    X86,
    X64,
    Itanium,
}

impl AttributeEnum for Platform {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("anycpu", Self::AnyCpu),
        ("x86", Self::X86),
        ("x64", Self::X64),
        ("itanium", Self::Itanium),
    ];
}

#[derive(Debug, Default)]
pub struct CscTask {
    meta: ElementMeta,
    settings: TaskSettings,
    output: PathBuf,
    target: TargetKind,
    debug: bool,
    optimize: bool,
    warnlevel: Option<u8>,
    warnaserror: bool,
    unsafe_code: bool,
    define: Option<String>,
    main: Option<String>,
    doc: Option<PathBuf>,
    platform: Option<Platform>,
    sources: FileSet,
    references: FileSet,
    args: Vec<Arg>,
    resources: Vec<Resource>,
}

impl CscTask {
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn optimize(&self) -> bool {
        self.optimize
    }

    pub fn warn_level(&self) -> Option<u8> {
        self.warnlevel
    }

    /// Conditional compilation symbols, split on `;` and `,`.
    pub fn defines(&self) -> Vec<&str> {
        self.define
            .as_deref()
            .map(|define| {
                define
                    .split([';', ','])
                    .map(str::trim)
                    .filter(|symbol| !symbol.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn sources(&self) -> &FileSet {
        &self.sources
    }

    pub fn references(&self) -> &FileSet {
        &self.references
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    /// Compiler switches followed by the source files, one per line.
    pub fn response_file_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("/target:{}", self.target.name()),
            format!("/out:{}", quote(&self.output)),
        ];
        if self.debug {
            lines.push("/debug".to_string());
        }
        if self.optimize {
            lines.push("/optimize+".to_string());
        }
        if let Some(level) = self.warnlevel {
            lines.push(format!("/warn:{level}"));
        }
        if self.warnaserror {
            lines.push("/warnaserror+".to_string());
        }
        if self.unsafe_code {
            lines.push("/unsafe".to_string());
        }
        let defines = self.defines();
        if !defines.is_empty() {
            lines.push(format!("/define:{}", defines.join(";")));
        }
        if let Some(main) = &self.main {
            lines.push(format!("/main:{main}"));
        }
        if let Some(doc) = &self.doc {
            lines.push(format!("/doc:{}", quote(doc)));
        }
        if let Some(platform) = self.platform {
            lines.push(format!("/platform:{}", platform.name()));
        }
        for reference in self.references.include_paths() {
            lines.push(format!("/reference:{}", quote(&reference)));
        }
        for resource in &self.resources {
            let line = match resource.name() {
                Some(name) => format!("/resource:{},{name}", quote(resource.file())),
                None => format!("/resource:{}", quote(resource.file())),
            };
            lines.push(line);
        }
        lines.extend(self.args.iter().flat_map(Arg::parts));
        lines.extend(self.sources.include_paths().iter().map(|s| quote(s)));
        lines
    }
}

/// Quote a path for a response file if it contains whitespace.
fn quote(path: &Path) -> String {
    let text = path.display().to_string();
    if text.contains(char::is_whitespace) {
        format!("\"{text}\"")
    } else {
        text
    }
}

impl Element for CscTask {
    const NAME: &'static str = "csc";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("output", "output", |c: &mut Self, v: PathBuf| c.output = v)
            .required()
            .non_empty();
        d.enumeration("target", "target", |c: &mut Self, v: TargetKind| c.target = v);
        d.attribute("debug", "debug", |c: &mut Self, v: bool| c.debug = v);
        d.attribute("optimize", "optimize", |c: &mut Self, v: bool| c.optimize = v);
        d.attribute("warnlevel", "warnlevel", |c: &mut Self, v: u8| c.warnlevel = Some(v))
            .validator(IntRangeValidator::new(0, 4));
        d.attribute("warnaserror", "warnaserror", |c: &mut Self, v: bool| c.warnaserror = v);
        d.attribute("unsafe_code", "unsafe", |c: &mut Self, v: bool| c.unsafe_code = v);
        d.attribute("define", "define", |c: &mut Self, v: String| c.define = Some(v));
        d.attribute("main", "main", |c: &mut Self, v: String| c.main = Some(v));
        d.attribute("doc", "doc", |c: &mut Self, v: PathBuf| c.doc = Some(v));
        d.enumeration("platform", "platform", |c: &mut Self, v: Platform| {
            c.platform = Some(v)
        });
        TaskSettings::describe(d, |c| &mut c.settings);

        d.element("sources", "sources", |c: &mut Self| Some(&mut c.sources))
            .required();
        d.element("references", "references", |c: &mut Self| Some(&mut c.references));
        d.array("args", "arg", |c: &mut Self, v: Vec<Arg>| c.args = v);
        d.collection("resources", "resources", "resource", |c: &mut Self, v: Vec<Resource>| {
            c.resources = v
        });
    }

    fn initialize(&mut self) -> Result<(), String> {
        if self.sources.is_empty() {
            return Err("<sources> must include at least one file".to_string());
        }
        if self.main.is_some() && matches!(self.target, TargetKind::Library | TargetKind::Module) {
            return Err(format!(
                "`main` only applies to executables, not target `{}`",
                self.target.name()
            ));
        }
        Ok(())
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote(Path::new("bin/app.exe")), "bin/app.exe");
        assert_eq!(quote(Path::new("my app/app.exe")), "\"my app/app.exe\"");
    }

    #[test]
    fn test_defines() {
        let csc = CscTask {
            define: Some("DEBUG; TRACE,,NET8".to_string()),
            ..CscTask::default()
        };

        assert_eq!(csc.defines(), ["DEBUG", "TRACE", "NET8"]);
        assert!(CscTask::default().defines().is_empty());
    }

    #[test]
    fn test_minimal_response_file() {
        let csc = CscTask {
            output: PathBuf::from("app.exe"),
            ..CscTask::default()
        };

        assert_eq!(csc.response_file_lines(), ["/target:exe", "/out:app.exe"]);
    }
}
