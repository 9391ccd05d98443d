//! Integration tests for the ProjectLoader API
//!
//! These tests load complete build files and check the bound elements and
//! the errors reported for broken ones.

use std::{fs, path::Path};

use tempfile::tempdir;

use kiln::{
    ErrorCode, KilnError, ProjectLoader, TaskRegistry, UnknownPolicy,
    config::AppConfig,
    tasks::{CopyTask, CscTask, EchoTask, Level, MkdirTask, Platform, PropertyTask, TargetKind},
};
use kiln_binder::error::Severity;
use kiln_core::Project;

const APP_BUILD: &str = r#"<?xml version="1.0"?>
<project name="app" default="build" basedir="src">
    <property name="config" value="Debug"/>
    <property name="out" value="bin/${config}"/>

    <target name="init" description="Create output directories">
        <mkdir dir="${out}"/>
    </target>

    <target name="build" depends="init" description="Compile the application">
        <csc output="${out}/app.exe" target="exe" debug="true" warnlevel="4" define="DEBUG;TRACE" platform="x64">
            <sources basedir="src">
                <include name="Program.cs"/>
                <include name="Util.cs"/>
            </sources>
            <references>
                <include name="lib/log.dll"/>
            </references>
            <arg value="/nologo"/>
            <resources>
                <resource file="app.ico" name="App.Icon"/>
            </resources>
        </csc>
        <copy file="README.md" todir="${out}"/>
        <echo message="Built ${kiln.project.name}" level="Warning"/>
    </target>
</project>
"#;

fn load(source: &str) -> Result<kiln::LoadedProject, KilnError> {
    ProjectLoader::default().load_str(source, "default.build")
}

fn load_err(source: &str) -> KilnError {
    load(source).expect_err("build file should be rejected")
}

#[test]
fn test_load_complete_build_file() {
    let loaded = load(APP_BUILD).expect("Failed to load");

    assert_eq!(loaded.element().name(), Some("app"));
    assert_eq!(loaded.project().name(), Some("app"));
    assert_eq!(loaded.project().base_dir(), Path::new("src"));

    let names: Vec<_> = loaded.targets().keys().map(String::as_str).collect();
    assert_eq!(names, ["init", "build"]);
    assert_eq!(loaded.default_target().unwrap().name(), "build");

    let build = loaded.target("build").unwrap();
    assert_eq!(build.depends(), ["init"]);
    assert_eq!(build.description(), Some("Compile the application"));

    let task_names: Vec<_> = build.tasks().iter().map(|t| t.task_name()).collect();
    assert_eq!(task_names, ["csc", "copy", "echo"]);

    // project-level properties are tasks too
    assert_eq!(loaded.tasks().len(), 2);
    assert!(loaded.tasks().iter().all(|t| t.is::<PropertyTask>()));
    assert!(loaded.warnings().is_empty());
}

#[test]
fn test_properties_expand_in_later_attributes() {
    let loaded = load(APP_BUILD).unwrap();

    let mkdir = loaded.target("init").unwrap().tasks()[0]
        .downcast_ref::<MkdirTask>()
        .unwrap();
    assert_eq!(mkdir.dir(), Path::new("bin/Debug"));

    let echo = loaded.target("build").unwrap().tasks()[2]
        .downcast_ref::<EchoTask>()
        .unwrap();
    assert_eq!(echo.message(), "Built app");
    assert_eq!(echo.level(), Level::Warning);
}

#[test]
fn test_csc_configuration() {
    let loaded = load(APP_BUILD).unwrap();
    let csc = loaded.target("build").unwrap().tasks()[0]
        .downcast_ref::<CscTask>()
        .unwrap();

    assert_eq!(csc.target(), TargetKind::Exe);
    assert_eq!(csc.platform(), Some(Platform::X64));
    assert_eq!(csc.warn_level(), Some(4));
    assert_eq!(csc.resources()[0].name(), Some("App.Icon"));
    assert_eq!(
        csc.response_file_lines(),
        [
            "/target:exe",
            "/out:bin/Debug/app.exe",
            "/debug",
            "/warn:4",
            "/define:DEBUG;TRACE",
            "/platform:x64",
            "/reference:lib/log.dll",
            "/resource:app.ico,App.Icon",
            "/nologo",
            "src/Program.cs",
            "src/Util.cs",
        ]
    );
}

#[test]
fn test_elements_record_their_parent() {
    let loaded = load(APP_BUILD).unwrap();

    let copy = &loaded.target("build").unwrap().tasks()[1];
    assert!(copy.is::<CopyTask>());
    let parent = copy.task_meta().parent().unwrap();
    assert_eq!(parent.target_name(), Some("build"));
    assert_eq!(copy.location().to_string(), "default.build:24:9");

    let property = &loaded.tasks()[0];
    assert_eq!(property.task_meta().parent().unwrap().info().element(), "project");
}

#[test]
fn test_builtin_properties() {
    let loaded = load(APP_BUILD).unwrap();
    let project = loaded.project();

    assert_eq!(project.property("kiln.project.name").as_deref(), Some("app"));
    assert_eq!(project.property("kiln.project.default").as_deref(), Some("build"));
    assert_eq!(project.property("kiln.filename").as_deref(), Some("default.build"));
    assert!(project.is_readonly("kiln.version"));

    let err = load_err(r#"<project><property name="kiln.filename" value="x"/></project>"#);
    assert_eq!(err.code(), Some(ErrorCode::E304));
}

#[test]
fn test_configured_properties_win() {
    let config = AppConfig::default().with_property("config", "Release");
    let loaded = ProjectLoader::new(config)
        .load_str(APP_BUILD, "default.build")
        .unwrap();

    assert_eq!(loaded.project().property("out").as_deref(), Some("bin/Release"));
}

#[test]
fn test_overwrite_false_keeps_existing_value() {
    let loaded = load(
        r#"<project>
            <property name="mode" value="fast"/>
            <property name="mode" value="slow" overwrite="false"/>
            <property name="skipped" value="x" if="false"/>
        </project>"#,
    )
    .unwrap();

    assert_eq!(loaded.project().property("mode").as_deref(), Some("fast"));
    assert!(!loaded.project().has_property("skipped"));
}

#[test]
fn test_readonly_property_redefined() {
    let err = load_err(
        r#"<project>
    <property name="version" value="1.0" readonly="true"/>
    <property name="version" value="2.0"/>
</project>"#,
    );

    assert_eq!(err.code(), Some(ErrorCode::E304));
    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.location().to_string(), "default.build:3:5");
}

#[test]
fn test_undefined_property_reference() {
    let err = load_err(r#"<project><echo message="${missing}"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E104));
    assert!(err.to_string().contains("missing"), "{err}");
}

#[test]
fn test_malformed_xml() {
    let err = load_err("<project>\n  <echo message=\"hi\">\n</project>");

    assert!(matches!(err, KilnError::Xml { .. }));
    assert_eq!(err.code(), Some(ErrorCode::E300));
    assert!(err.source_text().is_some());
}

#[test]
fn test_root_must_be_project() {
    let err = load_err(r#"<build name="app"/>"#);

    assert_eq!(err.code(), Some(ErrorCode::E301));
    assert_eq!(
        err.to_string(),
        "expected a <project> root element, found <build>"
    );
}

#[test]
fn test_duplicate_target() {
    let err = load_err(
        r#"<project>
    <target name="build"/>
    <target name="build"/>
</project>"#,
    );

    assert_eq!(err.code(), Some(ErrorCode::E302));
    assert_eq!(err.diagnostic().unwrap().labels().len(), 2);
}

#[test]
fn test_unknown_default_target() {
    let err = load_err(r#"<project default="all"><target name="build"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E303));
    assert_eq!(err.to_string(), "default target `all` is not declared");
}

#[test]
fn test_unknown_task_is_rejected() {
    let err = load_err(r#"<project><target name="build"><compile/></target></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E201));
    assert_eq!(err.to_string(), "unexpected element <compile> in <target>");
}

#[test]
fn test_invalid_enum_value() {
    let err = load_err(r#"<project><echo message="hi" level="info"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E103));
    let message = err.to_string();
    for level in ["Debug", "Verbose", "Info", "Warning", "Error"] {
        assert!(message.contains(level), "{message}");
    }
}

#[test]
fn test_warnlevel_out_of_range() {
    let err = load_err(
        r#"<project><csc output="a.exe" warnlevel="9"><sources><include name="a.cs"/></sources></csc></project>"#,
    );

    assert_eq!(err.code(), Some(ErrorCode::E101));
}

#[test]
fn test_copy_requires_a_source() {
    let err = load_err(r#"<project><copy todir="out"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E202));
}

#[test]
fn test_csc_requires_sources() {
    let err = load_err(r#"<project><csc output="a.exe"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E200));
}

#[test]
fn test_target_depending_on_itself() {
    let err = load_err(r#"<project><target name="build" depends="init,build"/></project>"#);

    assert_eq!(err.code(), Some(ErrorCode::E202));
}

#[test]
fn test_unknown_attribute_warns_by_default() {
    let loaded = load(r#"<project><mkdir dir="out" recursive="true"/></project>"#).unwrap();

    assert_eq!(loaded.warnings().len(), 1);
    let warning = &loaded.warnings()[0];
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.code(), Some(ErrorCode::E105));
}

#[test]
fn test_strict_config_rejects_unknown_attribute() {
    let err = ProjectLoader::new(AppConfig::default().strict())
        .load_str(r#"<project><mkdir dir="out" recursive="true"/></project>"#, "default.build")
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::E105));
    assert_eq!(UnknownPolicy::default(), UnknownPolicy::Warn);
}

#[test]
fn test_strict_config_rejects_repeated_sources() {
    let err = ProjectLoader::new(AppConfig::default().strict())
        .load_str(
            r#"<project>
    <csc output="a.exe">
        <sources><include name="a.cs"/></sources>
        <sources><include name="b.cs"/></sources>
    </csc>
</project>"#,
            "default.build",
        )
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::E201));
    assert_eq!(err.to_string(), "unexpected element <sources> in <csc>");
}

#[test]
fn test_default_namespace() {
    let loaded = load(
        r#"<project xmlns="http://kiln.build/schema" xmlns:x="urn:other" default="build">
    <target name="build" x:note="ignored">
        <echo message="hi"/>
        <x:custom/>
    </target>
</project>"#,
    )
    .unwrap();

    assert_eq!(loaded.target("build").unwrap().tasks().len(), 1);
    assert!(loaded.warnings().is_empty());
}

#[test]
fn test_configured_namespace_must_match() {
    let config: AppConfig = toml::from_str(
        r#"
        [project]
        namespace = "http://kiln.build/schema"
        "#,
    )
    .unwrap();

    let err = ProjectLoader::new(config)
        .load_str("<project/>", "default.build")
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E301));
}

#[test]
fn test_custom_task_registry() {
    let mut tasks = TaskRegistry::empty();
    tasks.register::<EchoTask>();
    let loader = ProjectLoader::default().with_task_registry(tasks);

    assert!(loader.load_str(r#"<project><echo/></project>"#, "a.build").is_ok());
    let err = loader
        .load_str(r#"<project><mkdir dir="x"/></project>"#, "a.build")
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E201));
}

#[test]
fn test_load_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("default.build");
    fs::write(&path, APP_BUILD).unwrap();

    let loaded = ProjectLoader::default().load_file(&path).unwrap();
    assert_eq!(loaded.project().base_dir(), dir.path().join("src"));

    let missing = ProjectLoader::default().load_file(dir.path().join("missing.build"));
    assert!(matches!(missing, Err(KilnError::Io(_))));
}
