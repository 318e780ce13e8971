//! End-to-end loading from files on disk

use envguard::{
    load, EnvLoader, ErrorKind, FsSource, KeySpec, LoadOptions, RawEnv, Schema, SchemaFile,
    SchemaType,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_env(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn process(pairs: &[(&str, &str)]) -> RawEnv {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_load_typed_values_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_env(
        &dir,
        ".env",
        "# service settings\r\n\
         PORT=3000\r\n\
         DEBUG=false\n\
         SECRET=\"8J+Sjg==\"\r\
         GREETING=\"hello\\nworld\"\n\
         MODE=production\n\
         bad.identifier=true\n",
    );

    let schema = Schema::new()
        .key("PORT", SchemaType::Number)
        .key("DEBUG", SchemaType::Boolean)
        .key("SECRET", SchemaType::Buffer)
        .key("GREETING", SchemaType::String)
        .key("MODE", SchemaType::one_of(["development", "production"]))
        .key("TIMEOUT", KeySpec::new(SchemaType::Number).with_default(30));

    let loader = EnvLoader::with_parts(FsSource, RawEnv::new());
    let env = loader.load(&schema, path.as_path()).unwrap();

    assert_eq!(env.number("PORT"), Some(3000));
    assert_eq!(env.boolean("DEBUG"), Some(false));
    assert_eq!(env.buffer("SECRET"), Some("💎".as_bytes()));
    assert_eq!(env.string("GREETING"), Some("hello\nworld"));
    assert_eq!(env.string("MODE"), Some("production"));
    assert_eq!(env.number("TIMEOUT"), Some(30));
    assert_eq!(env.len(), 6);
}

#[test]
fn test_every_problem_reported_at_once() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, ".env", "B=xyz\nC=maybe\n");

    let schema = Schema::new()
        .key("A", SchemaType::Boolean)
        .key("B", SchemaType::Number)
        .key("C", SchemaType::one_of(["yes", "no"]))
        .key("D", KeySpec::new(SchemaType::String));

    let loader = EnvLoader::with_parts(FsSource, RawEnv::new());
    let error = loader.load(&schema, path).unwrap_err();
    let report = error.report();

    assert_eq!(report.len(), 3);
    assert_eq!(report.get("A").map(|i| i.kind), Some(ErrorKind::Missing));
    assert_eq!(report.get("B").map(|i| i.kind), Some(ErrorKind::WrongType));
    assert_eq!(report.get("C").map(|i| i.kind), Some(ErrorKind::WrongType));
    assert_eq!(
        error.to_string(),
        "Invalid or missing environment variables\n\
         \x20   - Expected value for key 'A'; none found\n\
         \x20   - Expected value for key 'B' of type Number; got 'xyz'\n\
         \x20   - Expected value for key 'C' to be one of 'yes' | 'no'; got 'maybe'\n"
    );
}

#[test]
fn test_precedence_against_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, ".env.partial", "A=false\n");
    let schema = Schema::new().key("A", SchemaType::Boolean);
    let loader = EnvLoader::with_parts(FsSource, process(&[("A", "true")]));

    let env = loader.load(&schema, path.as_path()).unwrap();
    assert_eq!(env.boolean("A"), Some(true));

    let options = LoadOptions::new().path(&path).override_process_env(true);
    let env = loader.load(&schema, options).unwrap();
    assert_eq!(env.boolean("A"), Some(false));
}

#[test]
fn test_schema_file_drives_load() {
    let dir = TempDir::new().unwrap();
    let env_path = write_env(&dir, ".env", "PORT=9000\nDATABASE_URL=postgres://localhost/app\nMODE=development\n");
    let schema_path = write_env(&dir, "schema.yaml", &SchemaFile::example().to_yaml().unwrap());

    let schema = SchemaFile::load(&schema_path).unwrap().into_schema().unwrap();
    let loader = EnvLoader::with_parts(FsSource, RawEnv::new());
    let env = loader.load(&schema, env_path).unwrap();

    assert_eq!(env.number("PORT"), Some(9000));
    assert_eq!(env.boolean("DEBUG"), Some(false));
    assert_eq!(env.string("MODE"), Some("development"));
    assert!(env.contains_key("REGION"));
    assert_eq!(env.get("REGION"), None);
}

#[test]
fn test_load_reads_live_process_environment() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.env");
    let schema = Schema::new().key("ENVGUARD_TEST_ONLY_IN_PROCESS_ENV", SchemaType::Number);

    temp_env::with_var("ENVGUARD_TEST_ONLY_IN_PROCESS_ENV", Some("123"), || {
        let env = load(&schema, missing.as_path()).unwrap();
        assert_eq!(env.number("ENVGUARD_TEST_ONLY_IN_PROCESS_ENV"), Some(123));
    });
}

#[test]
fn test_loaded_json_keeps_declaration_order() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, ".env", "ZONE=eu-west\nAPI_KEY=\"aGk=\"\nDEBUG=true\n");
    let schema = Schema::new()
        .key("ZONE", SchemaType::String)
        .key("RETRIES", KeySpec::new(SchemaType::Number).with_default(3))
        .key("API_KEY", SchemaType::Buffer)
        .key("DEBUG", SchemaType::Boolean)
        .key("TRACE_ID", KeySpec::new(SchemaType::String).optional(true));

    let loader = EnvLoader::with_parts(FsSource, RawEnv::new());
    let env = loader.load(&schema, path.as_path()).unwrap();

    assert_eq!(
        serde_json::to_string(&env).unwrap(),
        r#"{"ZONE":"eu-west","RETRIES":3,"API_KEY":"aGk=","DEBUG":true,"TRACE_ID":null}"#
    );
}
