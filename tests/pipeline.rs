use persona_forge::testing::*;
use persona_forge::{
    FlatPersona, ForgeError, Layout, Mode, ParsePolicy, Persona, PersonaGenerator, Severity,
    read_columnar, run, write_personas_json,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn json_ids(path: &Path) -> anyhow::Result<Vec<String>> {
    let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(path)?)?;
    let items = doc["Persona"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("no Persona array in {}", path.display()))?;
    Ok(items
        .iter()
        .filter_map(|p| p["personId"].as_str().map(str::to_string))
        .collect())
}

#[test]
fn mode_names_parse() {
    assert_eq!(Mode::from_str("genData").unwrap(), Mode::Generate);
    assert_eq!(Mode::from_str("convertData").unwrap(), Mode::Convert);
    for bad in ["", "gendata", "convert", "genData "] {
        let err = Mode::from_str(bad).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidMode(_)));
        assert_eq!(err.to_string(), format!("Invalid type: {bad}"));
    }
}

#[test]
fn layout_derives_output_and_extraction_paths() {
    let layout = Layout::rooted_at(Path::new("/w"));
    assert_eq!(
        layout.converted_path(Path::new("/w/input/a/b/people.json")),
        PathBuf::from("/w/output/people.json.parquet")
    );
    let archive = Path::new("/w/input/sub/batch.zip");
    assert_eq!(layout.extraction_dir(archive), PathBuf::from("/w/input/batch"));
    assert_eq!(
        layout.entry_output_path(archive, Path::new("dir/y.json")),
        PathBuf::from("/w/output/batch/dir/y.json.parquet")
    );
}

#[test]
fn generate_zero_writes_empty_artifacts() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let report = run(Mode::Generate, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);

    let json = ws.layout().json_artifact(0);
    let parquet = ws.layout().parquet_artifact(0);
    assert!(json.ends_with("generatedData/JSON/generated-0.json"));
    assert!(parquet.ends_with("generatedData/PARQUET/generated-0.parquet"));
    assert!(json_ids(&json)?.is_empty());
    assert!(read_columnar::<Persona>(&parquet)?.is_empty());
    Ok(())
}

#[test]
fn generate_writes_the_same_batch_twice() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let report = run(Mode::Generate, 100, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.outputs.len(), 2);

    let ids = json_ids(&ws.layout().json_artifact(100))?;
    assert_eq!(ids.len(), 100);

    let rows: Vec<Persona> = read_columnar(ws.layout().parquet_artifact(100))?;
    let row_ids: Vec<_> = rows.into_iter().map(|p| p.person_id).collect();
    assert_eq!(row_ids, ids);
    Ok(())
}

#[test]
fn generate_again_replaces_previous_artifacts() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    run(Mode::Generate, 10, ws.settings())?;
    let first = json_ids(&ws.layout().json_artifact(10))?;

    run(Mode::Generate, 10, ws.settings())?;
    let second = json_ids(&ws.layout().json_artifact(10))?;
    let rows: Vec<Persona> = read_columnar(ws.layout().parquet_artifact(10))?;

    assert_eq!(second.len(), 10);
    assert_ne!(first, second);
    assert_eq!(
        rows.into_iter().map(|p| p.person_id).collect::<Vec<_>>(),
        second
    );
    Ok(())
}

#[test]
fn convert_handles_plain_files_and_archives() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let people = sample_flat_personas();
    let json = flat_personas_json(&people);
    ws.write_input("people.json", &json)?;
    ws.write_input("2024/march/more.json", &json)?;
    ws.write_zip_input("batch.zip", &[("a.json", json.as_str()), ("b.json", json.as_str())])?;
    ws.write_zip_input("sub/other.zip", &[("c.json", json.as_str())])?;
    ws.write_input("readme.txt", "ignored")?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.exit_code(), 0);

    let expected = [
        "batch/a.json.parquet",
        "batch/b.json.parquet",
        "more.json.parquet",
        "other/c.json.parquet",
        "people.json.parquet",
    ];
    assert_eq!(
        report.outputs,
        expected.iter().map(|p| ws.output_path(p)).collect::<Vec<_>>()
    );
    assert!(ws.input_path("other/c.json").is_file());
    assert_eq!(report.rows_written, 5 * people.len());
    for p in expected {
        let back: Vec<FlatPersona> = read_columnar(ws.output_path(p))?;
        assert_eq!(back, people, "{p}");
    }
    Ok(())
}

#[test]
fn extracted_files_are_not_converted_twice() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let json = flat_personas_json(&sample_flat_personas());
    ws.write_zip_input("batch.zip", &[("a.json", json.as_str())])?;

    let first = run(Mode::Convert, 0, ws.settings())?;
    assert_eq!(first.outputs.len(), 1);

    // input/batch/a.json now exists from the first run
    let second = run(Mode::Convert, 0, ws.settings())?;
    assert!(second.is_success(), "{:?}", second.failures);
    assert_eq!(second.outputs, vec![ws.output_path("batch/a.json.parquet")]);
    Ok(())
}

#[test]
fn hidden_files_are_skipped() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    ws.write_input(".draft.json", "not even json")?;
    ws.write_input(".stash.zip", "not a zip")?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);
    assert!(report.outputs.is_empty());
    assert!(!ws.output_path(".draft.json.parquet").exists());
    Ok(())
}

#[test]
fn invalid_record_fails_the_file_without_output() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    ws.write_input(
        "broken.json",
        r#"[{"name":"Ana","email":"a@x","id":"1"},{"name":"Bruno","email":"b@x"}]"#,
    )?;
    ws.write_input("fine.json", flat_personas_json(&sample_flat_personas()))?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.fatal_count(), 1);
    assert_eq!(report.failures[0].path, ws.input_path("broken.json"));
    assert!(report.failures[0].message.contains("index 1"));

    assert!(!ws.output_path("broken.json.parquet").exists());
    assert!(ws.output_path("fine.json.parquet").is_file());
    Ok(())
}

#[test]
fn skip_invalid_writes_the_good_records() -> anyhow::Result<()> {
    let mut ws = TempWorkspace::new()?;
    ws.settings_mut().parse_policy = ParsePolicy::SkipInvalid;
    ws.write_input(
        "mixed.json",
        r#"[
            {"name":"Ana","email":"a@x","id":"1"},
            {"name":"Bruno","email":"b@x","id":2},
            {"name":"Carla","email":"c@x","id":"3"}
        ]"#,
    )?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].severity, Severity::Recoverable);
    assert!(report.failures[0].message.starts_with("record 1 skipped"));

    let back: Vec<FlatPersona> = read_columnar(ws.output_path("mixed.json.parquet"))?;
    assert_eq!(
        back.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["1", "3"]
    );
    Ok(())
}

#[test]
fn malformed_json_is_attributed_to_its_file() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    ws.write_input("bad.json", "[{")?;
    ws.write_input("object.json", r#"{"name":"Ana"}"#)?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    let paths: Vec<_> = report.failures.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![ws.input_path("bad.json"), ws.input_path("object.json")]
    );
    assert!(report.failures.iter().all(|f| f.severity == Severity::Fatal));
    assert!(report.outputs.is_empty());
    Ok(())
}

#[test]
fn missing_input_root_is_an_error() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    std::fs::remove_dir_all(&ws.layout().input_root)?;

    let err = run(Mode::Convert, 0, ws.settings()).unwrap_err();
    assert!(matches!(err, ForgeError::MissingInput(_)), "{err}");
    Ok(())
}

#[test]
fn single_worker_still_drains_every_archive() -> anyhow::Result<()> {
    let mut ws = TempWorkspace::new()?;
    ws.settings_mut().archive_workers = 1;
    let json = flat_personas_json(&sample_flat_personas());
    for i in 0..6 {
        ws.write_zip_input(&format!("z{i}.zip"), &[("p.json", json.as_str())])?;
    }

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.outputs.len(), 6);
    Ok(())
}

#[test]
fn capitalised_keys_convert_end_to_end() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    ws.write_input(
        "legacy.json",
        r#"[{"Name":"Ana","Email":"ana@example.com","ID":"1"},{"Name":"Bruno","Email":"b@x","Id":"2"}]"#,
    )?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);

    let back: Vec<FlatPersona> = read_columnar(ws.output_path("legacy.json.parquet"))?;
    assert_eq!(
        back.iter().map(|p| (p.name.as_str(), p.id.as_str())).collect::<Vec<_>>(),
        vec![("Ana", "1"), ("Bruno", "2")]
    );
    Ok(())
}

#[test]
fn generated_json_converts_back_to_rich_parquet() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let personas = PersonaGenerator::with_seed(21).generate(5);
    write_personas_json(ws.input_path("generated-5.json"), &personas)?;
    ws.write_input("bare.json", serde_json::to_string(&personas.persona)?)?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);

    for name in ["generated-5.json.parquet", "bare.json.parquet"] {
        let back: Vec<Persona> = read_columnar(ws.output_path(name))?;
        assert_eq!(back, personas.persona, "{name}");
    }
    Ok(())
}

#[test]
fn rich_file_with_a_bad_record_is_attributed_as_rich() -> anyhow::Result<()> {
    let mut ws = TempWorkspace::new()?;
    ws.settings_mut().parse_policy = ParsePolicy::SkipInvalid;
    let personas = PersonaGenerator::with_seed(4).generate(3);
    let mut items = serde_json::to_value(&personas.persona)?;
    items[1]["status"] = serde_json::Value::from("yes");
    ws.write_input("rich.json", items.to_string())?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.starts_with("record 1 skipped"));

    let back: Vec<Persona> = read_columnar(ws.output_path("rich.json.parquet"))?;
    assert_eq!(back, vec![personas.persona[0].clone(), personas.persona[2].clone()]);
    Ok(())
}

#[test]
fn same_file_name_in_two_directories_shares_one_output() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let people = sample_flat_personas();
    ws.write_input("a/people.json", flat_personas_json(&people[..1]))?;
    ws.write_input("b/people.json", flat_personas_json(&people[1..]))?;

    let report = run(Mode::Convert, 0, ws.settings())?;
    assert!(report.is_success(), "{:?}", report.failures);

    // walk order is a/ then b/, so b/ wins
    let back: Vec<FlatPersona> = read_columnar(ws.output_path("people.json.parquet"))?;
    assert_eq!(back, &people[1..]);
    Ok(())
}
