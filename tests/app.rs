use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn input_file_doesnt_exist() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["file/doesnt/exist.tsv"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found: file/doesnt/exist.tsv"));

    Ok(())
}

#[test]
fn missing_input_among_valid_inputs_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_a.tsv", "tests/cases/sample_x.tsv", "-o"])
        .arg(&prefix);
    cmd.assert().failure();

    assert_eq!(fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[test]
fn missing_column_names_table_and_column() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_a.tsv", "tests/cases/missing_column.tsv", "-o"])
        .arg(&prefix);
    cmd.assert().failure().stderr(
        predicate::str::contains("tests/cases/missing_column.tsv")
            .and(predicate::str::contains("missing required column 'coverage'")),
    );

    assert_eq!(fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[test]
fn valid_inputs_write_function_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_a.tsv", "tests/cases/sample_b.tsv", "-o"])
        .arg(&prefix);
    cmd.assert().success();

    let functions = fs::read_to_string(dir.path().join("out-KO-function-coverages.tsv"))?;
    assert_eq!(
        functions,
        "KO_ID\tKO_function\tsample_a\tsample_b\n\
         K00001\talcohol dehydrogenase\t250000\t1000000\n\
         K00002\talcohol dehydrogenase (NADP+)\t750000\t0\n"
    );

    Ok(())
}

#[test]
fn valid_inputs_write_taxonomy_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_a.tsv", "tests/cases/sample_c.tsv", "-o"])
        .arg(&prefix);
    cmd.assert().success();

    let taxonomy = fs::read_to_string(dir.path().join("out-taxonomy-coverages.tsv"))?;
    let lines: Vec<&str> = taxonomy.lines().collect();

    assert_eq!(
        lines[0],
        "taxid\tdomain\tphylum\tclass\torder\tfamily\tgenus\tspecies\tsample_a\tsample_c"
    );
    assert_eq!(
        lines[1],
        "562\tBacteria\tPseudomonadota\tGammaproteobacteria\tEnterobacterales\tEnterobacteriaceae\tEscherichia\tEscherichia coli\t250000\t500000"
    );
    assert_eq!(
        lines[2],
        "1280\tBacteria\tBacillota\tBacilli\tBacillales\tStaphylococcaceae\tStaphylococcus\tStaphylococcus aureus\t750000\t0"
    );
    assert_eq!(
        lines[3],
        "Not classified\tNA\tNA\tNA\tNA\tNA\tNA\tNA\t0\t500000"
    );
    assert_eq!(lines.len(), 4);

    Ok(())
}

#[test]
fn compressed_input_sample_name_ok() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_gz.tsv.gz", "-o"]).arg(&prefix);
    cmd.assert().success();

    let functions = fs::read_to_string(dir.path().join("out-KO-function-coverages.tsv"))?;
    assert!(functions.starts_with("KO_ID\tKO_function\tsample_gz\n"));

    Ok(())
}

#[test]
fn summary_table_printed_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("out");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(vec!["tests/cases/sample_c.tsv", "--table", "-o"]).arg(&prefix);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("KO annotated (%)").and(predicate::str::contains("75.00")));

    Ok(())
}
