use std::fs;
use std::path::{Path, PathBuf};

use pooled_sql::prelude::*;
use serde_json::{Value, json};
use thiserror::Error;

use crate::args::{Args, Command};
use crate::params::{ParamError, parse_line};
use crate::script::split_statements;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Db(#[from] PooledSqlError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}:{line}: {source}")]
    Param {
        path: PathBuf,
        line: usize,
        source: ParamError,
    },
}

pub(crate) fn run(args: Args) -> Result<Value, CliError> {
    let config = PoolConfig::load(&args.config)?;
    let mut options = ExecutorOptions::default();
    if let Some(n) = args.fetch_size {
        options = options.with_fetch_size(n);
    }
    if let Command::Import { flush, .. } = &args.command {
        options = options.with_batch_flush(flush.policy());
    }
    let executor = SqlExecutor::new(ConnectionPool::sqlite(&config)?).with_options(options);

    match args.command {
        Command::Query { sql, params } => {
            let rows = executor.query(&sql, &params)?;
            Ok(Value::Array(rows.results.iter().map(DbRow::to_json).collect()))
        }
        Command::Update { sql, params } => {
            let updated = executor.update(&sql, &params)?;
            Ok(json!({ "updated": updated }))
        }
        Command::Exec { file } => {
            let statements = split_statements(&read(&file)?);
            let summary = executor.batch_statements(&statements)?;
            Ok(summary_json(&summary))
        }
        Command::Import {
            sql,
            file,
            delimiter,
            ..
        } => {
            let text = read(&file)?;
            let mut sets = Vec::new();
            for (idx, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let set = parse_line(line, delimiter).map_err(|source| CliError::Param {
                    path: file.clone(),
                    line: idx + 1,
                    source,
                })?;
                sets.push(set);
            }
            tracing::info!(entries = sets.len(), file = %file.display(), "importing");
            let summary = executor.batch_update(&sql, &sets)?;
            Ok(summary_json(&summary))
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn summary_json(summary: &BatchSummary) -> Value {
    serde_json::to_value(summary).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let props = dir.path().join("db.properties");
        fs::write(
            &props,
            format!(
                "driverClassName=org.sqlite.JDBC\nurl=jdbc:sqlite:{}\nmaxTotal=2\n",
                dir.path().join("cli.db").display()
            ),
        )
        .unwrap();
        (dir, props)
    }

    fn run_with(props: &Path, rest: &[&str]) -> Result<Value, CliError> {
        let mut argv = vec!["pooled-sql", "--config", props.to_str().unwrap()];
        argv.extend_from_slice(rest);
        run(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn exec_import_then_query() {
        let (dir, props) = setup();
        let script = dir.path().join("schema.sql");
        fs::write(
            &script,
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT);\n\
             -- seed; one row\n\
             INSERT INTO people VALUES (1, 'ada;lovelace');\n",
        )
        .unwrap();
        let out = run_with(&props, &["exec", script.to_str().unwrap()]).unwrap();
        assert_eq!(out["entries"], 2);
        let out = run_with(&props, &["query", "SELECT name FROM people WHERE id = 1"]).unwrap();
        assert_eq!(out, json!([{ "name": "ada;lovelace" }]));

        let rows = dir.path().join("people.csv");
        fs::write(&rows, "int:2,bob\nint:3,cy\n\nint:4,dee\n").unwrap();
        let out = run_with(
            &props,
            &[
                "import",
                "INSERT INTO people VALUES (?1, ?2)",
                rows.to_str().unwrap(),
                "--chunk",
                "2",
            ],
        )
        .unwrap();
        assert_eq!(out["entries"], 3);
        assert_eq!(out["flushes"], 2);

        let out = run_with(
            &props,
            &["query", "SELECT name FROM people WHERE id > ?1 ORDER BY id", "-p", "int:2"],
        )
        .unwrap();
        assert_eq!(out, json!([{ "name": "cy" }, { "name": "dee" }]));

        let out = run_with(
            &props,
            &["update", "UPDATE people SET name = ?1 WHERE id = 1", "-p", "ada l."],
        )
        .unwrap();
        assert_eq!(out, json!({ "updated": true }));

        let out = run_with(&props, &["query", "SELECT name FROM people WHERE id = 1"]).unwrap();
        assert_eq!(out, json!([{ "name": "ada l." }]));
    }

    #[test]
    fn bad_import_line_names_its_position() {
        let (dir, props) = setup();
        let rows = dir.path().join("bad.csv");
        fs::write(&rows, "int:1\nint:x\n").unwrap();
        let err = run_with(
            &props,
            &["import", "INSERT INTO t VALUES (?1)", rows.to_str().unwrap()],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Param { line: 2, .. }));
    }

    #[test]
    fn failed_query_is_an_error() {
        let (_dir, props) = setup();
        let err = run_with(&props, &["query", "SELECT * FROM missing"]).unwrap_err();
        assert!(matches!(err, CliError::Db(ref e) if e.kind() == FailureKind::QueryExecution));
    }
}
