//! Compile command - turn a request document into SQL
//!
//! # Usage
//!
//! ```bash
//! lens compile request.json --project my-project --dataset analytics_123
//! lens compile - --range 2024-01-01,2024-01-31 < request.json
//! lens compile request.json --escaped --max-depth 10
//! ```
//!
//! # Configuration
//!
//! Table coordinates and compiler options fall back to the config file:
//!
//! ```toml
//! [compiler]
//! max_filter_depth = 20
//! quoting = "verbatim"
//!
//! [table]
//! project = "my-project"
//! dataset = "analytics_123456"
//! table = "events"
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lens_analytics::{
    CompilerOptions, DateRange, QueryCompiler, QueryRequest, TableRef, ValueQuoting,
};
use lens_config::{Config, QuotingMode};

/// Compile command arguments
#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// Request document (JSON). Reads stdin when omitted or `-`
    #[arg(value_name = "REQUEST")]
    request: Option<PathBuf>,

    /// Cloud project id (overrides [table] project)
    #[arg(long)]
    project: Option<String>,

    /// Dataset id (overrides [table] dataset)
    #[arg(long)]
    dataset: Option<String>,

    /// Table prefix (overrides [table] table)
    #[arg(long)]
    table: Option<String>,

    /// Date range overriding the document's (7d, 30d, today, 2024-01-01,2024-01-31)
    #[arg(short, long)]
    range: Option<String>,

    /// Maximum filter nesting depth (overrides [compiler] max_filter_depth)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Escape values and validate identifiers (overrides [compiler] quoting)
    #[arg(long)]
    escaped: bool,
}

/// Run the compile command
pub fn run(args: CompileArgs, config: &Config) -> Result<()> {
    let document = read_document(args.request.as_ref())?;
    let sql = compile(&args, config, &document)?;
    println!("{}", sql);
    Ok(())
}

/// Compile a request document with CLI overrides applied over config
fn compile(args: &CompileArgs, config: &Config, document: &str) -> Result<String> {
    let mut request = QueryRequest::from_json(document).context("failed to decode request")?;
    if let Some(range) = &args.range {
        request.date_range = DateRange::parse(range).context("invalid --range")?;
    }

    let table = resolve_table(args, config)?;
    let options = resolve_options(args, config)?;
    tracing::debug!(
        project = %table.project,
        dataset = %table.dataset,
        table = %table.table,
        max_filter_depth = options.max_filter_depth,
        quoting = ?options.quoting,
        "compiling request"
    );

    QueryCompiler::new(options)
        .build_query(&request, &table)
        .context("failed to compile request")
}

fn read_document(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read request file: {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

/// Table coordinates: CLI flag > config file
fn resolve_table(args: &CompileArgs, config: &Config) -> Result<TableRef> {
    let project = args
        .project
        .clone()
        .or_else(|| config.table.project.clone())
        .ok_or_else(|| anyhow::anyhow!("no project given (use --project or [table] project)"))?;
    let dataset = args
        .dataset
        .clone()
        .or_else(|| config.table.dataset.clone())
        .ok_or_else(|| anyhow::anyhow!("no dataset given (use --dataset or [table] dataset)"))?;
    let table = args
        .table
        .clone()
        .unwrap_or_else(|| config.table.table.clone());

    Ok(TableRef::new(project, dataset, table))
}

/// Compiler options: CLI flag > config file
fn resolve_options(args: &CompileArgs, config: &Config) -> Result<CompilerOptions> {
    let quoting = if args.escaped {
        ValueQuoting::Escaped
    } else {
        match config.compiler.quoting {
            QuotingMode::Verbatim => ValueQuoting::Verbatim,
            QuotingMode::Escaped => ValueQuoting::Escaped,
        }
    };

    let max_filter_depth = args.max_depth.unwrap_or(config.compiler.max_filter_depth);
    if max_filter_depth == 0 {
        anyhow::bail!("--max-depth must be at least 1");
    }

    Ok(CompilerOptions {
        max_filter_depth,
        quoting,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const REQUEST: &str = r#"{
        "dimensions": [{"apiName": "country"}],
        "metrics": [{"apiName": "events"}],
        "dateRange": {"start": "2024-01-01", "end": "2024-01-31"}
    }"#;

    fn config(toml: &str) -> Config {
        Config::from_str(toml).unwrap()
    }

    #[test]
    fn test_table_from_config() {
        let config = config("[table]\nproject = \"p\"\ndataset = \"d\"");
        let table = resolve_table(&CompileArgs::default(), &config).unwrap();
        assert_eq!(table, TableRef::new("p", "d", "events"));
    }

    #[test]
    fn test_table_flags_override_config() {
        let config = config("[table]\nproject = \"p\"\ndataset = \"d\"");
        let args = CompileArgs {
            project: Some("other".to_string()),
            table: Some("events_intraday".to_string()),
            ..Default::default()
        };
        let table = resolve_table(&args, &config).unwrap();
        assert_eq!(table, TableRef::new("other", "d", "events_intraday"));
    }

    #[test]
    fn test_missing_project_is_error() {
        let err = resolve_table(&CompileArgs::default(), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn test_options_from_config_and_flags() {
        let config = config("[compiler]\nmax_filter_depth = 5\nquoting = \"escaped\"");
        let options = resolve_options(&CompileArgs::default(), &config).unwrap();
        assert_eq!(options.max_filter_depth, 5);
        assert_eq!(options.quoting, ValueQuoting::Escaped);

        let args = CompileArgs {
            max_depth: Some(9),
            escaped: true,
            ..Default::default()
        };
        let options = resolve_options(&args, &Config::default()).unwrap();
        assert_eq!(options.max_filter_depth, 9);
        assert_eq!(options.quoting, ValueQuoting::Escaped);
    }

    #[test]
    fn test_zero_max_depth_rejected() {
        let args = CompileArgs {
            max_depth: Some(0),
            ..Default::default()
        };
        let err = resolve_options(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--max-depth"));
    }

    #[test]
    fn test_compile_document() {
        let args = CompileArgs {
            project: Some("p".to_string()),
            dataset: Some("d".to_string()),
            ..Default::default()
        };
        let sql = compile(&args, &Config::default(), REQUEST).unwrap();
        assert!(sql.contains("`p.d.events_*`"));
        assert!(sql.contains("_TABLE_SUFFIX BETWEEN '20240101' AND '20240131'"));
        assert!(sql.ends_with("GROUP BY country;"));
    }

    #[test]
    fn test_range_override() {
        let args = CompileArgs {
            project: Some("p".to_string()),
            dataset: Some("d".to_string()),
            range: Some("2023-12-01,2023-12-02".to_string()),
            ..Default::default()
        };
        let sql = compile(&args, &Config::default(), REQUEST).unwrap();
        assert!(sql.contains("_TABLE_SUFFIX BETWEEN '20231201' AND '20231202'"));
    }

    #[test]
    fn test_unsupported_metric_surfaces() {
        let args = CompileArgs {
            project: Some("p".to_string()),
            dataset: Some("d".to_string()),
            ..Default::default()
        };
        let doc = r#"{
            "metrics": [{"apiName": "bounce_rate"}],
            "dateRange": {"start": "2024-01-01", "end": "2024-01-01"}
        }"#;
        let err = compile(&args, &Config::default(), doc).unwrap_err();
        assert!(format!("{:#}", err).contains("bounce_rate"));
    }
}
