//! Subcommand implementations
//!
//! Each command reads its inputs, runs the core pipeline and writes its
//! result to the given sink, so tests can drive them without a process.

use crate::output::{render_reconcile, render_store, render_summary, SummaryOutput};
use anyhow::{bail, Context as _, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use expodoc_core::{
    annotations_from_table, AnnotationSession, Dataset, DocumentaryStatus, EnrichedDataset,
    FilterOptions, JsonFileBackend, RecordFilter, Report, ReportConfig, StoreBackend,
};
use expodoc_table::{read_table, write_table, write_to, ReadOptions, TableFormat};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Context {
    config: ReportConfig,
    today: NaiveDate,
}

impl Context {
    /// Create context from a configuration and evaluation date
    #[must_use]
    pub fn new(config: ReportConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// Build the context from parsed arguments
    ///
    /// The configuration file is read first; `--store` and `--sheet`
    /// override it.
    ///
    /// # Errors
    /// Returns error if the configuration file cannot be loaded
    pub fn from_args(args: &ArgMatches) -> Result<Self> {
        let mut config = match args.get_one::<PathBuf>("config") {
            Some(path) => ReportConfig::load(path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?,
            None => ReportConfig::default(),
        };
        if let Some(store) = args.get_one::<PathBuf>("store") {
            config = config.with_store_path(store.clone());
        }
        if let Some(sheet) = args.get_one::<String>("sheet") {
            config = config.with_sheet(sheet.clone());
        }
        let today = args
            .get_one::<NaiveDate>("today")
            .copied()
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        Ok(Self::new(config, today))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Evaluation date
    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn backend(&self) -> JsonFileBackend {
        JsonFileBackend::new(self.config.store_path.clone())
    }

    fn open_session(&self) -> Result<AnnotationSession<JsonFileBackend>> {
        let session = AnnotationSession::open(self.backend()).with_context(|| {
            format!(
                "cannot open comment store {}",
                self.config.store_path.display()
            )
        })?;
        Ok(session.with_columns(self.config.columns.clone()))
    }

    fn read_input(&self, path: &Path) -> Result<Dataset> {
        let mut options = ReadOptions::new();
        if let Some(sheet) = &self.config.sheet {
            options = options.with_sheet(sheet.clone());
        }
        read_table(path, &options).with_context(|| format!("cannot read {}", path.display()))
    }

    fn enrich_input(
        &self,
        session: &AnnotationSession<JsonFileBackend>,
        path: &Path,
    ) -> Result<EnrichedDataset> {
        let dataset = self.read_input(path)?;
        let enriched = session
            .enrich(&dataset, self.today)
            .with_context(|| format!("{} cannot be processed", path.display()))?;
        for issue in enriched.date_issues() {
            tracing::warn!("{issue}; treated as missing");
        }
        Ok(enriched)
    }
}

/// Run subcommand `name`
///
/// # Errors
/// Returns the first failure of the command, with context
pub fn run(context: &Context, name: &str, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    match name {
        "enrich" => enrich_command(context, args, out),
        "summary" => summary_command(context, args, out),
        "annotate" => annotate_command(context, args, out),
        "reconcile" => reconcile_command(context, args, out),
        "show-store" => show_store_command(context, args, out),
        other => bail!("unknown command '{other}'"),
    }
}

/// Filter built from the repeatable facet flags
#[must_use]
pub fn filter_from_args(args: &ArgMatches) -> RecordFilter {
    let mut filter = RecordFilter::new();
    for period in args.get_many::<String>("period").into_iter().flatten() {
        filter = filter.with_period(period.clone());
    }
    for company in args.get_many::<String>("company").into_iter().flatten() {
        filter = filter.with_company(company.clone());
    }
    for status in args.get_many::<DocumentaryStatus>("status").into_iter().flatten() {
        filter = filter.with_status(*status);
    }
    for date in args.get_many::<NaiveDate>("etd").into_iter().flatten() {
        filter = filter.with_etd(*date);
    }
    for date in args.get_many::<NaiveDate>("eta").into_iter().flatten() {
        filter = filter.with_eta(*date);
    }
    filter
}

fn input_path(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("input")
        .context("input table path is required")
}

fn enrich_command(context: &Context, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let input = input_path(args)?;
    let session = context.open_session()?;
    let enriched = filter_from_args(args).apply(context.enrich_input(&session, input)?);
    let table = enriched.to_dataset();

    let output = args.get_one::<PathBuf>("output");
    let format = args
        .get_one::<TableFormat>("format")
        .copied()
        .or_else(|| output.and_then(|path| TableFormat::from_path(path)))
        .unwrap_or_default();

    match output {
        Some(path) => {
            write_table(&table, path, format)
                .with_context(|| format!("cannot write {}", path.display()))?;
            writeln!(out, "Wrote {} rows to {}", table.len(), path.display())?;
        }
        None => write_to(&table, &mut *out, format, Path::new("<stdout>"))?,
    }
    Ok(())
}

fn summary_command(context: &Context, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let input = input_path(args)?;
    let session = context.open_session()?;
    let unfiltered = context.enrich_input(&session, input)?;
    let options = FilterOptions::from_dataset(&unfiltered);
    let enriched = filter_from_args(args).apply(unfiltered);
    let report = Report::from_records(enriched.records());

    if args.get_flag("json") {
        let payload = SummaryOutput {
            evaluation_date: context.today,
            report: &report,
            filter_options: &options,
            unreadable_dates: enriched.date_issues().len(),
        };
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
    } else {
        render_summary(&report, context.today, enriched.date_issues().len(), out)?;
    }
    Ok(())
}

fn annotate_command(context: &Context, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let input = input_path(args)?;
    let id = args.get_one::<String>("id").context("--id is required")?.trim();
    let comment = args.get_one::<String>("comment").context("--comment is required")?;

    let mut session = context.open_session()?;
    let mut enriched = context.enrich_input(&session, input)?;
    if enriched.set_comment(id, comment.as_str()) == 0 {
        bail!("no shipment with identifier {id} in {}", input.display());
    }
    let report = session
        .reconcile(&enriched)
        .with_context(|| format!("comment for {id} was not saved"))?;

    writeln!(
        out,
        "Comment for {id} saved to {}",
        context.config.store_path.display()
    )?;
    render_reconcile(&report, out)?;
    Ok(())
}

fn reconcile_command(context: &Context, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let input = input_path(args)?;
    let table = context.read_input(input)?;
    let annotations = annotations_from_table(&table, &context.config.columns)
        .with_context(|| format!("{} cannot be reconciled", input.display()))?;

    let mut session = context.open_session()?;
    let report = session
        .reconcile_annotations(annotations)
        .context("edited comments were not saved")?;
    render_reconcile(&report, out)?;
    Ok(())
}

fn show_store_command(context: &Context, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let backend = context.backend();
    let store = backend
        .load()
        .with_context(|| format!("cannot open comment store {}", backend.location()))?;
    if args.get_flag("json") {
        out.write_all(store.to_json_pretty()?.as_bytes())?;
    } else {
        render_store(&store, &backend.location(), out)?;
    }
    Ok(())
}
